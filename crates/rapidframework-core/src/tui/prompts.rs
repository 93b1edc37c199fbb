//! Charm-style CLI prompts using cliclack

use crate::frameworks::{Framework, FrameworkCatalog, FrameworkTemplate, TemplateOptions};
use crate::managers::{run_blocking, Action, FailurePolicy, InstallOutcome, PackageInstaller};
use crate::product::ProductConfig;
use crate::scaffold::ScaffoldState;
use anyhow::{Context, Result};

/// Default file name (without `.py`) for example sources
const DEFAULT_EXAMPLE_NAME: &str = "main";

/// CLI arguments for the new-project command
#[derive(Debug, Clone, Default)]
pub struct NewArgs {
    /// Framework to scaffold
    pub framework: Option<String>,

    /// Version to pin the framework to
    pub version: Option<String>,

    /// Extra libraries to install
    pub libs: Vec<String>,

    /// Extra directories to create
    pub extra_dirs: Vec<String>,

    /// Extra empty files to create
    pub extra_files: Vec<String>,

    /// Bundled example to write into the project
    pub example: Option<u32>,

    /// File name for the example (without extension)
    pub name: Option<String>,

    /// Skip dependency installation
    pub skip_install: bool,

    /// Failure policy override; falls back to the product default
    pub policy: Option<FailurePolicy>,

    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,
}

impl NewArgs {
    fn template_options(&self) -> TemplateOptions {
        TemplateOptions {
            extra_dirs: self.extra_dirs.clone(),
            extra_files: self.extra_files.clone(),
            version: self.version.clone(),
            libs: self.libs.clone(),
        }
    }
}

/// Run the new-project flow with interactive prompts
pub async fn run<C: ProductConfig>(config: &C, args: NewArgs) -> Result<()> {
    cliclack::intro(config.display_name())?;

    // Step 1: Capture project context
    let state = ScaffoldState::get();
    cliclack::log::info(format!(
        "Project: {} ({})",
        state.project_name(),
        state.source_dir().display()
    ))?;
    confirm_existing_items(state, &args)?;

    // Step 2: Select framework
    let catalog = FrameworkCatalog::bundled()?;
    let framework = select_framework(&catalog, args.framework.as_deref(), args.yes)?;
    let template = FrameworkTemplate::new(framework, state);
    let options = args.template_options();

    // Step 3: Install dependencies
    if args.skip_install {
        cliclack::log::info("Skipping dependency installation")?;
    } else {
        install_dependencies(config, &template, &options, &args)?;
    }

    // Step 4: Create layout
    let spinner = cliclack::spinner();
    spinner.start("Creating project layout...");
    let summary = match template.setup_framework(&options).await {
        Ok(summary) => summary,
        Err(e) => {
            spinner.stop("Failed to create project layout");
            return Err(e.into());
        }
    };
    spinner.stop(format!(
        "Created {} directories and {} files in {}",
        summary.dirs.len(),
        summary.files.len(),
        state.source_dir().display()
    ));

    // Step 5: Example source
    if let Some(id) = select_example(framework, &args)? {
        let name = args.name.as_deref().unwrap_or(DEFAULT_EXAMPLE_NAME);
        let path = template.create_example(name, id).await?;
        cliclack::log::success(format!("Example written to {}", path.display()))?;
    }

    // Step 6: Show next steps
    print_next_steps(config, state, framework)?;

    Ok(())
}

fn confirm_existing_items(state: &ScaffoldState, args: &NewArgs) -> Result<()> {
    let count = match std::fs::read_dir(state.source_dir()) {
        Ok(entries) => entries.count(),
        Err(_) => return Ok(()),
    };
    if count == 0 {
        return Ok(());
    }

    cliclack::log::warning(format!("Directory has {} existing items", count))?;

    // Auto-confirm with --yes flag
    let confirm = if args.yes {
        true
    } else {
        cliclack::confirm("Continue anyway?")
            .initial_value(true)
            .interact()?
    };

    if !confirm {
        anyhow::bail!("Setup cancelled.");
    }
    Ok(())
}

fn select_framework<'c>(
    catalog: &'c FrameworkCatalog,
    specified: Option<&str>,
    yes: bool,
) -> Result<&'c Framework> {
    if let Some(name) = specified {
        let framework = catalog.find(name)?;
        cliclack::log::info(format!(
            "Framework: {} - {}",
            framework.name, framework.description
        ))?;
        return Ok(framework);
    }

    if yes {
        anyhow::bail!(
            "No framework given. Available frameworks: {}",
            catalog.names().join(", ")
        );
    }

    let mut select = cliclack::select("Select a framework");
    for (idx, framework) in catalog.frameworks().iter().enumerate() {
        select = select.item(idx, &framework.name, &framework.description);
    }
    let selected_idx: usize = select.interact()?;

    catalog
        .frameworks()
        .get(selected_idx)
        .context("Selected framework is out of range")
}

fn install_dependencies<C: ProductConfig>(
    config: &C,
    template: &FrameworkTemplate<'_>,
    options: &TemplateOptions,
    args: &NewArgs,
) -> Result<()> {
    let policy = args.policy.unwrap_or_else(|| config.failure_policy());
    let installer = PackageInstaller::for_product(config)?.with_policy(policy);
    let libraries = template.libraries(options);
    let command = installer.command_for(Action::Install, libraries.as_slice())?;

    cliclack::log::info(format!("This will execute: {}", command.join(" ")))?;

    let confirm = if args.yes {
        true
    } else {
        cliclack::confirm("Install dependencies now?")
            .initial_value(true)
            .interact()?
    };

    if !confirm {
        cliclack::log::info("Skipping dependency installation")?;
        return Ok(());
    }

    match run_blocking(|| installer.install(libraries.as_slice()))? {
        InstallOutcome::Completed => {
            cliclack::log::success(format!("Installed {}", libraries.join(", ")))?;
        }
        InstallOutcome::Failed(failure) => {
            cliclack::log::warning(format!(
                "{}\nContinuing with project setup; install the dependencies manually.",
                failure
            ))?;
        }
    }

    Ok(())
}

fn select_example(framework: &Framework, args: &NewArgs) -> Result<Option<u32>> {
    if let Some(id) = args.example {
        return Ok(Some(id));
    }
    if args.yes || framework.examples.is_empty() {
        return Ok(None);
    }

    let mut select = cliclack::select("Add an example?").item(0u32, "No example", "");
    for id in &framework.examples {
        select = select.item(*id, format!("Example {}", id), "");
    }
    let selected: u32 = select.interact()?;

    Ok((selected != 0).then_some(selected))
}

fn print_next_steps<C: ProductConfig>(
    config: &C,
    state: &ScaffoldState,
    framework: &Framework,
) -> Result<()> {
    let steps = config.next_steps(state.source_dir(), framework);

    println!();
    println!("  Next steps");
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step);
    }

    cliclack::outro("Happy coding!")?;

    Ok(())
}
