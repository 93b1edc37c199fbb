//! rapidframework CLI - Project scaffolding for Python frameworks

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use rapidframework_core::frameworks::{print_frameworks, Framework};
use rapidframework_core::managers::{print_managers, FailurePolicy, InstallOutcome};
use rapidframework_core::tui::NewArgs;
use rapidframework_core::{FrameworkCatalog, PackageInstaller, ProductConfig};
use std::path::Path;

/// rapidframework product configuration
#[derive(Clone)]
pub struct RapidConfig;

impl ProductConfig for RapidConfig {
    fn name(&self) -> &'static str {
        "rapidframework"
    }

    fn display_name(&self) -> &'static str {
        "rapidframework"
    }

    fn cli_description(&self) -> &'static str {
        "CLI for scaffolding Python framework projects"
    }

    fn next_steps(&self, dir: &Path, framework: &Framework) -> Vec<String> {
        let mut steps = Vec::new();
        let current = std::env::current_dir().ok();

        // Step 1: cd to directory if not current
        if current.as_deref() != Some(dir) {
            steps.push(format!("cd {}", dir.display()));
        }

        // Step 2: Framework-specific entry point
        match framework.name.as_str() {
            "fastapi" | "litestar" => steps.push("uvicorn main:app --reload".to_string()),
            "flask" => steps.push("flask --app main run --debug".to_string()),
            _ => steps.push("python main.py --help".to_string()),
        }

        steps
    }
}

#[derive(Parser, Debug)]
#[command(name = "rapidframework")]
#[command(about = "CLI for scaffolding Python framework projects")]
#[command(version)]
pub struct Args {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scaffold a new framework project in the current directory
    New(CliNewArgs),
    /// Install libraries with the detected package manager
    Install(PackagesArgs),
    /// Uninstall libraries with the detected package manager
    Uninstall(PackagesArgs),
    /// List known package managers and the detected one
    Managers,
    /// List supported frameworks
    Frameworks,
}

#[derive(Parser, Debug)]
pub struct CliNewArgs {
    /// Framework to scaffold (e.g. fastapi, flask)
    pub framework: Option<String>,

    /// Framework version to pin
    #[arg(long)]
    pub version: Option<String>,

    /// Extra libraries to install (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub libs: Vec<String>,

    /// Extra directories to create (comma-separated)
    #[arg(long = "extra-dirs", value_delimiter = ',')]
    pub extra_dirs: Vec<String>,

    /// Extra empty files to create (comma-separated)
    #[arg(long = "extra-files", value_delimiter = ',')]
    pub extra_files: Vec<String>,

    /// Bundled example to write into the project
    #[arg(short, long)]
    pub example: Option<u32>,

    /// File name for the example (without .py)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Skip dependency installation
    #[arg(long = "skip-install")]
    pub skip_install: bool,

    /// What to do when dependency installation fails
    #[arg(long = "on-failure", value_enum)]
    pub on_failure: Option<FailurePolicy>,

    /// Abort when dependency installation fails (same as --on-failure abort)
    #[arg(long, conflicts_with = "on_failure")]
    pub strict: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

impl From<CliNewArgs> for NewArgs {
    fn from(args: CliNewArgs) -> Self {
        NewArgs {
            framework: args.framework,
            version: args.version,
            libs: args.libs,
            extra_dirs: args.extra_dirs,
            extra_files: args.extra_files,
            example: args.example,
            name: args.name,
            skip_install: args.skip_install,
            policy: failure_policy(args.strict, args.on_failure),
            yes: args.yes,
        }
    }
}

#[derive(Parser, Debug)]
pub struct PackagesArgs {
    /// Libraries to pass to the package manager
    pub libs: Vec<String>,

    /// What to do when the package manager fails
    #[arg(long = "on-failure", value_enum)]
    pub on_failure: Option<FailurePolicy>,

    /// Exit with an error when the package manager fails
    #[arg(long, conflicts_with = "on_failure")]
    pub strict: bool,
}

/// Resolve the failure policy from `--strict` / `--on-failure`
fn failure_policy(strict: bool, on_failure: Option<FailurePolicy>) -> Option<FailurePolicy> {
    if strict {
        Some(FailurePolicy::Abort)
    } else {
        on_failure
    }
}

fn init_logging(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbose {
        0 => EnvFilter::new("rapidframework_core=warn"),
        1 => EnvFilter::new("rapidframework_core=info"),
        _ => EnvFilter::new("rapidframework_core=debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

fn run_packages(config: &RapidConfig, args: PackagesArgs, uninstall: bool) -> Result<()> {
    let mut installer = PackageInstaller::for_product(config)?;
    if let Some(policy) = failure_policy(args.strict, args.on_failure) {
        installer = installer.with_policy(policy);
    }

    let outcome = if uninstall {
        installer.uninstall(args.libs.as_slice())?
    } else {
        installer.install(args.libs.as_slice())?
    };

    if let InstallOutcome::Completed = outcome {
        println!("{}", "Done".green().bold());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    init_logging(args.verbose);
    let config = RapidConfig;

    match args.command {
        Some(Command::New(new_args)) => {
            let result = rapidframework_core::run(&config, new_args.into()).await;

            // Ensure cursor is visible on normal exit
            let _ = console::Term::stderr().show_cursor();

            result
        }
        Some(Command::Install(packages)) => run_packages(&config, packages, false),
        Some(Command::Uninstall(packages)) => run_packages(&config, packages, true),
        Some(Command::Managers) => {
            let installer = PackageInstaller::for_product(&config)?;
            print_managers(installer.registry(), &installer.active_manager());
            Ok(())
        }
        Some(Command::Frameworks) => {
            print_frameworks(&FrameworkCatalog::bundled()?);
            Ok(())
        }
        None => {
            // No subcommand provided, default to the interactive new-project flow
            let result = rapidframework_core::run(&config, NewArgs::default()).await;

            // Ensure cursor is visible on normal exit
            let _ = console::Term::stderr().show_cursor();

            result
        }
    }
}
