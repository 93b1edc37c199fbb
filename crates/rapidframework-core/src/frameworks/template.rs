//! Installing a framework and laying out its starter project

use super::catalog::Framework;
use super::FrameworkError;
use crate::managers::{
    run_blocking, CommandRunner, InstallOutcome, MetadataSource, PackageInstaller,
};
use crate::scaffold::{layout, ScaffoldState};
use std::path::PathBuf;

/// Per-run options for a framework template
#[derive(Debug, Clone, Default)]
pub struct TemplateOptions {
    /// Directories created on top of the framework's own
    pub extra_dirs: Vec<String>,
    /// Empty files created on top of the framework's own
    pub extra_files: Vec<String>,
    /// Version to pin the framework package to
    pub version: Option<String>,
    /// Libraries installed before the framework package
    pub libs: Vec<String>,
}

/// Directories and files produced by [`FrameworkTemplate::setup_framework`]
#[derive(Debug, Clone, Default)]
pub struct SetupSummary {
    pub dirs: Vec<PathBuf>,
    pub files: Vec<PathBuf>,
}

/// A framework bound to the project it is scaffolded into
pub struct FrameworkTemplate<'a> {
    framework: &'a Framework,
    state: &'a ScaffoldState,
}

impl<'a> FrameworkTemplate<'a> {
    pub fn new(framework: &'a Framework, state: &'a ScaffoldState) -> Self {
        Self { framework, state }
    }

    pub fn framework(&self) -> &Framework {
        self.framework
    }

    /// Libraries to install: the caller's, the framework's, then the framework itself
    pub fn libraries(&self, options: &TemplateOptions) -> Vec<String> {
        let mut libs = options.libs.clone();
        libs.extend(self.framework.libs.iter().cloned());
        libs.push(self.framework.requirement(options.version.as_deref()));
        libs
    }

    /// Install the framework's libraries, then set up the project layout
    ///
    /// A failed install does not stop the layout from being created unless
    /// the installer's policy is to abort.
    pub async fn install_framework<S: MetadataSource, R: CommandRunner>(
        &self,
        options: &TemplateOptions,
        installer: &PackageInstaller<S, R>,
    ) -> Result<(InstallOutcome, SetupSummary), FrameworkError> {
        let libraries = self.libraries(options);
        let outcome = run_blocking(|| installer.install(libraries.as_slice()))?;
        let summary = self.setup_framework(options).await?;
        Ok((outcome, summary))
    }

    /// Create the default, framework and extra directories and files
    pub async fn setup_framework(
        &self,
        options: &TemplateOptions,
    ) -> Result<SetupSummary, FrameworkError> {
        let mut extra_dirs = self.framework.extra_dirs.clone();
        extra_dirs.extend(options.extra_dirs.iter().cloned());
        let dirs = self.state.create_dirs(&extra_dirs).await?;

        let mut extra_files = self.framework.extra_files.clone();
        extra_files.extend(options.extra_files.iter().cloned());
        let files = self.state.create_files(&extra_files).await?;

        tracing::info!(
            framework = %self.framework.name,
            dirs = dirs.len(),
            files = files.len(),
            "project layout created"
        );

        Ok(SetupSummary { dirs, files })
    }

    /// Write bundled example `example_id` to `<source_dir>/<name>.py`
    ///
    /// `name` must be a plain file stem; separators and `..` are rejected so
    /// the example always lands directly in the project directory.
    pub async fn create_example(
        &self,
        name: &str,
        example_id: u32,
    ) -> Result<PathBuf, FrameworkError> {
        validate_example_name(name)?;

        let source = self
            .framework
            .example(example_id)
            .ok_or_else(|| FrameworkError::ExampleNotFound {
                framework: self.framework.name.clone(),
                id: example_id,
            })?;

        let file_name = format!("{}.py", name);
        let path = layout::write_file(self.state.source_dir(), &file_name, source).await?;
        Ok(path)
    }
}

fn validate_example_name(name: &str) -> Result<(), FrameworkError> {
    let invalid = name.trim().is_empty()
        || name == "."
        || name.contains("..")
        || name.chars().any(|c| c == '/' || c == '\\' || std::path::is_separator(c));

    if invalid {
        return Err(FrameworkError::InvalidExampleName(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frameworks::FrameworkCatalog;
    use crate::managers::{DetectionError, FailureKind, InstallerDetector, ManagerRegistry};
    use std::cell::RefCell;

    struct Installed(&'static str);

    impl MetadataSource for Installed {
        fn read_installer(&self) -> Result<String, DetectionError> {
            Ok(self.0.to_string())
        }
    }

    struct Recorder {
        calls: RefCell<Vec<Vec<String>>>,
        result: Result<(), FailureKind>,
    }

    impl CommandRunner for Recorder {
        fn run(&self, argv: &[String]) -> Result<(), FailureKind> {
            self.calls.borrow_mut().push(argv.to_vec());
            self.result.clone()
        }
    }

    fn installer(result: Result<(), FailureKind>) -> PackageInstaller<Installed, Recorder> {
        PackageInstaller::with_parts(
            ManagerRegistry::load("managers.json").unwrap(),
            InstallerDetector::with_source(Installed("uv")),
            Recorder {
                calls: RefCell::new(Vec::new()),
                result,
            },
        )
    }

    fn fastapi() -> Framework {
        FrameworkCatalog::bundled()
            .unwrap()
            .get("fastapi")
            .unwrap()
            .clone()
    }

    #[test]
    fn test_libraries_order_and_pin() {
        let framework = fastapi();
        let state = ScaffoldState::detached("/tmp/demo", "uv");
        let template = FrameworkTemplate::new(&framework, &state);

        let options = TemplateOptions {
            version: Some("0.110.0".to_string()),
            libs: vec!["sqlalchemy".to_string()],
            ..Default::default()
        };

        assert_eq!(
            template.libraries(&options),
            vec!["sqlalchemy", "uvicorn", "fastapi==0.110.0"]
        );
    }

    #[tokio::test]
    async fn test_install_framework_installs_then_sets_up() {
        let dir = tempfile::tempdir().unwrap();
        let framework = fastapi();
        let state = ScaffoldState::detached(dir.path(), "uv");
        let template = FrameworkTemplate::new(&framework, &state);
        let installer = installer(Ok(()));

        let (outcome, summary) = template
            .install_framework(&TemplateOptions::default(), &installer)
            .await
            .unwrap();

        assert!(outcome.is_completed());
        assert_eq!(
            installer.runner().calls.borrow().clone(),
            vec![vec!["uv", "add", "uvicorn", "fastapi"]]
        );
        assert!(dir.path().join("app/routers").is_dir());
        assert!(dir.path().join("static/images").is_dir());
        assert!(dir.path().join("app/__init__.py").is_file());
        assert!(!summary.files.is_empty());
    }

    #[tokio::test]
    async fn test_failed_install_still_sets_up() {
        let dir = tempfile::tempdir().unwrap();
        let framework = fastapi();
        let state = ScaffoldState::detached(dir.path(), "uv");
        let template = FrameworkTemplate::new(&framework, &state);
        let installer = installer(Err(FailureKind::Exit(Some(1))));

        let (outcome, _) = template
            .install_framework(&TemplateOptions::default(), &installer)
            .await
            .unwrap();

        assert!(matches!(outcome, InstallOutcome::Failed(_)));
        assert!(dir.path().join("tests").is_dir());
    }

    #[tokio::test]
    async fn test_setup_framework_with_extras() {
        let dir = tempfile::tempdir().unwrap();
        let framework = fastapi();
        let state = ScaffoldState::detached(dir.path(), "pip");
        let template = FrameworkTemplate::new(&framework, &state);

        let options = TemplateOptions {
            extra_dirs: vec!["migrations".to_string()],
            extra_files: vec!["README.md".to_string()],
            ..Default::default()
        };
        template.setup_framework(&options).await.unwrap();

        assert!(dir.path().join("migrations").is_dir());
        assert!(dir.path().join("README.md").is_file());
    }

    #[tokio::test]
    async fn test_create_example() {
        let dir = tempfile::tempdir().unwrap();
        let framework = fastapi();
        let state = ScaffoldState::detached(dir.path(), "pip");
        let template = FrameworkTemplate::new(&framework, &state);

        let path = template.create_example("main", 1).await.unwrap();

        assert_eq!(path, dir.path().join("main.py"));
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains("FastAPI"));
    }

    #[tokio::test]
    async fn test_create_unknown_example() {
        let dir = tempfile::tempdir().unwrap();
        let framework = fastapi();
        let state = ScaffoldState::detached(dir.path(), "pip");
        let template = FrameworkTemplate::new(&framework, &state);

        let err = template.create_example("main", 99).await.unwrap_err();

        assert!(matches!(err, FrameworkError::ExampleNotFound { id: 99, .. }));
        assert!(!dir.path().join("main.py").exists());
    }

    #[tokio::test]
    async fn test_create_example_rejects_paths_outside_project() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("project");
        std::fs::create_dir(&project).unwrap();
        let framework = fastapi();
        let state = ScaffoldState::detached(&project, "pip");
        let template = FrameworkTemplate::new(&framework, &state);

        for name in ["../escape", "app/main", "..", "", "a\\b"] {
            let err = template.create_example(name, 1).await.unwrap_err();
            assert!(
                matches!(err, FrameworkError::InvalidExampleName(ref n) if n == name),
                "expected {:?} to be rejected, got {:?}",
                name,
                err
            );
        }

        assert!(!dir.path().join("escape.py").exists());
        assert!(!project.join("app").exists());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_install_framework_on_multi_thread_runtime() {
        let dir = tempfile::tempdir().unwrap();
        let framework = fastapi();
        let state = ScaffoldState::detached(dir.path(), "uv");
        let template = FrameworkTemplate::new(&framework, &state);
        let installer = installer(Ok(()));

        let (outcome, _) = template
            .install_framework(&TemplateOptions::default(), &installer)
            .await
            .unwrap();

        assert!(outcome.is_completed());
        assert_eq!(installer.runner().calls.borrow().len(), 1);
        assert!(dir.path().join("app/routers").is_dir());
    }
}
