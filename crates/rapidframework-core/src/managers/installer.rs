//! Install and uninstall libraries through the detected package manager

use super::detect::{DistributionMetadata, InstallerDetector, MetadataSource};
use super::error::{FailureKind, ManagerError, SubprocessFailure};
use super::registry::ManagerRegistry;
use crate::product::ProductConfig;
use colored::Colorize;
use std::fmt;
use std::process::Command;
use tokio::runtime::RuntimeFlavor;

/// What to do after the package-manager subprocess fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum FailurePolicy {
    /// Report the failure and carry on scaffolding
    #[default]
    Continue,
    /// Return the failure as an error
    Abort,
}

/// Package-manager operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Install,
    Uninstall,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Install => write!(f, "install"),
            Action::Uninstall => write!(f, "uninstall"),
        }
    }
}

/// Result of an install/uninstall that did not abort
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    Completed,
    /// The subprocess failed; already reported to the user
    Failed(SubprocessFailure),
}

impl InstallOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, InstallOutcome::Completed)
    }
}

/// Runs a command line to completion
pub trait CommandRunner {
    /// `argv[0]` is the program, the rest its arguments
    fn run(&self, argv: &[String]) -> Result<(), FailureKind>;
}

/// Runs commands as child processes in the current directory, inheriting
/// the environment and standard streams
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, argv: &[String]) -> Result<(), FailureKind> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| FailureKind::Spawn("empty command line".to_string()))?;

        let status = Command::new(program)
            .args(args)
            .status()
            .map_err(|e| FailureKind::Spawn(e.to_string()))?;

        if status.success() {
            Ok(())
        } else {
            Err(FailureKind::Exit(status.code()))
        }
    }
}

/// Run a blocking package-manager call from inside a tokio runtime
///
/// On a multi-threaded runtime the worker is handed off with
/// [`tokio::task::block_in_place`]. Outside a runtime, or on a current-thread
/// runtime where that is not allowed, `f` runs directly.
pub fn run_blocking<T>(f: impl FnOnce() -> T) -> T {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(f)
        }
        _ => f(),
    }
}

/// Resolves the active manager's commands and runs them
///
/// Every call spawns exactly one child process. There are no retries and no
/// timeout; the call blocks until the manager exits.
#[derive(Debug, Clone)]
pub struct PackageInstaller<S = DistributionMetadata, R = SystemRunner> {
    registry: ManagerRegistry,
    detector: InstallerDetector<S>,
    runner: R,
    policy: FailurePolicy,
}

impl PackageInstaller {
    /// Installer backed by the bundled registry and the default detector
    pub fn new() -> Result<Self, ManagerError> {
        let registry = ManagerRegistry::shared()?.clone();
        Ok(Self::with_parts(registry, InstallerDetector::new(), SystemRunner))
    }

    /// Installer using a product's metadata location and defaults
    pub fn for_product<C: ProductConfig>(config: &C) -> Result<Self, ManagerError> {
        let registry = ManagerRegistry::shared()?.clone();
        Ok(
            Self::with_parts(registry, InstallerDetector::for_product(config), SystemRunner)
                .with_policy(config.failure_policy()),
        )
    }
}

impl<S: MetadataSource, R: CommandRunner> PackageInstaller<S, R> {
    pub fn with_parts(
        registry: ManagerRegistry,
        detector: InstallerDetector<S>,
        runner: R,
    ) -> Self {
        Self {
            registry,
            detector,
            runner,
            policy: FailurePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn registry(&self) -> &ManagerRegistry {
        &self.registry
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// The manager the next call would use
    pub fn active_manager(&self) -> String {
        self.detector.detect_active_manager()
    }

    /// Build the command line for an action without running it
    pub fn command_for<L: AsRef<str>>(
        &self,
        action: Action,
        libraries: &[L],
    ) -> Result<Vec<String>, ManagerError> {
        let manager = self.detector.detect_active_manager();
        let entry = self
            .registry
            .get(&manager)
            .ok_or_else(|| ManagerError::UnknownManager(manager.clone()))?;

        let subcommand = match action {
            Action::Install => &entry.install,
            Action::Uninstall => &entry.uninstall,
        };

        let mut argv = Vec::with_capacity(libraries.len() + 2);
        argv.push(manager);
        argv.push(subcommand.clone());
        argv.extend(libraries.iter().map(|lib| lib.as_ref().to_string()));
        Ok(argv)
    }

    pub fn install<L: AsRef<str>>(&self, libraries: &[L]) -> Result<InstallOutcome, ManagerError> {
        self.execute(Action::Install, libraries)
    }

    pub fn uninstall<L: AsRef<str>>(
        &self,
        libraries: &[L],
    ) -> Result<InstallOutcome, ManagerError> {
        self.execute(Action::Uninstall, libraries)
    }

    fn execute<L: AsRef<str>>(
        &self,
        action: Action,
        libraries: &[L],
    ) -> Result<InstallOutcome, ManagerError> {
        let argv = self.command_for(action, libraries)?;
        let command = argv.join(" ");

        println!("{} {}", "Running:".dimmed(), command.yellow());
        tracing::info!(%action, %command, "running package manager");

        match self.runner.run(&argv) {
            Ok(()) => Ok(InstallOutcome::Completed),
            Err(kind) => {
                let failure = SubprocessFailure { command, kind };
                match self.policy {
                    FailurePolicy::Abort => Err(failure.into()),
                    FailurePolicy::Continue => {
                        report_failure(action, &failure);
                        Ok(InstallOutcome::Failed(failure))
                    }
                }
            }
        }
    }
}

fn report_failure(action: Action, failure: &SubprocessFailure) {
    eprintln!(
        "{} {}",
        format!("Failed to {} packages:", action).red(),
        failure
    );
    tracing::warn!(
        %action,
        command = %failure.command,
        reason = %failure.kind,
        "package manager failed"
    );
}
