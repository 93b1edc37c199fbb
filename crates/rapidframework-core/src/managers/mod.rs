//! Package-manager resolution and invocation
//!
//! This module provides:
//! - The bundled registry of manager install/uninstall subcommands
//! - Detection of the manager that installed this tool
//! - The installer that combines both and runs the manager

pub mod detect;
pub mod error;
pub mod installer;
pub mod registry;

use colored::Colorize;

pub use detect::{
    detect_active_manager, Detection, DetectionError, DistributionMetadata, InstallerDetector,
    MetadataSource, DEFAULT_MANAGER,
};
pub use error::{FailureKind, ManagerError, SubprocessFailure};
pub use installer::{
    run_blocking, Action, CommandRunner, FailurePolicy, InstallOutcome, PackageInstaller,
    SystemRunner,
};
pub use registry::{ManagerEntry, ManagerRegistry, DEFAULT_RESOURCE};

/// Print the registry, marking the active manager
pub fn print_managers(registry: &ManagerRegistry, active: &str) {
    println!("{}", "Package managers".cyan().bold());
    println!();

    for entry in registry.entries() {
        let marker = if entry.name == active {
            "*".green().bold()
        } else {
            " ".normal()
        };
        println!(
            "  {} {:<8} {} {}",
            marker,
            entry.name,
            format!("install: {}", entry.install).dimmed(),
            format!("uninstall: {}", entry.uninstall).dimmed()
        );
    }

    println!();
    if registry.contains(active) {
        println!("{} {}", "Active:".green().bold(), active);
    } else {
        println!(
            "{} {} {}",
            "Active:".yellow().bold(),
            active,
            "(not in registry, installs will fail)".yellow()
        );
    }
}
