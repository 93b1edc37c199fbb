//! Rapidframework Core - Shared library for package-manager aware scaffolding
//!
//! This library detects which package manager installed the running tool,
//! resolves that manager's install/uninstall subcommands from a bundled
//! registry, installs framework dependencies with it and lays out a starter
//! project in the current working directory.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - Manager registry, installer detection,
//!   package installation and filesystem layout
//! - **Layer 2: Workflow Orchestration** - `ProductConfig` trait, the process-wide
//!   `ScaffoldState` and `FrameworkTemplate`
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use rapidframework_core::{FrameworkCatalog, FrameworkTemplate, PackageInstaller, ScaffoldState};
//!
//! let catalog = FrameworkCatalog::bundled()?;
//! let template = FrameworkTemplate::new(catalog.find("fastapi")?, ScaffoldState::get());
//! let installer = PackageInstaller::new()?;
//! template.install_framework(&Default::default(), &installer).await?;
//! ```

pub mod frameworks;
pub mod managers;
pub mod product;
pub mod scaffold;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use frameworks::{
    Framework, FrameworkCatalog, FrameworkError, FrameworkTemplate, TemplateOptions,
};
pub use managers::{
    detect_active_manager, FailurePolicy, InstallOutcome, ManagerError, ManagerRegistry,
    PackageInstaller,
};
pub use product::ProductConfig;
pub use scaffold::ScaffoldState;

#[cfg(feature = "tui")]
pub use tui::run;
