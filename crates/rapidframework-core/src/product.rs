//! Product configuration trait for CLI binaries
//!
//! This trait defines the interface a binary implements to configure how
//! the scaffolder identifies its own installation and talks to the user.

use crate::frameworks::Framework;
use crate::managers::detect::{DEFAULT_MANAGER, DISTRIBUTION_NAME, DIST_INFO_ENV};
use crate::managers::FailurePolicy;
use std::path::Path;

/// Configuration trait for CLI products
///
/// Each product implements this trait to define:
/// - Product identity (name, display name)
/// - Where its installation metadata lives
/// - Package-manager defaults
/// - Post-setup instructions
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for CLI command)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// CLI description shown in help text
    fn cli_description(&self) -> &'static str;

    /// Generate the "next steps" instructions after project creation
    fn next_steps(&self, dir: &Path, framework: &Framework) -> Vec<String>;

    /// Name of the installed distribution whose metadata records the installer
    fn distribution_name(&self) -> &'static str {
        DISTRIBUTION_NAME
    }

    /// Environment variable that points at the distribution metadata directory
    fn metadata_dir_env(&self) -> &'static str {
        DIST_INFO_ENV
    }

    /// Manager used when the installer cannot be detected
    fn default_manager(&self) -> &'static str {
        DEFAULT_MANAGER
    }

    /// Behaviour after a failed install when the user did not choose one
    fn failure_policy(&self) -> FailurePolicy {
        FailurePolicy::Continue
    }
}
