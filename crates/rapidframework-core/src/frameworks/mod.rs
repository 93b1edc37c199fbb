//! Framework catalogue and project templates
//!
//! This module provides:
//! - The bundled catalogue of supported frameworks (`frameworks.yaml`)
//! - Bundled example sources per framework
//! - [`FrameworkTemplate`], which installs a framework and creates its layout

pub mod catalog;
pub mod template;

use crate::managers::ManagerError;
use crate::scaffold::ScaffoldError;
use colored::Colorize;
use thiserror::Error;

pub use catalog::{Framework, FrameworkCatalog};
pub use template::{FrameworkTemplate, SetupSummary, TemplateOptions};

#[derive(Debug, Error)]
pub enum FrameworkError {
    #[error("Framework '{name}' not found. Available frameworks: {available}")]
    UnknownFramework { name: String, available: String },

    #[error("Example {id} not found for framework '{framework}'")]
    ExampleNotFound { framework: String, id: u32 },

    #[error("Invalid example name '{0}': expected a file name without path separators")]
    InvalidExampleName(String),

    #[error("Invalid framework catalog: {0}")]
    Catalog(#[from] serde_yaml::Error),

    #[error(transparent)]
    Manager(#[from] ManagerError),

    #[error(transparent)]
    Scaffold(#[from] ScaffoldError),
}

/// Print the supported frameworks with their examples
pub fn print_frameworks(catalog: &FrameworkCatalog) {
    println!("{}", "Frameworks".cyan().bold());
    println!();

    for framework in catalog.frameworks() {
        let examples = if framework.examples.is_empty() {
            String::new()
        } else {
            let ids: Vec<String> = framework.examples.iter().map(u32::to_string).collect();
            format!("(examples: {})", ids.join(", "))
        };
        println!(
            "  {} {:<10} {} {}",
            "->".blue(),
            framework.name,
            framework.description,
            examples.dimmed()
        );
    }
}
