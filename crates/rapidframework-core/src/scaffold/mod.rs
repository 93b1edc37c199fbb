//! Project context and filesystem layout

pub mod layout;
pub mod state;

use std::path::PathBuf;
use thiserror::Error;

pub use state::{ScaffoldState, DEFAULT_DIRS};

#[derive(Debug, Error)]
pub enum ScaffoldError {
    #[error("Failed to create directory: {}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create file: {}", path.display())]
    CreateFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
