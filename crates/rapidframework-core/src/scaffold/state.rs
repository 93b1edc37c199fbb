//! Process-wide project context

use super::{layout, ScaffoldError};
use crate::managers::detect_active_manager;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Directories every scaffolded project gets, relative to the source dir
pub const DEFAULT_DIRS: &[&str] = &[
    "tests",
    "templates",
    "static",
    "static/css",
    "static/js",
    "static/images",
];

static STATE: OnceLock<ScaffoldState> = OnceLock::new();

/// The project being scaffolded
///
/// One instance per process, captured on first access from the current
/// working directory and never modified afterwards.
#[derive(Debug)]
pub struct ScaffoldState {
    source_dir: PathBuf,
    project_name: String,
    dirs_to_create: Vec<String>,
    active_manager: String,
}

impl ScaffoldState {
    /// The process-wide state, initialized on first call
    pub fn get() -> &'static ScaffoldState {
        STATE.get_or_init(Self::capture)
    }

    /// Whether [`ScaffoldState::get`] has run yet
    pub fn is_initialized() -> bool {
        STATE.get().is_some()
    }

    fn capture() -> Self {
        let source_dir = std::env::current_dir().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "current directory unavailable, using '.'");
            PathBuf::from(".")
        });
        let state = Self::detached(source_dir, detect_active_manager());

        tracing::debug!(
            source_dir = %state.source_dir.display(),
            project = %state.project_name,
            manager = %state.active_manager,
            "scaffold state initialized"
        );
        state
    }

    /// A state for an explicit directory, independent of the process-wide one
    pub fn detached(source_dir: impl Into<PathBuf>, active_manager: impl Into<String>) -> Self {
        let source_dir = source_dir.into();
        let project_name = source_dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            source_dir,
            project_name,
            dirs_to_create: DEFAULT_DIRS.iter().map(|d| d.to_string()).collect(),
            active_manager: active_manager.into(),
        }
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Final component of the source directory
    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn dirs_to_create(&self) -> &[String] {
        &self.dirs_to_create
    }

    /// Package manager detected when the state was captured
    pub fn active_manager(&self) -> &str {
        &self.active_manager
    }

    /// Create the default directories plus `extra`, in that order
    pub async fn create_dirs(&self, extra: &[String]) -> Result<Vec<PathBuf>, ScaffoldError> {
        let mut dirs = self.dirs_to_create.clone();
        dirs.extend(extra.iter().cloned());
        layout::create_dirs(&self.source_dir, dirs.as_slice()).await
    }

    /// Create empty files relative to the source directory
    pub async fn create_files(&self, files: &[String]) -> Result<Vec<PathBuf>, ScaffoldError> {
        layout::create_files(&self.source_dir, files).await
    }
}
