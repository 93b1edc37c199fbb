//! Detection of the package manager that installed this tool
//!
//! The installer is recorded in the distribution's metadata directory as a
//! plain `INSTALLER` file. Detection is best-effort: any failure resolves to
//! the default manager and is only logged at debug level.

use crate::product::ProductConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Manager used whenever the installer cannot be determined
pub const DEFAULT_MANAGER: &str = "pip";

/// Distribution name whose metadata is inspected
pub const DISTRIBUTION_NAME: &str = "rapidframework";

/// Environment variable pointing at the distribution's metadata directory
pub const DIST_INFO_ENV: &str = "RAPIDFRAMEWORK_DIST_INFO";

const INSTALLER_RECORD: &str = "INSTALLER";

/// Outcome of installer detection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    /// The metadata named a manager (whitespace already stripped)
    Detected(String),
    /// The metadata could not be read or was empty
    Unresolved,
}

impl Detection {
    /// Collapse to a manager name, using `default` when unresolved
    pub fn into_manager(self, default: &str) -> String {
        match self {
            Detection::Detected(name) => name,
            Detection::Unresolved => default.to_string(),
        }
    }
}

/// Why the installer record could not be read
#[derive(Debug, Error)]
pub enum DetectionError {
    #[error("distribution '{0}' could not be located")]
    DistributionNotFound(String),

    #[error("failed to read {}", path.display())]
    RecordUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not valid UTF-8", .0.display())]
    Decode(PathBuf),
}

/// Source of the raw installer value
pub trait MetadataSource {
    fn read_installer(&self) -> Result<String, DetectionError>;
}

/// Installed-distribution metadata on the local filesystem
#[derive(Debug, Clone)]
pub struct DistributionMetadata {
    distribution: String,
    env_var: String,
    root: Option<PathBuf>,
}

impl Default for DistributionMetadata {
    fn default() -> Self {
        Self::new(DISTRIBUTION_NAME, DIST_INFO_ENV)
    }
}

impl DistributionMetadata {
    pub fn new(distribution: impl Into<String>, env_var: impl Into<String>) -> Self {
        Self {
            distribution: distribution.into(),
            env_var: env_var.into(),
            root: None,
        }
    }

    /// Metadata for the distribution described by a product config
    pub fn for_product<C: ProductConfig>(config: &C) -> Self {
        Self::new(config.distribution_name(), config.metadata_dir_env())
    }

    /// Metadata stored in a fixed directory, skipping the lookup
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
            ..Self::default()
        }
    }

    /// Candidate metadata directories, in lookup order
    fn candidates(&self) -> Vec<PathBuf> {
        let mut candidates = Vec::new();

        if let Some(dir) = std::env::var_os(&self.env_var) {
            candidates.push(PathBuf::from(dir));
        }

        if let Some(exe_dir) = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
        {
            candidates.push(exe_dir.join(format!("{}.dist-info", self.distribution)));
            candidates.push(exe_dir.join("..").join("share").join(&self.distribution));
        }

        candidates
    }

    /// Find the metadata directory of the installed distribution
    pub fn locate(&self) -> Result<PathBuf, DetectionError> {
        if let Some(root) = &self.root {
            return Ok(root.clone());
        }

        self.candidates()
            .into_iter()
            .find(|dir| dir.is_dir())
            .ok_or_else(|| DetectionError::DistributionNotFound(self.distribution.clone()))
    }
}

impl MetadataSource for DistributionMetadata {
    fn read_installer(&self) -> Result<String, DetectionError> {
        let path = self.locate()?.join(INSTALLER_RECORD);
        let bytes = std::fs::read(&path).map_err(|source| DetectionError::RecordUnreadable {
            path: path.clone(),
            source,
        })?;
        String::from_utf8(bytes).map_err(|_| DetectionError::Decode(path))
    }
}

/// Determines which package manager installed the running tool
#[derive(Debug, Clone)]
pub struct InstallerDetector<S = DistributionMetadata> {
    source: S,
    default_manager: String,
}

impl InstallerDetector {
    pub fn new() -> Self {
        Self::with_source(DistributionMetadata::default())
    }

    pub fn for_product<C: ProductConfig>(config: &C) -> Self {
        Self::with_source(DistributionMetadata::for_product(config))
            .with_default(config.default_manager())
    }
}

impl Default for InstallerDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: MetadataSource> InstallerDetector<S> {
    pub fn with_source(source: S) -> Self {
        Self {
            source,
            default_manager: DEFAULT_MANAGER.to_string(),
        }
    }

    /// Override the manager used when detection fails
    pub fn with_default(mut self, manager: impl Into<String>) -> Self {
        self.default_manager = manager.into();
        self
    }

    pub fn default_manager(&self) -> &str {
        &self.default_manager
    }

    pub fn detect(&self) -> Detection {
        match self.source.read_installer() {
            Ok(raw) => {
                let name: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
                if name.is_empty() {
                    tracing::debug!("installer record is empty");
                    Detection::Unresolved
                } else {
                    Detection::Detected(name)
                }
            }
            Err(e) => {
                tracing::debug!(error = %e, "installer detection failed");
                Detection::Unresolved
            }
        }
    }

    /// The detected manager, or the default one
    pub fn detect_active_manager(&self) -> String {
        self.detect().into_manager(&self.default_manager)
    }
}

/// Detect the active manager using the default distribution metadata
pub fn detect_active_manager() -> String {
    InstallerDetector::new().detect_active_manager()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingSource;

    impl MetadataSource for FailingSource {
        fn read_installer(&self) -> Result<String, DetectionError> {
            Err(DetectionError::DistributionNotFound("rapidframework".to_string()))
        }
    }

    struct FixedSource(&'static str);

    /// Removes a directory created next to the test executable
    struct RemoveOnDrop(PathBuf);

    impl Drop for RemoveOnDrop {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.0);
        }
    }

    fn exe_dir() -> PathBuf {
        std::env::current_exe()
            .unwrap()
            .parent()
            .unwrap()
            .to_path_buf()
    }

    /// Distribution name no other test or installation uses
    fn unique_distribution(label: &str) -> String {
        format!("rapidframework-test-{}-{}", label, std::process::id())
    }

    impl MetadataSource for FixedSource {
        fn read_installer(&self) -> Result<String, DetectionError> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn test_detects_installer_from_record() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("INSTALLER"), "uv\n").unwrap();

        let detector = InstallerDetector::with_source(DistributionMetadata::at(dir.path()));
        assert_eq!(detector.detect(), Detection::Detected("uv".to_string()));
        assert_eq!(detector.detect_active_manager(), "uv");
    }

    #[test]
    fn test_all_whitespace_is_stripped() {
        let detector = InstallerDetector::with_source(FixedSource(" p i\tp \r\n"));
        assert_eq!(detector.detect(), Detection::Detected("pip".to_string()));
    }

    #[test]
    fn test_missing_record_falls_back() {
        let dir = tempfile::tempdir().unwrap();

        let detector = InstallerDetector::with_source(DistributionMetadata::at(dir.path()));
        assert_eq!(detector.detect(), Detection::Unresolved);
        assert_eq!(detector.detect_active_manager(), "pip");
    }

    #[test]
    fn test_undecodable_record_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("INSTALLER"), [0xff, 0xfe, 0x00]).unwrap();

        let detector = InstallerDetector::with_source(DistributionMetadata::at(dir.path()));
        assert_eq!(detector.detect(), Detection::Unresolved);
        assert_eq!(detector.detect_active_manager(), "pip");
    }

    #[test]
    fn test_lookup_failure_falls_back() {
        let detector = InstallerDetector::with_source(FailingSource);
        assert_eq!(detector.detect(), Detection::Unresolved);
        assert_eq!(detector.detect_active_manager(), DEFAULT_MANAGER);
    }

    #[test]
    fn test_empty_record_is_unresolved() {
        let detector = InstallerDetector::with_source(FixedSource(" \n"));
        assert_eq!(detector.detect(), Detection::Unresolved);
    }

    #[test]
    fn test_custom_default_manager() {
        let detector = InstallerDetector::with_source(FailingSource).with_default("uv");
        assert_eq!(detector.detect_active_manager(), "uv");
    }

    #[test]
    fn test_unlocatable_distribution() {
        let metadata = DistributionMetadata::new(
            "rapidframework-test-missing-distribution",
            "RAPIDFRAMEWORK_TEST_UNSET_DIST_INFO",
        );
        assert!(matches!(
            metadata.locate(),
            Err(DetectionError::DistributionNotFound(_))
        ));
    }

    #[test]
    fn test_candidates_lookup_order() {
        let env_var = "RAPIDFRAMEWORK_TEST_ORDER_DIST_INFO";
        std::env::set_var(env_var, "/opt/rapidframework/meta");
        let distribution = unique_distribution("order");

        let candidates = DistributionMetadata::new(distribution.as_str(), env_var).candidates();

        assert_eq!(
            candidates,
            vec![
                PathBuf::from("/opt/rapidframework/meta"),
                exe_dir().join(format!("{}.dist-info", distribution)),
                exe_dir().join("..").join("share").join(&distribution),
            ]
        );
    }

    #[test]
    fn test_env_var_directory_is_used() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("INSTALLER"), "uv\n").unwrap();
        let env_var = "RAPIDFRAMEWORK_TEST_ENV_DIST_INFO";
        std::env::set_var(env_var, dir.path());

        let metadata = DistributionMetadata::new(unique_distribution("env"), env_var);
        assert_eq!(metadata.locate().unwrap(), dir.path());

        let detector = InstallerDetector::with_source(metadata);
        assert_eq!(detector.detect(), Detection::Detected("uv".to_string()));
    }

    #[test]
    fn test_missing_env_directory_falls_through_to_dist_info() {
        let env_var = "RAPIDFRAMEWORK_TEST_FALLTHROUGH_DIST_INFO";
        let missing = tempfile::tempdir().unwrap().path().join("gone");
        std::env::set_var(env_var, &missing);

        let distribution = unique_distribution("fallthrough");
        let dist_info = exe_dir().join(format!("{}.dist-info", distribution));
        std::fs::create_dir_all(&dist_info).unwrap();
        let _cleanup = RemoveOnDrop(dist_info.clone());
        std::fs::write(dist_info.join("INSTALLER"), "poetry\n").unwrap();

        let metadata = DistributionMetadata::new(distribution.as_str(), env_var);
        assert_eq!(metadata.locate().unwrap(), dist_info);

        let detector = InstallerDetector::with_source(metadata);
        assert_eq!(detector.detect(), Detection::Detected("poetry".to_string()));
    }

    #[test]
    fn test_share_directory_is_last_candidate() {
        let env_var = "RAPIDFRAMEWORK_TEST_SHARE_DIST_INFO";
        std::env::remove_var(env_var);

        let distribution = unique_distribution("share");
        let share = exe_dir().join("..").join("share").join(&distribution);
        std::fs::create_dir_all(&share).unwrap();
        let _cleanup = RemoveOnDrop(share.clone());
        std::fs::write(share.join("INSTALLER"), "pdm").unwrap();

        let detector = InstallerDetector::with_source(DistributionMetadata::new(
            distribution.as_str(),
            env_var,
        ));
        assert_eq!(detector.detect(), Detection::Detected("pdm".to_string()));
    }

    #[test]
    fn test_empty_record_in_located_directory_is_unresolved() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("INSTALLER"), " \n\t").unwrap();
        let env_var = "RAPIDFRAMEWORK_TEST_EMPTY_DIST_INFO";
        std::env::set_var(env_var, dir.path());

        let detector = InstallerDetector::with_source(DistributionMetadata::new(
            unique_distribution("empty"),
            env_var,
        ));
        assert_eq!(detector.detect(), Detection::Unresolved);
        assert_eq!(detector.detect_active_manager(), "pip");
    }
}
