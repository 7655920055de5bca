//! Local dataset location

use std::path::{Path, PathBuf};

use contracts::RelaySettings;

/// Where the local dataset copy lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetLocation {
    /// Directory created on first download
    pub data_dir: PathBuf,
    /// File name inside `data_dir`
    pub file_name: String,
}

impl DatasetLocation {
    pub fn new(data_dir: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            data_dir: data_dir.into(),
            file_name: file_name.into(),
        }
    }

    /// Build from loaded settings
    pub fn from_settings(settings: &RelaySettings) -> Self {
        Self::new(&settings.data_dir, &settings.dataset_file)
    }

    /// Full dataset path
    pub fn path(&self) -> PathBuf {
        self.data_dir.join(&self.file_name)
    }

    /// Temporary path used while a download is in flight
    pub fn partial_path(&self) -> PathBuf {
        partial_path(&self.path())
    }

    pub fn exists(&self) -> bool {
        self.path().is_file()
    }
}

pub(crate) fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}
