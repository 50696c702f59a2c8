//! File-system fixtures: throwaway folders and bundled test documents.

use crate::config::{ConfigError, TestSettings};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use thiserror::Error;
use tracing::debug;

const TEMP_PREFIX: &str = "eventwatch-";

/// Errors raised while preparing or releasing fixtures.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// The test settings could not be read.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A temporary folder could not be created.
    #[error("failed to create temp folder in {root}: {source}")]
    CreateTempFolder {
        /// Directory the folder was to be created in.
        root: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A temporary folder could not be removed.
    #[error("failed to remove temp folder {path}: {source}")]
    RemoveTempFolder {
        /// The folder that was left behind.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A test document could not be read.
    #[error("failed to read test document {path}: {source}")]
    ReadDocument {
        /// Path of the document.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Uniquely named directory that is deleted, with its contents, on drop.
///
/// Errors while deleting on drop are ignored; call [`TempFolder::close`] to
/// observe them.
#[derive(Debug)]
pub struct TempFolder {
    dir: TempDir,
}

impl TempFolder {
    /// Creates a folder under the configured temp root.
    pub fn new() -> Result<Self, FixtureError> {
        let settings = TestSettings::from_env()?;
        Self::new_in(settings.temp_root())
    }

    /// Creates a folder under `root`, creating `root` first if needed.
    pub fn new_in(root: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let root = root.as_ref();
        let create_error = |source| FixtureError::CreateTempFolder {
            root: root.to_path_buf(),
            source,
        };

        fs::create_dir_all(root).map_err(create_error)?;
        let dir = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .tempdir_in(root)
            .map_err(create_error)?;

        debug!(path = %dir.path().display(), "temp folder created");
        Ok(Self { dir })
    }

    /// Location of the folder.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Deletes the folder now, reporting failures.
    pub fn close(self) -> Result<(), FixtureError> {
        let path = self.dir.path().to_path_buf();
        self.dir
            .close()
            .map_err(|source| FixtureError::RemoveTempFolder { path, source })
    }
}

/// A file from the test documents directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestDocument {
    path: PathBuf,
}

impl TestDocument {
    /// Refers to `filename` inside `documents_dir`. The file is not touched.
    pub fn new(documents_dir: impl AsRef<Path>, filename: &str) -> Self {
        Self {
            path: documents_dir.as_ref().join(filename),
        }
    }

    /// Path of the document, including the documents directory.
    pub fn full_filename(&self) -> &Path {
        &self.path
    }

    /// Opens the document read-only.
    pub fn open(&self) -> Result<File, FixtureError> {
        File::open(&self.path).map_err(|source| self.read_error(source))
    }

    /// Reads the whole document as UTF-8 text.
    pub fn read_to_string(&self) -> Result<String, FixtureError> {
        fs::read_to_string(&self.path).map_err(|source| self.read_error(source))
    }

    fn read_error(&self, source: io::Error) -> FixtureError {
        FixtureError::ReadDocument {
            path: self.path.clone(),
            source,
        }
    }
}

/// Hands out the bundled test documents by kind.
#[derive(Debug, Clone)]
pub struct TestDocumentBuilder {
    documents_dir: PathBuf,
}

impl TestDocumentBuilder {
    /// Builder over the configured documents directory.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::from_settings(&TestSettings::from_env()?))
    }

    /// Builder over the documents directory of `settings`.
    pub fn from_settings(settings: &TestSettings) -> Self {
        Self::in_dir(settings.documents_dir())
    }

    /// Builder over `documents_dir`.
    pub fn in_dir(documents_dir: impl Into<PathBuf>) -> Self {
        Self {
            documents_dir: documents_dir.into(),
        }
    }

    /// A text document with two lines.
    pub fn of_type_txt(&self) -> TestDocument {
        TestDocument::new(&self.documents_dir, "document1.txt")
    }

    /// A CSV document with four rows of three columns each.
    pub fn of_type_csv(&self) -> TestDocument {
        TestDocument::new(&self.documents_dir, "document2.csv")
    }
}
