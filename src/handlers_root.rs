use crate::selection::Category;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const ROOT_FOLDER_NAME: &str = "Open With Handlers for";
pub const FILES_BY_EXTENSION: &str = "Files by Extension";

#[derive(Debug, Error)]
pub enum RootError {
    #[error("could not determine the user's documents folder; pass --root or set OPENWITH_ROOT")]
    NoDocumentsDir,
    #[error("failed to create handler folder {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Base folder of the on-disk handler registry. Read-only to the menu engine,
/// apart from the lazy creation of missing category folders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlersRoot {
    path: PathBuf,
}

impl HandlersRoot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        HandlersRoot { path: path.into() }
    }

    /// `<documents>/Open With Handlers for`.
    pub fn from_documents_dir() -> Result<Self, RootError> {
        dirs::document_dir()
            .map(|docs| HandlersRoot::new(docs.join(ROOT_FOLDER_NAME)))
            .ok_or(RootError::NoDocumentsDir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Folder holding the handlers of `category`. Extension folders are wrapped in
    /// parentheses since a bare `.txt` is not a usable folder name everywhere.
    /// `extension` is only consulted for `Category::SpecificExtension`.
    pub fn folder_for(&self, category: Category, extension: Option<&str>) -> PathBuf {
        match category {
            Category::Everything => self.path.join("Everything"),
            Category::Folders => self.path.join("Folders"),
            Category::ExtensionlessFiles => self.path.join("Extensionless Files"),
            Category::AllFiles => self.path.join("All files"),
            Category::SpecificExtension => self
                .path
                .join(FILES_BY_EXTENSION)
                .join(format!("({})", extension.unwrap_or_default())),
        }
    }

    /// Creates the root and its fixed category folders. Existing folders are kept.
    pub fn scaffold(&self) -> Result<Vec<PathBuf>, RootError> {
        let folders = [
            self.path.clone(),
            self.folder_for(Category::Everything, None),
            self.folder_for(Category::Folders, None),
            self.folder_for(Category::AllFiles, None),
            self.folder_for(Category::ExtensionlessFiles, None),
            self.path.join(FILES_BY_EXTENSION),
        ];
        for folder in &folders {
            fs::create_dir_all(folder).map_err(|source| RootError::Create {
                path: folder.clone(),
                source,
            })?;
        }
        tracing::info!(root = %self.path.display(), "Handler folders in place");
        Ok(folders.to_vec())
    }
}
