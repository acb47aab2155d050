use crate::icons::{Icon, IconProvider};
use crate::utils;
use ignore::WalkBuilder;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// One handler program discovered in a category folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerEntry {
    pub display_name: String,
    pub full_path: PathBuf,
    pub icon: Option<Icon>,
}

#[derive(Debug, Error)]
enum ListError {
    #[error("folder not found")]
    NotFound,
    #[error("access denied")]
    AccessDenied,
    #[error("{0}")]
    Other(#[from] io::Error),
}

impl ListError {
    fn from_io(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => ListError::NotFound,
            io::ErrorKind::PermissionDenied => ListError::AccessDenied,
            _ => ListError::Other(err),
        }
    }
}

/// Lists handler programs directly inside a category folder.
pub struct HandlerDirectory<'a> {
    icons: &'a dyn IconProvider,
}

impl<'a> HandlerDirectory<'a> {
    pub fn new(icons: &'a dyn IconProvider) -> Self {
        HandlerDirectory { icons }
    }

    /// Every visible, non-folder entry of `folder`, sorted by file name.
    ///
    /// A missing folder is created and reported as empty. Access problems and
    /// other enumeration failures also yield an empty list; only the latter are
    /// logged above debug level.
    pub fn list(&self, folder: &Path) -> Vec<HandlerEntry> {
        match read_entries(folder) {
            Ok(paths) => paths.into_iter().map(|p| self.entry_for(p)).collect(),
            Err(ListError::NotFound) => {
                tracing::debug!(folder = %folder.display(), "Handler folder missing, creating it");
                if let Err(e) = fs::create_dir_all(folder) {
                    tracing::warn!(folder = %folder.display(), error = %e, "Could not create handler folder");
                }
                Vec::new()
            }
            Err(ListError::AccessDenied) => {
                tracing::debug!(folder = %folder.display(), "Handler folder not accessible");
                Vec::new()
            }
            Err(e) => {
                tracing::warn!(folder = %folder.display(), error = %e, "Failed to enumerate handler folder");
                Vec::new()
            }
        }
    }

    fn entry_for(&self, full_path: PathBuf) -> HandlerEntry {
        let file_name = full_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        HandlerEntry {
            display_name: utils::display_name_of(&file_name).to_string(),
            icon: self.icons.lookup(&full_path),
            full_path,
        }
    }
}

fn read_entries(folder: &Path) -> Result<Vec<PathBuf>, ListError> {
    let meta = fs::metadata(folder).map_err(ListError::from_io)?;
    if !meta.is_dir() {
        return Err(ListError::Other(io::Error::new(
            io::ErrorKind::Other,
            "handler folder path is not a directory",
        )));
    }

    let walker = WalkBuilder::new(folder)
        .max_depth(Some(1))
        .hidden(false)
        .parents(false)
        .ignore(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    let mut handlers = Vec::new();
    for result in walker {
        let dirent = match result {
            Ok(v) => v,
            Err(e) => {
                match e.io_error().map(io::Error::kind) {
                    Some(io::ErrorKind::PermissionDenied) => {
                        tracing::debug!(error = %e, "Skipping inaccessible handler entry")
                    }
                    _ => tracing::warn!(error = %e, "Error while listing handlers"),
                }
                continue;
            }
        };

        // Depth 0 is the folder itself.
        if dirent.depth() == 0 {
            continue;
        }

        let path = dirent.into_path();
        // Follows links so a link to a folder is skipped like the folder itself.
        if path.is_dir() || is_hidden(&path) {
            continue;
        }
        handlers.push(path);
    }
    Ok(handlers)
}

#[cfg(windows)]
fn is_hidden(path: &Path) -> bool {
    use std::os::windows::fs::MetadataExt;
    const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;
    fs::symlink_metadata(path)
        .map(|m| m.file_attributes() & FILE_ATTRIBUTE_HIDDEN != 0)
        .unwrap_or(false)
}

#[cfg(not(windows))]
fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}
