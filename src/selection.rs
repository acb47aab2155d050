//! Selection classification: which handler categories apply to a set of selected paths.

use crate::utils;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    File,
    Folder,
}

/// One classified entry of the host's selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionItem {
    path: PathBuf,
    kind: ItemKind,
    extension: Option<String>,
}

impl SelectionItem {
    /// Classifies `path` as given; folders never carry an extension.
    pub fn new(path: impl Into<PathBuf>, kind: ItemKind) -> Self {
        let path = path.into();
        let extension = match kind {
            ItemKind::Folder => None,
            ItemKind::File => utils::extension_of(&path.to_string_lossy()).map(str::to_string),
        };
        SelectionItem {
            path,
            kind,
            extension,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    pub fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }
}

/// Inspects one selected path on disk. Returns `None` for anything that is not a
/// plain file or folder (missing paths, dangling links, non-filesystem items).
pub fn classify_path(path: &Path) -> Option<SelectionItem> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Some(SelectionItem::new(path, ItemKind::Folder)),
        Ok(meta) if meta.is_file() => Some(SelectionItem::new(path, ItemKind::File)),
        Ok(_) => {
            tracing::debug!(path = %path.display(), "Selection item is neither file nor folder");
            None
        }
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "Selection item not on disk");
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Everything,
    Folders,
    ExtensionlessFiles,
    SpecificExtension,
    AllFiles,
}

impl Category {
    /// Emission order for menu groups, most specific first.
    pub const PRECEDENCE: [Category; 5] = [
        Category::SpecificExtension,
        Category::ExtensionlessFiles,
        Category::AllFiles,
        Category::Folders,
        Category::Everything,
    ];

    fn bit(self) -> u8 {
        match self {
            Category::Everything => 1,
            Category::Folders => 1 << 1,
            Category::ExtensionlessFiles => 1 << 2,
            Category::SpecificExtension => 1 << 3,
            Category::AllFiles => 1 << 4,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Everything => "Everything",
            Category::Folders => "Folders",
            Category::ExtensionlessFiles => "Extensionless files",
            Category::SpecificExtension => "Specific extension",
            Category::AllFiles => "All files",
        };
        f.write_str(name)
    }
}

/// Bit-set over [`Category`]. The empty set stands for "nothing applicable".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategorySet(u8);

impl CategorySet {
    pub fn empty() -> Self {
        CategorySet(0)
    }

    pub fn of(categories: &[Category]) -> Self {
        categories
            .iter()
            .fold(CategorySet::empty(), |set, c| set.with(*c))
    }

    pub fn with(self, category: Category) -> Self {
        CategorySet(self.0 | category.bit())
    }

    pub fn contains(self, category: Category) -> bool {
        self.0 & category.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn has_specific_extension(self) -> bool {
        self.contains(Category::SpecificExtension)
    }

    /// Members in precedence order.
    pub fn iter(self) -> impl Iterator<Item = Category> {
        Category::PRECEDENCE
            .into_iter()
            .filter(move |c| self.contains(*c))
    }
}

/// How specifically a files-only selection can be served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSpecificity {
    /// Mixed or differing extensions: only the generic file handlers apply.
    Generic,
    Extensionless,
    /// Every file shares this extension (casing taken from the first file).
    Extension(String),
}

/// Outcome of classifying a whole selection. The common extension only exists
/// inside the `Extension` case, so it is present exactly when
/// `Category::SpecificExtension` is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    NotApplicable,
    Mixed,
    Folders,
    Files(FileSpecificity),
}

impl Classification {
    pub fn categories(&self) -> CategorySet {
        use Category::*;
        match self {
            Classification::NotApplicable => CategorySet::empty(),
            Classification::Mixed => CategorySet::of(&[Everything]),
            Classification::Folders => CategorySet::of(&[Everything, Folders]),
            Classification::Files(FileSpecificity::Generic) => {
                CategorySet::of(&[Everything, AllFiles])
            }
            Classification::Files(FileSpecificity::Extensionless) => {
                CategorySet::of(&[Everything, AllFiles, ExtensionlessFiles])
            }
            Classification::Files(FileSpecificity::Extension(_)) => {
                CategorySet::of(&[Everything, AllFiles, SpecificExtension])
            }
        }
    }

    pub fn common_extension(&self) -> Option<&str> {
        match self {
            Classification::Files(FileSpecificity::Extension(ext)) => Some(ext),
            _ => None,
        }
    }
}

/// Folds the selection into the most specific applicable classification.
pub fn classify(items: &[SelectionItem]) -> Classification {
    let mut have_files = false;
    let mut have_folders = false;
    let mut have_extensionless = false;
    let mut have_with_extension = false;
    let mut have_different_extensions = false;
    let mut common_extension: Option<&str> = None;

    for item in items {
        match item.kind() {
            ItemKind::Folder => have_folders = true,
            ItemKind::File => {
                have_files = true;
                match item.extension() {
                    Some(ext) => {
                        have_with_extension = true;
                        match common_extension {
                            None => common_extension = Some(ext),
                            Some(_) if have_different_extensions => {}
                            Some(first) => {
                                if !utils::same_extension(first, ext) {
                                    have_different_extensions = true;
                                }
                            }
                        }
                    }
                    None => have_extensionless = true,
                }
            }
        }
    }

    if !have_files && !have_folders {
        return Classification::NotApplicable;
    }
    if have_files && have_folders {
        return Classification::Mixed;
    }
    if have_folders {
        return Classification::Folders;
    }

    match (have_extensionless, have_with_extension, common_extension) {
        (true, true, _) => Classification::Files(FileSpecificity::Generic),
        (true, false, _) => Classification::Files(FileSpecificity::Extensionless),
        (false, true, _) if have_different_extensions => {
            Classification::Files(FileSpecificity::Generic)
        }
        (false, true, Some(ext)) => {
            Classification::Files(FileSpecificity::Extension(ext.to_string()))
        }
        _ => {
            // Unreachable with the partition above; keep the menu generic if item kinds ever grow.
            tracing::warn!(
                items = items.len(),
                "Files selected but neither extension-bearing nor extensionless; falling back to generic file handlers"
            );
            Classification::Files(FileSpecificity::Generic)
        }
    }
}
