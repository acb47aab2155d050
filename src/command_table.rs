//! Ordered, id-addressed menu contents built from a classification.

use crate::handler_directory::{HandlerDirectory, HandlerEntry};
use crate::handlers_root::HandlersRoot;
use crate::selection::{Category, Classification};

pub type CommandId = u32;

pub const OPEN_HANDLERS_FOLDER_LABEL: &str = "Open handlers folder";

/// Handlers of one category, in listing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandGroup {
    pub category: Category,
    pub separator_before: bool,
    pub entries: Vec<(CommandId, HandlerEntry)>,
}

/// What a command id resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    Handler(&'a HandlerEntry),
    OpenHandlersFolder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTable {
    pub groups: Vec<CommandGroup>,
    pub open_handlers_folder: CommandId,
    /// Ids of the separator and submenu anchor the host adds to its own menu.
    pub host_separator: CommandId,
    pub submenu_anchor: CommandId,
    pub id_first: CommandId,
}

impl CommandTable {
    pub fn resolve(&self, id: CommandId) -> Option<Command<'_>> {
        if id == self.open_handlers_folder {
            return Some(Command::OpenHandlersFolder);
        }
        self.groups
            .iter()
            .flat_map(|g| g.entries.iter())
            .find(|(entry_id, _)| *entry_id == id)
            .map(|(_, entry)| Command::Handler(entry))
    }

    pub fn handler_count(&self) -> usize {
        self.groups.iter().map(|g| g.entries.len()).sum()
    }

    /// Number of ids taken from the host's range, host entries included.
    pub fn ids_consumed(&self) -> u32 {
        self.submenu_anchor - self.id_first + 1
    }
}

/// Queries each applicable category folder, most specific first, and numbers the
/// results from `id_first`. Ids must stay below `id_last` including the trailing
/// command and the two host entries; otherwise nothing is returned at all.
pub fn build(
    classification: &Classification,
    root: &HandlersRoot,
    id_first: CommandId,
    id_last: CommandId,
    directory: &HandlerDirectory<'_>,
) -> Option<CommandTable> {
    let categories = classification.categories();
    debug_assert_eq!(
        categories.has_specific_extension(),
        classification.common_extension().is_some()
    );
    if categories.is_empty() {
        tracing::debug!("Nothing in the selection is applicable; only the handlers folder command");
    }
    let mut next_id = Some(id_first);
    let mut groups: Vec<CommandGroup> = Vec::new();

    for category in categories.iter() {
        let folder = root.folder_for(category, classification.common_extension());
        let handlers = directory.list(&folder);
        tracing::debug!(%category, folder = %folder.display(), count = handlers.len(), "Handlers found");
        if handlers.is_empty() {
            continue;
        }

        let mut entries = Vec::with_capacity(handlers.len());
        for handler in handlers {
            let Some(id) = next_id else { break };
            next_id = id.checked_add(1);
            entries.push((id, handler));
        }
        groups.push(CommandGroup {
            category,
            separator_before: !groups.is_empty(),
            entries,
        });
    }

    let reserved = next_id.and_then(|open_id| {
        let separator = open_id.checked_add(1)?;
        let anchor = separator.checked_add(1)?;
        Some((open_id, separator, anchor))
    });

    match reserved {
        Some((open_handlers_folder, host_separator, submenu_anchor)) if submenu_anchor < id_last => {
            Some(CommandTable {
                groups,
                open_handlers_folder,
                host_separator,
                submenu_anchor,
                id_first,
            })
        }
        _ => {
            tracing::warn!(
                id_first,
                id_last,
                "No room for the handler menu in the host's command id range"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icons::GlyphIcons;
    use crate::selection::{ItemKind, SelectionItem, classify};
    use std::fs::{self, File};
    use std::path::Path;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        File::create(path).unwrap();
    }

    fn names(group: &CommandGroup) -> Vec<&str> {
        group
            .entries
            .iter()
            .map(|(_, e)| e.display_name.as_str())
            .collect()
    }

    fn txt_selection() -> Classification {
        classify(&[
            SelectionItem::new(r"c:\a.txt", ItemKind::File),
            SelectionItem::new(r"c:\b.txt", ItemKind::File),
        ])
    }

    #[test]
    fn end_to_end_groups_follow_precedence() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "Everything/foo.exe");
        touch(dir.path(), "All files/bar.exe");
        touch(dir.path(), "Files by Extension/(.txt)/baz.exe");
        let root = HandlersRoot::new(dir.path());
        let icons = GlyphIcons;

        let table = build(
            &txt_selection(),
            &root,
            100,
            200,
            &HandlerDirectory::new(&icons),
        )
        .unwrap();

        let order: Vec<Category> = table.groups.iter().map(|g| g.category).collect();
        assert_eq!(
            order,
            vec![
                Category::SpecificExtension,
                Category::AllFiles,
                Category::Everything
            ]
        );
        assert_eq!(names(&table.groups[0]), vec!["baz"]);
        assert_eq!(names(&table.groups[1]), vec!["bar"]);
        assert_eq!(names(&table.groups[2]), vec!["foo"]);
        let separators: Vec<bool> = table.groups.iter().map(|g| g.separator_before).collect();
        assert_eq!(separators, vec![false, true, true]);

        assert_eq!(table.groups[0].entries[0].0, 100);
        assert_eq!(table.groups[1].entries[0].0, 101);
        assert_eq!(table.groups[2].entries[0].0, 102);
        assert_eq!(table.open_handlers_folder, 103);
        assert_eq!(table.host_separator, 104);
        assert_eq!(table.submenu_anchor, 105);
        assert_eq!(table.ids_consumed(), 6);
    }

    #[test]
    fn empty_category_folders_produce_no_group() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "Everything/foo.exe");
        let root = HandlersRoot::new(dir.path());
        let icons = GlyphIcons;

        let table = build(&txt_selection(), &root, 0, 50, &HandlerDirectory::new(&icons)).unwrap();
        assert_eq!(table.groups.len(), 1);
        assert!(!table.groups[0].separator_before);
        // Missing folders were provisioned along the way.
        assert!(dir.path().join("Files by Extension").join("(.txt)").is_dir());
        assert!(dir.path().join("All files").is_dir());
    }

    #[test]
    fn nothing_applicable_leaves_only_the_trailing_command() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "Everything/foo.exe");
        let root = HandlersRoot::new(dir.path());
        let icons = GlyphIcons;

        let table = build(
            &Classification::NotApplicable,
            &root,
            7,
            50,
            &HandlerDirectory::new(&icons),
        )
        .unwrap();
        assert!(table.groups.is_empty());
        assert_eq!(table.open_handlers_folder, 7);
        assert_eq!(table.resolve(7), Some(Command::OpenHandlersFolder));
    }

    #[test]
    fn too_small_range_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let root = HandlersRoot::new(dir.path());
        let icons = GlyphIcons;
        let directory = HandlerDirectory::new(&icons);

        assert!(build(&Classification::NotApplicable, &root, 10, 12, &directory).is_none());
        assert!(build(&Classification::NotApplicable, &root, 10, 13, &directory).is_some());

        touch(dir.path(), "Everything/a.exe");
        touch(dir.path(), "Everything/b.exe");
        assert!(build(&Classification::Mixed, &root, 10, 14, &directory).is_none());
        assert!(build(&Classification::Mixed, &root, 10, 15, &directory).is_some());
    }

    #[test]
    fn id_overflow_is_no_room() {
        let dir = tempfile::tempdir().unwrap();
        let root = HandlersRoot::new(dir.path());
        let icons = GlyphIcons;
        let directory = HandlerDirectory::new(&icons);
        assert!(
            build(
                &Classification::NotApplicable,
                &root,
                u32::MAX - 1,
                u32::MAX,
                &directory
            )
            .is_none()
        );
    }

    #[test]
    fn rebuilding_is_stable_apart_from_id_offset() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "Everything/one.exe");
        touch(dir.path(), "Everything/two.exe");
        touch(dir.path(), "All files/three.exe");
        let root = HandlersRoot::new(dir.path());
        let icons = GlyphIcons;
        let directory = HandlerDirectory::new(&icons);
        let classification = txt_selection();

        let first = build(&classification, &root, 1, 100, &directory).unwrap();
        let again = build(&classification, &root, 1, 100, &directory).unwrap();
        let shifted = build(&classification, &root, 40, 100, &directory).unwrap();

        assert_eq!(first, again);
        let layout = |t: &CommandTable| -> Vec<(Category, Vec<String>)> {
            t.groups
                .iter()
                .map(|g| {
                    (
                        g.category,
                        g.entries.iter().map(|(_, e)| e.display_name.clone()).collect(),
                    )
                })
                .collect()
        };
        assert_eq!(layout(&first), layout(&shifted));
        assert_eq!(shifted.groups[0].entries[0].0, 40);
    }

    #[test]
    fn resolve_maps_ids_back_to_entries() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "Folders/tree.exe");
        touch(dir.path(), "Everything/shell.exe");
        let root = HandlersRoot::new(dir.path());
        let icons = GlyphIcons;

        let table = build(
            &Classification::Folders,
            &root,
            1,
            100,
            &HandlerDirectory::new(&icons),
        )
        .unwrap();
        assert_eq!(table.handler_count(), 2);
        match table.resolve(2) {
            Some(Command::Handler(entry)) => assert_eq!(entry.display_name, "shell"),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(table.resolve(99), None);
    }
}
