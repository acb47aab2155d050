//! Host-facing entry points: build a menu for a selection, then dispatch a picked id.

use crate::command_table::{self, CommandId, CommandTable};
use crate::dispatch::{self, Invocation};
use crate::handler_directory::HandlerDirectory;
use crate::handlers_root::HandlersRoot;
use crate::icons::IconProvider;
use crate::launcher::{LaunchError, LaunchRequest, Launcher};
use crate::lifecycle::InstanceGuard;
use crate::selection::{self, Classification, SelectionItem};
use std::path::PathBuf;

pub const SUBMENU_LABEL: &str = "Open with";

/// One build-and-dispatch cycle. Owns its selection and table; nothing is shared
/// with other instances beyond the handler folders on disk.
#[derive(Debug)]
pub struct ContextMenu {
    selection: Vec<SelectionItem>,
    classification: Classification,
    root: HandlersRoot,
    table: CommandTable,
    _instance: InstanceGuard,
}

impl ContextMenu {
    /// `None` when the table does not fit in `[id_first, id_last)`.
    pub fn build(
        paths: &[PathBuf],
        root: HandlersRoot,
        id_first: CommandId,
        id_last: CommandId,
        icons: &dyn IconProvider,
    ) -> Option<Self> {
        let instance = InstanceGuard::acquire();
        let selection: Vec<SelectionItem> = paths
            .iter()
            .filter_map(|p| selection::classify_path(p))
            .collect();
        let classification = selection::classify(&selection);
        tracing::debug!(
            items = selection.len(),
            categories = ?classification.categories(),
            extension = classification.common_extension(),
            "Selection classified"
        );
        let directory = HandlerDirectory::new(icons);
        let table = command_table::build(&classification, &root, id_first, id_last, &directory)?;
        Some(ContextMenu {
            selection,
            classification,
            root,
            table,
            _instance: instance,
        })
    }

    pub fn table(&self) -> &CommandTable {
        &self.table
    }

    pub fn selection(&self) -> &[SelectionItem] {
        &self.selection
    }

    pub fn classification(&self) -> &Classification {
        &self.classification
    }

    pub fn root(&self) -> &HandlersRoot {
        &self.root
    }

    pub fn request_for(&self, command_id: CommandId, elevate: bool) -> Option<LaunchRequest> {
        dispatch::request_for(command_id, &self.table, &self.selection, &self.root, elevate)
    }

    pub fn dispatch(
        &self,
        command_id: CommandId,
        elevate: bool,
        launcher: &dyn Launcher,
    ) -> Result<Invocation, LaunchError> {
        dispatch::invoke(
            command_id,
            &self.table,
            &self.selection,
            &self.root,
            elevate,
            launcher,
        )
    }
}
