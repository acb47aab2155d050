use crate::command_table::CommandId;

/// One line of the rendered submenu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuRow {
    Handler {
        id: CommandId,
        label: String,
        icon: String,
    },
    Separator,
    OpenHandlersFolder {
        id: CommandId,
    },
}

impl MenuRow {
    pub fn command_id(&self) -> Option<CommandId> {
        match self {
            MenuRow::Handler { id, .. } | MenuRow::OpenHandlersFolder { id } => Some(*id),
            MenuRow::Separator => None,
        }
    }
}

/// The activated command and whether the elevation modifier was held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    pub command_id: CommandId,
    pub elevate: bool,
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub(super) enum AppMode {
    Normal,
    Filtering,
}
