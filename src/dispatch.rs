use crate::command_table::{Command, CommandId, CommandTable};
use crate::handlers_root::HandlersRoot;
use crate::launcher::{LaunchError, LaunchRequest, Launcher, Verb};
use crate::selection::SelectionItem;
use std::path::PathBuf;

/// What an invoked command id did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Launched { program: PathBuf, verb: Verb },
    OpenedHandlersFolder,
    /// The id was not produced by this table.
    Ignored,
}

/// Turns a command id back into a launch request, without launching it.
pub fn request_for(
    command_id: CommandId,
    table: &CommandTable,
    selection: &[SelectionItem],
    root: &HandlersRoot,
    elevate: bool,
) -> Option<LaunchRequest> {
    match table.resolve(command_id)? {
        Command::Handler(entry) => Some(LaunchRequest {
            program: entry.full_path.clone(),
            arguments: selection
                .iter()
                .map(|item| item.path().as_os_str().to_os_string())
                .collect(),
            verb: if elevate { Verb::RunElevated } else { Verb::Open },
        }),
        Command::OpenHandlersFolder => Some(LaunchRequest {
            program: root.path().to_path_buf(),
            arguments: Vec::new(),
            verb: Verb::Explore,
        }),
    }
}

pub fn invoke(
    command_id: CommandId,
    table: &CommandTable,
    selection: &[SelectionItem],
    root: &HandlersRoot,
    elevate: bool,
    launcher: &dyn Launcher,
) -> Result<Invocation, LaunchError> {
    let Some(request) = request_for(command_id, table, selection, root, elevate) else {
        tracing::debug!(command_id, "Command id not in table, ignoring");
        return Ok(Invocation::Ignored);
    };

    launcher.launch(&request)?;
    Ok(match request.verb {
        Verb::Explore => Invocation::OpenedHandlersFolder,
        verb => Invocation::Launched {
            program: request.program,
            verb,
        },
    })
}
