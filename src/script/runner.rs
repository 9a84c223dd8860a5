use std::path::Path;

use tracing::{info, warn};

use crate::model::Id;
use crate::mutation::Mutations;
use crate::persistence::Store;
use crate::script::command::ScriptCommand;
use crate::utils::error::{MutationError, ScriptError};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub applied: usize,
    pub failed: usize,
}

/// Parses a JSON-lines script. Blank lines and lines starting with `#` are
/// skipped; line numbers in errors are 1-based.
pub fn parse_script(text: &str) -> Result<Vec<ScriptCommand>, ScriptError> {
    text.lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line, content)| {
            serde_json::from_str(content).map_err(|source| ScriptError::Parse { line, source })
        })
        .collect()
}

pub fn read_script(path: &Path) -> Result<Vec<ScriptCommand>, ScriptError> {
    let text = std::fs::read_to_string(path)?;
    parse_script(&text)
}

/// Applies one command and returns the id of the record it touched.
pub fn apply<S: Store>(
    mutations: &mut Mutations<S>,
    command: ScriptCommand,
) -> Result<Id, MutationError> {
    let id = match command {
        ScriptCommand::CreateUser { data } => mutations.create_user(data)?.id,
        ScriptCommand::UpdateUser { id, data } => mutations.update_user(&id, data)?.id,
        ScriptCommand::DeleteUser { id } => mutations.delete_user(&id)?.id,
        ScriptCommand::CreatePost { data } => mutations.create_post(data)?.id,
        ScriptCommand::UpdatePost { id, data } => mutations.update_post(&id, data)?.id,
        ScriptCommand::DeletePost { id } => mutations.delete_post(&id)?.id,
        ScriptCommand::CreateComment { data } => mutations.create_comment(data)?.id,
        ScriptCommand::UpdateComment { id, data } => mutations.update_comment(&id, data)?.id,
        ScriptCommand::DeleteComment { id } => mutations.delete_comment(&id)?.id,
    };
    Ok(id)
}

/// Applies every command in order. A failing command is logged and skipped.
pub fn run<S: Store>(mutations: &mut Mutations<S>, commands: Vec<ScriptCommand>) -> RunSummary {
    let mut summary = RunSummary::default();
    for command in commands {
        let name = command.name();
        match apply(mutations, command) {
            Ok(id) => {
                summary.applied += 1;
                info!(command = name, %id, "applied");
            }
            Err(e) => {
                summary.failed += 1;
                warn!(command = name, error = %e, "mutation rejected");
            }
        }
    }
    summary
}
