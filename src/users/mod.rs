// file: src/users/mod.rs
// version: 1.0.0
// guid: c5f0a8d3-6e21-4b97-b3d4-8a1e7f2c9056

//! Image user accounts stored in `CONFIG_MKQNX_USERS`

pub mod codec;
pub mod editor;

pub use codec::{decode, encode, validate_username, Password, UserEntry, UserList, USERS_KEY};
pub use editor::{EditorCommand, EditorOutcome, Prompt, TerminalPrompt, UserEditor};

use crate::config::{patch_single_key, read_lines, write_lines, ConfigStore, CONFIG_PREFIX};
use crate::Result;
use std::path::Path;
use tracing::info;

/// User list currently held by a config
pub fn load_users(config: &ConfigStore) -> UserList {
    UserList::parse(&config.get_string(USERS_KEY, ""))
}

/// Rewrite only the users line of the config file at `path`
pub fn save_users(path: &Path, users: &UserList) -> Result<()> {
    let lines = read_lines(path)?;
    let new_line = format!("{}{}=\"{}\"", CONFIG_PREFIX, USERS_KEY, users.encode());
    write_lines(path, &patch_single_key(&lines, USERS_KEY, &new_line))?;
    info!("Saved {} users to {}", users.len(), path.display());
    Ok(())
}
