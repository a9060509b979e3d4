// file: src/users/codec.rs
// version: 1.0.0
// guid: 4e8a2c60-b1d7-4f93-a5c8-0d6f3e9b7a21

//! `MKQNX_USERS` value codec and list operations
//!
//! Serialized form: `name[/password]` entries joined by `:`. A password of `-` means
//! "explicitly no password"; an omitted password lets mkqnximage generate one.

use crate::error::{MkqnxError, Result};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Config key holding the user list
pub const USERS_KEY: &str = "MKQNX_USERS";

/// Literal marking an explicit empty password
pub const NO_PASSWORD: &str = "-";

fn username_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid username regex"))
}

/// Check a username against the allowed character set
pub fn validate_username(name: &str) -> Result<()> {
    if username_regex().is_match(name) {
        Ok(())
    } else {
        Err(MkqnxError::InvalidUsername(name.to_string()))
    }
}

/// Password state of a user entry
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Password {
    /// Omitted; the image builder generates one
    #[default]
    Unset,
    /// Stored verbatim, including the `-` no-password marker
    Explicit(String),
}

impl Password {
    /// Map prompt input to a password: empty input means unset
    pub fn from_input(input: &str) -> Self {
        if input.is_empty() {
            Password::Unset
        } else {
            Password::Explicit(input.to_string())
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, Password::Unset)
    }

    pub fn is_no_password(&self) -> bool {
        matches!(self, Password::Explicit(p) if p == NO_PASSWORD)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Password::Unset => None,
            Password::Explicit(p) => Some(p),
        }
    }

    /// Masked form for listings
    pub fn masked(&self) -> &'static str {
        match self {
            Password::Unset => "<empty>",
            _ if self.is_no_password() => "'-' (no-password)",
            Password::Explicit(_) => "***",
        }
    }
}

/// One configured user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserEntry {
    pub name: String,
    pub password: Password,
}

impl UserEntry {
    pub fn new(name: impl Into<String>, password: Password) -> Self {
        Self {
            name: name.into(),
            password,
        }
    }

    /// Entry with no password set
    pub fn unset(name: impl Into<String>) -> Self {
        Self::new(name, Password::Unset)
    }

    /// Entry with an explicit password text
    pub fn with_password(name: impl Into<String>, password: impl Into<String>) -> Self {
        Self::new(name, Password::Explicit(password.into()))
    }
}

impl fmt::Display for UserEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.password.as_str() {
            None => f.write_str(&self.name),
            Some(password) => write!(f, "{}/{}", self.name, password),
        }
    }
}

/// Split a serialized user list; empty segments are skipped
pub fn decode(raw: &str) -> Vec<UserEntry> {
    raw.split(':')
        .filter(|segment| !segment.is_empty())
        .map(|segment| match segment.split_once('/') {
            Some((name, password)) => UserEntry::with_password(name, password),
            None => UserEntry::unset(segment),
        })
        .collect()
}

/// Join entries into the serialized form; entries with an empty name are dropped
pub fn encode(entries: &[UserEntry]) -> String {
    entries
        .iter()
        .filter(|entry| !entry.name.is_empty())
        .map(|entry| match &entry.password {
            Password::Explicit(p) if !p.is_empty() => format!("{}/{}", entry.name, p),
            _ => entry.name.clone(),
        })
        .collect::<Vec<_>>()
        .join(":")
}

/// Ordered, editable list of users
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserList {
    entries: Vec<UserEntry>,
}

impl UserList {
    pub fn new(entries: Vec<UserEntry>) -> Self {
        Self { entries }
    }

    /// Decode a serialized value
    pub fn parse(raw: &str) -> Self {
        Self::new(decode(raw))
    }

    pub fn encode(&self) -> String {
        encode(&self.entries)
    }

    pub fn entries(&self) -> &[UserEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&UserEntry> {
        self.entries.get(index).ok_or(MkqnxError::InvalidIndex(index + 1))
    }

    /// Append a user after checking the name
    pub fn add(&mut self, entry: UserEntry) -> Result<()> {
        validate_username(&entry.name)?;
        self.entries.push(entry);
        Ok(())
    }

    /// Rename and optionally change the password; `None` keeps the current password
    pub fn edit(&mut self, index: usize, name: &str, password: Option<Password>) -> Result<()> {
        if index >= self.entries.len() {
            return Err(MkqnxError::InvalidIndex(index + 1));
        }
        validate_username(name)?;

        let entry = &mut self.entries[index];
        entry.name = name.to_string();
        if let Some(password) = password {
            entry.password = password;
        }
        Ok(())
    }

    pub fn delete(&mut self, index: usize) -> Result<UserEntry> {
        if index >= self.entries.len() {
            return Err(MkqnxError::InvalidIndex(index + 1));
        }
        Ok(self.entries.remove(index))
    }

    /// Remove the entry at `src` and insert it at `dst` of the shortened list.
    ///
    /// `dst` may equal the original length, which appends.
    pub fn move_entry(&mut self, src: usize, dst: usize) -> Result<()> {
        let len = self.entries.len();
        if src >= len {
            return Err(MkqnxError::InvalidIndex(src + 1));
        }
        if dst > len {
            return Err(MkqnxError::InvalidIndex(dst + 1));
        }

        let entry = self.entries.remove(src);
        let dst = dst.min(self.entries.len());
        self.entries.insert(dst, entry);
        Ok(())
    }
}
