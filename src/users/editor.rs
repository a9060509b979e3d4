// file: src/users/editor.rs
// version: 1.0.0
// guid: 91d6b3f8-0a27-4c5e-8f14-c2e7a9d05b63

//! Interactive editor for the `MKQNX_USERS` list

use super::codec::{Password, UserEntry, UserList};
use crate::error::{MkqnxError, Result};
use colored::Colorize;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use std::io::{self, BufRead, IsTerminal, Write};
use tracing::debug;

/// Source of operator input
pub trait Prompt {
    /// Read one line of visible input, without the trailing newline
    fn line(&mut self, prompt: &str) -> Result<String>;

    /// Read one line without echoing it
    fn secret(&mut self, prompt: &str) -> Result<String>;
}

/// Prompt backed by the process terminal
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn line(&mut self, prompt: &str) -> Result<String> {
        print!("{}", prompt);
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().lock().read_line(&mut input)? == 0 {
            return Err(MkqnxError::Interrupted);
        }
        Ok(input.trim_end_matches(['\r', '\n']).to_string())
    }

    fn secret(&mut self, prompt: &str) -> Result<String> {
        if !io::stdin().is_terminal() {
            return self.line(prompt);
        }

        print!("{}", prompt);
        io::stdout().flush()?;

        terminal::enable_raw_mode()?;
        let result = read_hidden_keys();
        terminal::disable_raw_mode()?;
        println!();

        result
    }
}

fn read_hidden_keys() -> Result<String> {
    let mut buffer = String::new();

    loop {
        let Event::Key(KeyEvent {
            code, modifiers, kind, ..
        }) = event::read()?
        else {
            continue;
        };
        if kind == KeyEventKind::Release {
            continue;
        }

        match code {
            KeyCode::Enter => return Ok(buffer),
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Char('c') | KeyCode::Char('d') if modifiers.contains(KeyModifiers::CONTROL) => {
                return Err(MkqnxError::Interrupted);
            }
            KeyCode::Char(c) => buffer.push(c),
            _ => {}
        }
    }
}

/// One parsed editor command; positions are 1-based as typed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorCommand {
    Add,
    Edit(usize),
    ShowPassword(usize),
    Delete(usize),
    Move(usize, usize),
    Save,
    Cancel,
    Help,
}

impl EditorCommand {
    /// Parse one input line; the error is a usage message for the operator
    pub fn parse(input: &str) -> std::result::Result<Self, &'static str> {
        let input = input.trim();
        let mut chars = input.chars();
        let Some(action) = chars.next() else {
            return Ok(EditorCommand::Help);
        };
        let arg = chars.as_str().trim();

        match action {
            'a' => Ok(EditorCommand::Add),
            'e' => parse_position(arg)
                .map(EditorCommand::Edit)
                .ok_or("Invalid edit command. Use eN (e.g. e2)."),
            'p' => parse_position(arg)
                .map(EditorCommand::ShowPassword)
                .ok_or("Invalid command. Use pN (e.g. p2)."),
            'd' => parse_position(arg)
                .map(EditorCommand::Delete)
                .ok_or("Invalid delete command. Use dN (e.g. d3)."),
            'm' => parse_move(arg).ok_or("Invalid move usage. Use mSRC DST (e.g. m3 1)."),
            's' => Ok(EditorCommand::Save),
            'c' => Ok(EditorCommand::Cancel),
            'h' => Ok(EditorCommand::Help),
            _ if input.bytes().all(|b| b.is_ascii_digit()) => parse_position(input)
                .map(EditorCommand::Edit)
                .ok_or("Invalid index."),
            _ => Err("Unknown command. Enter 'h' for help."),
        }
    }
}

fn parse_position(text: &str) -> Option<usize> {
    text.trim().parse::<usize>().ok()
}

fn parse_move(arg: &str) -> Option<EditorCommand> {
    let parts: Vec<&str> = arg.split_whitespace().collect();
    match parts.as_slice() {
        [src, dst] => Some(EditorCommand::Move(parse_position(src)?, parse_position(dst)?)),
        _ => None,
    }
}

/// Convert a typed 1-based position to an index
fn to_index(position: usize) -> Result<usize> {
    position.checked_sub(1).ok_or(MkqnxError::InvalidIndex(position))
}

/// How an editing session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorOutcome {
    Saved(UserList),
    Cancelled,
}

/// Menu-driven editing session over a user list
pub struct UserEditor<P: Prompt> {
    prompt: P,
    users: UserList,
}

impl<P: Prompt> UserEditor<P> {
    pub fn new(prompt: P, users: UserList) -> Self {
        Self { prompt, users }
    }

    /// Run until the operator saves or cancels
    pub fn run(mut self) -> Result<EditorOutcome> {
        loop {
            self.show_menu();
            let input = self.prompt.line("Choose action: ")?;

            let command = match EditorCommand::parse(&input) {
                Ok(command) => command,
                Err(usage) => {
                    println!("{}", usage.red());
                    continue;
                }
            };
            debug!("Editor command: {:?}", command);

            let outcome = match command {
                EditorCommand::Add => self.add_user(),
                EditorCommand::Edit(pos) => self.edit_user(pos),
                EditorCommand::ShowPassword(pos) => self.show_password(pos),
                EditorCommand::Delete(pos) => self.delete_user(pos),
                EditorCommand::Move(src, dst) => self.move_user(src, dst),
                EditorCommand::Save => return Ok(EditorOutcome::Saved(self.users)),
                EditorCommand::Cancel => {
                    println!("Cancelled, no changes saved.");
                    return Ok(EditorOutcome::Cancelled);
                }
                EditorCommand::Help => Ok(()),
            };

            match outcome {
                Ok(()) => {}
                Err(MkqnxError::InvalidIndex(_)) => println!("{}", "Invalid index.".red()),
                Err(e @ MkqnxError::InvalidUsername(_)) => println!("{}", e.to_string().red()),
                Err(e) => return Err(e),
            }
        }
    }

    fn show_menu(&self) {
        println!("\nConfigured users:");
        if self.users.is_empty() {
            println!("  <none>");
        } else {
            for (i, entry) in self.users.entries().iter().enumerate() {
                println!("  {}. {}  ({})", i + 1, entry.name, entry.password.masked());
            }
        }
        println!("\nActions:");
        println!("  a  Add user");
        println!("  eN Edit user number N (e.g. e2 to edit #2)");
        println!("  pN Show password for user N");
        println!("  dN Delete user number N");
        println!("  mN M Move user N to position M (e.g. m3 1 moves #3 to pos 1)");
        println!("  s  Save and exit");
        println!("  c  Cancel (exit without saving)");
        println!("  h  Help (this menu)\n");
    }

    fn add_user(&mut self) -> Result<()> {
        loop {
            let name = self
                .prompt
                .line("Enter username (allowed characters A-Za-z0-9_-). Empty to cancel: ")?;
            let name = name.trim();
            if name.is_empty() {
                println!("Add cancelled.");
                return Ok(());
            }

            if super::codec::validate_username(name).is_err() {
                println!(
                    "{}",
                    "Invalid username. Only letters, numbers, '-' and '_' allowed. Try again.".red()
                );
                continue;
            }

            let password = self.prompt.secret(
                "Enter password (leave empty to omit; enter '-' to explicitly set no-password): ",
            )?;
            self.users.add(UserEntry::new(name, Password::from_input(&password)))?;
            println!("{}", "Added.".green());
            return Ok(());
        }
    }

    fn edit_user(&mut self, position: usize) -> Result<()> {
        let index = to_index(position)?;
        let current = self.users.get(index)?.clone();
        println!("Editing user #{}: '{}'", position, current.name);

        let input = self
            .prompt
            .line(&format!("New username [{}] ", current.name))?;
        let new_name = if input.is_empty() {
            current.name.clone()
        } else {
            input.trim().to_string()
        };
        if new_name.is_empty() {
            println!("Username cannot be empty; edit cancelled.");
            return Ok(());
        }
        if super::codec::validate_username(&new_name).is_err() {
            println!("{}", "Invalid username characters; edit cancelled.".red());
            return Ok(());
        }

        println!("Password editing: leave empty to keep current, enter '-' to explicitly set no-password,");
        let hint = if current.password.is_unset() {
            "(current: none)"
        } else {
            "(current: set or '-' )"
        };
        let password = self.prompt.secret(&format!("New password {}: ", hint))?;
        let password = (!password.is_empty()).then(|| Password::from_input(&password));

        self.users.edit(index, &new_name, password)?;
        println!("{}", "Updated.".green());
        Ok(())
    }

    fn show_password(&mut self, position: usize) -> Result<()> {
        let entry = self.users.get(to_index(position)?)?;
        println!(
            "Password for user '{}': {}",
            entry.name,
            entry.password.as_str().unwrap_or("<none>")
        );
        Ok(())
    }

    fn delete_user(&mut self, position: usize) -> Result<()> {
        let index = to_index(position)?;
        let name = self.users.get(index)?.name.clone();

        let confirm = self.prompt.line(&format!("Delete user '{}'? [y/N]: ", name))?;
        if confirm.trim().eq_ignore_ascii_case("y") {
            self.users.delete(index)?;
            println!("{}", "Deleted.".green());
        } else {
            println!("Cancelled.");
        }
        Ok(())
    }

    fn move_user(&mut self, src: usize, dst: usize) -> Result<()> {
        let moved = to_index(src)
            .and_then(|src| to_index(dst).map(|dst| (src, dst)))
            .and_then(|(src, dst)| self.users.move_entry(src, dst));

        match moved {
            Ok(()) => println!("Moved to position {}.", dst),
            Err(MkqnxError::InvalidIndex(_)) => println!("{}", "Invalid indices.".red()),
            Err(e) => return Err(e),
        }
        Ok(())
    }
}
