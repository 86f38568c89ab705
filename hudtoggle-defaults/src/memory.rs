// ABOUTME: In-process stand-in for the `defaults` tool, keyed on the literal command strings.
// ABOUTME: Lets callers exercise read/write flows without touching the real preference database.

use std::cell::RefCell;
use std::io;

use crate::command::{CommandOutput, CommandRunner};
use crate::PreferenceCommand;

/// Fake preference store that answers the three `MetalForceHudEnabled` commands.
#[derive(Debug, Default)]
pub struct MemoryDefaults {
    value: RefCell<Option<String>>,
    issued: RefCell<Vec<String>>,
    fail_launch: bool,
    fail_writes: bool,
}

impl MemoryDefaults {
    /// Store with the key absent.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(enabled: bool) -> Self {
        Self::with_raw_value(if enabled { "1" } else { "0" })
    }

    /// Store holding an arbitrary value, as if written with `-string`.
    pub fn with_raw_value(raw: &str) -> Self {
        Self {
            value: RefCell::new(Some(raw.to_string())),
            ..Self::default()
        }
    }

    /// Every command fails to spawn.
    pub fn failing_launch(mut self) -> Self {
        self.fail_launch = true;
        self
    }

    /// Writes exit non-zero and leave the value untouched.
    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Command lines seen so far, reads excluded.
    pub fn issued(&self) -> Vec<String> {
        self.issued.borrow().clone()
    }

    pub fn raw_value(&self) -> Option<String> {
        self.value.borrow().clone()
    }
}

impl CommandRunner for MemoryDefaults {
    fn run(&self, command_line: &str) -> io::Result<CommandOutput> {
        if self.fail_launch {
            return Err(io::Error::new(io::ErrorKind::NotFound, "shell not found"));
        }

        if command_line == PreferenceCommand::Read.command_line() {
            return Ok(match self.value.borrow().as_deref() {
                Some(raw) => CommandOutput::ok(format!("{raw}\n")),
                None => CommandOutput::failed(
                    1,
                    "The domain/default pair of (kCFPreferencesAnyApplication, MetalForceHudEnabled) does not exist",
                ),
            });
        }

        for enable in [true, false] {
            if command_line == PreferenceCommand::Write(enable).command_line() {
                self.issued.borrow_mut().push(command_line.to_string());
                if self.fail_writes {
                    return Ok(CommandOutput::failed(1, "Could not write domain"));
                }
                *self.value.borrow_mut() = Some(if enable { "1" } else { "0" }.to_string());
                return Ok(CommandOutput::ok(""));
            }
        }

        Ok(CommandOutput::failed(127, format!("unknown command: {command_line}")))
    }
}
