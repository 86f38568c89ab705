// ABOUTME: Reads and writes the global MetalForceHudEnabled default through the `defaults` tool.
// ABOUTME: Defines the preference key, literal command strings, output parsing, and the error type.

mod command;
mod memory;

use std::fmt;

pub use command::{CommandOutput, CommandRunner, DEFAULT_SHELL, ShellRunner};
pub use memory::MemoryDefaults;

/// Preference key controlling the compositor's Metal performance HUD.
pub const PREFERENCE_KEY: &str = "MetalForceHudEnabled";

/// A `defaults` invocation against the global domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceCommand {
    Read,
    Write(bool),
}

impl PreferenceCommand {
    /// The exact shell string handed to the runner.
    pub fn command_line(&self) -> String {
        match self {
            PreferenceCommand::Read => format!("defaults read -g {PREFERENCE_KEY}"),
            PreferenceCommand::Write(enable) => format!(
                "defaults write -g {PREFERENCE_KEY} -bool {}",
                if *enable { "YES" } else { "NO" }
            ),
        }
    }
}

impl fmt::Display for PreferenceCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.command_line())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DefaultsError {
    #[error("could not launch `{command}`: {source}")]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{command}` exited with {}: {stderr}", describe_exit(.code))]
    Failed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("status {c}"),
        None => "a signal".to_string(),
    }
}

/// Interpret `defaults read` output as a boolean.
///
/// Boolean defaults print as `1`/`0`. Only `1` counts as enabled; a value
/// stored as a string (`YES`, `true`) reads as false.
pub fn parse_bool_output(stdout: &str) -> bool {
    stdout.trim() == "1"
}

/// Read the preference, surfacing launch failures.
///
/// A non-zero exit means the key is absent and reads as `Ok(false)`.
pub fn try_read_enabled(runner: &dyn CommandRunner) -> Result<bool, DefaultsError> {
    let command = PreferenceCommand::Read.command_line();
    let output = runner
        .run(&command)
        .map_err(|source| DefaultsError::Launch {
            command: command.clone(),
            source,
        })?;

    if !output.success {
        tracing::debug!("{PREFERENCE_KEY} not set (exit {:?})", output.code);
        return Ok(false);
    }

    Ok(parse_bool_output(&output.stdout))
}

/// Read the preference. Absent, unparsable, or unreadable all map to false.
pub fn read_enabled(runner: &dyn CommandRunner) -> bool {
    match try_read_enabled(runner) {
        Ok(enabled) => enabled,
        Err(e) => {
            tracing::debug!("Treating {PREFERENCE_KEY} as disabled: {e}");
            false
        }
    }
}

/// Write the preference, blocking until the `defaults` process exits.
pub fn write_enabled(runner: &dyn CommandRunner, enable: bool) -> Result<(), DefaultsError> {
    let command = PreferenceCommand::Write(enable).command_line();
    tracing::info!("Running: {command}");

    let output = runner
        .run(&command)
        .map_err(|source| DefaultsError::Launch {
            command: command.clone(),
            source,
        })?;

    if !output.success {
        return Err(DefaultsError::Failed {
            command,
            code: output.code,
            stderr: output.stderr.trim().to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_commands_are_literal() {
        assert_eq!(
            PreferenceCommand::Write(true).command_line(),
            "defaults write -g MetalForceHudEnabled -bool YES"
        );
        assert_eq!(
            PreferenceCommand::Write(false).command_line(),
            "defaults write -g MetalForceHudEnabled -bool NO"
        );
    }

    #[test]
    fn read_command_targets_global_domain() {
        assert_eq!(
            PreferenceCommand::Read.to_string(),
            "defaults read -g MetalForceHudEnabled"
        );
    }

    #[test]
    fn write_issues_exactly_one_matching_command() {
        let defaults = MemoryDefaults::new();
        write_enabled(&defaults, true).unwrap();
        write_enabled(&defaults, false).unwrap();
        assert_eq!(
            defaults.issued(),
            vec![
                "defaults write -g MetalForceHudEnabled -bool YES".to_string(),
                "defaults write -g MetalForceHudEnabled -bool NO".to_string(),
            ]
        );
    }

    #[test]
    fn parse_accepts_one_with_whitespace() {
        assert!(parse_bool_output("1\n"));
        assert!(parse_bool_output("  1  "));
    }

    #[test]
    fn parse_rejects_string_typed_booleans() {
        assert!(!parse_bool_output("YES"));
        assert!(!parse_bool_output("true"));
        assert!(!parse_bool_output("yes\n"));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(!parse_bool_output(""));
        assert!(!parse_bool_output("0"));
        assert!(!parse_bool_output("2"));
        assert!(!parse_bool_output("enabled"));
        assert!(!parse_bool_output("The domain/default pair does not exist"));
    }

    #[test]
    fn read_is_false_when_key_absent() {
        let defaults = MemoryDefaults::new();
        assert!(!read_enabled(&defaults));
        assert!(!try_read_enabled(&defaults).unwrap());
    }

    #[test]
    fn read_is_false_when_value_unparsable() {
        let defaults = MemoryDefaults::with_raw_value("banana");
        assert!(!read_enabled(&defaults));
    }

    #[test]
    fn read_is_false_for_string_yes() {
        let defaults = MemoryDefaults::with_raw_value("YES");
        assert!(!read_enabled(&defaults));
        assert!(!try_read_enabled(&defaults).unwrap());
    }

    #[test]
    fn read_is_false_when_launch_fails() {
        let defaults = MemoryDefaults::new().failing_launch();
        assert!(!read_enabled(&defaults));
        assert!(matches!(
            try_read_enabled(&defaults),
            Err(DefaultsError::Launch { .. })
        ));
    }

    #[test]
    fn toggle_on_then_off_restores_original() {
        for original in [None, Some(false), Some(true)] {
            let defaults = match original {
                Some(v) => MemoryDefaults::with_value(v),
                None => MemoryDefaults::new(),
            };
            let before = read_enabled(&defaults);

            write_enabled(&defaults, !before).unwrap();
            assert_eq!(read_enabled(&defaults), !before);
            write_enabled(&defaults, before).unwrap();

            assert_eq!(read_enabled(&defaults), before);
        }
    }

    #[test]
    fn failed_write_reports_exit_status() {
        let defaults = MemoryDefaults::with_value(false).failing_writes();
        let err = write_enabled(&defaults, true).unwrap_err();
        match err {
            DefaultsError::Failed { command, code, .. } => {
                assert_eq!(command, "defaults write -g MetalForceHudEnabled -bool YES");
                assert_eq!(code, Some(1));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!read_enabled(&defaults));
    }
}
