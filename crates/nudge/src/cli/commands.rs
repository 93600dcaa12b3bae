//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::reminder::{IntervalUnit, ReminderDraft};

/// Add command arguments.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// The reminder message
    pub message: String,

    /// Interval magnitude
    #[arg(short, long, default_value_t = 1, value_name = "N")]
    pub every: u64,

    /// Interval unit
    #[arg(short, long, value_enum, default_value = "days")]
    pub unit: UnitArg,

    /// Time of day for the first reminder (24-hour HH:MM)
    #[arg(short, long, value_name = "HH:MM")]
    pub at: Option<String>,
}

impl AddCommand {
    /// Convert the arguments to a reminder draft.
    #[must_use]
    pub fn to_draft(&self) -> ReminderDraft {
        let mut draft = ReminderDraft::new(self.message.clone()).every(self.every, self.unit.into());
        if let Some(at) = &self.at {
            draft = draft.at(at.clone());
        }
        draft
    }
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Remove command arguments.
#[derive(Debug, Args)]
pub struct RemoveCommand {
    /// Id of the reminder to remove (see `nudge list`)
    pub id: String,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Interval unit argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UnitArg {
    /// Minutes
    Minutes,
    /// Hours
    Hours,
    /// Days
    Days,
}

impl From<UnitArg> for IntervalUnit {
    fn from(arg: UnitArg) -> Self {
        match arg {
            UnitArg::Minutes => Self::Minutes,
            UnitArg::Hours => Self::Hours,
            UnitArg::Days => Self::Days,
        }
    }
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_arg_conversion() {
        assert_eq!(IntervalUnit::from(UnitArg::Minutes), IntervalUnit::Minutes);
        assert_eq!(IntervalUnit::from(UnitArg::Hours), IntervalUnit::Hours);
        assert_eq!(IntervalUnit::from(UnitArg::Days), IntervalUnit::Days);
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Plain);
    }

    #[test]
    fn test_add_command_to_draft() {
        let cmd = AddCommand {
            message: "Stretch".to_string(),
            every: 2,
            unit: UnitArg::Hours,
            at: Some("09:00".to_string()),
        };
        let draft = cmd.to_draft();

        assert_eq!(draft.message, "Stretch");
        assert_eq!(draft.interval_value, Some(2));
        assert_eq!(draft.interval_unit, Some(IntervalUnit::Hours));
        assert_eq!(draft.custom_time.as_deref(), Some("09:00"));
    }

    #[test]
    fn test_add_command_without_time() {
        let cmd = AddCommand {
            message: "Water".to_string(),
            every: 1,
            unit: UnitArg::Days,
            at: None,
        };
        assert!(cmd.to_draft().custom_time.is_none());
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        assert!(format!("{cmd:?}").contains("Show"));
    }
}
