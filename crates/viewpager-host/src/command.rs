//! Imperative commands sent by the embedding application.

use std::fmt;

/// A loosely typed command argument.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandArg {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
}

impl CommandArg {
    fn as_int(&self) -> Option<i64> {
        match *self {
            CommandArg::Int(value) => Some(value),
            CommandArg::Float(value) if value.fract() == 0.0 && value.is_finite() => {
                Some(value as i64)
            }
            _ => None,
        }
    }

    fn as_float(&self) -> Option<f64> {
        match *self {
            CommandArg::Int(value) => Some(value as f64),
            CommandArg::Float(value) => Some(value),
            _ => None,
        }
    }
}

impl From<i64> for CommandArg {
    fn from(value: i64) -> Self {
        CommandArg::Int(value)
    }
}

impl From<f64> for CommandArg {
    fn from(value: f64) -> Self {
        CommandArg::Float(value)
    }
}

impl From<bool> for CommandArg {
    fn from(value: bool) -> Self {
        CommandArg::Bool(value)
    }
}

impl From<&str> for CommandArg {
    fn from(value: &str) -> Self {
        CommandArg::Str(value.to_owned())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PagerCommand {
    /// Resizes the sequence. A `selected` position below the current count
    /// is jumped to before resizing, any other one after.
    SetCount {
        count: usize,
        selected: Option<usize>,
    },
    InsertCount {
        start: usize,
        count: usize,
    },
    RemoveCount {
        start: usize,
        count: usize,
    },
    SetCurrentIndex {
        index: usize,
        smooth: bool,
    },
    /// Replies with the current position, echoing `token`.
    GetCurrentIndex {
        token: String,
    },
    BeginFakeDrag,
    /// Drag offset in density-independent pixels.
    FakeDragBy {
        offset: f32,
    },
    EndFakeDrag,
}

impl PagerCommand {
    pub fn name(&self) -> &'static str {
        match self {
            PagerCommand::SetCount { .. } => "setCount",
            PagerCommand::InsertCount { .. } => "insertCount",
            PagerCommand::RemoveCount { .. } => "removeCount",
            PagerCommand::SetCurrentIndex { .. } => "setCurrentIndex",
            PagerCommand::GetCurrentIndex { .. } => "getCurrentIndex",
            PagerCommand::BeginFakeDrag => "beginFakeDrag",
            PagerCommand::FakeDragBy { .. } => "fakeDragBy",
            PagerCommand::EndFakeDrag => "endFakeDrag",
        }
    }

    pub fn parse(name: &str, args: &[CommandArg]) -> Result<Self, CommandError> {
        let args = Args {
            command: name,
            values: args,
        };
        let command = match name {
            "setCount" => PagerCommand::SetCount {
                count: args.index(0)?,
                // Negative means "no selection".
                selected: match args.values.get(1) {
                    None => None,
                    Some(_) => usize::try_from(args.int(1)?).ok(),
                },
            },
            "insertCount" => PagerCommand::InsertCount {
                start: args.index(0)?,
                count: args.index(1)?,
            },
            "removeCount" => PagerCommand::RemoveCount {
                start: args.index(0)?,
                count: args.index(1)?,
            },
            "setCurrentIndex" => PagerCommand::SetCurrentIndex {
                index: args.index(0)?,
                smooth: args.bool_or(1, false)?,
            },
            "getCurrentIndex" => PagerCommand::GetCurrentIndex {
                token: args.string(0)?,
            },
            "beginFakeDrag" => PagerCommand::BeginFakeDrag,
            "fakeDragBy" => PagerCommand::FakeDragBy {
                offset: args.float(0)? as f32,
            },
            "endFakeDrag" => PagerCommand::EndFakeDrag,
            other => {
                return Err(CommandError::Unknown {
                    name: other.to_owned(),
                })
            }
        };
        Ok(command)
    }
}

struct Args<'a> {
    command: &'a str,
    values: &'a [CommandArg],
}

impl Args<'_> {
    fn get(&self, index: usize) -> Result<&CommandArg, CommandError> {
        self.values
            .get(index)
            .ok_or_else(|| CommandError::MissingArgument {
                command: self.command.to_owned(),
                index,
            })
    }

    fn invalid(&self, index: usize, expected: &'static str) -> CommandError {
        CommandError::InvalidArgument {
            command: self.command.to_owned(),
            index,
            expected,
        }
    }

    fn int(&self, index: usize) -> Result<i64, CommandError> {
        self.get(index)?
            .as_int()
            .ok_or_else(|| self.invalid(index, "an integer"))
    }

    fn index(&self, index: usize) -> Result<usize, CommandError> {
        usize::try_from(self.int(index)?).map_err(|_| self.invalid(index, "a non-negative integer"))
    }

    fn float(&self, index: usize) -> Result<f64, CommandError> {
        self.get(index)?
            .as_float()
            .ok_or_else(|| self.invalid(index, "a number"))
    }

    fn bool_or(&self, index: usize, default: bool) -> Result<bool, CommandError> {
        match self.values.get(index) {
            None => Ok(default),
            Some(CommandArg::Bool(value)) => Ok(*value),
            Some(_) => Err(self.invalid(index, "a boolean")),
        }
    }

    fn string(&self, index: usize) -> Result<String, CommandError> {
        match self.get(index)? {
            CommandArg::Str(value) => Ok(value.clone()),
            CommandArg::Int(value) => Ok(value.to_string()),
            _ => Err(self.invalid(index, "a string")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Unknown {
        name: String,
    },
    MissingArgument {
        command: String,
        index: usize,
    },
    InvalidArgument {
        command: String,
        index: usize,
        expected: &'static str,
    },
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Unknown { name } => write!(f, "unknown command {name:?}"),
            CommandError::MissingArgument { command, index } => {
                write!(f, "{command}: missing argument {index}")
            }
            CommandError::InvalidArgument {
                command,
                index,
                expected,
            } => write!(f, "{command}: argument {index} must be {expected}"),
        }
    }
}

impl std::error::Error for CommandError {}

#[cfg(test)]
#[path = "tests/command_tests.rs"]
mod tests;
