//! Control Surface
//!
//! Zeilenbasiertes Kommando-Protokoll der Konsole und die Gegenseite
//! ([`ExportFrame`]) für Tools, die den Export mitlesen.

use crate::status::{Reason, Status};

/// Rahmen um den Export
pub const CSV_START: &str = "CSV_START";
pub const CSV_END: &str = "CSV_END";

/// Erste Zeile nach dem Boot
pub const READY_BANNER: &str = "ESP32-LOGGER_READY";

/// Hinweis am Ende des Boots
pub const COMMANDS_HINT: &str = "COMMANDS: ping | export | clear | (press button to log)";

/// Wird nach jedem bearbeiteten Kommando ausgegeben
pub const HELP_BOX: [&str; 3] = [
    "--------------------------",
    "| ping | export | clear | ",
    "--------------------------",
];

/// Kommandos der Control Surface
///
/// `SetColor` kommt nur über HTTP, nicht über die Konsole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    Ping,
    Export,
    Clear,
    SetColor { r: i32, g: i32, b: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    #[error("unknown command")]
    Unknown,
}

impl From<CommandError> for Status {
    fn from(_: CommandError) -> Self {
        Status::error(Reason::UnknownCommand)
    }
}

impl TryFrom<&str> for Command {
    type Error = CommandError;

    /// Konsolen-Wort, getrimmt und case-sensitiv
    fn try_from(line: &str) -> Result<Self, Self::Error> {
        match line.trim() {
            "ping" => Ok(Command::Ping),
            "export" => Ok(Command::Export),
            "clear" => Ok(Command::Clear),
            _ => Err(CommandError::Unknown),
        }
    }
}

/// Einordnung einer empfangenen Zeile durch [`ExportFrame`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameLine<'a> {
    Started,
    Row(&'a str),
    Finished,
    /// Außerhalb des Rahmens, leer oder Status-Zeile
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameState {
    Waiting,
    Inside,
    Done,
}

/// Sammelt die Zeilen zwischen `CSV_START` und `CSV_END`
#[derive(Debug, Clone)]
pub struct ExportFrame {
    state: FrameState,
}

impl ExportFrame {
    pub fn new() -> Self {
        Self {
            state: FrameState::Waiting,
        }
    }

    pub fn feed<'a>(&mut self, line: &'a str) -> FrameLine<'a> {
        let line = line.trim();
        match self.state {
            FrameState::Waiting if line == CSV_START => {
                self.state = FrameState::Inside;
                FrameLine::Started
            }
            FrameState::Inside if line == CSV_END => {
                self.state = FrameState::Done;
                FrameLine::Finished
            }
            FrameState::Inside => {
                if line.is_empty() || line.starts_with("OK:") || line.starts_with("ERROR:") {
                    FrameLine::Ignored
                } else {
                    FrameLine::Row(line)
                }
            }
            _ => FrameLine::Ignored,
        }
    }

    pub fn is_started(&self) -> bool {
        self.state != FrameState::Waiting
    }

    pub fn is_finished(&self) -> bool {
        self.state == FrameState::Done
    }
}

impl Default for ExportFrame {
    fn default() -> Self {
        Self::new()
    }
}
