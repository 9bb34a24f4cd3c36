//! Status-Tokens `OK:<REASON>` / `ERROR:<REASON>`
//!
//! Einheitliche externe Schnittstelle für Konsole und Event-Quellen.
//! Die Strings sind Vertrag nach außen und dürfen nicht geändert werden.

use core::fmt;

/// Ergebnis-Klasse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    Ok,
    Error,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Ok => "OK",
            Outcome::Error => "ERROR",
        }
    }
}

/// Maschinenlesbarer Grund
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reason {
    Pong,
    DataSaved,
    CsvWriteFail,
    CsvNotFound,
    CsvOpenFail,
    CsvCleared,
    CsvDeleteFail,
    CsvCreateFail,
    FilesystemReady,
    FilesystemInitFail,
    UnknownCommand,
    TimeSyncFail,
    WifiConnectFail,
    InvalidFormat,
    ColorSet,
}

impl Reason {
    pub fn as_str(self) -> &'static str {
        match self {
            Reason::Pong => "PONG",
            Reason::DataSaved => "DATA_SAVED",
            Reason::CsvWriteFail => "CSV_WRITE_FAIL",
            Reason::CsvNotFound => "CSV_NOT_FOUND",
            Reason::CsvOpenFail => "CSV_OPEN_FAIL",
            Reason::CsvCleared => "CSV_CLEARED",
            Reason::CsvDeleteFail => "CSV_DELETE_FAIL",
            Reason::CsvCreateFail => "CSV_CREATE_FAIL",
            Reason::FilesystemReady => "FILESYSTEM_READY",
            Reason::FilesystemInitFail => "FILESYSTEM_INIT_FAIL",
            Reason::UnknownCommand => "UNKNOWN_COMMAND",
            Reason::TimeSyncFail => "TIME_SYNC_FAIL",
            Reason::WifiConnectFail => "WIFI_CONNECT_FAIL",
            Reason::InvalidFormat => "INVALID_FORMAT",
            Reason::ColorSet => "COLOR_SET",
        }
    }
}

/// Zweiteiliges Status-Token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status {
    pub outcome: Outcome,
    pub reason: Reason,
}

impl Status {
    pub const fn ok(reason: Reason) -> Self {
        Self {
            outcome: Outcome::Ok,
            reason,
        }
    }

    pub const fn error(reason: Reason) -> Self {
        Self {
            outcome: Outcome::Error,
            reason,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.outcome == Outcome::Ok
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.outcome.as_str(), self.reason.as_str())
    }
}
