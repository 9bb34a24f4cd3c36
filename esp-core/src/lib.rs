//! ESP Core - Platform-agnostic Logic and Traits
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! Sie definiert Traits für Hardware-Zugriff und die komplette Event-Logik:
//! Storage Log, Farb-Policy, IR-Signalfilter, Event-Quellen und Control Surface.

#![no_std]

// Muss zuerst kommen: Log-Makros (defmt oder no-op)
#[macro_use]
mod fmt;

pub mod color;
pub mod control;
pub mod filter;
pub mod indicator;
pub mod ir;
pub mod recorder;
pub mod sources;
pub mod status;
pub mod storage;
pub mod traits;
pub mod types;
pub mod web;

// Re-exports für einfachen Zugriff
pub use chrono::NaiveDateTime;
pub use color::{ColorPolicy, clamp_channel, from_hex24, to_hex24};
pub use control::{Command, CommandError, ExportFrame, FrameLine};
pub use filter::{REPEAT_SENTINEL, accept};
pub use indicator::Indicator;
pub use recorder::{Recorder, RecorderConfig};
pub use sources::{ButtonDebouncer, Trigger};
pub use status::{Outcome, Reason, Status};
pub use storage::{CsvLog, ExportLines, HEADER, LOG_PATH, LogError, LogLine};
pub use traits::{
    ButtonInput, Clock, ConsoleWriter, IrDecoder, LedError, LogStorage, SmartLedWriter,
    StorageError,
};
pub use types::{Event, EventSource, IrDecode, IrProtocol, Timestamp, local_time};
pub use web::{FormatError, parse_rgb_triple};
