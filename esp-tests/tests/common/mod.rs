//! Mocks für die esp-core Traits
//!
//! Jede Test-Datei bindet dieses Modul mit `mod common;` ein.
#![allow(dead_code)]

use std::cell::Cell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use chrono::{NaiveDate, NaiveDateTime};
use esp_core::{
    ButtonInput, Clock, ConsoleWriter, HEADER, IrDecode, IrDecoder, LOG_PATH, LedError,
    LogStorage, Recorder, RecorderConfig, SmartLedWriter, StorageError,
};
use rgb::RGB8;

// ============================================================================
// Mock LED Writer
// ============================================================================

#[derive(Default)]
pub struct MockLedWriter {
    pub last_color: Option<RGB8>,
    pub history: Vec<RGB8>,
    pub fail_next_write: bool,
}

impl MockLedWriter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SmartLedWriter for MockLedWriter {
    fn write(&mut self, color: RGB8) -> Result<(), LedError> {
        if self.fail_next_write {
            self.fail_next_write = false;
            return Err(LedError::WriteFailed);
        }

        self.last_color = Some(color);
        self.history.push(color);
        Ok(())
    }
}

// ============================================================================
// Dateisystem im RAM
// ============================================================================

#[derive(Default)]
pub struct MemStorage {
    pub files: HashMap<String, Vec<u8>>,
    pub fail_mount: bool,
    pub fail_create: bool,
    pub fail_append: bool,
    pub fail_read: bool,
    pub fail_remove: bool,
    pub mount_calls: usize,
}

impl MemStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Vorhandene Log-Datei mit beliebigem Inhalt
    pub fn with_log(contents: &str) -> Self {
        let mut storage = Self::new();
        storage
            .files
            .insert(LOG_PATH.to_string(), contents.as_bytes().to_vec());
        storage
    }

    pub fn log_text(&self) -> Option<String> {
        self.files
            .get(LOG_PATH)
            .map(|bytes| String::from_utf8(bytes.clone()).unwrap())
    }

    /// Datenzeilen ohne Header
    pub fn data_rows(&self) -> Vec<String> {
        self.log_text()
            .unwrap_or_default()
            .lines()
            .filter(|line| !line.is_empty() && *line != HEADER)
            .map(str::to_string)
            .collect()
    }
}

impl LogStorage for MemStorage {
    fn mount(&mut self) -> Result<(), StorageError> {
        self.mount_calls += 1;
        if self.fail_mount {
            return Err(StorageError::MountFailed);
        }
        Ok(())
    }

    fn exists(&mut self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    fn create(&mut self, path: &str, contents: &[u8]) -> Result<(), StorageError> {
        if self.fail_create {
            return Err(StorageError::Io);
        }
        self.files.insert(path.to_string(), contents.to_vec());
        Ok(())
    }

    fn append(&mut self, path: &str, data: &[u8]) -> Result<(), StorageError> {
        if self.fail_append {
            return Err(StorageError::Io);
        }
        self.files
            .entry(path.to_string())
            .or_default()
            .extend_from_slice(data);
        Ok(())
    }

    fn read_at(
        &mut self,
        path: &str,
        offset: usize,
        buf: &mut [u8],
    ) -> Result<usize, StorageError> {
        if self.fail_read {
            return Err(StorageError::Io);
        }
        let file = self.files.get(path).ok_or(StorageError::NotFound)?;
        if offset >= file.len() {
            return Ok(0);
        }
        let n = buf.len().min(file.len() - offset);
        buf[..n].copy_from_slice(&file[offset..offset + n]);
        Ok(n)
    }

    fn remove(&mut self, path: &str) -> Result<(), StorageError> {
        if self.fail_remove {
            return Err(StorageError::Io);
        }
        self.files
            .remove(path)
            .map(|_| ())
            .ok_or(StorageError::NotFound)
    }
}

// ============================================================================
// Steuerbare Uhr
// ============================================================================

/// Uhr mit geteiltem Zustand: der Test verstellt sie, der Recorder liest sie
#[derive(Clone, Default)]
pub struct FakeClock {
    pub uptime: Rc<Cell<u64>>,
    pub wall: Rc<Cell<Option<NaiveDateTime>>>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ms: u64) {
        self.uptime.set(self.uptime.get() + ms);
    }

    pub fn set_wall(&self, time: NaiveDateTime) {
        self.wall.set(Some(time));
    }
}

impl Clock for FakeClock {
    fn uptime_ms(&self) -> u64 {
        self.uptime.get()
    }

    fn wall_clock(&self) -> Option<NaiveDateTime> {
        self.wall.get()
    }
}

pub fn wall_time(h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, 1)
        .unwrap()
        .and_hms_opt(h, m, s)
        .unwrap()
}

// ============================================================================
// Geskriptete Eingänge
// ============================================================================

/// Liefert die Pegel der Reihe nach, danach "losgelassen"
#[derive(Default)]
pub struct ScriptedButton {
    pub levels: VecDeque<bool>,
}

impl ScriptedButton {
    pub fn new(levels: &[bool]) -> Self {
        Self {
            levels: levels.iter().copied().collect(),
        }
    }
}

impl ButtonInput for ScriptedButton {
    fn is_active(&mut self) -> bool {
        self.levels.pop_front().unwrap_or(false)
    }
}

#[derive(Default)]
pub struct ScriptedIr {
    pub pending: VecDeque<IrDecode>,
    pub resumes: usize,
}

impl ScriptedIr {
    pub fn new(codes: &[IrDecode]) -> Self {
        Self {
            pending: codes.iter().copied().collect(),
            resumes: 0,
        }
    }
}

impl IrDecoder for ScriptedIr {
    fn poll(&mut self) -> Option<IrDecode> {
        self.pending.pop_front()
    }

    fn resume(&mut self) {
        self.resumes += 1;
    }
}

/// Sammelt alle Konsolen-Zeilen
#[derive(Default)]
pub struct LineSink {
    pub lines: Vec<String>,
}

impl LineSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&mut self) -> Vec<String> {
        std::mem::take(&mut self.lines)
    }
}

impl ConsoleWriter for LineSink {
    fn write_line(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}

// ============================================================================
// Helfer
// ============================================================================

pub type TestRecorder = Recorder<MemStorage, MockLedWriter, FakeClock>;

pub fn recorder(storage: MemStorage) -> (TestRecorder, FakeClock) {
    let clock = FakeClock::new();
    let recorder = Recorder::new(
        storage,
        MockLedWriter::new(),
        clock.clone(),
        42,
        RecorderConfig::default(),
    );
    (recorder, clock)
}

/// Zerlegt eine Datenzeile in ihre vier Spalten
pub fn columns(row: &str) -> (String, u64, String, String) {
    let fields: Vec<&str> = row.split(',').collect();
    assert_eq!(fields.len(), 4, "row has four columns: {row}");
    (
        fields[0].to_string(),
        fields[1].parse().unwrap(),
        fields[2].to_string(),
        fields[3].to_string(),
    )
}
