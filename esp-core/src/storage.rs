//! Storage Log
//!
//! Append-only CSV-Datei `/data.csv` mit genau einer Header-Zeile.
//! Die Datei ist der einzige persistente Zustand: kein Index, kein Cache,
//! Export liest immer neu vom Dateisystem.

use core::fmt::Write;

use heapless::{String, Vec};

use crate::status::{Reason, Status};
use crate::traits::{LogStorage, StorageError};
use crate::types::Event;

/// Pfad der Log-Datei im Flash-Dateisystem
pub const LOG_PATH: &str = "/data.csv";

/// Spaltennamen, erste Zeile jeder Log-Datei
pub const HEADER: &str = "Timestamp(ISO8601),Uptime(ms),Color(HEX),Who";

/// Maximale Länge einer Zeile (längste Datenzeile ist ~60 Zeichen)
pub const ROW_CAPACITY: usize = 96;

/// Eine Zeile der Log-Datei ohne Zeilenumbruch
pub type LogLine = String<ROW_CAPACITY>;

const READ_CHUNK: usize = 64;

/// Fehler des Storage Logs, jeweils mit eigenem Status-Token
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LogError {
    #[error("filesystem init failed")]
    FilesystemInit,
    #[error("log file could not be created")]
    CreateFailed,
    #[error("log write failed")]
    WriteFailed,
    #[error("log file not found")]
    NotFound,
    #[error("log file could not be opened")]
    OpenFailed,
    #[error("log file could not be deleted")]
    DeleteFailed,
}

impl LogError {
    pub fn reason(self) -> Reason {
        match self {
            LogError::FilesystemInit => Reason::FilesystemInitFail,
            LogError::CreateFailed => Reason::CsvCreateFail,
            LogError::WriteFailed => Reason::CsvWriteFail,
            LogError::NotFound => Reason::CsvNotFound,
            LogError::OpenFailed => Reason::CsvOpenFail,
            LogError::DeleteFailed => Reason::CsvDeleteFail,
        }
    }
}

impl From<LogError> for Status {
    fn from(error: LogError) -> Self {
        Status::error(error.reason())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MountState {
    Unmounted,
    Mounted,
    /// Mount ist einmal fehlgeschlagen, Gerät läuft ohne Persistenz weiter
    Failed,
}

/// CSV-Log über einem [`LogStorage`]
pub struct CsvLog<S> {
    storage: S,
    state: MountState,
}

impl<S: LogStorage> CsvLog<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            state: MountState::Unmounted,
        }
    }

    fn mount(&mut self) -> Result<(), LogError> {
        match self.state {
            MountState::Mounted => Ok(()),
            MountState::Failed => Err(LogError::FilesystemInit),
            MountState::Unmounted => match self.storage.mount() {
                Ok(()) => {
                    self.state = MountState::Mounted;
                    Ok(())
                }
                Err(e) => {
                    warn!("CSV: mount failed: {}", e);
                    self.state = MountState::Failed;
                    Err(LogError::FilesystemInit)
                }
            },
        }
    }

    /// Mountet das Dateisystem und legt die Datei mit Header an, falls sie fehlt
    ///
    /// Idempotent: bei vorhandener Datei wird nichts geschrieben.
    pub fn ensure_initialized(&mut self) -> Result<(), LogError> {
        self.mount()?;
        if self.storage.exists(LOG_PATH) {
            return Ok(());
        }

        let mut header = LogLine::new();
        writeln!(header, "{}", HEADER).map_err(|_| LogError::CreateFailed)?;
        self.storage
            .create(LOG_PATH, header.as_bytes())
            .map_err(|_| LogError::CreateFailed)?;
        info!("CSV: created {}", LOG_PATH);
        Ok(())
    }

    /// Status-Token für den Boot-Report
    pub fn boot_status(&mut self) -> Status {
        match self.ensure_initialized() {
            Ok(()) => Status::ok(Reason::FilesystemReady),
            Err(e) => e.into(),
        }
    }

    /// Hängt genau eine Datenzeile an
    ///
    /// Fehlt die Datei (z.B. nach `clear` mit fehlgeschlagenem Neuanlegen),
    /// wird sie vorher mit Header neu erzeugt.
    pub fn append(&mut self, event: &Event) -> Result<(), LogError> {
        let mut row = LogLine::new();
        writeln!(row, "{}", event).map_err(|_| LogError::WriteFailed)?;

        self.ensure_initialized()
            .map_err(|_| LogError::WriteFailed)?;
        self.storage
            .append(LOG_PATH, row.as_bytes())
            .map_err(|_| LogError::WriteFailed)
    }

    /// Liest alle nicht-leeren Zeilen in Datei-Reihenfolge (Header inklusive)
    ///
    /// Jeder Aufruf beginnt wieder am Dateianfang.
    pub fn export_all(&mut self) -> Result<ExportLines<'_, S>, LogError> {
        self.mount().map_err(|_| LogError::OpenFailed)?;
        if !self.storage.exists(LOG_PATH) {
            return Err(LogError::NotFound);
        }
        Ok(ExportLines::new(&mut self.storage))
    }

    /// Löscht die Datei und legt sie sofort mit frischem Header neu an
    pub fn clear(&mut self) -> Result<(), LogError> {
        self.mount().map_err(|_| LogError::DeleteFailed)?;
        match self.storage.remove(LOG_PATH) {
            Ok(()) => {}
            Err(StorageError::NotFound) => return Err(LogError::NotFound),
            Err(_) => return Err(LogError::DeleteFailed),
        }
        info!("CSV: removed {}", LOG_PATH);

        // Teilfehler: gelöscht, aber nicht neu angelegt
        self.ensure_initialized()
            .map_err(|_| LogError::CreateFailed)
    }

    pub fn is_mounted(&self) -> bool {
        self.state == MountState::Mounted
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }
}

/// Lazy Zeilen-Iterator über die Log-Datei
///
/// Liest in kleinen Blöcken über `read_at`. `\r` wird entfernt, leere Zeilen
/// übersprungen. Nach dem ersten Lesefehler liefert der Iterator nichts mehr.
pub struct ExportLines<'a, S> {
    storage: &'a mut S,
    offset: usize,
    chunk: [u8; READ_CHUNK],
    filled: usize,
    pos: usize,
    pending: Vec<u8, ROW_CAPACITY>,
    eof: bool,
    failed: bool,
}

impl<'a, S: LogStorage> ExportLines<'a, S> {
    fn new(storage: &'a mut S) -> Self {
        Self {
            storage,
            offset: 0,
            chunk: [0; READ_CHUNK],
            filled: 0,
            pos: 0,
            pending: Vec::new(),
            eof: false,
            failed: false,
        }
    }

    fn fail(&mut self) -> Option<Result<LogLine, LogError>> {
        self.failed = true;
        Some(Err(LogError::OpenFailed))
    }

    /// Gibt die gesammelte Zeile zurück, `None` wenn sie leer war
    fn take_pending(&mut self) -> Option<Result<LogLine, LogError>> {
        let bytes = core::mem::take(&mut self.pending);
        if bytes.iter().all(|b| b.is_ascii_whitespace()) {
            return None;
        }
        match String::from_utf8(bytes) {
            Ok(line) => Some(Ok(line)),
            Err(_) => self.fail(),
        }
    }
}

impl<S: LogStorage> Iterator for ExportLines<'_, S> {
    type Item = Result<LogLine, LogError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            if self.pos < self.filled {
                let byte = self.chunk[self.pos];
                self.pos += 1;
                match byte {
                    b'\n' => {
                        if let Some(line) = self.take_pending() {
                            return Some(line);
                        }
                    }
                    b'\r' => {}
                    _ => {
                        if self.pending.push(byte).is_err() {
                            warn!("CSV: line exceeds {} bytes", ROW_CAPACITY);
                            return self.fail();
                        }
                    }
                }
                continue;
            }

            if self.eof {
                // Letzte Zeile ohne abschließenden Zeilenumbruch
                return if self.pending.is_empty() {
                    None
                } else {
                    self.take_pending()
                };
            }

            match self.storage.read_at(LOG_PATH, self.offset, &mut self.chunk) {
                Ok(0) => self.eof = true,
                Ok(n) => {
                    self.offset += n;
                    self.filled = n;
                    self.pos = 0;
                }
                Err(e) => {
                    warn!("CSV: read failed at {}: {}", self.offset, e);
                    return self.fail();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EventSource, Timestamp};
    use rgb::RGB8;

    /// Ein-Datei-Dateisystem im RAM
    #[derive(Default)]
    struct OneFile {
        data: Option<Vec<u8, 1024>>,
        mount_fails: bool,
        remove_fails: bool,
        create_fails: bool,
    }

    impl LogStorage for OneFile {
        fn mount(&mut self) -> Result<(), StorageError> {
            if self.mount_fails {
                Err(StorageError::MountFailed)
            } else {
                Ok(())
            }
        }

        fn exists(&mut self, _path: &str) -> bool {
            self.data.is_some()
        }

        fn create(&mut self, _path: &str, contents: &[u8]) -> Result<(), StorageError> {
            if self.create_fails {
                return Err(StorageError::Io);
            }
            let mut data = Vec::new();
            data.extend_from_slice(contents).map_err(|_| StorageError::Io)?;
            self.data = Some(data);
            Ok(())
        }

        fn append(&mut self, _path: &str, bytes: &[u8]) -> Result<(), StorageError> {
            let data = self.data.as_mut().ok_or(StorageError::NotFound)?;
            data.extend_from_slice(bytes).map_err(|_| StorageError::Io)
        }

        fn read_at(
            &mut self,
            _path: &str,
            offset: usize,
            buf: &mut [u8],
        ) -> Result<usize, StorageError> {
            let data = self.data.as_ref().ok_or(StorageError::NotFound)?;
            let rest = data.get(offset..).unwrap_or(&[]);
            let n = rest.len().min(buf.len());
            buf[..n].copy_from_slice(&rest[..n]);
            Ok(n)
        }

        fn remove(&mut self, _path: &str) -> Result<(), StorageError> {
            if self.remove_fails {
                return Err(StorageError::Io);
            }
            self.data.take().map(|_| ()).ok_or(StorageError::NotFound)
        }
    }

    fn event(uptime_ms: u64) -> Event {
        Event {
            timestamp: Timestamp::Unknown,
            uptime_ms,
            color: RGB8 { r: 1, g: 2, b: 3 },
            source: EventSource::Button,
        }
    }

    fn contents(log: &CsvLog<OneFile>) -> &[u8] {
        log.storage().data.as_deref().unwrap()
    }

    #[test]
    fn test_initialize_writes_header_once() {
        let mut log = CsvLog::new(OneFile::default());
        log.ensure_initialized().unwrap();
        log.ensure_initialized().unwrap();
        assert_eq!(contents(&log), b"Timestamp(ISO8601),Uptime(ms),Color(HEX),Who\n");
    }

    #[test]
    fn test_append_rows() {
        let mut log = CsvLog::new(OneFile::default());
        log.append(&event(10)).unwrap();
        log.append(&event(20)).unwrap();

        let mut lines = log.export_all().unwrap();
        assert_eq!(lines.next().unwrap().unwrap().as_str(), HEADER);
        assert_eq!(
            lines.next().unwrap().unwrap().as_str(),
            "UNKNOWN_TIME,10,010203,button"
        );
        assert_eq!(
            lines.next().unwrap().unwrap().as_str(),
            "UNKNOWN_TIME,20,010203,button"
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_export_is_restartable() {
        let mut log = CsvLog::new(OneFile::default());
        log.append(&event(1)).unwrap();
        assert_eq!(log.export_all().unwrap().count(), 2);
        assert_eq!(log.export_all().unwrap().count(), 2);
    }

    #[test]
    fn test_export_skips_blank_lines_and_cr() {
        let mut log = CsvLog::new(OneFile::default());
        log.storage_mut()
            .create(LOG_PATH, b"a,b\r\n\r\n\nc,d")
            .unwrap();
        let mut lines = log.export_all().unwrap();
        assert_eq!(lines.next().unwrap().unwrap().as_str(), "a,b");
        assert_eq!(lines.next().unwrap().unwrap().as_str(), "c,d");
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_export_missing_file_is_not_found() {
        let mut log = CsvLog::new(OneFile::default());
        assert_eq!(log.export_all().err(), Some(LogError::NotFound));
    }

    #[test]
    fn test_clear_recreates_header() {
        let mut log = CsvLog::new(OneFile::default());
        log.append(&event(5)).unwrap();
        log.clear().unwrap();
        let mut lines = log.export_all().unwrap();
        assert_eq!(lines.next().unwrap().unwrap().as_str(), HEADER);
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_clear_missing_file() {
        let mut log = CsvLog::new(OneFile::default());
        assert_eq!(log.clear(), Err(LogError::NotFound));
        // nächstes Append legt die Datei wieder an
        log.append(&event(1)).unwrap();
        assert!(contents(&log).starts_with(HEADER.as_bytes()));
    }

    #[test]
    fn test_clear_partial_failure_is_reported() {
        let mut log = CsvLog::new(OneFile::default());
        log.ensure_initialized().unwrap();
        log.storage_mut().create_fails = true;
        assert_eq!(log.clear(), Err(LogError::CreateFailed));
        assert!(log.storage().data.is_none());
    }

    #[test]
    fn test_mount_failure_is_permanent() {
        let mut log = CsvLog::new(OneFile {
            mount_fails: true,
            ..Default::default()
        });
        assert_eq!(log.boot_status(), Status::error(Reason::FilesystemInitFail));
        log.storage_mut().mount_fails = false;
        assert_eq!(log.append(&event(1)), Err(LogError::WriteFailed));
        assert_eq!(log.export_all().err(), Some(LogError::OpenFailed));
        assert_eq!(log.clear(), Err(LogError::DeleteFailed));
        assert!(!log.is_mounted());
    }

    #[test]
    fn test_error_status_tokens() {
        assert_eq!(
            Status::from(LogError::NotFound),
            Status::error(Reason::CsvNotFound)
        );
        assert_eq!(
            Status::from(LogError::DeleteFailed),
            Status::error(Reason::CsvDeleteFail)
        );
    }
}
