//! Hardware Abstraction Traits
//!
//! Diese Traits definieren Schnittstellen für Hardware-Zugriff
//! ohne konkrete Implementierung.

use core::fmt::Write;

use chrono::NaiveDateTime;
use rgb::RGB8;

use crate::status::Status;
use crate::types::IrDecode;

/// Fehler-Typ für LED-Operationen
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedError {
    #[error("LED write failed")]
    WriteFailed,
}

/// Trait für SmartLED Hardware-Zugriff
///
/// Abstrahiert den Zugriff auf RGB LEDs (WS2812/Neopixel).
///
/// # Implementierungen
/// - **Production:** RmtLedWriter (ESP32 RMT Peripheral)
/// - **Testing:** MockLedWriter (in-memory Mock)
pub trait SmartLedWriter: Send {
    /// Schreibt eine RGB-Farbe auf die LED
    ///
    /// # Fehlerbehandlung
    /// Gibt `LedError::WriteFailed` zurück wenn Hardware-Zugriff fehlschlägt
    fn write(&mut self, color: RGB8) -> Result<(), LedError>;
}

/// Fehler-Typ für Dateisystem-Operationen
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    #[error("filesystem mount failed")]
    MountFailed,
    #[error("file not found")]
    NotFound,
    #[error("filesystem i/o error")]
    Io,
}

/// Minimales Dateisystem für das Storage Log
///
/// # Implementierungen
/// - **Production:** FlashFs (littlefs2 auf dem ESP32 Flash)
/// - **Testing:** MemStorage (HashMap im RAM)
pub trait LogStorage {
    /// Mountet das Dateisystem. Formatieren bei Bedarf ist Sache der Implementierung.
    fn mount(&mut self) -> Result<(), StorageError>;

    fn exists(&mut self, path: &str) -> bool;

    /// Legt die Datei neu an (oder kürzt sie) und schreibt `contents`
    fn create(&mut self, path: &str, contents: &[u8]) -> Result<(), StorageError>;

    /// Hängt `data` an. Muss bei Fehlern den bisherigen Inhalt unverändert lassen.
    fn append(&mut self, path: &str, data: &[u8]) -> Result<(), StorageError>;

    /// Liest ab `offset` in `buf`, gibt 0 am Dateiende zurück
    fn read_at(&mut self, path: &str, offset: usize, buf: &mut [u8])
    -> Result<usize, StorageError>;

    fn remove(&mut self, path: &str) -> Result<(), StorageError>;
}

/// Zeitquelle
pub trait Clock {
    /// Millisekunden seit Boot, monoton steigend
    fn uptime_ms(&self) -> u64;

    /// Lokale Wall-Clock Zeit, `None` solange nicht synchronisiert
    fn wall_clock(&self) -> Option<NaiveDateTime>;
}

/// IR-Empfänger
///
/// Nach jedem `poll()` mit Ergebnis MUSS `resume()` aufgerufen werden,
/// sonst nimmt der Empfänger keinen weiteren Code an.
pub trait IrDecoder {
    fn poll(&mut self) -> Option<IrDecode>;
    fn resume(&mut self);
}

/// Taster-Eingang (Pegel-Logik, z.B. active-low, steckt in der Implementierung)
pub trait ButtonInput {
    fn is_active(&mut self) -> bool;
}

/// Zeilenbasierte Konsole für Status-Zeilen und Export
pub trait ConsoleWriter {
    fn write_line(&mut self, line: &str);

    /// Schreibt `OK:<REASON>` bzw. `ERROR:<REASON>`
    fn write_status(&mut self, status: Status) {
        let mut line: heapless::String<32> = heapless::String::new();
        if write!(line, "{}", status).is_ok() {
            self.write_line(&line);
        }
    }
}
