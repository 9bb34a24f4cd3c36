//! Indicator - kurzes Aufleuchten der LED pro Event
//!
//! Nicht-blockierend: `flash()` setzt die Farbe und eine Deadline,
//! `tick()` schaltet die LED nach Ablauf wieder aus.

use rgb::RGB8;

use crate::color::BLACK;
use crate::traits::SmartLedWriter;

/// Leuchtdauer pro Event in Millisekunden
pub const FLASH_MS: u64 = 100;

pub struct Indicator<L> {
    led: L,
    flash_ms: u64,
    clear_at: Option<u64>,
}

impl<L: SmartLedWriter> Indicator<L> {
    pub fn new(led: L, flash_ms: u64) -> Self {
        Self {
            led,
            flash_ms,
            clear_at: None,
        }
    }

    /// Zeigt `color` ab `now_ms` für die konfigurierte Dauer
    ///
    /// Ein neuer Flash während ein alter noch läuft verlängert die Deadline.
    /// LED-Fehler werden nur geloggt.
    pub fn flash(&mut self, color: RGB8, now_ms: u64) {
        if let Err(e) = self.led.write(color) {
            warn!("LED: flash failed: {}", e);
        }
        self.clear_at = Some(now_ms.saturating_add(self.flash_ms));
    }

    /// Muss regelmäßig aufgerufen werden
    pub fn tick(&mut self, now_ms: u64) {
        match self.clear_at {
            Some(deadline) if now_ms >= deadline => {
                if let Err(e) = self.led.write(BLACK) {
                    warn!("LED: clear failed: {}", e);
                }
                self.clear_at = None;
            }
            _ => {}
        }
    }

    pub fn is_lit(&self) -> bool {
        self.clear_at.is_some()
    }

    pub fn led(&self) -> &L {
        &self.led
    }
}
