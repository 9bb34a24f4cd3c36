//! Event-Quellen
//!
//! Jede Quelle liefert einen [`Trigger`]. Was daraus wird (Farbe, Log-Zeile,
//! LED) entscheidet der Recorder.

use crate::types::{EventSource, IrDecode};

/// Entprell-Fenster des Tasters in Millisekunden
pub const DEBOUNCE_MS: u64 = 50;

/// Roher Auslöser einer Quelle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Trigger {
    /// Entprellte steigende Flanke des Tasters
    Button,
    /// Dekodierter IR-Code (noch ungefiltert)
    Ir(IrDecode),
    /// Farbe aus dem HTTP-Request, Kanäle noch nicht begrenzt
    Web { r: i32, g: i32, b: i32 },
}

impl Trigger {
    pub fn source(&self) -> EventSource {
        match self {
            Trigger::Button => EventSource::Button,
            Trigger::Ir(_) => EventSource::IrReceiver,
            Trigger::Web { .. } => EventSource::Web,
        }
    }
}

/// Flankenerkennung mit Entprellung
///
/// Ein Druck zählt genau einmal: beim Übergang losgelassen → gedrückt, wenn
/// der Taster mindestens `window_ms` losgelassen war und der letzte akzeptierte
/// Druck mindestens `window_ms` zurückliegt. Gedrückt halten erzeugt kein
/// weiteres Event.
#[derive(Debug, Clone)]
pub struct ButtonDebouncer {
    window_ms: u64,
    pressed: bool,
    released_at: Option<u64>,
    accepted_at: Option<u64>,
}

impl ButtonDebouncer {
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            pressed: false,
            released_at: None,
            accepted_at: None,
        }
    }

    /// Neuer Pegel zum Zeitpunkt `now_ms`, `true` = akzeptierter Druck
    pub fn update(&mut self, active: bool, now_ms: u64) -> bool {
        let was_pressed = self.pressed;
        self.pressed = active;

        if !active {
            if was_pressed || self.released_at.is_none() {
                self.released_at = Some(now_ms);
            }
            return false;
        }
        if was_pressed {
            return false;
        }

        let settled = |since: Option<u64>| match since {
            Some(t) => now_ms.saturating_sub(t) >= self.window_ms,
            None => true,
        };
        if settled(self.released_at) && settled(self.accepted_at) {
            self.accepted_at = Some(now_ms);
            return true;
        }
        false
    }
}

impl Default for ButtonDebouncer {
    fn default() -> Self {
        Self::new(DEBOUNCE_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_press_single_event() {
        let mut button = ButtonDebouncer::default();
        assert!(!button.update(false, 0));
        assert!(button.update(true, 100));
        // gehalten
        for t in 101..400 {
            assert!(!button.update(true, t));
        }
    }

    #[test]
    fn test_bounce_is_ignored() {
        let mut button = ButtonDebouncer::default();
        button.update(false, 0);
        assert!(button.update(true, 100));
        // Prellen innerhalb des Fensters
        assert!(!button.update(false, 102));
        assert!(!button.update(true, 104));
        assert!(!button.update(false, 110));
        assert!(!button.update(true, 112));
        assert!(!button.update(false, 130));
        // sauber losgelassen, neuer Druck
        assert!(button.update(true, 200));
    }

    #[test]
    fn test_press_at_boot_counts() {
        let mut button = ButtonDebouncer::default();
        assert!(button.update(true, 0));
    }

    #[test]
    fn test_trigger_sources() {
        assert_eq!(Trigger::Button.source(), EventSource::Button);
        assert_eq!(
            Trigger::Web { r: 1, g: 2, b: 3 }.source(),
            EventSource::Web
        );
    }
}
