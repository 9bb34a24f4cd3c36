//! Farb-Policy
//!
//! Zufällige Farben für Taster/Web und reproduzierbare Farben pro IR-Code.
//! Der PRNG ist expliziter Zustand in [`ColorPolicy`], kein globaler.

use rand_chacha::ChaCha8Rng;
use rand_core::{RngCore, SeedableRng};
use rgb::RGB8;

/// LED aus
pub const BLACK: RGB8 = RGB8 { r: 0, g: 0, b: 0 };

/// Seedbare Farbquelle
///
/// Nicht kryptographisch. `color_for_signal()` seedet den Generator neu,
/// danach laufen auch `random_color()`-Ziehungen von diesem Seed weiter.
pub struct ColorPolicy {
    rng: ChaCha8Rng,
}

impl ColorPolicy {
    /// Erstellt eine Policy mit Start-Seed (auf dem Gerät vom Hardware-RNG)
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Setzt den Generator deterministisch auf `seed` zurück
    pub fn reseed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    /// Drei unabhängig gezogene 8-Bit Kanäle
    pub fn random_color(&mut self) -> RGB8 {
        RGB8 {
            r: self.channel(),
            g: self.channel(),
            b: self.channel(),
        }
    }

    /// Gleicher Code → gleiche Farbe, verschiedene Codes → unkorrelierte Farben
    ///
    /// # Beispiele
    ///
    /// ```
    /// # use esp_core::ColorPolicy;
    /// let mut policy = ColorPolicy::new(1);
    /// let a = policy.color_for_signal(0x20DF10EF);
    /// policy.random_color();
    /// let b = policy.color_for_signal(0x20DF10EF);
    /// assert_eq!(a, b);
    /// ```
    pub fn color_for_signal(&mut self, signal: u64) -> RGB8 {
        self.reseed(signal);
        self.random_color()
    }

    fn channel(&mut self) -> u8 {
        (self.rng.next_u32() & 0xFF) as u8
    }
}

/// Packt RGB8 in einen 24-Bit Wert `0xRRGGBB`
pub fn to_hex24(color: RGB8) -> u32 {
    (u32::from(color.r) << 16) | (u32::from(color.g) << 8) | u32::from(color.b)
}

/// Gegenstück zu [`to_hex24`], Bits oberhalb von 24 werden ignoriert
pub fn from_hex24(value: u32) -> RGB8 {
    RGB8 {
        r: (value >> 16) as u8,
        g: (value >> 8) as u8,
        b: value as u8,
    }
}

/// Begrenzt einen Kanalwert auf 0..=255
pub fn clamp_channel(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex24_packing() {
        let color = RGB8 { r: 0x12, g: 0xAB, b: 0xFF };
        assert_eq!(to_hex24(color), 0x12ABFF);
        assert_eq!(from_hex24(0x12ABFF), color);
    }

    #[test]
    fn test_hex24_stays_in_range() {
        let white = RGB8 { r: 255, g: 255, b: 255 };
        assert_eq!(to_hex24(white), 0xFFFFFF);
        assert!(to_hex24(BLACK) <= 0xFFFFFF);
    }

    #[test]
    fn test_clamp_channel() {
        assert_eq!(clamp_channel(-20), 0);
        assert_eq!(clamp_channel(128), 128);
        assert_eq!(clamp_channel(999), 255);
    }

    #[test]
    fn test_same_signal_same_color() {
        let mut policy = ColorPolicy::new(42);
        let first = policy.color_for_signal(0xFF30CF);
        let second = policy.color_for_signal(0xFF30CF);
        assert_eq!(first, second);
    }

    #[test]
    fn test_signal_color_independent_of_prior_state() {
        let mut a = ColorPolicy::new(1);
        let mut b = ColorPolicy::new(2);
        b.random_color();
        b.random_color();
        assert_eq!(a.color_for_signal(0xABCD), b.color_for_signal(0xABCD));
    }

    #[test]
    fn test_distinct_signals_distinct_colors() {
        let mut policy = ColorPolicy::new(0);
        let a = policy.color_for_signal(0x00FF_A25D);
        let b = policy.color_for_signal(0x00FF_629D);
        assert_ne!(a, b);
    }

    #[test]
    fn test_random_colors_vary() {
        let mut policy = ColorPolicy::new(7);
        let first = policy.random_color();
        let differs = (0..8).any(|_| policy.random_color() != first);
        assert!(differs);
    }
}
