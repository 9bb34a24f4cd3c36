// Zeitquelle: Uptime vom embassy-time Treiber, Wall-Clock vom SNTP-Task
//
// Der SNTP-Task speichert nur den UNIX-Zeitpunkt des Boots. Die aktuelle
// Zeit ergibt sich aus Boot-Zeitpunkt + Uptime, damit läuft die Uhr auch
// zwischen zwei Synchronisationen monoton weiter.

use core::cell::Cell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::Instant;
use esp_core::{Clock, NaiveDateTime, local_time};

/// UNIX-Sekunden zum Zeitpunkt Uptime = 0, `None` bis zur ersten Synchronisation
static BOOT_UNIX_SECS: Mutex<CriticalSectionRawMutex, Cell<Option<i64>>> =
    Mutex::new(Cell::new(None));

/// Übernimmt eine frisch synchronisierte UNIX-Zeit
pub fn set_unix_time(unix_secs: i64) {
    let uptime_secs = Instant::now().as_secs() as i64;
    BOOT_UNIX_SECS.lock(|boot| boot.set(Some(unix_secs - uptime_secs)));
}

pub fn is_synced() -> bool {
    BOOT_UNIX_SECS.lock(|boot| boot.get().is_some())
}

/// Clock-Implementierung für den Recorder
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    tz_offset_secs: i64,
}

impl SystemClock {
    pub fn new(tz_offset_secs: i64) -> Self {
        Self { tz_offset_secs }
    }
}

impl Clock for SystemClock {
    fn uptime_ms(&self) -> u64 {
        Instant::now().as_millis()
    }

    fn wall_clock(&self) -> Option<NaiveDateTime> {
        let boot = BOOT_UNIX_SECS.lock(|boot| boot.get())?;
        let now = boot + Instant::now().as_secs() as i64;
        local_time(now, self.tz_offset_secs)
    }
}
