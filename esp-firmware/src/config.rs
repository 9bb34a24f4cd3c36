// Projekt-Konfiguration: Konstanten und Hardware-Zuordnungen

// ============================================================================
// LED Konfiguration
// ============================================================================

/// RMT Taktfrequenz in MHz
/// 80 MHz ist optimal für WS2812 LED-Timing
pub const RMT_CLOCK_MHZ: u32 = 80;

/// Leuchtdauer pro Event in Millisekunden
pub const FLASH_MS: u64 = 100;

// LED hängt an GPIO8 (Onboard WS2812 des ESP32-C6-DevKitC-1)

// ============================================================================
// Taster & IR-Empfänger
// ============================================================================

// Taster an GPIO9 (BOOT-Taste, active-low mit Pull-Up)
// IR-Empfänger (TSOP38238 o.ä.) an GPIO4, Ausgang active-low

/// Entprell-Fenster des Tasters in Millisekunden
pub const DEBOUNCE_MS: u64 = 50;

/// Pause nach der ein IR-Frame als beendet gilt (µs)
/// Länger als jede Pause innerhalb eines Frames (NEC-Leader: 4,5 ms)
pub const IR_FRAME_GAP_US: u64 = 8_000;

/// Anzahl gepufferter IR-Mitschnitte zwischen Capture-Task und Control-Loop
pub const IR_CAPTURE_QUEUE: usize = 2;

// ============================================================================
// Konsole (UART0)
// ============================================================================

// UART0: TX = GPIO16, RX = GPIO17

/// Baudrate der Kommando-Konsole
pub const CONSOLE_BAUDRATE: u32 = 115_200;

/// Maximale Länge einer Kommando-Zeile (längere werden verworfen)
pub const CONSOLE_LINE_CAPACITY: usize = 64;

/// Anzahl gepufferter Kommando-Zeilen
pub const CONSOLE_LINE_QUEUE: usize = 4;

/// Pause pro Control-Loop Durchlauf in Millisekunden
pub const LOOP_YIELD_MS: u64 = 1;

// ============================================================================
// Flash-Dateisystem
// ============================================================================

/// Start der LittleFS-Partition im Flash (muss zur Partitionstabelle passen)
pub const FS_PARTITION_OFFSET: u32 = 0x40_0000;

/// Größe der LittleFS-Partition in Bytes (1 MB)
pub const FS_PARTITION_SIZE: u32 = 0x10_0000;

/// Erase-Block-Größe des SPI-Flash
pub const FS_BLOCK_SIZE: usize = 4096;

// ============================================================================
// WiFi Konfiguration
// ============================================================================

/// WiFi SSID (Netzwerk-Name)
/// Wird zur Build-Zeit aus der Environment Variable WIFI_SSID geladen
/// Setze diese in .env file (siehe .env.example)
pub const WIFI_SSID: &str = env!(
    "WIFI_SSID",
    "WiFi SSID nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// WiFi Passwort
/// Wird zur Build-Zeit aus der Environment Variable WIFI_PASSWORD geladen
/// Setze diese in .env file (siehe .env.example)
pub const WIFI_PASSWORD: &str = env!(
    "WIFI_PASSWORD",
    "WiFi Password nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// Maximale Wartezeit auf eine IP-Adresse nach dem Boot
/// Danach wird ERROR:WIFI_CONNECT_FAIL gemeldet, der Connection-Task versucht es weiter
pub const WIFI_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Heap-Größe für WiFi (Bytes)
/// WiFi benötigt dynamischen Speicher für Pakete
pub const WIFI_HEAP_SIZE: usize = 65536; // 64 KB

/// Zusätzliche Heap-Größe (Bytes)
pub const EXTRA_HEAP_SIZE: usize = 36864; // 36 KB

// Gesamt-Heap: ~100 KB für WiFi-Stack

// ============================================================================
// Zeit-Synchronisation (SNTP)
// ============================================================================

/// NTP-Server in Reihenfolge der Abfrage
pub const NTP_SERVERS: [&str; 2] = ["pool.ntp.org", "time.nist.gov"];

/// NTP Server-Port
pub const NTP_PORT: u16 = 123;

/// Lokaler UDP-Port für SNTP-Anfragen
pub const NTP_LOCAL_PORT: u16 = 12_300;

/// Timeout pro SNTP-Anfrage in Sekunden
pub const NTP_TIMEOUT_SECS: u64 = 5;

/// Intervall für Re-Sync nach erfolgreicher Synchronisation (1 Stunde)
pub const NTP_RESYNC_SECS: u64 = 3600;

/// Wartezeit nach fehlgeschlagener Synchronisation
pub const NTP_RETRY_SECS: u64 = 60;

/// UDP-Buffer-Größe für SNTP (48 Byte Paket + Reserve)
pub const NTP_BUFFER_SIZE: usize = 128;

/// Lokale Zeitzone in Sekunden östlich von UTC (Default: UTC+8)
/// Überschreibbar zur Build-Zeit über TZ_OFFSET_SECS
pub const TZ_OFFSET_SECS: i64 = match i64::from_str_radix(env!("TZ_OFFSET_SECS"), 10) {
    Ok(secs) => secs,
    Err(_) => panic!("TZ_OFFSET_SECS ist keine Ganzzahl"),
};

/// Anzahl gepufferter Status-Meldungen (WiFi/SNTP → Konsole)
pub const STATUS_QUEUE: usize = 4;

// ============================================================================
// HTTP Server Konfiguration
// ============================================================================

/// Anzahl paralleler HTTP-Server Tasks
pub const HTTP_TASK_COUNT: usize = 2;

/// HTTP Buffer-Größe in Bytes
/// Für HTTP Request/Response Headers und Body
pub const HTTP_BUFFER_SIZE: usize = 1024;

/// TCP RX Buffer-Größe in Bytes
/// Für eingehende TCP-Daten vom Client
pub const TCP_RX_BUFFER_SIZE: usize = 1024;

/// TCP TX Buffer-Größe in Bytes
/// Für ausgehende TCP-Daten zum Client
pub const TCP_TX_BUFFER_SIZE: usize = 1024;

/// Anzahl gepufferter Farb-Requests (HTTP → Control-Loop)
pub const WEB_COLOR_QUEUE: usize = 4;
