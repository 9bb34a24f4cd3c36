// Task-Modul: Enthält alle Embassy Tasks
//
// Jeder Task läuft asynchron und unabhängig.
// Alle Ereignisse laufen über Channels in den Control-Loop
// (HTTP → Farbe, UART → Zeilen, IR → Mitschnitte, WiFi/SNTP → Status).

pub mod console;
pub mod control;
pub mod http;
pub mod ir;
pub mod sntp;
pub mod wifi;

// Re-export Tasks für einfachen Import
pub use console::console_reader_task;
pub use control::{ControlInputs, control_loop_task};
pub use http::http_server_task;
pub use ir::ir_capture_task;
pub use sntp::sntp_task;
pub use wifi::{connection_task, dhcp_task, net_task};
