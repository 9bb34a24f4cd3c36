// Library-Root: Hardware-Adapter, Tasks und Channel-Typen
// Keine Standard-Bibliothek (Embedded System)
#![no_std]

// Module
pub mod config;
pub mod hal;
pub mod tasks;
pub mod web;

// Re-exports von esp-core
pub use esp_core::{Recorder, RecorderConfig, Status};

// Embassy Channel-Typen
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};
use embassy_sync::signal::Signal;
use esp_core::ir::IrCapture;
use heapless::String;

use crate::config::{
    CONSOLE_LINE_CAPACITY, CONSOLE_LINE_QUEUE, IR_CAPTURE_QUEUE, STATUS_QUEUE, WEB_COLOR_QUEUE,
};

// ============================================================================
// Type-Aliase für Channel-Typen
// ============================================================================
//
// Alle Tasks laufen auf demselben Executor, daher NoopRawMutex.
// Nur der Control-Loop empfängt: er besitzt Log, LED und Konsolen-Ausgabe.

/// Eine Zeile von der Konsole (ohne Zeilenumbruch)
pub type ConsoleLine = String<CONSOLE_LINE_CAPACITY>;

/// RGB-Triple aus dem HTTP-Request (bereits validiert)
pub type WebColor = [i32; 3];

/// Channel für Farb-Requests (HTTP → Control-Loop)
pub type WebColorChannel = Channel<NoopRawMutex, WebColor, WEB_COLOR_QUEUE>;
pub type WebColorSender = Sender<'static, NoopRawMutex, WebColor, WEB_COLOR_QUEUE>;
pub type WebColorReceiver = Receiver<'static, NoopRawMutex, WebColor, WEB_COLOR_QUEUE>;

/// Channel für Kommando-Zeilen (UART RX → Control-Loop)
pub type ConsoleLineChannel = Channel<NoopRawMutex, ConsoleLine, CONSOLE_LINE_QUEUE>;
pub type ConsoleLineSender = Sender<'static, NoopRawMutex, ConsoleLine, CONSOLE_LINE_QUEUE>;
pub type ConsoleLineReceiver = Receiver<'static, NoopRawMutex, ConsoleLine, CONSOLE_LINE_QUEUE>;

/// Channel für rohe IR-Mitschnitte (Capture-Task → Control-Loop)
pub type IrCaptureChannel = Channel<NoopRawMutex, IrCapture, IR_CAPTURE_QUEUE>;
pub type IrCaptureSender = Sender<'static, NoopRawMutex, IrCapture, IR_CAPTURE_QUEUE>;
pub type IrCaptureReceiver = Receiver<'static, NoopRawMutex, IrCapture, IR_CAPTURE_QUEUE>;

/// "Nächsten IR-Code annehmen" (Control-Loop → Capture-Task)
pub type IrResumeSignal = Signal<NoopRawMutex, ()>;

/// Status-Meldungen der Netzwerk-Tasks für die Konsole
pub type StatusChannel = Channel<NoopRawMutex, Status, STATUS_QUEUE>;
pub type StatusSender = Sender<'static, NoopRawMutex, Status, STATUS_QUEUE>;
pub type StatusReceiver = Receiver<'static, NoopRawMutex, Status, STATUS_QUEUE>;

// ============================================================================
// Testing-Strategie
// ============================================================================
//
// Diese Crate kompiliert nur für riscv32imac-unknown-none-elf.
// Die komplette Event-Logik (Recorder, Storage Log, IR-Decoder, Kommandos)
// liegt in esp-core und wird dort bzw. in esp-tests gegen Mocks getestet.
// Hier bleiben nur dünne Adapter, die die esp-core Traits auf Hardware abbilden.
