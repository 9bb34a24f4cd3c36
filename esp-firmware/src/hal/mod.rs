// Hardware Abstraction Layer (HAL) Module
//
// Adapter, die die Traits aus esp-core auf ESP32-C6 Peripherie abbilden.

pub mod button;
pub mod clock;
pub mod console;
pub mod flash_fs;
pub mod ir_receiver;
pub mod led_writer;

pub use button::ButtonPin;
pub use clock::SystemClock;
pub use console::UartConsole;
pub use flash_fs::{FlashFs, FlashPartition};
pub use ir_receiver::IrReceiver;
pub use led_writer::RmtLedWriter;
