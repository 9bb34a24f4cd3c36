// Keine Standard-Bibliothek verwenden (Embedded System)
#![no_std]
// Kein normaler main() Einstiegspunkt (wird von esp_rtos bereitgestellt)
#![no_main]
// Verbiete mem::forget - gefährlich bei ESP HAL Types mit DMA-Buffern
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
// Verbiete große Stack-Frames (Stack ist auf Embedded Systemen begrenzt)
#![deny(clippy::large_stack_frames)]

// Heap Allocator (WiFi benötigt dynamischen Speicher)
extern crate alloc;

// Embassy Async Runtime
use embassy_executor::Spawner;
use embassy_net::{Config as NetConfig, Stack, StackResources};
use embassy_time::{Duration, Timer};

// ESP32-C6 HAL
use esp_hal::clock::CpuClock;
use esp_hal::rng::Rng;
use esp_hal::timer::timg::TimerGroup;
use esp_hal::uart::{Config as UartConfig, Uart};
use esp_storage::FlashStorage;
use littlefs2::fs::{Allocation, Filesystem};

// Backtrace bei Panic und defmt-Ausgabe über USB-JTAG
use {esp_backtrace as _, esp_println as _};

// Projekt-Module und Konfiguration
use esp_color_logger::config::{
    CONSOLE_BAUDRATE, EXTRA_HEAP_SIZE, HTTP_TASK_COUNT, TZ_OFFSET_SECS, WIFI_HEAP_SIZE,
};
use esp_color_logger::hal::{
    ButtonPin, FlashFs, FlashPartition, IrReceiver, SystemClock, UartConsole,
};
use esp_color_logger::tasks::{
    ControlInputs, connection_task, console_reader_task, control_loop_task, dhcp_task,
    http_server_task, ir_capture_task, net_task, sntp_task,
};
use esp_color_logger::{
    ConsoleLineChannel, IrCaptureChannel, IrResumeSignal, StatusChannel, WebColorChannel,
};

// ESP-IDF App Descriptor - erforderlich für den Bootloader!
// Ohne diesen schlägt das Flashen mit "ESP-IDF App Descriptor missing" fehl
esp_bootloader_esp_idf::esp_app_desc!();

/// Main Entry Point
///
/// Initialisiert Hardware, WiFi, Dateisystem und Channels, spawnt dann alle Tasks.
/// Danach schläft main() - alle Arbeit läuft in Tasks.
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    // ESP32-C6 Konfiguration: CPU auf maximale Taktfrequenz (160 MHz)
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    // Heap Allocator initialisieren (WiFi braucht dynamischen Speicher!)
    esp_alloc::heap_allocator!(
        #[esp_hal::ram(reclaimed)]
        size: WIFI_HEAP_SIZE
    );
    esp_alloc::heap_allocator!(size: EXTRA_HEAP_SIZE);

    // Embassy Runtime initialisieren (Timer + Software Interrupt)
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_interrupt =
        esp_hal::interrupt::software::SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_interrupt.software_interrupt0);

    // Zufalls-Seeds aus dem Hardware-RNG: TCP/IP Stack und Farb-Policy
    let rng = Rng::new();
    let net_seed = (rng.random() as u64) << 32 | rng.random() as u64;
    let color_seed = (rng.random() as u64) << 32 | rng.random() as u64;

    // ========================================================================
    // Konsole (UART0) und Channels
    // ========================================================================

    let uart = Uart::new(
        peripherals.UART0,
        UartConfig::default().with_baudrate(CONSOLE_BAUDRATE),
    )
    .expect("Failed to initialize UART0")
    .with_tx(peripherals.GPIO16)
    .with_rx(peripherals.GPIO17)
    .into_async();
    let (uart_rx, uart_tx) = uart.split();

    static WEB_COLORS: static_cell::StaticCell<WebColorChannel> = static_cell::StaticCell::new();
    let web_colors = WEB_COLORS.init(WebColorChannel::new());

    static CONSOLE_LINES: static_cell::StaticCell<ConsoleLineChannel> =
        static_cell::StaticCell::new();
    let console_lines = CONSOLE_LINES.init(ConsoleLineChannel::new());

    static IR_CAPTURES: static_cell::StaticCell<IrCaptureChannel> = static_cell::StaticCell::new();
    let ir_captures = IR_CAPTURES.init(IrCaptureChannel::new());

    static IR_RESUME: static_cell::StaticCell<IrResumeSignal> = static_cell::StaticCell::new();
    let ir_resume = &*IR_RESUME.init(IrResumeSignal::new());

    static STATUSES: static_cell::StaticCell<StatusChannel> = static_cell::StaticCell::new();
    let statuses = STATUSES.init(StatusChannel::new());

    // ========================================================================
    // Flash-Dateisystem (wird erst im Control-Loop gemountet)
    // ========================================================================

    static FS_PARTITION: static_cell::StaticCell<FlashPartition> = static_cell::StaticCell::new();
    let partition = FS_PARTITION.init(FlashPartition::new(FlashStorage::new(peripherals.FLASH)));

    static FS_ALLOC: static_cell::StaticCell<Allocation<FlashPartition>> =
        static_cell::StaticCell::new();
    let fs_alloc = FS_ALLOC.init(Filesystem::allocate());

    let storage = FlashFs::new(fs_alloc, partition);

    // ========================================================================
    // Control-Loop und lokale Event-Quellen
    // ========================================================================

    let inputs = ControlInputs {
        button: ButtonPin::new(peripherals.GPIO9),
        ir: IrReceiver::new(ir_captures.receiver(), ir_resume),
        lines: console_lines.receiver(),
        web_colors: web_colors.receiver(),
        statuses: statuses.receiver(),
    };

    spawner
        .spawn(control_loop_task(
            peripherals.GPIO8,
            peripherals.RMT,
            storage,
            SystemClock::new(TZ_OFFSET_SECS),
            color_seed,
            inputs,
            UartConsole::new(uart_tx),
        ))
        .unwrap();

    spawner
        .spawn(console_reader_task(uart_rx, console_lines.sender()))
        .unwrap();

    spawner
        .spawn(ir_capture_task(
            peripherals.GPIO4,
            ir_captures.sender(),
            ir_resume,
        ))
        .unwrap();

    // ========================================================================
    // WiFi, SNTP und HTTP
    // ========================================================================

    static RADIO_INIT: static_cell::StaticCell<esp_radio::Controller> =
        static_cell::StaticCell::new();
    let radio_init =
        RADIO_INIT.init(esp_radio::init().expect("Failed to initialize Wi-Fi/BLE controller"));

    let (wifi_controller, wifi_interface) =
        esp_radio::wifi::new(radio_init, peripherals.WIFI, Default::default())
            .expect("Failed to initialize Wi-Fi");

    // Static resources für embassy-net
    // HTTP-Listener (HTTP_TASK_COUNT) + SNTP (1) + DNS (1) + Reserve
    static RESOURCES: static_cell::StaticCell<StackResources<6>> = static_cell::StaticCell::new();
    let resources = RESOURCES.init(StackResources::new());

    // embassy-net erstellt Stack + Runner (nutzt STA interface für Client-Modus)
    let (stack, runner) = embassy_net::new(
        wifi_interface.sta,
        NetConfig::dhcpv4(Default::default()),
        resources,
        net_seed,
    );

    // Stack muss 'static sein für Tasks
    static STACK: static_cell::StaticCell<Stack<'static>> = static_cell::StaticCell::new();
    let stack = &*STACK.init(stack);

    spawner.spawn(connection_task(wifi_controller)).unwrap();
    spawner.spawn(net_task(runner)).unwrap();
    spawner.spawn(dhcp_task(stack, statuses.sender())).unwrap();
    spawner.spawn(sntp_task(stack, statuses.sender())).unwrap();

    // Spawn HTTP Server Tasks (HTTP_TASK_COUNT für concurrent connections)
    for task_id in 0..HTTP_TASK_COUNT {
        spawner
            .spawn(http_server_task(task_id, stack, web_colors.sender()))
            .unwrap();
    }

    // Main-Loop: schläft (alle Arbeit läuft in Tasks)
    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}
