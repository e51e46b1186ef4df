#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
#![deny(clippy::large_stack_frames)]

use embassy_executor::Spawner;
use embassy_net::StackResources;
use embassy_time::{Duration, Ticker, Timer};
use esp_hal::clock::CpuClock;
use esp_hal::gpio::{Level, Output, OutputConfig};
use esp_hal::rng::Rng;
use esp_hal::time::Rate;
use esp_hal::timer::timg::TimerGroup;
use log::{error, info, warn};
use rand_core::SeedableRng;
use rand_xoshiro::Xoroshiro128StarStar;
use static_cell::StaticCell;

// Display-LCD panel specific imports
use embedded_hal_bus::spi::ExclusiveDevice;
use esp_hal::spi::master::{Config as SpiConfig, Spi};
use mipidsi::interface::SpiInterface;
use mipidsi::options::ColorInversion;
use mipidsi::{Builder as MipidsiBuilder, models::ST7789};

use horo_core::face::ClockFace;
use horo_core::frame::SCREEN_SIZE_PX;
use horo_core::palette;
use horo_core::screen::ClockScreen;
use horo_core::surface::{PanelSurface, Surface, SurfaceFault};
use horo_core::time::TimeSource;
use horo_firmware::net::{WALL_CLOCK_SYNC, connection_task, net_task, sntp_task};
use horo_firmware::panel::Panel;
use horo_firmware::wall_clock::WallClock;

/// Local offset from UTC in seconds, baked in by build.rs from `.env`.
const UTC_OFFSET_SECONDS: &str = env!("UTC_OFFSET_SECONDS");

/// How long the boot palette screen stays up before the tick loop starts.
const PALETTE_HOLD: Duration = Duration::from_secs(2);

#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    log::error!("PANIC: {info}");
    loop {}
}

extern crate alloc;

// This creates a default app-descriptor required by the esp-idf bootloader.
// For more information see: <https://docs.espressif.com/projects/esp-idf/en/stable/esp32/api-reference/system/app_image_format.html#application-description>
esp_bootloader_esp_idf::esp_app_desc!();

static RADIO: StaticCell<esp_radio::Controller<'static>> = StaticCell::new();
static STACK_RESOURCES: StaticCell<StackResources<4>> = StaticCell::new();

#[allow(
    clippy::large_stack_frames,
    reason = "it's not unusual to allocate larger buffers etc. in main"
)]
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    rtt_target::rtt_init_log!();

    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    // Small internal heap for the radio, the big frame buffers go to PSRAM.
    esp_alloc::heap_allocator!(#[esp_hal::ram(reclaimed)] size: 73744);
    esp_alloc::psram_allocator!(peripherals.PSRAM, esp_hal);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    let mut rng = Rng::new(peripherals.RNG);

    // WiFi station plus the network stack the SNTP task runs on.
    let radio = RADIO.init(esp_radio::init().expect("failed to initialize radio controller"));
    let (controller, interfaces) =
        esp_radio::wifi::new(radio, peripherals.WIFI, Default::default())
            .expect("failed to initialize wifi controller");
    let net_seed = (u64::from(rng.random()) << 32) | u64::from(rng.random());
    let (stack, runner) = embassy_net::new(
        interfaces.sta,
        embassy_net::Config::dhcpv4(Default::default()),
        STACK_RESOURCES.init(StackResources::new()),
        net_seed,
    );
    spawner.must_spawn(connection_task(controller));
    spawner.must_spawn(net_task(runner));
    spawner.must_spawn(sntp_task(stack));

    // Configure and initialize the display

    // 1. Configure SPI bus
    let spi_bus = Spi::new(
        peripherals.SPI2,
        SpiConfig::default().with_frequency(Rate::from_mhz(40)),
    )
    .unwrap()
    .with_sck(peripherals.GPIO36)
    .with_mosi(peripherals.GPIO37);

    // 2. Create a dummy CS pin (we don't use hardware CS for this display)
    let cs = Output::new(peripherals.GPIO35, Level::High, OutputConfig::default());

    // 3. Wrap the SPI bus as a SPI device (required by embedded-hal traits)
    let spi_device = ExclusiveDevice::new_no_delay(spi_bus, cs).unwrap();

    // 4. Set up DC (Data/Command) pin
    let dc = Output::new(peripherals.GPIO34, Level::Low, OutputConfig::default());

    // 5. Create a buffer for SPI batching (larger = faster, uses more RAM)
    let mut spi_buffer = [0u8; 512];

    // 6. Create display interface
    let di = SpiInterface::new(spi_device, dc, &mut spi_buffer);

    // 7. Build and initialize the display driver
    let display = MipidsiBuilder::new(ST7789, di)
        .display_size(SCREEN_SIZE_PX, SCREEN_SIZE_PX)
        .invert_colors(ColorInversion::Inverted)
        .init(&mut embassy_time::Delay)
        .expect("failed to initialize display");

    let mut surface = PanelSurface::new(Panel::new(display));
    info!("display initialized");

    // Boot palette screen, then the clock takes over.
    if let Err(err) = palette::draw(&mut surface).and_then(|()| surface.flush()) {
        warn!("palette screen failed: {err}");
    }
    Timer::after(PALETTE_HOLD).await;

    let utc_offset: i64 = UTC_OFFSET_SECONDS
        .parse()
        .expect("UTC_OFFSET_SECONDS is generated by build.rs");
    let mut clock = WallClock::new(utc_offset);
    let ambient_seed = (u64::from(rng.random()) << 32) | u64::from(rng.random());
    let mut screen = ClockScreen::new(
        ClockFace::default(),
        Xoroshiro128StarStar::seed_from_u64(ambient_seed),
    );

    let mut ticker = Ticker::every(Duration::from_secs(1));
    loop {
        if let Some(sync) = WALL_CLOCK_SYNC.try_take() {
            info!("applying wall clock sync");
            clock.synchronize(sync);
        }
        match screen.tick(&mut surface, clock.sample()) {
            Ok(()) => {}
            Err(fault) if fault.is_transient() => warn!("display busy, tick skipped: {fault}"),
            Err(fault) => {
                error!("display failed permanently: {fault}");
                panic!("unrecoverable display fault");
            }
        }
        ticker.next().await;
    }
}
