//! pendant-hw-interface
//!
//! Bench integration firmware for the Raspberry Pi Pico 2: wires the MPG
//! pendant session, the adapter core, and a logging stand-in controller
//! into a live loop.
//!
//! 1. The pendant raises its strobe line on key/encoder activity.
//! 2. The strobe task latches a read request on the shared
//!    [`KeypadInput`].
//! 3. The pendant task ticks every 10 ms: the core's poll scheduler
//!    decides whether a counts read or status write is due, and the task
//!    performs the I2C transfers it asked for.
//! 4. Macro characters stream out of the core and are logged line by
//!    line in place of a G-code parser.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::block::ImageDef;
use embassy_rp::gpio::{Input, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_time::{Duration, Instant, Ticker};
use heapless::String;
use {defmt_rtt as _, panic_probe as _};

use pendant_core::{KeypadInput, Pendant};
use pendant_link::{PendantLink, DEFAULT_ADDRESS};

mod controller;
use controller::DemoController;

// ---------------------------------------------------------------------------
// Boot block and interrupt binding
// ---------------------------------------------------------------------------

/// Tell the RP2350 Boot ROM about our application.
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = embassy_rp::block::ImageDef::secure_exe();

// Wire the I2C0 peripheral interrupt to Embassy's async handler.
bind_interrupts!(struct Irqs {
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
});

// ---------------------------------------------------------------------------
// Static storage
// ---------------------------------------------------------------------------

/// Interrupt-shared half of the adapter: key ring + strobe/jog flags.
static PENDANT_INPUT: KeypadInput = KeypadInput::new();

/// Stand-in motion controller, shared between tasks.
static CONTROLLER: DemoController = DemoController::new();

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// Strobe monitoring task. The line is active-low; a falling edge means
/// the pendant has fresh counts or buttons for us.
#[embassy_executor::task]
async fn strobe_task(mut strobe: Input<'static>, input: &'static KeypadInput) {
    loop {
        strobe.wait_for_low().await;
        input.on_strobe();
        strobe.wait_for_high().await;
    }
}

/// Foreground task: periodic tick into the core, I2C transfers out.
#[embassy_executor::task]
async fn pendant_task(
    mut link: PendantLink<I2c<'static, I2C0, i2c::Async>>,
    input: &'static KeypadInput,
    controller: &'static DemoController,
) {
    // No NVS on this bench board; the adapter runs on default jog
    // parameters and an empty macro table.
    let mut pendant = Pendant::new(input);
    let mut ticker = Ticker::every(Duration::from_millis(10));
    let mut macro_line: String<80> = String::new();

    loop {
        ticker.next().await;
        let now_ms = Instant::now().as_millis() as u32;
        let outcome = pendant.poll(controller, now_ms);

        if let Some(status) = outcome.status {
            if let Err(e) = link.write_status(&status).await {
                // Expected while no pendant is plugged in.
                debug!("status write failed: {}", e);
            }
        }

        if outcome.read_counts {
            match link.read_counts().await {
                Ok(packet) => {
                    let result = pendant.on_counts(controller, &packet);
                    if result.clear_buttons {
                        if let Err(e) = link.clear_buttons().await {
                            warn!("button clear failed: {}", e);
                        }
                    }
                }
                Err(e) => debug!("counts read failed: {}", e),
            }
        }

        // A real integration points the controller's stream selector at
        // stream_read(); here macro output is just logged per block.
        while let Some(byte) = pendant.stream_read() {
            if byte == b'\n' {
                info!("macro block: {}", macro_line.as_str());
                macro_line.clear();
            } else {
                let _ = macro_line.push(byte as char);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    info!("pendant-hw-interface starting");

    // —— Pin assignments ————————————————————————————————————————————————————
    // I2C_SDA → GP20  (p.PIN_20)
    // I2C_SCL → GP21  (p.PIN_21)
    // STROBE  → GP19  (p.PIN_19)  active-low, pull-up enabled
    // ———————————————————————————————————————————————————————————————————————

    let i2c = I2c::new_async(
        p.I2C0,
        p.PIN_21, // SCL
        p.PIN_20, // SDA
        Irqs,
        i2c::Config::default(),
    );

    let link = PendantLink::new(i2c, DEFAULT_ADDRESS);
    let strobe = Input::new(p.PIN_19, Pull::Up);

    spawner.spawn(strobe_task(strobe, &PENDANT_INPUT)).unwrap();
    spawner
        .spawn(pendant_task(link, &PENDANT_INPUT, &CONTROLLER))
        .unwrap();

    info!("All tasks spawned");
}
