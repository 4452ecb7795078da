//! Car firmware entry point
//!
//! Initializes the RP2350, splits the hardware resources and spawns the
//! drive control and serial link tasks.

#![no_std]
#![no_main]

use crate::task::{
    drive::drive,
    resources::AssignedResources,
    serial_link::{self, serial_rx, serial_tx},
};
use defmt::{info, unwrap};
use embassy_executor::Spawner;
use embassy_rp::block::ImageDef;
use embassy_rp::config::Config;
use {defmt_rtt as _, panic_probe as _};

/// Firmware image type for bootloader
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = ImageDef::secure_exe();

/// Task implementations
mod task;

/// Firmware entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Config::default());

    // Split the resources into separate groups for each task
    let r = split_resources!(p);

    let (tx, rx) = serial_link::init(r.serial);

    // Status consumer first, so the very first ramp tick has a listener
    spawner.spawn(unwrap!(serial_tx(tx)));
    spawner.spawn(unwrap!(serial_rx(rx)));
    spawner.spawn(unwrap!(drive(r.motor_driver)));

    info!("joystick car started");
}
