//! Serial command link
//!
//! Line-oriented UART link to the joystick bridge:
//! - inbound: one command per line, decoded and queued for the drive task
//! - outbound: one JSON status report per line
//!
//! Malformed lines are logged and dropped without touching the controller.

use crate::task::link;
use crate::task::resources::{Irqs, SerialResources};
use defmt::{error, warn};
use embassy_rp::uart::{self, BufferedUart, BufferedUartRx, BufferedUartTx};
use embedded_io_async::{Read, Write};
use joystick_car::system::command::{self, LineFramer};
use static_cell::StaticCell;

/// Link baud rate
const BAUD_RATE: u32 = 115_200;

/// Longest accepted command line
const FRAME_CAPACITY: usize = 96;

/// Room for one serialized status report plus newline
const STATUS_LINE_CAPACITY: usize = 128;

static TX_BUFFER: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUFFER: StaticCell<[u8; 256]> = StaticCell::new();

/// Sets up the buffered UART and splits it into both directions
///
/// Must only be called once.
pub fn init(r: SerialResources) -> (BufferedUartTx, BufferedUartRx) {
    let mut config = uart::Config::default();
    config.baudrate = BAUD_RATE;

    let tx_buffer = &mut TX_BUFFER.init([0; 256])[..];
    let rx_buffer = &mut RX_BUFFER.init([0; 256])[..];
    let uart = BufferedUart::new(
        r.uart, r.tx_pin, r.rx_pin, Irqs, tx_buffer, rx_buffer, config,
    );
    uart.split()
}

/// Reads command lines and queues decoded commands
#[embassy_executor::task]
pub async fn serial_rx(mut rx: BufferedUartRx) {
    let mut framer = LineFramer::<FRAME_CAPACITY>::new();
    let mut chunk = [0u8; 32];

    loop {
        let len = match rx.read(&mut chunk).await {
            Ok(len) => len,
            Err(e) => {
                warn!("uart read failed: {}", e);
                continue;
            }
        };

        for &byte in &chunk[..len] {
            match framer.push(byte) {
                Some(Ok([])) | None => {}
                Some(Ok(frame)) => match command::decode(frame) {
                    Ok(command) => link::submit(command),
                    Err(e) => warn!("dropping command: {}", e),
                },
                Some(Err(e)) => warn!("dropping command: {}", e),
            }
        }
    }
}

/// Writes every status report as one JSON line
#[embassy_executor::task]
pub async fn serial_tx(mut tx: BufferedUartTx) {
    let Ok(mut status) = link::STATUS.subscriber() else {
        error!("no status subscriber slot left");
        return;
    };
    let mut line = [0u8; STATUS_LINE_CAPACITY];

    loop {
        let report = status.next_message_pure().await;
        let len = match report.to_json(&mut line[..STATUS_LINE_CAPACITY - 1]) {
            Ok(len) => len,
            Err(e) => {
                warn!("status not sent: {}", e);
                continue;
            }
        };
        line[len] = b'\n';
        if let Err(e) = tx.write_all(&line[..=len]).await {
            warn!("uart write failed: {}", e);
        }
    }
}
