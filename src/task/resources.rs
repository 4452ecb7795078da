//! Hardware Resource Management
//!
//! Allocates pins and peripherals to the firmware tasks. Each task receives
//! its own resource group, so no two tasks can drive the same pin.
//!
//! # Resource Groups
//! - Motor Driver: TB6612FNG dual H-bridge pins and PWM slices
//! - Serial: UART carrying joystick commands in and status out

use assign_resources::assign_resources;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::{self, UART0};
use embassy_rp::uart::BufferedInterruptHandler;
use embassy_rp::Peri;

assign_resources! {
    /// TB6612FNG dual motor driver pins and PWM channels
    motor_driver: MotorDriverResources {
        standby_pin: PIN_22,
        // Motor A: throttle (drive motor)
        throttle_slice: PWM_SLICE6,
        throttle_pwm_pin: PIN_28,
        throttle_forward_pin: PIN_21,
        throttle_backward_pin: PIN_20,
        // Motor B: steering
        steer_slice: PWM_SLICE5,
        steer_pwm_pin: PIN_27,
        steer_forward_pin: PIN_19,
        steer_backward_pin: PIN_18,
    },
    /// Command/status link to the joystick bridge
    serial: SerialResources {
        uart: UART0,
        tx_pin: PIN_0,
        rx_pin: PIN_1,
    },
}

bind_interrupts!(pub struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});
