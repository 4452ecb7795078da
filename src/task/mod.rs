pub mod drive;
pub mod link;
pub mod motor_driver;
pub mod resources;
pub mod serial_link;
