//! Core drive control components
pub mod axis;
pub mod command;
pub mod config;
pub mod controller;
pub mod motor;
pub mod safety;
pub mod state;
pub mod status;
