//! Driven adapters: implementations of the port traits against real
//! hardware (ESP-IDF) or in-memory simulations (host builds and tests).

pub mod hardware;
pub mod log_sink;
pub mod nvs;
pub mod scanner;
pub mod time;
