//! numcrypt: number theory and textbook RSA behind a keyboard-driven
//! terminal menu.

pub mod app;
pub mod config;
pub mod console;
pub mod input;
pub mod logging;
pub mod menu;
pub mod numtheory;
pub mod report;
pub mod rsa;
pub mod types;

#[cfg(test)]
mod testing;
