//! Utility functions used across the application.
//!
//! - [`code_generator`] - Short identifier generation and validation
//! - [`qr`] - QR code rendering to PNG

pub mod code_generator;
pub mod qr;
