//! Drawing surface for DWIN serial displays
//!
//! This crate provides:
//! - `Transport` trait for the outgoing byte stream, plus `CaptureTransport`
//!   for tests
//! - `Surface`, the stateful cursor/font/color context and the drawing
//!   primitives composed from wire commands
//! - RGB565 palette, theme colors and color interpolation
//! - Screen layout constants
//!
//! # Architecture
//!
//! The panel retains nothing between commands, so renderers redraw whatever
//! they own from scratch. Each primitive is fire-and-forget: encoding and
//! sending happen immediately and no result is returned.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// Must come first so the macros are visible to the other modules
mod fmt;

pub mod color;
pub mod layout;
pub mod surface;
pub mod transport;

// Re-export key types
pub use layout::FrameRect;
pub use stratum_protocol::icons;
pub use surface::{DisplayContext, NumberStyle, Surface, TextStyle};
pub use transport::{CaptureTransport, Transport};
