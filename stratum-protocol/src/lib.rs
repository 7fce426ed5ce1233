//! DWIN Display Command Protocol
//!
//! This crate encodes drawing requests into the binary command set of
//! DWIN-style serial TFT controllers (the panels fitted to Creality-type
//! printer mainboards). The panel keeps no widget state: every pixel on it
//! is the result of a command sent from here.
//!
//! # Protocol Overview
//!
//! Every command is a single frame:
//! ```text
//! ┌────────┬─────────┬──────────────────┬─────────────┐
//! │ HEADER │ COMMAND │ PAYLOAD          │ TAIL        │
//! │ 0xAA   │ 1B      │ 0–90B, BE fields │ CC 33 C3 3C │
//! └────────┴─────────┴──────────────────┴─────────────┘
//! ```
//!
//! There is no checksum and no acknowledgement; the only reply the UI ever
//! reads is the handshake `OK`.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod command;
pub mod events;
pub mod font;
pub mod frame;
pub mod icons;
pub mod number;

pub use command::{
    AreaMoveDir, Command, IconFlags, RectMode, DISPLAY_HEIGHT, DISPLAY_WIDTH, MAX_STRING_LEN,
};
pub use events::EncoderEvent;
pub use font::Font;
pub use frame::{FrameError, FrameWriter, Reply, ReplyParser, FRAME_HEADER, FRAME_TAIL, MAX_FRAME_SIZE};
pub use number::{scale_float, NumberFormat};
