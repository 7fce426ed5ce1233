//! Display UI for DWIN serial panels
//!
//! Ties the pieces together:
//! - [`Controller`] owns all UI state (mode, navigation, editor, popups) and
//!   turns encoder events into machine commands and redraws
//! - `render` draws every screen through a [`Surface`](stratum_display::Surface)
//! - [`UartTransport`] sends frames over a board UART
//! - `storage` loads and saves the settings record
//! - `config` parses TOML feature profiles and builds a controller from
//!   one with `Controller::from_profile` (needs `std`)
//!
//! # Usage
//!
//! ```ignore
//! let transport = UartTransport::new(uart);
//! let mut ui = Controller::new(transport, store, FeatureSet::default());
//! ui.start(&host);
//! loop {
//!     if let Some(event) = encoder.poll() {
//!         ui.handle_input(event, &mut host);
//!     }
//!     ui.tick(&mut host);
//! }
//! ```

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

// Must come first so the macros are visible to the other modules
mod fmt;

pub mod controller;
pub mod render;
pub mod storage;
pub mod theme;
pub mod transport;

#[cfg(feature = "std")]
pub mod config;

pub use controller::Controller;
pub use storage::{load_settings, save_settings, PersistError};
pub use theme::Theme;
pub use transport::UartTransport;

#[cfg(feature = "std")]
pub use config::{parse_profile, ConfigError, Profile};
