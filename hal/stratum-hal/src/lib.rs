//! Stratum Hardware Abstraction Layer
//!
//! The display UI never touches a peripheral directly. It talks to two
//! collaborators, both defined here as traits so the same UI code runs on
//! any mainboard (and on the host, under test):
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  stratum-ui (controller + renderers)    │
//! └─────────────────────────────────────────┘
//!            │                     │
//!            ▼                     ▼
//! ┌───────────────────┐  ┌───────────────────┐
//! │ uart::UartTx      │  │ storage::         │
//! │ (display link)    │  │   SettingsStore   │
//! └───────────────────┘  └───────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::UartTx`] - Outgoing serial link to the display controller
//! - [`storage::SettingsStore`] - Persistent block for the UI settings record

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod storage;
pub mod uart;

pub use storage::{MemoryStore, SettingsStore, StorageError};
pub use uart::{IoUart, UartConfig, UartTx};
