//! Board-agnostic logic for the Stratum display UI
//!
//! This crate contains everything about the UI that does not draw:
//!
//! - Feature set and the persisted settings record (bit-packed codec)
//! - Menu tree: ids, titles, item tables built from the feature set
//! - Navigation history, edit sessions, popups and interaction modes
//! - The machine-host collaborator trait and the commands sent to it
//! - Value store binding editable slots to settings, host and UI state

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// Must come first so the macros are visible to the other modules
mod fmt;

pub mod config;
pub mod menu;
pub mod state;
pub mod traits;
pub mod values;

pub use config::{FeatureSet, PersistedSettings, SettingsError};
pub use menu::{ItemAction, MenuId, MenuItem, MenuModel, Task};
pub use state::{InteractionMode, NavFrame, NavigationStack, PopupId, Redraw};
pub use traits::{MachineCommand, MachineHost, MachineParam, MachineStatus, PrintStatus};
pub use values::{OptionSlot, ToggleSlot, ValueSlot, ValueStore};
