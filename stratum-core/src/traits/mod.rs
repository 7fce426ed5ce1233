//! Collaborator traits
//!
//! These traits define the interface between the UI logic and the firmware
//! it runs in.

pub mod host;

pub use host::{
    Axis, Endstops, FileEntry, Heater, HomeAxes, MachineCommand, MachineFlag, MachineHost, MachineParam,
    MachineStatus, PrintStatus,
};
