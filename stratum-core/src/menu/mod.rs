//! Menu tree
//!
//! Menus are identified by [`MenuId`]. Every menu has a back row at index 0
//! followed by rows whose [`ItemAction`] says what a click does.

pub mod action;
pub mod ids;
pub mod model;

pub use action::{Corner, EditSpec, ItemAction, MenuItem, OptionSpec, Task};
pub use ids::{MenuId, PRESET_NAMES};
pub use model::{preset_name, Items, MenuModel, HOST_ACTION_ROWS, MAX_ITEMS};
