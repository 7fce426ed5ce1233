//! Interaction state: modes, navigation, editors, popups, lock screen

pub mod edit;
pub mod lock;
pub mod mode;
pub mod nav;
pub mod popup;

pub use edit::{EditSession, Editor, OptionSession};
pub use lock::{LockOutcome, LockState};
pub use mode::{InteractionMode, Redraw};
pub use nav::{NavFrame, NavigationStack, Step, MAX_DEPTH};
pub use popup::{Choice, Continuation, PopupDescriptor, PopupId, PopupKind, PopupState};
