//! In-place edit sessions
//!
//! A numeric edit works in whole detents of its `unit` so repeated rotation
//! never accumulates float error. Bounds are enforced on every detent and
//! again on confirm; a value that started out of range is only clamped when
//! committed.

use crate::menu::{EditSpec, OptionSpec};
use crate::traits::MachineCommand;
use crate::values::{OptionSlot, ValueSlot};

fn round_i32(value: f32) -> i32 {
    if value >= 0.0 {
        (value + 0.5) as i32
    } else {
        (value - 0.5) as i32
    }
}

/// Clamp that tolerates NaN by falling back to `min`
fn clamp(value: f32, min: f32, max: f32) -> f32 {
    if value >= max {
        max
    } else if value >= min {
        value
    } else {
        min
    }
}

/// Numeric edit of one slot
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EditSession {
    pub slot: ValueSlot,
    /// Menu row being edited
    pub row: u8,
    pub min: f32,
    pub max: f32,
    pub unit: f32,
    pub decimals: u8,
    original: f32,
    detents: i32,
    completion: Option<MachineCommand>,
}

impl EditSession {
    pub fn new(spec: &EditSpec, current: f32, row: u8) -> Self {
        let unit = if spec.unit > 0.0 { spec.unit } else { 1.0 };
        Self {
            slot: spec.slot,
            row,
            min: spec.min,
            max: spec.max,
            unit,
            decimals: spec.decimals,
            original: current,
            detents: round_i32(current / unit),
            completion: spec.completion,
        }
    }

    fn min_detents(&self) -> i32 {
        round_i32(self.min / self.unit)
    }

    fn max_detents(&self) -> i32 {
        round_i32(self.max / self.unit)
    }

    /// Value the session currently shows
    pub fn value(&self) -> f32 {
        self.detents as f32 * self.unit
    }

    pub fn original(&self) -> f32 {
        self.original
    }

    /// Move by `delta` detents; returns true if the value changed
    pub fn rotate(&mut self, delta: i8) -> bool {
        let before = self.detents;
        let moved = self.detents.saturating_add(delta as i32);
        self.detents = moved.clamp(self.min_detents(), self.max_detents().max(self.min_detents()));
        self.detents != before
    }

    /// Final value, quantized and clamped, plus the follow-up command
    pub fn confirm(self) -> (f32, Option<MachineCommand>) {
        let value = clamp(self.value(), self.min, self.max);
        debug!("edit commit {} = {}", self.slot, value);
        (value, self.completion)
    }

    /// The value the slot held before editing
    pub fn cancel(self) -> f32 {
        self.original
    }
}

/// Option list edit of one slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OptionSession {
    pub slot: OptionSlot,
    pub row: u8,
    original: u8,
    index: u8,
    count: u8,
}

impl OptionSession {
    pub fn new(spec: &OptionSpec, current: u8, row: u8) -> Self {
        let count = spec.slot.labels().len().min(u8::MAX as usize) as u8;
        Self {
            slot: spec.slot,
            row,
            original: current,
            index: current.min(count.saturating_sub(1)),
            count,
        }
    }

    pub fn index(&self) -> u8 {
        self.index
    }

    pub fn label(&self) -> &'static str {
        self.slot
            .labels()
            .get(self.index as usize)
            .copied()
            .unwrap_or("")
    }

    /// Move by one entry, clamped at both ends
    pub fn rotate(&mut self, delta: i8) -> bool {
        let before = self.index;
        self.index = if delta > 0 {
            self.index.saturating_add(1).min(self.count.saturating_sub(1))
        } else if delta < 0 {
            self.index.saturating_sub(1)
        } else {
            self.index
        };
        self.index != before
    }

    pub fn confirm(self) -> u8 {
        debug!("option commit {} = {}", self.slot, self.index);
        self.index
    }

    pub fn cancel(self) -> u8 {
        self.original
    }
}

/// The one active editor, if any
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Editor {
    Value(EditSession),
    Option(OptionSession),
}

impl Editor {
    pub fn row(&self) -> u8 {
        match self {
            Editor::Value(session) => session.row,
            Editor::Option(session) => session.row,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SettingField;
    use crate::traits::MachineParam;
    use proptest::prelude::*;

    fn spec(min: f32, max: f32, unit: f32) -> EditSpec {
        EditSpec {
            slot: ValueSlot::Machine(MachineParam::HotendTarget),
            min,
            max,
            unit,
            decimals: 0,
            completion: None,
        }
    }

    #[test]
    fn test_out_of_range_value_clamped_on_confirm() {
        let session = EditSession::new(&spec(0.0, 100.0, 1.0), 150.0, 1);
        assert_eq!(session.confirm().0, 100.0);
    }

    #[test]
    fn test_cancel_restores_original() {
        let mut session = EditSession::new(&spec(0.0, 100.0, 1.0), 150.0, 1);
        session.rotate(-1);
        session.rotate(-1);
        assert_eq!(session.cancel(), 150.0);
    }

    #[test]
    fn test_rotation_clamps_at_bounds() {
        let mut session = EditSession::new(&spec(0.0, 3.0, 1.0), 2.0, 1);
        assert!(session.rotate(1));
        assert!(!session.rotate(1));
        assert_eq!(session.value(), 3.0);
    }

    #[test]
    fn test_quantized_to_unit() {
        let mut session = EditSession::new(&spec(-10.0, 10.0, 0.01), -0.123, 1);
        session.rotate(1);
        let (value, _) = session.confirm();
        assert!((value - -0.11).abs() < 1e-5);
    }

    #[test]
    fn test_completion_returned_once() {
        let spec = EditSpec {
            slot: ValueSlot::Setting(SettingField::MeshMinX),
            min: 0.0,
            max: 100.0,
            unit: 0.1,
            decimals: 1,
            completion: Some(MachineCommand::ApplyMeshLimits),
        };
        let session = EditSession::new(&spec, 25.0, 2);
        assert_eq!(session.confirm().1, Some(MachineCommand::ApplyMeshLimits));
    }

    #[test]
    fn test_option_session_clamps() {
        let spec = OptionSpec {
            slot: OptionSlot::PreheatMode,
        };
        let mut session = OptionSession::new(&spec, 0, 1);
        assert!(!session.rotate(-1));
        assert!(session.rotate(1));
        assert!(session.rotate(1));
        assert!(!session.rotate(1));
        assert_eq!(session.label(), "Bed");
        assert_eq!(session.confirm(), 2);
        assert_eq!(OptionSession::new(&spec, 1, 1).cancel(), 1);
    }

    proptest! {
        #[test]
        fn prop_confirm_within_bounds(start in -500.0f32..500.0, turns in proptest::collection::vec(-1i8..=1, 0..40)) {
            let mut session = EditSession::new(&spec(0.0, 100.0, 0.5), start, 1);
            for t in turns {
                session.rotate(t);
            }
            let (value, _) = session.confirm();
            prop_assert!((0.0..=100.0).contains(&value));
        }
    }
}
