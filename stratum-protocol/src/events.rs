//! Input events from the rotary encoder

/// Edge events delivered by the encoder driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncoderEvent {
    /// One detent clockwise
    RotateCw,
    /// One detent counter-clockwise
    RotateCcw,
    /// Button press
    Click,
}

impl EncoderEvent {
    /// Event for a signed rotation delta, `None` for zero
    pub fn from_delta(delta: i8) -> Option<Self> {
        match delta {
            d if d > 0 => Some(EncoderEvent::RotateCw),
            d if d < 0 => Some(EncoderEvent::RotateCcw),
            _ => None,
        }
    }

    /// Returns true if this is a rotation event
    pub fn is_rotation(&self) -> bool {
        matches!(self, EncoderEvent::RotateCw | EncoderEvent::RotateCcw)
    }

    /// Returns true if this is a button event
    pub fn is_button(&self) -> bool {
        matches!(self, EncoderEvent::Click)
    }

    /// Returns the rotation direction as a signed delta (-1, 0, or +1)
    pub fn rotation_delta(&self) -> i8 {
        match self {
            EncoderEvent::RotateCw => 1,
            EncoderEvent::RotateCcw => -1,
            EncoderEvent::Click => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_delta() {
        assert_eq!(EncoderEvent::from_delta(1), Some(EncoderEvent::RotateCw));
        assert_eq!(EncoderEvent::from_delta(-3), Some(EncoderEvent::RotateCcw));
        assert_eq!(EncoderEvent::from_delta(0), None);
    }

    #[test]
    fn test_rotation_delta() {
        assert_eq!(EncoderEvent::RotateCw.rotation_delta(), 1);
        assert_eq!(EncoderEvent::RotateCcw.rotation_delta(), -1);
        assert_eq!(EncoderEvent::Click.rotation_delta(), 0);
    }

    #[test]
    fn test_is_rotation() {
        assert!(EncoderEvent::RotateCw.is_rotation());
        assert!(EncoderEvent::RotateCcw.is_rotation());
        assert!(!EncoderEvent::Click.is_rotation());
    }

    #[test]
    fn test_is_button() {
        assert!(EncoderEvent::Click.is_button());
        assert!(!EncoderEvent::RotateCw.is_button());
    }
}
