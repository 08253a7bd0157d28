use std::io::Write;

use crate::constants::{HAPTIC_LIGHT_MS, HAPTIC_MEDIUM_MS};

/// Strength of a tactile pulse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HapticIntensity {
    /// Direct selection from the chat list
    Light,
    /// Swipe navigation between chats
    Medium,
}

impl HapticIntensity {
    /// Pulse length for hosts that vibrate by duration
    pub fn duration_ms(&self) -> u64 {
        match self {
            Self::Light => HAPTIC_LIGHT_MS,
            Self::Medium => HAPTIC_MEDIUM_MS,
        }
    }
}

/// Sink for tactile feedback. Hosts without one simply do nothing.
pub trait HapticFeedback: Send {
    fn pulse(&self, intensity: HapticIntensity);
}

/// Host with no haptic capability
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHaptics;

impl HapticFeedback for NoHaptics {
    fn pulse(&self, _intensity: HapticIntensity) {}
}

/// Terminal stand-in for a vibration motor: rings the bell
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalBell;

impl HapticFeedback for TerminalBell {
    fn pulse(&self, intensity: HapticIntensity) {
        tracing::trace!(?intensity, "haptic pulse");
        let mut stdout = std::io::stdout();
        // Write failures mean no bell, nothing more
        let _ = stdout.write_all(b"\x07").and_then(|_| stdout.flush());
    }
}

/// Pick the feedback sink for the configured setting
pub fn haptics_for(enabled: bool) -> Box<dyn HapticFeedback> {
    if enabled {
        Box::new(TerminalBell)
    } else {
        Box::new(NoHaptics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swipe_pulse_is_stronger_than_selection() {
        assert!(HapticIntensity::Medium.duration_ms() > HapticIntensity::Light.duration_ms());
    }

    #[test]
    fn test_no_haptics_is_silent() {
        NoHaptics.pulse(HapticIntensity::Medium);
        NoHaptics.pulse(HapticIntensity::Light);
    }
}
