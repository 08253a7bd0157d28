// Gateway module for gesture handling - follows the Train Station Pattern
// All external access must go through this gateway

mod haptics;
mod translator;

pub use haptics::{haptics_for, HapticFeedback, HapticIntensity, NoHaptics, TerminalBell};
pub use translator::{
    resolve, GestureEvent, GestureSession, GestureTranslator, Navigation, SwipeDirection,
};
