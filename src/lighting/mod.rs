//! Light behaviors

pub mod flicker;

pub use flicker::{FlickerConfig, FlickerLight, FlickerProfile, Oscillator};
