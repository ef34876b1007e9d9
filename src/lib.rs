//! Campsite - behaviors for an interactive campfire scene
//!
//! A small scene graph plus a frame-driven behavior runtime, with the
//! behaviors that bring the camp to life: flickering fire lights, procedural
//! forest and mountains, a movement boundary, proximity sensing, log seats
//! and camera-facing popups.

pub mod core;
pub mod math;
pub mod scene;
pub mod behavior;
pub mod lighting;
pub mod generation;
pub mod interaction;
