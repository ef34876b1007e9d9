//! Fire light flicker: per-frame intensity modulation and one-time shadow setup.
//!
//! Each light instance is matched once, at attach, against two lookup tables
//! keyed by its identity tag: an intensity profile (which oscillator, how much
//! amplitude) and a shadow profile (map size and clip planes). A tag missing
//! from a table simply disables that part.

use std::any::Any;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::behavior::{Behavior, BehaviorContext, Signal, TimerId};
use crate::scene::{LightKind, SceneGraph, SceneNodeId, ShadowSettings};

/// Delay of the fallback shadow pass, in case `loaded` fired before attach.
pub const SHADOW_FALLBACK_DELAY: Duration = Duration::from_millis(100);

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Declared options of the flicker behavior.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlickerConfig {
    /// Oscillation rate (radians per second of the primary oscillator).
    pub speed: f32,
    /// Base intensity used only when the entity carries no light at attach.
    pub base_intensity: f32,
}

impl Default for FlickerConfig {
    fn default() -> Self {
        Self {
            speed: 10.0,
            base_intensity: 1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

/// One of three phase-offset sinusoids sharing the configured speed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Oscillator {
    /// `sin(t·speed)`
    Primary,
    /// `sin(t·speed·1.3)`
    Fast,
    /// `sin(t·speed·0.8)`
    Slow,
}

impl Oscillator {
    pub fn rate_multiplier(self) -> f32 {
        match self {
            Oscillator::Primary => 1.0,
            Oscillator::Fast => 1.3,
            Oscillator::Slow => 0.8,
        }
    }

    pub fn sample(self, t: f32, speed: f32) -> f32 {
        (t * speed * self.rate_multiplier()).sin()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlickerProfile {
    pub oscillator: Oscillator,
    /// Fraction of the base intensity the light swings by (0.10 – 0.25).
    pub amplitude: f32,
}

impl FlickerProfile {
    const fn new(oscillator: Oscillator, amplitude: f32) -> Self {
        Self { oscillator, amplitude }
    }

    /// Intensity after `t` seconds at `speed`.
    pub fn intensity(&self, base: f32, t: f32, speed: f32) -> f32 {
        base * (1.0 + self.oscillator.sample(t, speed) * self.amplitude)
    }
}

/// Intensity profiles by light tag.
pub const FLICKER_PROFILES: &[(&str, FlickerProfile)] = &[
    ("fireLight1", FlickerProfile::new(Oscillator::Primary, 0.15)),
    ("fireLight2", FlickerProfile::new(Oscillator::Fast, 0.20)),
    ("fireLight3", FlickerProfile::new(Oscillator::Slow, 0.25)),
    ("fireGlow", FlickerProfile::new(Oscillator::Primary, 0.10)),
    ("groundReflection", FlickerProfile::new(Oscillator::Fast, 0.15)),
];

/// Shadow profiles by light tag.
pub const SHADOW_PROFILES: &[(&str, ShadowSettings)] = &[
    ("fireLight1", ShadowSettings { map_size: 512, near: 0.1, far: 8.0 }),
    ("fireLight2", ShadowSettings { map_size: 256, near: 0.1, far: 6.0 }),
    ("fireLight3", ShadowSettings { map_size: 256, near: 0.1, far: 5.0 }),
    ("groundReflection", ShadowSettings { map_size: 512, near: 0.05, far: 4.0 }),
];

pub fn flicker_profile(tag: &str) -> Option<FlickerProfile> {
    FLICKER_PROFILES.iter().find(|(t, _)| *t == tag).map(|(_, p)| *p)
}

pub fn shadow_profile(tag: &str) -> Option<ShadowSettings> {
    SHADOW_PROFILES.iter().find(|(t, _)| *t == tag).map(|(_, s)| *s)
}

// ---------------------------------------------------------------------------
// Behavior
// ---------------------------------------------------------------------------

/// Flickering light attached to a light entity. Never moves the light.
pub struct FlickerLight {
    config: FlickerConfig,
    base_intensity: f32,
    elapsed: f32,
    profile: Option<FlickerProfile>,
    shadow: Option<ShadowSettings>,
    shadows_applied: bool,
}

impl FlickerLight {
    pub fn new(config: FlickerConfig) -> Self {
        Self {
            base_intensity: config.base_intensity,
            config,
            elapsed: 0.0,
            profile: None,
            shadow: None,
            shadows_applied: false,
        }
    }

    pub fn base_intensity(&self) -> f32 {
        self.base_intensity
    }

    /// Seconds accumulated since attach.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn profile(&self) -> Option<FlickerProfile> {
        self.profile
    }

    /// Whether a shadow pass has reached a loaded point light.
    pub fn shadows_applied(&self) -> bool {
        self.shadows_applied
    }

    /// Current target intensity, or `None` for an untagged light.
    pub fn current_intensity(&self) -> Option<f32> {
        self.profile
            .map(|p| p.intensity(self.base_intensity, self.elapsed, self.config.speed))
    }

    /// Enable shadows on a loaded point light and apply the tag's shadow
    /// profile. Safe to call repeatedly; a no-op until the light is loaded.
    pub fn configure_shadows(&mut self, scene: &mut SceneGraph, entity: SceneNodeId) -> bool {
        if !scene.is_loaded(entity) {
            return false;
        }
        let shadow = self.shadow;
        let Some(light) = scene.light_mut(entity) else {
            return false;
        };
        if light.kind != LightKind::Point {
            return false;
        }

        light.cast_shadow = true;
        if let Some(settings) = shadow {
            light.shadow = settings;
        }
        if !self.shadows_applied {
            log::debug!("Configured shadows for light {:?}: {:?}", entity, shadow);
        }
        self.shadows_applied = true;
        true
    }
}

impl Behavior for FlickerLight {
    fn name(&self) -> &'static str {
        "flicker-light"
    }

    fn on_attach(&mut self, ctx: &mut BehaviorContext<'_>) {
        let entity = ctx.entity();
        let scene = ctx.scene();

        if let Some(light) = scene.light(entity) {
            self.base_intensity = light.intensity;
        }
        if let Some(tag) = scene.tag(entity) {
            self.profile = flicker_profile(tag);
            self.shadow = shadow_profile(tag);
        }

        ctx.schedule(SHADOW_FALLBACK_DELAY);
    }

    fn on_signal(&mut self, ctx: &mut BehaviorContext<'_>, signal: &Signal) {
        if *signal == Signal::Loaded {
            let entity = ctx.entity();
            self.configure_shadows(ctx.scene_mut(), entity);
        }
    }

    fn on_timer(&mut self, ctx: &mut BehaviorContext<'_>, _timer: TimerId) {
        let entity = ctx.entity();
        self.configure_shadows(ctx.scene_mut(), entity);
    }

    fn on_frame(&mut self, ctx: &mut BehaviorContext<'_>, dt: f32) {
        self.elapsed += dt;

        let Some(intensity) = self.current_intensity() else {
            return;
        };
        let entity = ctx.entity();
        if let Some(light) = ctx.scene_mut().light_mut(entity) {
            light.intensity = intensity;
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
