//! Rejection-sampling scatter passes.
//!
//! A pass draws a target count, then repeatedly samples a uniform angle and a
//! uniform radius inside an annulus around the origin. Candidates inside the
//! pass's exclusion zone are rejected. The pass stops when the target is
//! placed or after `target × RETRY_FACTOR` draws, whichever comes first, so an
//! under-filled pass is a normal outcome rather than an error.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use crate::math::point_on_circle;

/// Candidate draws allowed per requested object.
pub const RETRY_FACTOR: u32 = 3;

/// Circular region in the ground plane where nothing may be placed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExclusionZone {
    /// Center as `(x, z)`
    pub center: Vec2,
    pub radius: f32,
}

impl ExclusionZone {
    pub const fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Whether `point` lies strictly closer than `radius` to the center.
    pub fn contains(&self, point: Vec2) -> bool {
        point.distance(self.center) < self.radius
    }
}

/// A single candidate position checked against an exclusion zone.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacementRequest {
    pub x: f32,
    pub z: f32,
    pub exclusion: ExclusionZone,
}

impl PlacementRequest {
    pub fn new(position: Vec2, exclusion: ExclusionZone) -> Self {
        Self {
            x: position.x,
            z: position.y,
            exclusion,
        }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.z)
    }

    pub fn is_accepted(&self) -> bool {
        !self.exclusion.contains(self.position())
    }
}

/// Ring around the origin candidates are drawn from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Annulus {
    pub inner: f32,
    pub outer: f32,
}

impl Annulus {
    pub const fn new(inner: f32, outer: f32) -> Self {
        Self { inner, outer }
    }

    /// `inner + U[0,1)·(outer − inner)`
    pub fn sample_radius<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        self.inner + rng.gen_range(0.0..1.0) * (self.outer - self.inner)
    }
}

/// `base + U{0..spread-1}`; a zero spread gives exactly `base`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TargetCount {
    pub base: u32,
    pub spread: u32,
}

impl TargetCount {
    pub const fn exactly(base: u32) -> Self {
        Self { base, spread: 0 }
    }

    pub const fn between(base: u32, spread: u32) -> Self {
        Self { base, spread }
    }

    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        if self.spread == 0 {
            self.base
        } else {
            self.base + rng.gen_range(0..self.spread)
        }
    }

    /// Largest value `roll` can return.
    pub fn max(&self) -> u32 {
        self.base + self.spread.saturating_sub(1)
    }
}

/// Outcome of one pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PassReport {
    pub name: &'static str,
    pub target: u32,
    pub placed: u32,
    pub attempts: u32,
}

impl PassReport {
    /// Whether the pass reached its target.
    pub fn is_complete(&self) -> bool {
        self.placed == self.target
    }
}

/// One population pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScatterPass {
    pub name: &'static str,
    pub count: TargetCount,
    pub annulus: Annulus,
    pub exclusion: Option<ExclusionZone>,
}

impl ScatterPass {
    /// Run the pass, calling `place` for every accepted position `(x, z)`.
    pub fn run<R, F>(&self, rng: &mut R, mut place: F) -> PassReport
    where
        R: Rng + ?Sized,
        F: FnMut(&mut R, Vec2),
    {
        let target = self.count.roll(rng);
        let budget = target * RETRY_FACTOR;
        let mut placed = 0;
        let mut attempts = 0;

        while placed < target && attempts < budget {
            attempts += 1;
            let angle = rng.gen_range(0.0..TAU);
            let radius = self.annulus.sample_radius(rng);
            let candidate = point_on_circle(angle, radius);

            if let Some(zone) = self.exclusion {
                if !PlacementRequest::new(candidate, zone).is_accepted() {
                    continue;
                }
            }

            place(&mut *rng, candidate);
            placed += 1;
        }

        let report = PassReport {
            name: self.name,
            target,
            placed,
            attempts,
        };
        log::debug!(
            "Scatter pass '{}': placed {}/{} in {} attempts",
            report.name,
            report.placed,
            report.target,
            report.attempts
        );
        report
    }
}
