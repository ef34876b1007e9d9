//! Integration tests for the assembled campsite.
//!
//! Exercises: SceneConfig → CampScene → BehaviorRuntime frames, driving the
//! scene only through its public surface the way a host would.

use std::time::Duration;

use campsite::core::input::InputState;
use campsite::core::time::FrameClock;
use campsite::generation::{CAMP_TREE_PASSES, TENT_EXCLUSION};
use campsite::math::{planar_distance, planar_length};
use campsite::scene::manager::{RIG_START, TENT_POSITION};
use campsite::scene::{CampScene, SceneConfig};
use glam::Vec3;
use winit::keyboard::KeyCode;

// ── Helpers ────────────────────────────────────────────────────────────

fn seeded(seed: u64) -> CampScene {
    CampScene::new(SceneConfig {
        seed: Some(seed),
        ..Default::default()
    })
}

fn run_frames(camp: &mut CampScene, clock: &mut FrameClock, frames: usize) {
    let input = InputState::new();
    for _ in 0..frames {
        let dt = clock.tick();
        camp.tick(&input, dt);
    }
}

fn press(camp: &mut CampScene, key: KeyCode) {
    let mut input = InputState::new();
    input.press(key);
    camp.tick(&input, 1.0 / 60.0);
}

fn intensities(camp: &CampScene) -> Vec<f32> {
    camp.lights()
        .iter()
        .map(|l| camp.scene().light(*l).unwrap().intensity)
        .collect()
}

// ── Generation ─────────────────────────────────────────────────────────

#[test]
fn test_same_seed_builds_same_camp() {
    let a = seeded(77);
    let b = seeded(77);
    let trees = |camp: &CampScene| {
        camp.tree_scatterer()
            .unwrap()
            .trees()
            .iter()
            .map(|t| camp.scene().position(*t).unwrap())
            .collect::<Vec<_>>()
    };
    assert_eq!(trees(&a), trees(&b));
    assert_eq!(a.scene().node_count(), b.scene().node_count());
}

#[test]
fn test_forest_keeps_clear_of_tent() {
    for seed in 0..4 {
        let camp = seeded(seed);
        let forest = camp.tree_scatterer().unwrap();
        assert_eq!(forest.reports().len(), CAMP_TREE_PASSES.len());
        for tree in forest.trees() {
            let p = camp.scene().world_position(*tree).unwrap();
            assert!(planar_distance(p, TENT_POSITION) >= TENT_EXCLUSION.radius - 1e-4);
            assert!(planar_length(p) < 26.0 + 1e-3);
        }
    }
}

#[test]
fn test_config_file_drives_scene() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("camp.json");
    std::fs::write(&path, r#"{"seed": 5, "boundary": {"max_radius": 12.0}}"#).unwrap();

    let config = SceneConfig::load(&path).unwrap();
    let mut camp = CampScene::new(config);
    let mut clock = FrameClock::fixed(Duration::from_millis(16));
    run_frames(&mut camp, &mut clock, 1);

    // Inside the default radius but outside the configured one
    assert!(camp.walk(Vec3::new(0.0, 0.0, 6.0)));
    run_frames(&mut camp, &mut clock, 1);
    assert_eq!(camp.scene().position(camp.rig()), Some(RIG_START));
}

// ── Frame loop ─────────────────────────────────────────────────────────

#[test]
fn test_fire_flickers_and_shadows_come_up() {
    let mut camp = seeded(1);
    let mut clock = FrameClock::fixed(Duration::from_millis(16));
    let before = intensities(&camp);

    // Fallback timer alone configures shadows once the lights are loaded
    for light in camp.lights().to_vec() {
        camp.scene_mut().mark_loaded(light);
    }
    run_frames(&mut camp, &mut clock, 10);

    let after = intensities(&camp);
    assert_ne!(before, after);
    for light in camp.lights() {
        assert!(camp.scene().light(*light).unwrap().cast_shadow);
    }
    assert_eq!(camp.runtime().pending_timers(), 0);
}

#[test]
fn test_full_visit() {
    let mut camp = seeded(9);
    let mut clock = FrameClock::fixed(Duration::from_millis(16));
    camp.finish_loading();
    run_frames(&mut camp, &mut clock, 2);

    // Walk up to the first log
    let seat = camp.seats()[0];
    let seat_at = camp.scene().world_position(seat.entity).unwrap();
    while planar_distance(camp.scene().position(camp.rig()).unwrap(), seat_at) > 1.0 {
        let mut step = seat_at - camp.scene().position(camp.rig()).unwrap();
        step.y = 0.0;
        assert!(camp.walk(step.normalize() * 0.1));
        run_frames(&mut camp, &mut clock, 1);
    }
    assert!(camp.scene().is_visible(seat.sit_prompt));

    press(&mut camp, KeyCode::KeyE);
    assert_eq!(camp.seated_at(), Some(0));
    assert!(camp.scene().is_visible(seat.stand_prompt));
    assert!(!camp.scene().is_visible(seat.sit_prompt));
    let seated = camp.scene().position(camp.rig()).unwrap();
    assert!((seated.y - 0.7).abs() < 1e-6);

    // Movement is ignored while seated
    assert!(!camp.walk(Vec3::X));
    run_frames(&mut camp, &mut clock, 30);
    assert_eq!(camp.scene().position(camp.rig()), Some(seated));

    press(&mut camp, KeyCode::KeyE);
    assert_eq!(camp.seated_at(), None);
    assert!(camp.scene().is_visible(seat.sit_prompt));
    assert!(!camp.scene().is_visible(seat.stand_prompt));
    assert_eq!(camp.scene().position(camp.rig()).unwrap().y, RIG_START.y);
    assert_eq!(camp.scene().controls(camp.rig()).unwrap().acceleration, 15.0);

    // Wander off: the prompt goes away, the boundary holds
    for _ in 0..200 {
        camp.walk(Vec3::new(0.0, 0.0, 0.25));
        run_frames(&mut camp, &mut clock, 1);
    }
    assert!(!camp.scene().is_visible(seat.sit_prompt));
    assert!(planar_length(camp.scene().position(camp.rig()).unwrap()) <= 25.0);
    assert!(camp.boundary().unwrap().reverts() > 0);
}

#[test]
fn test_removing_seat_releases_key_listener() {
    let mut camp = seeded(2);
    assert_eq!(camp.runtime().listener_count(), camp.seats().len());
    let behaviors = camp.runtime().behavior_count();

    let seat = camp.seats()[1].entity;
    camp.remove_entity(seat);

    assert!(!camp.scene().contains(seat));
    assert_eq!(camp.seats().len(), 2);
    assert_eq!(camp.runtime().listener_count(), 2);
    // Proximity sensor and seat interaction
    assert_eq!(camp.runtime().behavior_count(), behaviors - 2);

    // The remaining seats keep running; out of range the key does nothing
    let mut clock = FrameClock::fixed(Duration::from_millis(16));
    run_frames(&mut camp, &mut clock, 3);
    press(&mut camp, KeyCode::KeyE);
    assert_eq!(camp.seated_at(), None);
}
