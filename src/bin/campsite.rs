//! Headless campsite run
//!
//! Builds the campsite and plays a short scripted visit: walk to the first
//! log, sit down, stand up again and wander off towards the mountains until
//! the boundary holds the rig back.
//!
//! Usage:
//!     campsite [OPTIONS]
//!
//! Options:
//!     -n, --frames <N>        Frames to simulate (default: 900)
//!     --seed <SEED>           Seed for trees and mountains (default: from config, else random)
//!     -c, --config <PATH>     JSON scene configuration
//!     -v, --verbose           Debug logging (RUST_LOG still wins)
//!     -h, --help              Show this help message

use std::env;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use campsite::core::input::InputState;
use campsite::core::logging;
use campsite::core::time::FrameClock;
use campsite::math::planar_distance;
use campsite::scene::{CampScene, SceneConfig};
use glam::Vec3;
use winit::keyboard::KeyCode;

/// Walking speed of the scripted visitor, units per second.
const WALK_SPEED: f32 = 2.0;
/// Frames spent seated before standing up.
const SEATED_FRAMES: u64 = 180;

fn print_help() {
    eprintln!("campsite - Headless campsite run");
    eprintln!();
    eprintln!("Usage: campsite [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("    -n, --frames <N>        Frames to simulate (default: 900)");
    eprintln!("    --seed <SEED>           Seed for trees and mountains");
    eprintln!("    -c, --config <PATH>     JSON scene configuration");
    eprintln!("    -v, --verbose           Debug logging (RUST_LOG still wins)");
    eprintln!("    -h, --help              Show this help message");
    eprintln!();
    eprintln!("Example:");
    eprintln!("    campsite --seed 42 -n 1200");
    eprintln!("    campsite -v -c camp.json");
}

#[derive(Debug)]
struct Args {
    frames: u64,
    seed: Option<u64>,
    config: Option<PathBuf>,
    verbose: bool,
}

fn parse_args() -> Result<Args, String> {
    let args: Vec<String> = env::args().skip(1).collect();

    let mut frames: u64 = 900;
    let mut seed: Option<u64> = None;
    let mut config: Option<PathBuf> = None;
    let mut verbose = false;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-n" | "--frames" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --frames".to_string());
                }
                frames = args[i].parse().map_err(|_| format!("Invalid frame count: {}", args[i]))?;
            }
            "--seed" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --seed".to_string());
                }
                seed = Some(args[i].parse().map_err(|_| format!("Invalid seed: {}", args[i]))?);
            }
            "-c" | "--config" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --config".to_string());
                }
                config = Some(PathBuf::from(&args[i]));
            }
            "-v" | "--verbose" => verbose = true,
            other => return Err(format!("Unknown option: {}", other)),
        }
        i += 1;
    }

    Ok(Args { frames, seed, config, verbose })
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Visit {
    Approach,
    Seated { since: u64 },
    Wander,
}

fn main() {
    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            print_help();
            std::process::exit(1);
        }
    };

    if args.verbose {
        logging::init_with_filter("debug");
    } else {
        logging::init();
    }

    let mut config = match &args.config {
        Some(path) => match SceneConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: failed to load {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => SceneConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let start = Instant::now();
    let mut camp = CampScene::new(config);
    log::info!("Scene built in {:.1}ms", start.elapsed().as_secs_f64() * 1000.0);

    let mut clock = FrameClock::fixed(Duration::from_secs_f32(1.0 / 60.0));
    let mut visit = Visit::Approach;
    let seat = camp.seats()[0];

    for frame in 0..args.frames {
        let dt = clock.tick();
        let mut input = InputState::new();

        if frame == 1 {
            camp.finish_loading();
        }

        let rig_position = camp.scene().position(camp.rig()).unwrap_or(Vec3::ZERO);
        let seat_position = camp.scene().world_position(seat.entity).unwrap_or(Vec3::ZERO);

        match visit {
            Visit::Approach => {
                if planar_distance(rig_position, seat_position) > 1.5 {
                    let mut heading = seat_position - rig_position;
                    heading.y = 0.0;
                    camp.walk(heading.normalize_or_zero() * WALK_SPEED * dt);
                } else {
                    input.press(KeyCode::KeyE);
                    visit = Visit::Seated { since: frame };
                }
            }
            Visit::Seated { since } if frame - since >= SEATED_FRAMES => {
                input.press(KeyCode::KeyE);
                visit = Visit::Wander;
            }
            Visit::Seated { .. } => {}
            Visit::Wander => {
                camp.walk(Vec3::NEG_X * WALK_SPEED * 3.0 * dt);
            }
        }

        camp.tick(&input, dt);

        if frame % 120 == 0 {
            let p = camp.scene().position(camp.rig()).unwrap_or(Vec3::ZERO);
            log::debug!("frame {}: rig at ({:.2}, {:.2}, {:.2}), {:?}", frame, p.x, p.y, p.z, visit);
        }
    }

    println!("Campsite run");
    println!("============");
    println!("Frames: {} ({:.1}s simulated)", clock.frame_count(), clock.elapsed().as_secs_f32());
    if let Some(forest) = camp.tree_scatterer() {
        println!("Trees: {}", forest.trees().len());
        for report in forest.reports() {
            println!(
                "  {:<12} {:>3}/{:<3} placed in {} attempts",
                report.name, report.placed, report.target, report.attempts
            );
        }
    }
    if let Some(mountains) = camp.mountain_boundary() {
        println!(
            "Mountains: {} ring walls, {} outer slabs",
            mountains.ring_walls().len(),
            mountains.band_walls().len()
        );
    }
    for light in camp.lights() {
        if let (Some(tag), Some(params)) = (camp.scene().tag(*light), camp.scene().light(*light)) {
            println!(
                "Light {:<17} intensity {:.3}, shadows {}",
                tag,
                params.intensity,
                if params.cast_shadow { "on" } else { "off" }
            );
        }
    }
    if let Some(boundary) = camp.boundary() {
        println!("Boundary reverts: {}", boundary.reverts());
    }
    let p = camp.scene().position(camp.rig()).unwrap_or(Vec3::ZERO);
    println!("Rig final position: ({:.2}, {:.2}, {:.2}), state {:?}", p.x, p.y, p.z, visit);
}
