//! Headless ballpit session
//!
//! Loads `ballpit.toml` (or the path given on the command line), mounts the
//! level and drives the simulation with a scripted player: walk forward,
//! jump, look around and throw balls. A summary is logged at the end.
//!
//! ```text
//! ballpit [CONFIG] [--frames N] [--dt SECONDS]
//! ```

use std::path::PathBuf;

use ballpit_engine::foundation::logging;
use ballpit_engine::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

const DEFAULT_CONFIG: &str = "ballpit.toml";

#[derive(Error, Debug)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Simulation(#[from] SimulationError),

    #[error("invalid argument: {0}")]
    Argument(String),
}

/// Command line options
#[derive(Debug)]
struct Options {
    config_path: Option<PathBuf>,
    frames: u32,
    frame_delta: f32,
}

impl Options {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, AppError> {
        let mut options = Self {
            config_path: None,
            frames: 600,
            frame_delta: 1.0 / 60.0,
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--frames" => {
                    let value = args.next().ok_or_else(|| AppError::Argument("--frames needs a value".into()))?;
                    options.frames = value
                        .parse()
                        .map_err(|_| AppError::Argument(format!("bad frame count '{value}'")))?;
                }
                "--dt" => {
                    let value = args.next().ok_or_else(|| AppError::Argument("--dt needs a value".into()))?;
                    options.frame_delta = value
                        .parse()
                        .map_err(|_| AppError::Argument(format!("bad frame delta '{value}'")))?;
                }
                flag if flag.starts_with("--") => return Err(AppError::Argument(format!("unknown flag {flag}"))),
                path => options.config_path = Some(PathBuf::from(path)),
            }
        }
        Ok(options)
    }
}

fn load_config(options: &Options) -> Result<ApplicationConfig, AppError> {
    let path = match options.config_path {
        Some(ref path) => path.clone(),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG);
            if !default.exists() {
                return Ok(ApplicationConfig::default());
            }
            default
        }
    };
    let config = ApplicationConfig::load_from_file(&path)?;
    config.validate()?;
    Ok(config)
}

/// Scripted player input for one frame
fn script_frame(frame: u32, input: &mut InputState, camera: &mut CameraPose, rng: &mut StdRng) {
    input.set_key("KeyW", frame < 90);
    input.set_key("KeyD", (150..240).contains(&frame));
    input.set_key("Space", (60..63).contains(&frame) || (200..203).contains(&frame));

    if frame >= 30 && frame % 15 == 0 {
        let yaw = rng.gen_range(-std::f32::consts::PI..std::f32::consts::PI);
        let pitch = rng.gen_range(-0.3..0.4);
        camera.set_yaw_pitch(yaw, pitch);
        input.press_pointer();
    }
}

fn log_summary(simulation: &Simulation, camera: &CameraPose) {
    let stats = simulation.statics().stats();
    log::info!(
        "Level: {} triangles in {} nodes ({} leaves, depth {})",
        stats.triangle_count,
        stats.node_count,
        stats.leaf_count,
        stats.depth
    );

    let clock = simulation.clock();
    let player = simulation.player();
    log::info!(
        "Simulated {} frames ({:.2}s), {} balls thrown",
        clock.frame_count(),
        clock.simulated_time(),
        player.throw_count()
    );
    log::info!(
        "Player eye at ({:.2}, {:.2}, {:.2}), on floor: {}",
        camera.position.x,
        camera.position.y,
        camera.position.z,
        player.on_floor()
    );

    let balls: Vec<_> = simulation
        .registry()
        .iter()
        .filter_map(|(_, body)| match body {
            DynamicBody::Sphere(sphere) => Some(sphere),
            DynamicBody::Capsule(_) => None,
        })
        .collect();
    let resting = balls.iter().filter(|ball| ball.velocity.magnitude() < 0.5).count();
    let lowest = balls.iter().map(|ball| ball.center.y).fold(f32::INFINITY, f32::min);
    log::info!("{} of {} balls at rest, lowest at y = {:.2}", resting, balls.len(), lowest);
}

fn run() -> Result<(), AppError> {
    let options = Options::parse(std::env::args().skip(1))?;
    let config = load_config(&options)?;
    logging::init_from_config(&config.engine);

    if options.frame_delta.is_nan() || options.frame_delta < 0.0 {
        return Err(AppError::Argument(format!("frame delta must not be negative, got {}", options.frame_delta)));
    }
    match options.config_path {
        Some(ref path) => log::info!("Using configuration {}", path.display()),
        None => log::info!("Using default configuration"),
    }

    let mut simulation = Simulation::from_config(&config)?;
    let mut camera = CameraPose::default();
    let mut input = InputState::new();
    let mut rng = match config.engine.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
        None => StdRng::from_entropy(),
    };

    for frame in 0..options.frames {
        script_frame(frame, &mut input, &mut camera, &mut rng);
        simulation.tick(options.frame_delta, &input, &mut camera);

        if frame % 120 == 0 {
            log::debug!(
                "Frame {}: eye ({:.2}, {:.2}, {:.2}), {} instance bytes",
                frame,
                camera.position.x,
                camera.position.y,
                camera.position.z,
                simulation.as_bytes().len()
            );
        }
    }

    log_summary(&simulation, &camera);
    Ok(())
}

fn main() {
    if let Err(error) = run() {
        log::error!("{error}");
        eprintln!("ballpit: {error}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn test_parse_options() {
        let options = Options::parse(args(&["level.toml", "--frames", "30", "--dt", "0.02"])).unwrap();
        assert_eq!(options.config_path, Some(PathBuf::from("level.toml")));
        assert_eq!(options.frames, 30);
        assert_eq!(options.frame_delta, 0.02);

        assert!(Options::parse(args(&["--frames"])).is_err());
        assert!(Options::parse(args(&["--speed", "2"])).is_err());
    }

    #[test]
    fn test_script_throws_on_schedule() {
        let mut input = InputState::new();
        let mut camera = CameraPose::default();
        let mut rng = StdRng::seed_from_u64(0);
        for frame in 0..60 {
            script_frame(frame, &mut input, &mut camera, &mut rng);
        }
        // Frames 30 and 45
        assert_eq!(input.throw_requests(), 2);
        assert!(input.is_held(MovementKeys::FORWARD));
    }
}
