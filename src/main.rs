mod net;
mod state;

use std::sync::Arc;

use log::{LevelFilter, error, info};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use tokio::sync::Mutex;
use tokio::time::{Duration, MissedTickBehavior, interval};

use raycast_vehicle::{
    COUPE, DebugOverlay, PhysicsWorld, RigidBodyEngine, Vehicle, VehicleConfig, VehicleError,
};

use crate::net::start_websocket_server;
use crate::state::{ChassisSnapshot, SharedState, Snapshot};

const DT: f32 = 1.0 / 60.0;

fn log_level() -> LevelFilter {
    match std::env::var("RV_LOG").as_deref() {
        Ok("error") => LevelFilter::Error,
        Ok("warn") => LevelFilter::Warn,
        Ok("debug") => LevelFilter::Debug,
        Ok("trace") => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

fn load_config() -> Result<VehicleConfig, VehicleError> {
    match std::env::args().nth(1) {
        Some(path) => VehicleConfig::from_json_file(path),
        None => {
            info!("no config path given, using the coupe preset");
            Ok(COUPE)
        }
    }
}

#[tokio::main]
async fn main() {
    let _ = TermLogger::init(log_level(), Config::default(), TerminalMode::Mixed, ColorChoice::Auto);

    if let Err(err) = run().await {
        error!("vehicle server stopped: {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), VehicleError> {
    info!("starting vehicle server");

    let config = load_config()?;
    let mut world = PhysicsWorld::new();
    // wheels just touching the ground, springs at rest length
    let spawn_height = config.rest_length + config.tire_radius() - config.mount_height;
    let body = world.spawn_chassis(&config, rapier3d::prelude::vector![0.0, spawn_height, 0.0]);
    world.chassis(body)?;

    let mut vehicle = Vehicle::assemble(body, config)?;
    let ctx = world.context(DT)?;

    let state = Arc::new(Mutex::new(SharedState::new()));
    let server_state = Arc::clone(&state);
    tokio::spawn(async move {
        if let Err(err) = start_websocket_server(server_state).await {
            error!("websocket server failed: {err}");
        }
    });

    // Fixed timestep: ~60 Hz
    let mut ticker = interval(Duration::from_secs_f32(DT));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut overlay = DebugOverlay::default();

    loop {
        ticker.tick().await;
        let mut game = state.lock().await;

        vehicle.tick(&mut world, &ctx, game.input);

        // diagnostics read the forces this tick applied, before they are cleared
        let pose = world.pose(body);
        overlay.rebuild(&vehicle, &pose, world.mass(body));
        let speed = world.linear_speed(body);

        world.step(DT);

        game.tick += 1;
        let pos = world.pose(body).translation.vector;
        let snapshot = Snapshot {
            tick: game.tick,
            chassis: ChassisSnapshot { x: pos.x, y: pos.y, z: pos.z, speed },
            overlay: &overlay,
        };
        game.broadcast_snapshot(&snapshot);
    }
}
