use std::collections::HashMap;

use log::warn;
use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

use raycast_vehicle::{ControlInput, DebugOverlay};

#[derive(Serialize)]
pub struct ChassisSnapshot {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub speed: f32, // m/s
}

#[derive(Serialize)]
pub struct Snapshot<'a> {
    pub tick: u64,
    pub chassis: ChassisSnapshot,
    pub overlay: &'a DebugOverlay,
}

/// State shared between the tick loop and the websocket tasks.
/// The only thing clients can change is `input`.
pub struct SharedState {
    pub tick: u64,
    pub clients: HashMap<Uuid, UnboundedSender<String>>,
    pub input: ControlInput,
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedState {
    pub fn new() -> Self {
        Self {
            tick: 0,
            clients: HashMap::new(),
            input: ControlInput::default(),
        }
    }

    pub fn register_client(&mut self, tx: UnboundedSender<String>) -> Uuid {
        let id = Uuid::new_v4();
        self.clients.insert(id, tx);
        id
    }

    pub fn remove_client(&mut self, id: &Uuid) {
        self.clients.remove(id);
        // nobody left driving: release the controls
        if self.clients.is_empty() {
            self.input = ControlInput::default();
        }
    }

    pub fn update_input(&mut self, input: ControlInput) {
        self.input = input.clamped();
    }

    /// Serialize once, send to every client; drop the ones whose channel closed.
    pub fn broadcast_snapshot(&mut self, snapshot: &Snapshot<'_>) {
        let json = match serde_json::to_string(snapshot) {
            Ok(json) => json,
            Err(err) => {
                warn!("snapshot serialization failed: {err}");
                return;
            }
        };

        self.clients.retain(|_, tx| tx.send(json.clone()).is_ok());
    }
}
