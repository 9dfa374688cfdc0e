use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{World, ZoneId};

pub mod topics {
    pub const STORAGE_MISSING_OR_AMBIGUOUS: &str = "telemetry.storage.missing_or_ambiguous";
    pub const HARVEST_LOT_CREATED: &str = "telemetry.harvest.lot_created";
    pub const DEVICE_REPLACEMENT_RECOMMENDED: &str = "telemetry.device.replacement_recommended";
}

pub mod codes {
    pub const PLANT_STRAIN_MISSING: &str = "plant.strain.missing";
    pub const HARVEST_STORAGE_UNRESOLVED: &str = "harvest.storage.unresolved";
}

/// Best-effort event sink. Never required for correctness: the world a tick
/// produces is identical with or without an emitter attached.
pub trait TelemetryEmitter {
    fn emit(&mut self, topic: &str, payload: Value);
}

pub trait DiagnosticsEmitter {
    fn emit(&mut self, diagnostic: Diagnostic);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticScope {
    Zone,
    Structure,
    Plant,
    Device,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub scope: DiagnosticScope,
    pub code: String,
    pub zone: Option<ZoneId>,
    pub message: String,
    pub metadata: Value,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TickOptions {
    pub trace: bool,
}

/// Tick-wide constants handed to every stage.
#[derive(Debug, Clone, Copy)]
pub struct TickInputs {
    pub tick_hours: f32,
    pub tick: u64,
}

#[derive(Debug, Clone, Default)]
pub struct TickTrace {
    pub stages: Vec<&'static str>,
}

pub struct TickResult {
    pub world: Arc<World>,
    pub trace: Option<TickTrace>,
}
