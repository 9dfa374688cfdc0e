use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::{Diagnostic, DiagnosticsEmitter, TelemetryEmitter};
use crate::model::{DeviceId, RoomId, StructureId, ZoneId};

pub const DEFAULT_TICK_HOURS: f32 = 1.0;

/// Maintenance work deposited for the workforce collaborator to pick up in
/// its own, later pipeline stage. The core never calls workforce back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceTask {
    pub device: DeviceId,
    pub zone: ZoneId,
    pub structure: StructureId,
    pub workshop: RoomId,
    pub task: String,
    pub duration_hours: f32,
    pub scheduled_at_hours: f32,
}

/// Service the workforce collaborator finished since the previous tick.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CompletedService {
    pub device: DeviceId,
}

/// Tick-scoped mutable side channel. Not part of the world snapshot; world
/// output never depends on its contents beyond the tick-duration override.
#[derive(Default)]
pub struct EngineRunContext {
    pub telemetry: Option<Box<dyn TelemetryEmitter>>,
    pub diagnostics: Option<Box<dyn DiagnosticsEmitter>>,
    pub tick_hours: Option<f32>,
    pub maintenance_tasks: Vec<MaintenanceTask>,
    pub completed_services: Vec<CompletedService>,
    /// One-shot edge signals, pushed the single tick a device's accrued
    /// maintenance cost crosses its replacement cost.
    pub replacements_recommended: Vec<DeviceId>,
}

impl EngineRunContext {
    pub fn tick_hours(&self) -> f32 {
        self.tick_hours.unwrap_or(DEFAULT_TICK_HOURS)
    }

    pub fn emit_telemetry(&mut self, topic: &str, payload: Value) {
        if let Some(telemetry) = self.telemetry.as_mut() {
            telemetry.emit(topic, payload);
        }
    }

    pub fn emit_diagnostic(&mut self, diagnostic: Diagnostic) {
        if let Some(diagnostics) = self.diagnostics.as_mut() {
            diagnostics.emit(diagnostic);
        }
    }
}
