use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceKey(pub usize);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceKind {
    pub id: DeviceKey,
    pub name: String,
    pub wear_per_hour01: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskKey(pub usize);

/// Maintenance task definition consumed by the workforce collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskKind {
    pub id: TaskKey,
    pub name: String,
    pub duration_hours: f32,
}

/// Name of the task definition the device stage schedules service under.
pub const SERVICE_TASK: &str = "device-service";

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MaintenancePolicy {
    pub lifetime_hours: f32,
    pub service_interval_hours: f32,
    pub service_duration_hours: f32,
    pub base_cost_per_hour_cc: f32,
    pub cost_increase_per_1000h_cc: f32,
    pub restore_amount01: f32,
    pub replacement_cost_cc: f32,
}

/// Per-device accrual ledger, persisted in the world tree across ticks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceMaintenance {
    pub runtime_hours: f32,
    pub hours_since_service: f32,
    pub total_maintenance_cost_cc: f32,
    pub completed_service_count: u32,
    pub recommended_replacement: bool,
    pub policy: MaintenancePolicy,
}

/// Nominal interval divided by the quality maintenance demand; better built
/// devices go longer between services.
pub fn effective_service_interval_hours(policy: &MaintenancePolicy, quality01: f32) -> f32 {
    let demand = 1.5 - 0.75 * quality01.clamp(0.0, 1.0);
    policy.service_interval_hours / demand
}
