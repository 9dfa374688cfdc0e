#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use serde_json::Value;

use game::api::{Diagnostic, DiagnosticsEmitter, TelemetryEmitter};
use game::context::EngineRunContext;
use game::devices::{
    DeviceEffects, DeviceKey, DeviceKind, DeviceMaintenance, LightingEffect, MaintenancePolicy,
    TaskKey, TaskKind, SERVICE_TASK,
};
use game::model::{
    Company, DeviceId, DeviceInstance, Environment, Inventory, Knowledge, LightSchedule,
    PhotoperiodPhase, Plant, PlantId, PlantStage, PlantStatus, Room, RoomId, RoomPurpose,
    Structure, StructureId, World, Zone, ZoneId,
};
use game::physiology::{
    Band, DryMatterFraction, EnvironmentalBands, PhaseDurations, StrainKey, StrainKind,
    TemperatureResponse,
};

#[derive(Clone, Default)]
pub struct TelemetryRecorder {
    pub events: Rc<RefCell<Vec<(String, Value)>>>,
}

impl TelemetryEmitter for TelemetryRecorder {
    fn emit(&mut self, topic: &str, payload: Value) {
        self.events.borrow_mut().push((topic.to_string(), payload));
    }
}

impl TelemetryRecorder {
    pub fn topics(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .map(|(topic, _)| topic.clone())
            .collect()
    }
}

#[derive(Clone, Default)]
pub struct DiagnosticsRecorder {
    pub records: Rc<RefCell<Vec<Diagnostic>>>,
}

impl DiagnosticsEmitter for DiagnosticsRecorder {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.records.borrow_mut().push(diagnostic);
    }
}

pub fn recording_context() -> (EngineRunContext, TelemetryRecorder, DiagnosticsRecorder) {
    let telemetry = TelemetryRecorder::default();
    let diagnostics = DiagnosticsRecorder::default();
    let context = EngineRunContext {
        telemetry: Some(Box::new(telemetry.clone())),
        diagnostics: Some(Box::new(diagnostics.clone())),
        ..Default::default()
    };
    (context, telemetry, diagnostics)
}

pub fn band(green_lo: f32, green_hi: f32, yellow_lo: f32, yellow_hi: f32) -> Band {
    Band {
        green_lo,
        green_hi,
        yellow_lo,
        yellow_hi,
    }
}

pub fn strain(name: &str) -> StrainKind {
    StrainKind {
        id: StrainKey(1),
        name: name.to_string(),
        light_use_efficiency_g_per_mol: 0.9,
        max_biomass_dry_kg: 0.2,
        temperature: TemperatureResponse {
            min_c: 10.0,
            ref_c: 25.0,
            max_c: 40.0,
        },
        bands: EnvironmentalBands {
            temperature: band(20.0, 28.0, 10.0, 38.0),
            humidity: band(40.0, 70.0, 20.0, 90.0),
            co2: band(350.0, 1200.0, 150.0, 2000.0),
            ppfd: band(200.0, 900.0, 50.0, 1500.0),
            tolerance: 1.0,
        },
        stage_dry_matter: DryMatterFraction::Flat(0.25),
        phases: PhaseDurations {
            seedling_days: 1.0,
            vegetative_days: 2.0,
            flowering_days: 3.0,
        },
        vegetative_light_hours: 30.0,
        transition_stress_max01: 0.4,
        maintenance_respiration_frac_per_hour: 0.001,
        noise01: None,
    }
}

pub fn knowledge() -> Knowledge {
    let mut known = Knowledge::default();
    known.strains.insert(StrainKey(1), "sunberry", strain("sunberry"));
    known.devices.insert(
        DeviceKey(1),
        "led-panel",
        DeviceKind {
            id: DeviceKey(1),
            name: "led-panel".to_string(),
            wear_per_hour01: 0.001,
        },
    );
    known.tasks.insert(
        TaskKey(1),
        SERVICE_TASK,
        TaskKind {
            id: TaskKey(1),
            name: SERVICE_TASK.to_string(),
            duration_hours: 2.0,
        },
    );
    known
}

pub fn plant(id: usize) -> Arc<Plant> {
    Arc::new(Plant {
        id: PlantId(id),
        strain: "sunberry".to_string(),
        age_hours: 0.0,
        biomass_g: 0.0,
        health01: 1.0,
        light_hours: 0.0,
        stage: PlantStage::Seedling,
        ready_for_harvest: false,
        status: PlantStatus::Active,
        moisture01: None,
        quality01: None,
        harvested_at_tick: None,
    })
}

pub fn policy() -> MaintenancePolicy {
    MaintenancePolicy {
        lifetime_hours: 10000.0,
        service_interval_hours: 100.0,
        service_duration_hours: 2.0,
        base_cost_per_hour_cc: 0.5,
        cost_increase_per_1000h_cc: 1.0,
        restore_amount01: 0.3,
        replacement_cost_cc: 1000.0,
    }
}

pub fn maintenance() -> DeviceMaintenance {
    DeviceMaintenance {
        runtime_hours: 0.0,
        hours_since_service: 0.0,
        total_maintenance_cost_cc: 0.0,
        completed_service_count: 0,
        recommended_replacement: false,
        policy: policy(),
    }
}

pub fn device(id: usize) -> Arc<DeviceInstance> {
    Arc::new(DeviceInstance {
        id: DeviceId(id),
        kind: "led-panel".to_string(),
        condition01: 1.0,
        quality01: 1.0,
        effects: DeviceEffects {
            lighting: Some(LightingEffect {
                ppfd_at_canopy_umol_m2s: 800.0,
                coverage_m2: 12.0,
            }),
            ..Default::default()
        },
        maintenance: Some(maintenance()),
    })
}

pub fn zone(id: usize, plants: Vec<Arc<Plant>>, devices: Vec<Arc<DeviceInstance>>) -> Arc<Zone> {
    Arc::new(Zone {
        id: ZoneId(id),
        name: format!("zone-{}", id),
        area_m2: 10.0,
        environment: Environment {
            temperature_c: 25.0,
            humidity_pct: 55.0,
            co2_ppm: 800.0,
        },
        lighting: LightSchedule {
            start_hour: 0.0,
            on_hours: 18.0,
        },
        photoperiod: PhotoperiodPhase::Vegetative,
        ppfd_umol_m2s: 600.0,
        dli_mol_m2d_inc: 0.0,
        nutrient_buffer: Default::default(),
        plants,
        devices,
    })
}

pub fn growroom(id: usize, zones: Vec<Arc<Zone>>) -> Arc<Room> {
    Arc::new(Room {
        id: RoomId(id),
        name: format!("grow-{}", id),
        purpose: RoomPurpose::Growroom,
        zones,
        inventory: Inventory::default(),
    })
}

pub fn room(id: usize, purpose: RoomPurpose) -> Arc<Room> {
    Arc::new(Room {
        id: RoomId(id),
        name: format!("room-{}", id),
        purpose,
        zones: vec![],
        inventory: Inventory::default(),
    })
}

pub fn structure(id: usize, rooms: Vec<Arc<Room>>) -> Arc<Structure> {
    Arc::new(Structure {
        id: StructureId(id),
        name: format!("site-{}", id),
        rooms,
    })
}

pub fn world(structures: Vec<Arc<Structure>>) -> Arc<World> {
    Arc::new(World {
        seed: "test-seed".to_string(),
        sim_time_hours: 0.0,
        company: Arc::new(Company { structures }),
    })
}
