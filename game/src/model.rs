use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::collections::Dictionary;
use crate::devices::{DeviceEffects, DeviceKey, DeviceKind, DeviceMaintenance, TaskKey, TaskKind};
use crate::inventory::HarvestLot;
use crate::physiology::{StrainKey, StrainKind};

/// Immutable reference catalogs consumed by the simulation. Populated by the
/// embedding application from its blueprint source; the core only looks up.
#[derive(Default)]
pub struct Knowledge {
    pub strains: Dictionary<StrainKey, StrainKind>,
    pub devices: Dictionary<DeviceKey, DeviceKind>,
    pub tasks: Dictionary<TaskKey, TaskKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub struct StructureId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub struct RoomId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub struct ZoneId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub struct PlantId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub struct DeviceId(pub usize);

/// Root snapshot of one simulated moment. Never mutated in place: a tick
/// produces a new `World` whose unchanged subtrees are the same `Arc` nodes
/// as the input (structural sharing, observable via `Arc::ptr_eq`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub seed: String,
    pub sim_time_hours: f32,
    pub company: Arc<Company>,
}

impl World {
    pub fn tick_index(&self, tick_hours: f32) -> u64 {
        (self.sim_time_hours / tick_hours).round() as u64
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub structures: Vec<Arc<Structure>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Structure {
    pub id: StructureId,
    pub name: String,
    pub rooms: Vec<Arc<Room>>,
}

impl Structure {
    pub fn rooms_with_purpose(&self, purpose: RoomPurpose) -> impl Iterator<Item = &Arc<Room>> {
        self.rooms.iter().filter(move |room| room.purpose == purpose)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub enum RoomPurpose {
    Growroom,
    Storage,
    Workshop,
    Breakroom,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub purpose: RoomPurpose,
    // only Growroom rooms host non-empty zones, validated at construction
    pub zones: Vec<Arc<Zone>>,
    pub inventory: Inventory,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    pub lots: Vec<Arc<HarvestLot>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zone {
    pub id: ZoneId,
    pub name: String,
    pub area_m2: f32,
    pub environment: Environment,
    pub lighting: LightSchedule,
    pub photoperiod: PhotoperiodPhase,
    /// Realized photon flux at canopy level, written by the device stage
    /// when the zone has lighting devices.
    pub ppfd_umol_m2s: f32,
    /// Light integral accumulated over the current day, mol/m².
    pub dli_mol_m2d_inc: f32,
    pub nutrient_buffer: NutrientBuffer,
    pub plants: Vec<Arc<Plant>>,
    pub devices: Vec<Arc<DeviceInstance>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Environment {
    pub temperature_c: f32,
    pub humidity_pct: f32,
    pub co2_ppm: f32,
}

/// Daily on/off light window; the window may straddle midnight.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LightSchedule {
    pub start_hour: f32,
    pub on_hours: f32,
}

impl LightSchedule {
    pub fn is_on(&self, sim_time_hours: f32) -> bool {
        if self.on_hours <= 0.0 {
            return false;
        }
        if self.on_hours >= 24.0 {
            return true;
        }
        let hour = sim_time_hours.rem_euclid(24.0);
        let start = self.start_hour.rem_euclid(24.0);
        let end = (start + self.on_hours).rem_euclid(24.0);
        if start < end {
            hour >= start && hour < end
        } else {
            hour >= start || hour < end
        }
    }
}

/// Grower-controlled zone phase; plants observe it for flowering induction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub enum PhotoperiodPhase {
    Vegetative,
    Flowering,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutrientBuffer {
    pub n_mg: f32,
    pub p_mg: f32,
    pub k_mg: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub enum PlantStage {
    Seedling,
    Vegetative,
    Flowering,
    HarvestReady,
}

impl PlantStage {
    pub fn ordinal(&self) -> u8 {
        match self {
            PlantStage::Seedling => 0,
            PlantStage::Vegetative => 1,
            PlantStage::Flowering => 2,
            PlantStage::HarvestReady => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub enum PlantStatus {
    Active,
    Harvested,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plant {
    pub id: PlantId,
    pub strain: String,
    pub age_hours: f32,
    pub biomass_g: f32,
    pub health01: f32,
    /// Light hours accumulated under the zone schedule since sowing.
    pub light_hours: f32,
    pub stage: PlantStage,
    pub ready_for_harvest: bool,
    pub status: PlantStatus,
    pub moisture01: Option<f32>,
    pub quality01: Option<f32>,
    pub harvested_at_tick: Option<u64>,
}

/// Rebuilds the world tree through a per-zone transform, re-allocating only
/// the paths whose zones actually changed. A transform that returns the
/// same `Arc` leaves the zone, its room, its structure and the company
/// reference-equal to the input.
pub fn map_zones<F>(world: &Arc<World>, mut transform: F) -> Arc<World>
where
    F: FnMut(&Structure, &Room, &Arc<Zone>) -> Arc<Zone>,
{
    let mut structures = Vec::with_capacity(world.company.structures.len());
    let mut company_changed = false;
    for structure in &world.company.structures {
        let mut rooms = Vec::with_capacity(structure.rooms.len());
        let mut structure_changed = false;
        for room in &structure.rooms {
            let mut zones = Vec::with_capacity(room.zones.len());
            let mut room_changed = false;
            for zone in &room.zones {
                let updated = transform(structure, room, zone);
                if !Arc::ptr_eq(&updated, zone) {
                    room_changed = true;
                }
                zones.push(updated);
            }
            if room_changed {
                structure_changed = true;
                rooms.push(Arc::new(Room {
                    zones,
                    ..(**room).clone()
                }));
            } else {
                rooms.push(room.clone());
            }
        }
        if structure_changed {
            company_changed = true;
            structures.push(Arc::new(Structure {
                rooms,
                ..(**structure).clone()
            }));
        } else {
            structures.push(structure.clone());
        }
    }
    if company_changed {
        Arc::new(World {
            seed: world.seed.clone(),
            sim_time_hours: world.sim_time_hours,
            company: Arc::new(Company { structures }),
        })
    } else {
        world.clone()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceInstance {
    pub id: DeviceId,
    pub kind: String,
    pub condition01: f32,
    pub quality01: f32,
    pub effects: DeviceEffects,
    pub maintenance: Option<DeviceMaintenance>,
}
