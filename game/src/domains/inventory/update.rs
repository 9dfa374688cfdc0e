use std::sync::Arc;

use log::{info, warn};
use serde_json::json;

use crate::api::{codes, topics, Diagnostic, DiagnosticScope, TickInputs};
use crate::context::EngineRunContext;
use crate::inventory::{derive_lot_id, resolve_storage, HarvestLot, StorageResolution, DEFAULT_MOISTURE01};
use crate::math::clamp01;
use crate::model::{
    Company, Knowledge, Plant, PlantStatus, Room, RoomId, Structure, World, Zone,
};

pub fn update_harvest(
    _known: &Knowledge,
    world: &Arc<World>,
    context: &mut EngineRunContext,
    inputs: TickInputs,
) -> Arc<World> {
    let mut structures = Vec::with_capacity(world.company.structures.len());
    let mut company_changed = false;
    for structure in &world.company.structures {
        let updated = update_structure(world, structure, context, inputs);
        if !Arc::ptr_eq(&updated, structure) {
            company_changed = true;
        }
        structures.push(updated);
    }
    if !company_changed {
        return world.clone();
    }
    Arc::new(World {
        seed: world.seed.clone(),
        sim_time_hours: world.sim_time_hours,
        company: Arc::new(Company { structures }),
    })
}

fn harvestable(plant: &Plant) -> bool {
    plant.ready_for_harvest && plant.status != PlantStatus::Harvested
}

fn update_structure(
    world: &World,
    structure: &Arc<Structure>,
    context: &mut EngineRunContext,
    inputs: TickInputs,
) -> Arc<Structure> {
    let any_ready = structure
        .rooms
        .iter()
        .flat_map(|room| room.zones.iter())
        .flat_map(|zone| zone.plants.iter())
        .any(|plant| harvestable(plant));
    if !any_ready {
        return structure.clone();
    }
    match resolve_storage(structure) {
        StorageResolution::NotFound => {
            report_unresolved(structure, "not_found", vec![], context);
            structure.clone()
        }
        StorageResolution::Ambiguous { candidates } => {
            report_unresolved(structure, "ambiguous", candidates, context);
            structure.clone()
        }
        StorageResolution::Resolved { room } => {
            harvest_structure(world, structure, room.id, context, inputs)
        }
    }
}

/// One telemetry event per structure per tick; one diagnostic per affected
/// plant. Candidate plants stay untouched, so re-running under the same
/// failed resolution is a no-op.
fn report_unresolved(
    structure: &Structure,
    reason: &str,
    candidates: Vec<RoomId>,
    context: &mut EngineRunContext,
) {
    warn!(
        "structure {} storage resolution failed ({}), harvest skipped",
        structure.id.0, reason
    );
    context.emit_telemetry(
        topics::STORAGE_MISSING_OR_AMBIGUOUS,
        json!({
            "structure": structure.id.0,
            "reason": reason,
            "candidates": candidates.iter().map(|room| room.0).collect::<Vec<_>>(),
        }),
    );
    for room in &structure.rooms {
        for zone in &room.zones {
            for plant in &zone.plants {
                if harvestable(plant) {
                    context.emit_diagnostic(Diagnostic {
                        scope: DiagnosticScope::Plant,
                        code: codes::HARVEST_STORAGE_UNRESOLVED.to_string(),
                        zone: Some(zone.id),
                        message: format!(
                            "plant {} is harvest-ready, storage {}",
                            plant.id.0, reason
                        ),
                        metadata: json!({ "plant": plant.id.0, "reason": reason }),
                    });
                }
            }
        }
    }
}

fn harvest_structure(
    world: &World,
    structure: &Arc<Structure>,
    storage: RoomId,
    context: &mut EngineRunContext,
    inputs: TickInputs,
) -> Arc<Structure> {
    let mut lots: Vec<Arc<HarvestLot>> = vec![];
    let mut lot_index: u32 = 0;
    let mut rooms = Vec::with_capacity(structure.rooms.len());
    for room in &structure.rooms {
        let mut zones = Vec::with_capacity(room.zones.len());
        let mut room_changed = false;
        for zone in &room.zones {
            let mut plants = Vec::with_capacity(zone.plants.len());
            let mut zone_changed = false;
            for plant in &zone.plants {
                if !harvestable(plant) {
                    plants.push(plant.clone());
                    continue;
                }
                let lot = HarvestLot {
                    id: derive_lot_id(
                        &world.seed,
                        structure.id,
                        storage,
                        plant.id,
                        inputs.tick,
                        lot_index,
                    ),
                    plant: plant.id,
                    structure: structure.id,
                    room: storage,
                    strain: plant.strain.clone(),
                    fresh_weight_kg: plant.biomass_g / 1000.0,
                    moisture01: clamp01(plant.moisture01.unwrap_or(DEFAULT_MOISTURE01)),
                    quality01: clamp01(plant.quality01.unwrap_or(plant.health01)),
                    created_at_tick: inputs.tick,
                };
                lot_index += 1;
                context.emit_telemetry(
                    topics::HARVEST_LOT_CREATED,
                    json!({
                        "lot": lot.id,
                        "structure": structure.id.0,
                        "room": storage.0,
                        "plant": plant.id.0,
                        "fresh_weight_kg": lot.fresh_weight_kg,
                    }),
                );
                info!("plant {} harvested into lot {}", plant.id.0, lot.id);
                lots.push(Arc::new(lot));
                plants.push(Arc::new(Plant {
                    ready_for_harvest: false,
                    status: PlantStatus::Harvested,
                    harvested_at_tick: Some(inputs.tick),
                    ..(**plant).clone()
                }));
                zone_changed = true;
            }
            if zone_changed {
                room_changed = true;
                zones.push(Arc::new(Zone {
                    plants,
                    ..(**zone).clone()
                }));
            } else {
                zones.push(zone.clone());
            }
        }
        if room_changed {
            rooms.push(Arc::new(Room {
                zones,
                ..(**room).clone()
            }));
        } else {
            rooms.push(room.clone());
        }
    }
    if lots.is_empty() {
        return structure.clone();
    }
    let rooms = rooms
        .into_iter()
        .map(|room| {
            if room.id != storage {
                return room;
            }
            let mut inventory = room.inventory.clone();
            inventory.lots.extend(lots.iter().cloned());
            Arc::new(Room {
                inventory,
                ..(*room).clone()
            })
        })
        .collect();
    Arc::new(Structure {
        rooms,
        ..(**structure).clone()
    })
}
