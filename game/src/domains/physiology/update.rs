use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use log::warn;
use serde_json::json;

use crate::api::{codes, Diagnostic, DiagnosticScope, TickInputs};
use crate::collections::Shared;
use crate::context::EngineRunContext;
use crate::math::{clamp01, derive_stream};
use crate::model::{map_zones, Knowledge, Plant, PlantStage, PlantStatus, World, Zone};
use crate::physiology::{
    advance_stage, biomass_increment_g, combined_stress01, factor_stress01, health_decay01,
    health_recovery01, StageObservation, StrainKind,
};

/// Plants below this delta on every tracked value keep their identity, so
/// structural sharing propagates up the tree.
pub const CHANGE_EPSILON: f32 = 1e-6;

pub fn update_physiology(
    known: &Knowledge,
    world: &Arc<World>,
    context: &mut EngineRunContext,
    inputs: TickInputs,
) -> Arc<World> {
    // per-tick strain cache: one dictionary lookup and at most one missing
    // diagnostic per (zone, strain)
    let mut cache: HashMap<String, Option<Shared<StrainKind>>> = HashMap::new();
    let mut reported: HashSet<(usize, String)> = HashSet::new();
    map_zones(world, |_structure, _room, zone| {
        update_zone(known, world, zone, context, inputs, &mut cache, &mut reported)
    })
}

#[allow(clippy::too_many_arguments)]
fn update_zone(
    known: &Knowledge,
    world: &World,
    zone: &Arc<Zone>,
    context: &mut EngineRunContext,
    inputs: TickInputs,
    cache: &mut HashMap<String, Option<Shared<StrainKind>>>,
    reported: &mut HashSet<(usize, String)>,
) -> Arc<Zone> {
    let light_on = zone.lighting.is_on(world.sim_time_hours);

    // daily light integral, reset on day rollover
    let previous_hours = world.sim_time_hours - inputs.tick_hours;
    let day_rolled = (previous_hours / 24.0).floor() != (world.sim_time_hours / 24.0).floor();
    let dli_increment = if light_on {
        zone.ppfd_umol_m2s * 3600.0 * inputs.tick_hours / 1_000_000.0
    } else {
        0.0
    };
    let dli = if day_rolled {
        dli_increment
    } else {
        zone.dli_mol_m2d_inc + dli_increment
    };

    let mut plants = Vec::with_capacity(zone.plants.len());
    let mut plants_changed = false;
    for plant in &zone.plants {
        let updated = if plant.status == PlantStatus::Harvested {
            plant.clone()
        } else {
            let strain = resolve_strain(known, zone, plant, context, cache, reported);
            update_plant(world, zone, plant, strain, light_on, inputs)
        };
        if !Arc::ptr_eq(&updated, plant) {
            plants_changed = true;
        }
        plants.push(updated);
    }

    if !plants_changed && (dli - zone.dli_mol_m2d_inc).abs() <= CHANGE_EPSILON {
        return zone.clone();
    }
    Arc::new(Zone {
        dli_mol_m2d_inc: dli,
        plants,
        ..(**zone).clone()
    })
}

fn resolve_strain(
    known: &Knowledge,
    zone: &Zone,
    plant: &Plant,
    context: &mut EngineRunContext,
    cache: &mut HashMap<String, Option<Shared<StrainKind>>>,
    reported: &mut HashSet<(usize, String)>,
) -> Option<Shared<StrainKind>> {
    let strain = cache
        .entry(plant.strain.clone())
        .or_insert_with(|| known.strains.find(&plant.strain).ok())
        .clone();
    if strain.is_none() && reported.insert((zone.id.0, plant.strain.clone())) {
        warn!(
            "strain {} unknown, plants in zone {} age without growth",
            plant.strain, zone.id.0
        );
        context.emit_diagnostic(Diagnostic {
            scope: DiagnosticScope::Zone,
            code: codes::PLANT_STRAIN_MISSING.to_string(),
            zone: Some(zone.id),
            message: format!("strain blueprint '{}' not found", plant.strain),
            metadata: json!({ "strain": plant.strain }),
        });
    }
    strain
}

fn update_plant(
    world: &World,
    zone: &Zone,
    plant: &Arc<Plant>,
    strain: Option<Shared<StrainKind>>,
    light_on: bool,
    inputs: TickInputs,
) -> Arc<Plant> {
    let age_hours = plant.age_hours + inputs.tick_hours;
    let strain = match strain {
        Some(strain) => strain,
        // degraded path: the plant keeps aging, everything else is skipped
        None => {
            return Arc::new(Plant {
                age_hours,
                ..(**plant).clone()
            })
        }
    };

    let mut random = derive_stream(
        &world.seed,
        &format!("plant:{}/tick:{}", plant.id.0, inputs.tick),
    );
    let bands = &strain.bands;
    let environment = &zone.environment;
    let mut factors = vec![
        factor_stress01(environment.temperature_c, &bands.temperature, bands.tolerance),
        factor_stress01(environment.humidity_pct, &bands.humidity, bands.tolerance),
        factor_stress01(environment.co2_ppm, &bands.co2, bands.tolerance),
    ];
    if light_on {
        // darkness is a scheduled state, not a light deficit
        factors.push(factor_stress01(zone.ppfd_umol_m2s, &bands.ppfd, bands.tolerance));
    }
    let stress01 = combined_stress01(&factors);

    let light_hours = if light_on {
        plant.light_hours + inputs.tick_hours
    } else {
        plant.light_hours
    };
    let light_mol_m2 = if light_on {
        zone.ppfd_umol_m2s * 3600.0 * inputs.tick_hours / 1_000_000.0
    } else {
        0.0
    };
    let increment = biomass_increment_g(
        &strain,
        plant.stage,
        plant.biomass_g,
        light_mol_m2,
        environment.temperature_c,
        stress01,
        inputs.tick_hours,
        &mut random,
    );
    let biomass_g = plant.biomass_g + increment;

    let mut health01 = clamp01(plant.health01 - health_decay01(stress01, inputs.tick_hours, &mut random));
    health01 = clamp01(health01 + health_recovery01(stress01, health01, inputs.tick_hours));

    let observation = StageObservation {
        photoperiod: zone.photoperiod,
        light_hours,
        age_hours,
        stress01,
    };
    let stage = advance_stage(plant.stage, &strain, &observation);
    let ready_for_harvest = plant.ready_for_harvest || stage == PlantStage::HarvestReady;

    let changed = (age_hours - plant.age_hours).abs() > CHANGE_EPSILON
        || (biomass_g - plant.biomass_g).abs() > CHANGE_EPSILON
        || (health01 - plant.health01).abs() > CHANGE_EPSILON
        || (light_hours - plant.light_hours).abs() > CHANGE_EPSILON
        || stage != plant.stage
        || ready_for_harvest != plant.ready_for_harvest;
    if !changed {
        return plant.clone();
    }
    Arc::new(Plant {
        age_hours,
        biomass_g,
        health01,
        light_hours,
        stage,
        ready_for_harvest,
        ..(**plant).clone()
    })
}
