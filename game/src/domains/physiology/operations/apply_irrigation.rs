use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::model::{NutrientBuffer, Zone};
use crate::physiology::Physiology::ZoneIrrigated;
use crate::physiology::{Physiology, PhysiologyError};

/// Fraction of every deposit that leaches straight through the substrate.
pub const LEACHING_FRACTION: f32 = 0.1;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NutrientSolution {
    pub n_mg_per_l: f32,
    pub p_mg_per_l: f32,
    pub k_mg_per_l: f32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IrrigationEvent {
    pub water_l: f32,
    pub concentrations: NutrientSolution,
}

/// Deposits `water_l × concentration` per element into the zone buffer,
/// minus leaching. Negative or non-finite inputs are configuration bugs
/// and raise instead of clamping.
pub fn apply_irrigation(
    zone: &Arc<Zone>,
    event: &IrrigationEvent,
) -> Result<(Arc<Zone>, Physiology), PhysiologyError> {
    let inputs = [
        ("water_l", event.water_l),
        ("n_mg_per_l", event.concentrations.n_mg_per_l),
        ("p_mg_per_l", event.concentrations.p_mg_per_l),
        ("k_mg_per_l", event.concentrations.k_mg_per_l),
    ];
    for (field, value) in inputs {
        if !value.is_finite() || value < 0.0 {
            return Err(PhysiologyError::InvalidIrrigation {
                field: field.to_string(),
                value,
            });
        }
    }
    let net = |concentration: f32| event.water_l * concentration * (1.0 - LEACHING_FRACTION);
    let buffer = NutrientBuffer {
        n_mg: zone.nutrient_buffer.n_mg + net(event.concentrations.n_mg_per_l),
        p_mg: zone.nutrient_buffer.p_mg + net(event.concentrations.p_mg_per_l),
        k_mg: zone.nutrient_buffer.k_mg + net(event.concentrations.k_mg_per_l),
    };
    let event = ZoneIrrigated {
        zone: zone.id,
        n_mg: buffer.n_mg,
        p_mg: buffer.p_mg,
        k_mg: buffer.k_mg,
    };
    let zone = Arc::new(Zone {
        nutrient_buffer: buffer,
        ..(**zone).clone()
    });
    Ok((zone, event))
}
