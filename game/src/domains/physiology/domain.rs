use serde::{Deserialize, Serialize};

use crate::model::{PlantStage, ZoneId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StrainKey(pub usize);

/// Green span is stress-free; stress rises linearly past its edge and
/// saturates at the yellow edge distance scaled by the strain tolerance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Band {
    pub green_lo: f32,
    pub green_hi: f32,
    pub yellow_lo: f32,
    pub yellow_hi: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentalBands {
    pub temperature: Band,
    pub humidity: Band,
    pub co2: Band,
    pub ppfd: Band,
    pub tolerance: f32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TemperatureResponse {
    pub min_c: f32,
    pub ref_c: f32,
    pub max_c: f32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum DryMatterFraction {
    Flat(f32),
    PerStage {
        seedling: f32,
        vegetative: f32,
        flowering: f32,
    },
}

impl DryMatterFraction {
    pub fn for_stage(&self, stage: PlantStage) -> f32 {
        match *self {
            DryMatterFraction::Flat(fraction) => fraction,
            DryMatterFraction::PerStage {
                seedling,
                vegetative,
                flowering,
            } => match stage {
                PlantStage::Seedling => seedling,
                PlantStage::Vegetative => vegetative,
                PlantStage::Flowering | PlantStage::HarvestReady => flowering,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PhaseDurations {
    pub seedling_days: f32,
    pub vegetative_days: f32,
    pub flowering_days: f32,
}

impl PhaseDurations {
    pub fn seedling_hours(&self) -> f32 {
        self.seedling_days * 24.0
    }

    pub fn total_hours(&self) -> f32 {
        (self.seedling_days + self.vegetative_days + self.flowering_days) * 24.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrainKind {
    pub id: StrainKey,
    pub name: String,
    pub light_use_efficiency_g_per_mol: f32,
    pub max_biomass_dry_kg: f32,
    pub temperature: TemperatureResponse,
    pub bands: EnvironmentalBands,
    pub stage_dry_matter: DryMatterFraction,
    pub phases: PhaseDurations,
    /// Accumulated light hours required to leave the seedling stage.
    pub vegetative_light_hours: f32,
    /// Stage transitions stall while combined stress exceeds this bound.
    pub transition_stress_max01: f32,
    pub maintenance_respiration_frac_per_hour: f32,
    /// Bounded symmetric growth noise, opt-in per strain.
    pub noise01: Option<f32>,
}

#[derive(Debug, bincode::Encode, bincode::Decode)]
pub enum Physiology {
    ZoneIrrigated {
        zone: ZoneId,
        n_mg: f32,
        p_mg: f32,
        k_mg: f32,
    },
}

#[derive(Debug, bincode::Encode, bincode::Decode)]
pub enum PhysiologyError {
    InvalidIrrigation { field: String, value: f32 },
}
