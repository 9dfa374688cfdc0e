use crate::math::{clamp01, Random};
use crate::model::PlantStage;
use crate::physiology::{Band, StrainKind, TemperatureResponse};

pub const HEALTH_DECAY_RATE_PER_HOUR: f32 = 0.02;
pub const HEALTH_DECAY_JITTER01: f32 = 0.2;
pub const HEALTH_RECOVERY_RATE_PER_HOUR: f32 = 0.01;
pub const RECOVERY_STRESS_CEILING: f32 = 0.25;

pub fn factor_stress01(value: f32, band: &Band, tolerance: f32) -> f32 {
    if value >= band.green_lo && value <= band.green_hi {
        return 0.0;
    }
    let (green_edge, yellow_edge) = if value < band.green_lo {
        (band.green_lo, band.yellow_lo)
    } else {
        (band.green_hi, band.yellow_hi)
    };
    let span = (green_edge - yellow_edge).abs() * tolerance;
    if span <= f32::EPSILON {
        return 1.0;
    }
    ((value - green_edge).abs() / span).min(1.0)
}

/// Dominated by the strongest factor; secondary factors push the result
/// further toward 1. Zero everywhere means zero combined.
pub fn combined_stress01(factors: &[f32]) -> f32 {
    let max = factors.iter().cloned().fold(0.0f32, f32::max);
    let sum: f32 = factors.iter().sum();
    clamp01(max + 0.25 * (sum - max))
}

/// Gaussian around the reference temperature; decays toward zero outside
/// the [min, max] bounds, never negative.
pub fn temperature_response(temperature_c: f32, curve: &TemperatureResponse) -> f32 {
    let sigma = ((curve.max_c - curve.min_c) / 4.0).max(0.1);
    let z = (temperature_c - curve.ref_c) / sigma;
    (-z * z).exp()
}

/// Net dry-biomass gain for one tick, grams. Floored at zero and capped so
/// biomass never exceeds the strain ceiling.
#[allow(clippy::too_many_arguments)]
pub fn biomass_increment_g(
    strain: &StrainKind,
    stage: PlantStage,
    biomass_g: f32,
    light_mol_m2: f32,
    temperature_c: f32,
    stress01: f32,
    tick_hours: f32,
    random: &mut Random,
) -> f32 {
    let gross = strain.light_use_efficiency_g_per_mol
        * light_mol_m2
        * temperature_response(temperature_c, &strain.temperature);
    let respiration = strain.maintenance_respiration_frac_per_hour * biomass_g * tick_hours;
    let fraction = strain.stage_dry_matter.for_stage(stage);
    let mut increment = (gross - respiration) * (1.0 - stress01) * fraction;
    if let Some(noise) = strain.noise01 {
        increment *= 1.0 + random.symmetric(noise);
    }
    let ceiling_g = strain.max_biomass_dry_kg * 1000.0;
    increment.max(0.0).min((ceiling_g - biomass_g).max(0.0))
}

/// Superlinear in stress, linear in tick duration, jittered by the plant
/// stream. Zero stress costs nothing.
pub fn health_decay01(stress01: f32, tick_hours: f32, random: &mut Random) -> f32 {
    if stress01 <= 0.0 {
        return 0.0;
    }
    let jitter = 1.0 + random.symmetric(HEALTH_DECAY_JITTER01);
    stress01 * stress01 * HEALTH_DECAY_RATE_PER_HOUR * tick_hours * jitter
}

/// Recovery only under low stress; badly damaged plants recover faster.
/// Bounded so health never exceeds 1.
pub fn health_recovery01(stress01: f32, health01: f32, tick_hours: f32) -> f32 {
    if stress01 >= RECOVERY_STRESS_CEILING || health01 >= 1.0 {
        return 0.0;
    }
    let rate = HEALTH_RECOVERY_RATE_PER_HOUR * (2.0 - health01);
    (rate * tick_hours).min(1.0 - health01)
}
