use serde::{Deserialize, Serialize};

use crate::devices::EffectError::OutOfRange;
use crate::math::{clamp01, Random};

/// Closed capability set; a device carries any subset of these.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceEffects {
    pub lighting: Option<LightingEffect>,
    pub thermal: Option<ThermalEffect>,
    pub humidity: Option<HumidityEffect>,
    pub co2: Option<Co2Effect>,
    pub sensor: Option<SensorEffect>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LightingEffect {
    pub ppfd_at_canopy_umol_m2s: f32,
    pub coverage_m2: f32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ThermalEffect {
    pub heat_output_w: f32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HumidityEffect {
    pub capacity_l_per_h: f32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Co2Effect {
    pub injection_ppm_per_h: f32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SensorEffect {
    pub noise01: f32,
}

#[derive(Debug, bincode::Encode, bincode::Decode)]
pub enum EffectError {
    OutOfRange {
        effect: String,
        field: String,
        value: f32,
    },
}

/// Negative or non-finite physical inputs are configuration bugs; clamping
/// here would mask them.
fn physical(effect: &str, field: &str, value: f32) -> Result<f32, EffectError> {
    if !value.is_finite() || value < 0.0 {
        return Err(OutOfRange {
            effect: effect.to_string(),
            field: field.to_string(),
            value,
        });
    }
    Ok(value)
}

/// Photon flux a fixture actually delivers over the zone canopy. Worn
/// fixtures dim rather than fail outright.
pub fn lighting_delivery_umol_m2s(
    effect: &LightingEffect,
    condition01: f32,
    area_m2: f32,
) -> Result<f32, EffectError> {
    let ppfd = physical("lighting", "ppfd_at_canopy_umol_m2s", effect.ppfd_at_canopy_umol_m2s)?;
    let coverage = physical("lighting", "coverage_m2", effect.coverage_m2)?;
    let area = physical("lighting", "area_m2", area_m2)?;
    let footprint = if area > 0.0 {
        (coverage / area).min(1.0)
    } else {
        1.0
    };
    Ok(ppfd * footprint * (0.5 + 0.5 * clamp01(condition01)))
}

pub fn thermal_output_w(effect: &ThermalEffect, duty01: f32) -> Result<f32, EffectError> {
    let heat = physical("thermal", "heat_output_w", effect.heat_output_w)?;
    let duty = physical("thermal", "duty01", duty01)?;
    if duty > 1.0 {
        return Err(OutOfRange {
            effect: "thermal".to_string(),
            field: "duty01".to_string(),
            value: duty,
        });
    }
    Ok(heat * duty)
}

pub fn humidity_exchange_l(effect: &HumidityEffect, tick_hours: f32) -> Result<f32, EffectError> {
    let capacity = physical("humidity", "capacity_l_per_h", effect.capacity_l_per_h)?;
    let hours = physical("humidity", "tick_hours", tick_hours)?;
    Ok(capacity * hours)
}

pub fn co2_injection_ppm(effect: &Co2Effect, tick_hours: f32) -> Result<f32, EffectError> {
    let rate = physical("co2", "injection_ppm_per_h", effect.injection_ppm_per_h)?;
    let hours = physical("co2", "tick_hours", tick_hours)?;
    Ok(rate * hours)
}

pub fn sensor_reading(
    effect: &SensorEffect,
    true_value: f32,
    random: &mut Random,
) -> Result<f32, EffectError> {
    if !true_value.is_finite() {
        return Err(OutOfRange {
            effect: "sensor".to_string(),
            field: "true_value".to_string(),
            value: true_value,
        });
    }
    let noise = physical("sensor", "noise01", effect.noise01)?;
    Ok(true_value * (1.0 + random.symmetric(noise)))
}
