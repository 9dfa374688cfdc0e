use crate::model::{PhotoperiodPhase, PlantStage};
use crate::physiology::StrainKind;

/// What a plant observes about itself and its zone when stage transitions
/// are evaluated. Age and light hours are the values already advanced for
/// the current tick.
#[derive(Debug, Clone, Copy)]
pub struct StageObservation {
    pub photoperiod: PhotoperiodPhase,
    pub light_hours: f32,
    pub age_hours: f32,
    pub stress01: f32,
}

/// Forward-only transition chain. Every predicate is evaluated once, in
/// order, guarded by the predecessor state; a plant may clear several
/// thresholds and advance multiple stages within a single tick.
pub fn advance_stage(
    stage: PlantStage,
    strain: &StrainKind,
    observation: &StageObservation,
) -> PlantStage {
    let mut stage = stage;
    if stage == PlantStage::Seedling
        && observation.light_hours > strain.vegetative_light_hours
        && observation.stress01 <= strain.transition_stress_max01
    {
        stage = PlantStage::Vegetative;
    }
    if stage == PlantStage::Vegetative
        && observation.photoperiod == PhotoperiodPhase::Flowering
        && observation.age_hours >= strain.phases.seedling_hours()
        && observation.stress01 <= strain.transition_stress_max01
    {
        stage = PlantStage::Flowering;
    }
    if stage == PlantStage::Flowering && observation.age_hours >= strain.phases.total_hours() {
        stage = PlantStage::HarvestReady;
    }
    stage
}
