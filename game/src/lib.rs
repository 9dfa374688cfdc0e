pub use domains::*;

use std::sync::Arc;

use crate::api::TickInputs;
use crate::context::EngineRunContext;
use crate::model::{Knowledge, World};

pub mod api;
pub mod collections;
pub mod context;
pub mod math;
pub mod model;

mod domains;
mod update;

pub type StageFn = fn(&Knowledge, &Arc<World>, &mut EngineRunContext, TickInputs) -> Arc<World>;

/// One step of the tick pipeline. A stage receives the previous stage's
/// snapshot and returns a new one (or the same reference when nothing
/// changed); emissions go through the run context only.
pub struct Stage {
    pub name: &'static str,
    pub run: StageFn,
}

pub struct Simulation {
    pub known: Knowledge,
    stages: Vec<Stage>,
}

impl Simulation {
    pub fn new(known: Knowledge) -> Self {
        Self {
            known,
            stages: vec![
                Stage {
                    name: "devices",
                    run: devices::update_devices,
                },
                Stage {
                    name: "physiology",
                    run: physiology::update_physiology,
                },
                Stage {
                    name: "harvest",
                    run: inventory::update_harvest,
                },
            ],
        }
    }

    /// Collaborator stages (workforce, economy) run after the core stages,
    /// in registration order.
    pub fn push_stage(&mut self, stage: Stage) {
        self.stages.push(stage);
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name).collect()
    }
}
