use std::sync::Arc;

use log::debug;

use crate::api::{TickInputs, TickOptions, TickResult, TickTrace};
use crate::context::EngineRunContext;
use crate::model::World;
use crate::Simulation;

impl Simulation {
    /// Advances the world by one tick: bumps simulation time, then threads
    /// the snapshot through every stage in fixed order. The input world is
    /// never mutated; unchanged subtrees keep their identity in the output.
    pub fn run_tick(
        &self,
        world: Arc<World>,
        context: &mut EngineRunContext,
        options: TickOptions,
    ) -> TickResult {
        let tick_hours = context.tick_hours();
        let mut current = Arc::new(World {
            seed: world.seed.clone(),
            sim_time_hours: world.sim_time_hours + tick_hours,
            company: world.company.clone(),
        });
        let inputs = TickInputs {
            tick_hours,
            tick: current.tick_index(tick_hours),
        };
        let mut trace = options.trace.then(|| TickTrace {
            stages: vec!["advance-time"],
        });
        for stage in &self.stages {
            current = (stage.run)(&self.known, &current, context, inputs);
            debug!("stage {} complete", stage.name);
            if let Some(trace) = trace.as_mut() {
                trace.stages.push(stage.name);
            }
        }
        TickResult {
            world: current,
            trace,
        }
    }
}
