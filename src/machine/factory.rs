//! Builds independent state-machine instances, one per worker.
//!
//! Each instance compiles its own copy of the circuit, so workers never
//! share mutable state. Construction is read-only over the input circuit
//! and runs on the rayon pool when enabled.

use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info};

use super::propnet::PropNetStateMachine;
use crate::circuit::Circuit;
use crate::core::{BuildError, MachineConfig};

/// Factory for `PropNetStateMachine` instances.
#[derive(Clone, Debug, Default)]
pub struct InstanceFactory {
    config: MachineConfig,
}

impl InstanceFactory {
    pub fn new(config: MachineConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// Build `config.instance_count` instances of `circuit`.
    ///
    /// Any failing instance aborts the whole build.
    pub fn build(&self, circuit: &Circuit) -> Result<Vec<PropNetStateMachine>, BuildError> {
        let count = self.config.instance_count;
        if count == 0 {
            return Err(BuildError::NoInstances);
        }

        let start = Instant::now();
        let build_one = |index: usize| {
            debug!(instance = index, "building instance");
            PropNetStateMachine::new(circuit.clone())
        };

        let instances = if self.config.parallel_build {
            (0..count)
                .into_par_iter()
                .map(build_one)
                .collect::<Result<Vec<_>, _>>()?
        } else {
            (0..count).map(build_one).collect::<Result<Vec<_>, _>>()?
        };

        info!(
            instances = instances.len(),
            parallel = self.config.parallel_build,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "instances built"
        );
        Ok(instances)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::CircuitBuilder;
    use crate::core::Term;
    use crate::machine::StateMachine;

    fn tiny() -> Circuit {
        let mut b = CircuitBuilder::new();
        let me = b.role("me");
        let init = b.init();
        let lit = b.base(Term::atom("lit"));
        b.next(lit, init);
        let t = b.constant(true);
        b.legal(me, Term::atom("wait"), t);
        b.input(me, Term::atom("wait"));
        b.goal(me, 50, t);
        b.terminal(lit);
        b.build().unwrap()
    }

    #[test]
    fn test_zero_instances() {
        let factory = InstanceFactory::new(MachineConfig::default().with_instances(0));
        assert!(matches!(factory.build(&tiny()), Err(BuildError::NoInstances)));
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let circuit = tiny();
        let parallel = InstanceFactory::new(MachineConfig::default().with_instances(3))
            .build(&circuit)
            .unwrap();
        let sequential =
            InstanceFactory::new(MachineConfig::default().with_instances(2).with_parallel_build(false))
                .build(&circuit)
                .unwrap();

        assert_eq!(parallel.len(), 3);
        assert_eq!(sequential.len(), 2);
        for machine in parallel.iter().chain(&sequential) {
            assert_eq!(machine.initial_state(), sequential[0].initial_state());
            assert!(machine.initial_state().contains(&Term::atom("lit")));
        }
    }

    #[test]
    fn test_instances_do_not_share_nets() {
        let instances = InstanceFactory::new(MachineConfig::default().with_instances(2))
            .build(&tiny())
            .unwrap();
        assert!(!std::sync::Arc::ptr_eq(instances[0].net(), instances[1].net()));
    }
}
