//! State machine backed by an incrementally propagated circuit.
//!
//! Every query reloads its state explicitly (diff-based, so an unchanged
//! state costs nothing), drains the pass it needs, and reads back results.
//! The `current_*` and `advance` methods skip the reload for rollouts that
//! walk forward from whatever state is loaded.

use std::sync::Arc;

use smallvec::SmallVec;
use tracing::trace;

use super::traits::StateMachine;
use crate::circuit::{Circuit, CompId};
use crate::core::{
    BuildError, JointMove, MachineResult, MachineState, Move, PropagationError, Role, RoleIndex,
    RoleMap, StateMachineError,
};
use crate::engine::{CompiledNet, PropagationStats, Propagator};

/// One circuit instance. Not shareable across threads while querying;
/// build one per worker or `fork` it.
#[derive(Clone, Debug)]
pub struct PropNetStateMachine {
    net: Arc<CompiledNet>,
    propagator: Propagator,
    initial: MachineState,
}

impl PropNetStateMachine {
    /// Compile a circuit and compute its initial state.
    pub fn new(circuit: Circuit) -> Result<Self, BuildError> {
        let net = CompiledNet::compile(circuit)?;
        Self::from_net(Arc::new(net))
    }

    /// Create an instance over an already compiled net.
    pub fn from_net(net: Arc<CompiledNet>) -> Result<Self, BuildError> {
        let propagator = Propagator::new(&net);
        let mut machine = Self {
            net,
            propagator,
            initial: MachineState::new(),
        };
        machine.initial = machine.run_init().map_err(BuildError::InitialState)?;
        Ok(machine)
    }

    /// Assert init, step once, de-assert init, settle.
    fn run_init(&mut self) -> Result<MachineState, PropagationError> {
        let init = self.net.circuit().init_proposition();
        self.propagator.set(&self.net, init, true);
        self.propagator.propagate_value(&self.net);
        self.propagator.transition(&self.net)?;
        self.propagator.set(&self.net, init, false);
        self.propagator.propagate_value(&self.net);
        Ok(self.current_state())
    }

    /// A new instance sharing the compiled net, with its own mutable state.
    #[must_use]
    pub fn fork(&self) -> Self {
        self.clone()
    }

    /// The shared compiled net.
    #[must_use]
    pub fn net(&self) -> &Arc<CompiledNet> {
        &self.net
    }

    /// Number of circuit components.
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.net.circuit().len()
    }

    #[must_use]
    pub fn stats(&self) -> &PropagationStats {
        self.propagator.stats()
    }

    pub fn reset_stats(&mut self) {
        self.propagator.reset_stats();
    }

    /// Index of a role in this game.
    #[must_use]
    pub fn role_index(&self, role: &Role) -> Option<RoleIndex> {
        self.net.role_index(role)
    }

    /// Load `state` onto the base propositions, flipping only differences.
    ///
    /// Facts that name no base proposition are ignored.
    pub fn load_state(&mut self, state: &MachineState) {
        let mut matched = 0;
        for (prop, fact) in self.net.base_facts() {
            let value = state.contains(fact);
            matched += usize::from(value);
            self.propagator.set(&self.net, *prop, value);
        }
        if matched < state.len() {
            trace!(ignored = state.len() - matched, "state facts without base propositions");
        }
    }

    /// Snapshot of the loaded base propositions.
    #[must_use]
    pub fn current_state(&self) -> MachineState {
        self.net
            .base_facts()
            .iter()
            .filter(|(prop, _)| self.propagator.source_value(*prop))
            .map(|(_, fact)| fact.clone())
            .collect()
    }

    /// Legal moves of a role in the loaded state.
    pub fn current_legal_moves(&mut self, role: RoleIndex) -> MachineResult<Vec<Move>> {
        self.propagator.propagate_legal(&self.net);

        let mut moves = Vec::new();
        for entry in self.net.legals(role) {
            let legal = self
                .propagator
                .legal(&self.net, entry.prop)
                .map_err(|e| StateMachineError::move_propagation(&self.net.roles()[role], e))?;
            if legal {
                moves.push(entry.mv.clone());
            }
        }
        Ok(moves)
    }

    /// Check if the loaded state is terminal.
    pub fn current_is_terminal(&mut self) -> MachineResult<bool> {
        self.propagator.propagate_value(&self.net);
        let terminal = self.net.circuit().terminal_proposition();
        self.propagator
            .value(&self.net, terminal)
            .map_err(StateMachineError::transition_propagation)
    }

    /// Goal value of a role in the loaded state.
    ///
    /// Exactly one goal proposition must be true.
    pub fn current_goal(&mut self, role: RoleIndex) -> MachineResult<u32> {
        self.propagator.propagate_value(&self.net);
        let role_term = &self.net.roles()[role];

        let mut found: SmallVec<[u32; 2]> = SmallVec::new();
        for entry in self.net.goals(role) {
            let value = self
                .propagator
                .value(&self.net, entry.prop)
                .map_err(|e| StateMachineError::goal_propagation(role_term, e))?;
            if value {
                found.push(entry.value);
            }
        }

        match found.as_slice() {
            [value] => Ok(*value),
            values => Err(StateMachineError::goal_definition(
                role_term,
                format!("{} goal propositions true", values.len()),
            )),
        }
    }

    /// Goal values of every role in the loaded state.
    pub fn current_goals(&mut self) -> MachineResult<RoleMap<u32>> {
        let roles = self.net.roles().role_count();
        let mut values = Vec::with_capacity(roles);
        for role in RoleIndex::all(roles) {
            values.push(self.current_goal(role)?);
        }
        RoleMap::from_vec(values).ok_or_else(|| StateMachineError::transition("no roles"))
    }

    /// Apply a joint move to the loaded state.
    pub fn advance(&mut self, joint: &JointMove) -> MachineResult<()> {
        let roles = self.net.roles();
        if joint.len() != roles.role_count() {
            return Err(StateMachineError::transition(format!(
                "joint move {joint} has {} moves for {} roles",
                joint.len(),
                roles.role_count()
            )));
        }

        let mut chosen: SmallVec<[CompId; 4]> = SmallVec::new();
        for (role, mv) in joint.iter() {
            let input = self.net.input_for(role, mv).ok_or_else(|| {
                StateMachineError::transition(format!(
                    "no action proposition for {mv} by {}",
                    roles[role]
                ))
            })?;
            chosen.push(input);
        }

        for &input in &chosen {
            self.propagator.set(&self.net, input, true);
        }
        self.propagator.propagate_value(&self.net);
        let stepped = self.propagator.transition(&self.net);

        // actions hold for one step only
        for &input in &chosen {
            self.propagator.set(&self.net, input, false);
        }
        stepped.map_err(StateMachineError::transition_propagation)?;
        trace!(pending = self.propagator.pending_value(), "advanced one step");
        Ok(())
    }
}

impl StateMachine for PropNetStateMachine {
    fn roles(&self) -> &RoleMap<Role> {
        self.net.roles()
    }

    fn initial_state(&self) -> MachineState {
        self.initial.clone()
    }

    fn legal_moves(&mut self, state: &MachineState, role: &Role) -> MachineResult<Vec<Move>> {
        let index = self
            .role_index(role)
            .ok_or_else(|| StateMachineError::move_definition(role, "role not in game"))?;
        self.load_state(state);
        self.current_legal_moves(index)
    }

    fn next_state(
        &mut self,
        state: &MachineState,
        joint: &JointMove,
    ) -> MachineResult<MachineState> {
        self.load_state(state);
        self.advance(joint)?;
        Ok(self.current_state())
    }

    fn is_terminal(&mut self, state: &MachineState) -> MachineResult<bool> {
        self.load_state(state);
        self.current_is_terminal()
    }

    fn goal(&mut self, state: &MachineState, role: &Role) -> MachineResult<u32> {
        let index = self
            .role_index(role)
            .ok_or_else(|| StateMachineError::goal_definition(role, "role not in game"))?;
        self.load_state(state);
        self.current_goal(index)
    }
}
