//! Immutable per-instance compilation result.
//!
//! Bundles the circuit with its evaluation order, dependency map and the
//! decoded role, move and goal tables the state machine reads through.

use std::time::Instant;

use rustc_hash::FxHashMap;
use tracing::info;

use super::dependency::DependencyMap;
use super::ordering::EvaluationOrder;
use crate::circuit::{Circuit, CompId};
use crate::core::{BuildError, Move, Role, RoleIndex, RoleMap, Term};

/// A legal proposition and the move it reports.
#[derive(Clone, Debug)]
pub struct LegalEntry {
    pub prop: CompId,
    pub mv: Move,
}

/// A goal proposition and its value.
#[derive(Clone, Copy, Debug)]
pub struct GoalEntry {
    pub prop: CompId,
    pub value: u32,
}

/// Circuit plus everything derived from it once.
#[derive(Clone, Debug)]
pub struct CompiledNet {
    circuit: Circuit,
    order: EvaluationOrder,
    dependencies: DependencyMap,
    role_lookup: FxHashMap<Role, RoleIndex>,
    legals: RoleMap<Vec<LegalEntry>>,
    goals: RoleMap<Vec<GoalEntry>>,
    inputs: RoleMap<FxHashMap<Move, CompId>>,
    base_facts: Vec<(CompId, Term)>,
    base_lookup: FxHashMap<Term, CompId>,
}

impl CompiledNet {
    /// Validate the circuit, order it and build the dependency map.
    pub fn compile(circuit: Circuit) -> Result<Self, BuildError> {
        let start = Instant::now();
        circuit.validate()?;

        let order = EvaluationOrder::build(&circuit)?;
        let dependencies = DependencyMap::build(&circuit, &order);

        let roles = circuit.roles();
        let role_lookup: FxHashMap<Role, RoleIndex> =
            roles.iter().map(|(index, role)| (role.clone(), index)).collect();

        let mut legals = RoleMap::new(roles.role_count(), |_| Vec::new());
        let mut goals = RoleMap::new(roles.role_count(), |_| Vec::new());
        for role in roles.role_indices() {
            for &prop in circuit.legal_propositions(role) {
                legals[role].push(LegalEntry {
                    prop,
                    mv: decode_move(&circuit, prop)?,
                });
            }
            for &prop in circuit.goal_propositions(role) {
                goals[role].push(GoalEntry {
                    prop,
                    value: decode_goal(&circuit, prop)?,
                });
            }
        }

        let mut inputs = RoleMap::new(roles.role_count(), |_| FxHashMap::default());
        for &prop in circuit.input_propositions() {
            let name = circuit.name_of(prop);
            let role = name
                .arg(0)
                .and_then(|term| role_lookup.get(&Role(term.clone())))
                .copied()
                .ok_or_else(|| BuildError::InvalidMoveTerm { term: name.clone() })?;
            inputs[role].insert(decode_move(&circuit, prop)?, prop);
        }

        let base_facts: Vec<(CompId, Term)> = circuit
            .base_propositions()
            .iter()
            .map(|&prop| (prop, circuit.name_of(prop)))
            .collect();
        let base_lookup = base_facts
            .iter()
            .map(|(prop, fact)| (fact.clone(), *prop))
            .collect();

        info!(
            components = circuit.len(),
            ordered = order.len(),
            base = circuit.base_propositions().len(),
            inputs = circuit.input_propositions().len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "propnet compiled"
        );

        Ok(Self {
            circuit,
            order,
            dependencies,
            role_lookup,
            legals,
            goals,
            inputs,
            base_facts,
            base_lookup,
        })
    }

    #[must_use]
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    #[must_use]
    pub fn order(&self) -> &EvaluationOrder {
        &self.order
    }

    #[must_use]
    pub fn dependencies(&self) -> &DependencyMap {
        &self.dependencies
    }

    /// Roles in circuit order.
    #[must_use]
    pub fn roles(&self) -> &RoleMap<Role> {
        self.circuit.roles()
    }

    /// Index of a role, if the circuit declares it.
    #[must_use]
    pub fn role_index(&self, role: &Role) -> Option<RoleIndex> {
        self.role_lookup.get(role).copied()
    }

    /// Legal propositions of a role with their decoded moves.
    #[must_use]
    pub fn legals(&self, role: RoleIndex) -> &[LegalEntry] {
        &self.legals[role]
    }

    /// Goal propositions of a role with their decoded values.
    #[must_use]
    pub fn goals(&self, role: RoleIndex) -> &[GoalEntry] {
        &self.goals[role]
    }

    /// Action proposition for a role's move.
    #[must_use]
    pub fn input_for(&self, role: RoleIndex, mv: &Move) -> Option<CompId> {
        self.inputs[role].get(mv).copied()
    }

    /// Base propositions with the facts they stand for, in circuit order.
    #[must_use]
    pub fn base_facts(&self) -> &[(CompId, Term)] {
        &self.base_facts
    }

    /// Base proposition named by a state fact.
    #[must_use]
    pub fn base_for(&self, fact: &Term) -> Option<CompId> {
        self.base_lookup.get(fact).copied()
    }
}

/// The move of a `(legal r m)` or `(does r m)` proposition.
fn decode_move(circuit: &Circuit, prop: CompId) -> Result<Move, BuildError> {
    let name = circuit.name_of(prop);
    let mv = name.arg(1).filter(|_| name.arity() == 2).cloned();
    mv.map(Move).ok_or(BuildError::InvalidMoveTerm { term: name })
}

/// The value of a `(goal r N)` proposition.
fn decode_goal(circuit: &Circuit, prop: CompId) -> Result<u32, BuildError> {
    let name = circuit.name_of(prop);
    let value = name.arg(1).and_then(Term::as_int);
    value.ok_or(BuildError::InvalidGoalValue { term: name })
}
