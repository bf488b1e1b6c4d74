//! Random acyclic circuits for property tests.
//!
//! Derived propositions are created in a shuffled arena order and wired
//! afterwards, so arena order says nothing about dependency order.

#![allow(dead_code)]

use proptest::prelude::*;

use propnet_ggp::circuit::{Circuit, CircuitBuilder, CompId};
use propnet_ggp::core::Term;

/// Shape of a random circuit.
#[derive(Clone, Debug)]
pub struct CircuitShape {
    pub bases: usize,
    pub inputs: usize,
    /// Per derived proposition (in dependency order): AND if true, else OR,
    /// with (source pick, negate) inputs.
    pub gates: Vec<(bool, Vec<(u16, bool)>)>,
    /// Arena creation order of the derived propositions.
    pub arena_order: Vec<usize>,
    /// Per base: pick of the proposition feeding its transition.
    pub nexts: Vec<u16>,
}

/// A built random circuit with its interesting components.
pub struct RandomCircuit {
    pub circuit: Circuit,
    pub bases: Vec<CompId>,
    pub inputs: Vec<CompId>,
    pub derived: Vec<CompId>,
}

pub fn circuit_shape() -> impl Strategy<Value = CircuitShape> {
    (1usize..4, 1usize..4, 1usize..16)
        .prop_flat_map(|(bases, inputs, derived)| {
            let gates = prop::collection::vec(
                (any::<bool>(), prop::collection::vec((any::<u16>(), any::<bool>()), 1..4)),
                derived,
            );
            let arena_order = Just((0..derived).collect::<Vec<_>>()).prop_shuffle();
            let nexts = prop::collection::vec(any::<u16>(), bases);
            (Just(bases), Just(inputs), gates, arena_order, nexts)
        })
        .prop_map(|(bases, inputs, gates, arena_order, nexts)| CircuitShape {
            bases,
            inputs,
            gates,
            arena_order,
            nexts,
        })
}

pub fn build(shape: &CircuitShape) -> RandomCircuit {
    let mut b = CircuitBuilder::new();
    let me = b.role("me");
    let init = b.init();

    let bases: Vec<CompId> = (0..shape.bases)
        .map(|i| b.base(Term::compound("b", [Term::int(i as u32)])))
        .collect();
    let inputs: Vec<CompId> = (0..shape.inputs)
        .map(|i| b.input(me, Term::compound("m", [Term::int(i as u32)])))
        .collect();

    // create derived propositions out of order, each over an empty gate
    let count = shape.gates.len();
    let mut gate_ids = vec![CompId::NONE; count];
    let mut derived = vec![CompId::NONE; count];
    for &k in &shape.arena_order {
        let none = Vec::<CompId>::new();
        let gate = if shape.gates[k].0 { b.and(none) } else { b.or(none) };
        gate_ids[k] = gate;
        derived[k] = b.derived(Term::compound("d", [Term::int(k as u32)]), gate);
    }

    let mut sources: Vec<CompId> = bases.iter().chain(&inputs).copied().collect();
    sources.push(init);
    for (k, (_, picks)) in shape.gates.iter().enumerate() {
        let available: Vec<CompId> = sources.iter().chain(&derived[..k]).copied().collect();
        for &(pick, negate) in picks {
            let src = available[pick as usize % available.len()];
            let wire = if negate { b.not(src) } else { src };
            b.connect(wire, gate_ids[k]);
        }
    }

    let feeds: Vec<CompId> = bases.iter().chain(&inputs).chain(&derived).copied().collect();
    for (&base, &pick) in bases.iter().zip(&shape.nexts) {
        b.next(base, feeds[pick as usize % feeds.len()]);
    }

    let always = b.constant(true);
    b.legal(me, Term::atom("go"), always);
    b.goal(me, 0, always);
    b.terminal(derived[count - 1]);

    RandomCircuit {
        circuit: b.build().expect("random circuit is well formed"),
        bases,
        inputs,
        derived,
    }
}
