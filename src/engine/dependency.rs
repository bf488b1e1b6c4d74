//! Per-source dependency bit-sets.
//!
//! For every base, action and init proposition, the evaluation-order
//! positions reachable through a purely combinational forward path.
//! Transitions end the traversal: the next step's fan-out is not included.

use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};

use super::bitset::BitSet;
use super::ordering::EvaluationOrder;
use crate::circuit::{Circuit, CompId, NodeKind};

/// Immutable map from source proposition to its dependent positions.
#[derive(Clone, Debug)]
pub struct DependencyMap {
    sets: FxHashMap<CompId, BitSet>,
    empty: BitSet,
}

impl DependencyMap {
    /// Compute bit-sets for every source proposition of the circuit.
    pub fn build(circuit: &Circuit, order: &EvaluationOrder) -> Self {
        let sources = circuit
            .nodes()
            .filter(|(_, node)| node.prop_kind().is_some_and(|k| k.is_source()))
            .map(|(id, _)| id);

        let sets = sources
            .map(|source| (source, reachable_positions(circuit, order, source)))
            .collect();

        Self {
            sets,
            empty: BitSet::new(order.len()),
        }
    }

    /// Dependent positions of a source proposition.
    ///
    /// Non-source components get the empty set.
    #[inline]
    #[must_use]
    pub fn get(&self, source: CompId) -> &BitSet {
        self.sets.get(&source).unwrap_or(&self.empty)
    }

    /// Number of sources with a computed set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

/// Breadth-first forward traversal from `source`.
fn reachable_positions(circuit: &Circuit, order: &EvaluationOrder, source: CompId) -> BitSet {
    let mut positions = BitSet::new(order.len());
    let mut visited = FxHashSet::default();
    let mut frontier: VecDeque<CompId> = circuit.node(source).outputs.iter().copied().collect();

    while let Some(id) = frontier.pop_front() {
        if !visited.insert(id) {
            continue;
        }
        let node = circuit.node(id);
        match node.kind {
            NodeKind::Transition => continue,
            NodeKind::Proposition { .. } => {
                if let Some(pos) = order.position(id) {
                    positions.set(pos);
                }
            }
            _ => {}
        }
        frontier.extend(node.outputs.iter().copied());
    }
    positions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::CircuitBuilder;
    use crate::core::Term;

    #[test]
    fn test_fan_out_stops_at_transition() {
        let mut b = CircuitBuilder::new();
        let me = b.role("me");
        let init = b.init();
        let p = b.base(Term::atom("p"));
        let q = b.base(Term::atom("q"));
        let press = b.input(me, Term::atom("press"));

        let p_or_press = b.or([p, press]);
        let seen = b.derived(Term::atom("seen"), p_or_press);
        let seen_twice = b.derived(Term::atom("seen_twice"), seen);
        b.next(q, seen_twice);
        let from_q = b.derived(Term::atom("from_q"), q);
        let next_p = b.or([init, from_q]);
        b.next(p, next_p);

        let t = b.constant(true);
        b.legal(me, Term::atom("press"), t);
        b.goal(me, 100, q);
        b.terminal(from_q);
        let circuit = b.build().unwrap();

        let order = EvaluationOrder::build(&circuit).unwrap();
        let deps = DependencyMap::build(&circuit, &order);

        let positions = |ids: &[CompId]| {
            let mut set: Vec<_> = ids.iter().map(|&id| order.position(id).unwrap()).collect();
            set.sort_unstable();
            set
        };

        assert_eq!(deps.get(p).ones().collect::<Vec<_>>(), positions(&[seen, seen_twice]));
        assert_eq!(deps.get(press).ones().collect::<Vec<_>>(), positions(&[seen, seen_twice]));
        // q reaches from_q, terminal and its goal, but not p's fan-out
        let q_deps: Vec<_> = deps.get(q).ones().collect();
        assert!(q_deps.contains(&order.position(from_q).unwrap()));
        assert!(!q_deps.contains(&order.position(seen).unwrap()));
        // init only feeds a transition
        assert!(deps.get(init).is_empty());
        assert_eq!(deps.len(), 4);
    }

    #[test]
    fn test_non_source_has_empty_set() {
        let mut b = CircuitBuilder::new();
        let me = b.role("me");
        b.init();
        let t = b.constant(true);
        let legal = b.legal(me, Term::atom("go"), t);
        b.goal(me, 0, t);
        b.terminal(t);
        let circuit = b.build().unwrap();
        let order = EvaluationOrder::build(&circuit).unwrap();
        let deps = DependencyMap::build(&circuit, &order);

        assert!(deps.get(legal).is_empty());
    }
}
