//! Evaluation order over derived propositions.
//!
//! Every derived proposition appears after all derived propositions in its
//! combinational ancestry. Gates are expanded transparently; transitions and
//! base/input/init propositions end the ancestry walk.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::circuit::{Circuit, CompId, NodeKind, PropKind};
use crate::core::{BuildError, Term};

/// Linear order over the circuit's derived propositions.
#[derive(Clone, Debug)]
pub struct EvaluationOrder {
    order: Vec<CompId>,
    positions: FxHashMap<CompId, usize>,
}

impl EvaluationOrder {
    /// Compute the order for a circuit.
    ///
    /// Fails with `CombinationalCycle` when the circuit minus transitions is
    /// not acyclic.
    pub fn build(circuit: &Circuit) -> Result<Self, BuildError> {
        check_gate_cycles(circuit)?;

        let mut pending: VecDeque<CompId> = circuit.propositions_of(PropKind::Derived).collect();
        let mut ordered = vec![false; circuit.len()];
        let mut order = Vec::with_capacity(pending.len());
        let mut walker = AncestryWalker::new(circuit.len());

        // Scan cyclically; a full lap with no progress means a cycle.
        let mut misses = 0;
        while let Some(candidate) = pending.pop_front() {
            if walker.is_ready(circuit, candidate, &ordered) {
                ordered[candidate.index()] = true;
                order.push(candidate);
                misses = 0;
            } else {
                pending.push_back(candidate);
                misses += 1;
                if misses >= pending.len() {
                    return Err(BuildError::CombinationalCycle {
                        remaining: pending.len(),
                        stuck: circuit.name_of(candidate),
                    });
                }
            }
        }

        let positions = order.iter().enumerate().map(|(pos, &id)| (id, pos)).collect();
        debug!(propositions = order.len(), "evaluation order built");
        Ok(Self { order, positions })
    }

    /// Position of a derived proposition in the order.
    #[inline]
    #[must_use]
    pub fn position(&self, id: CompId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    /// Number of ordered propositions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Proposition at a position.
    #[inline]
    #[must_use]
    pub fn at(&self, pos: usize) -> CompId {
        self.order[pos]
    }

    #[must_use]
    pub fn as_slice(&self) -> &[CompId] {
        &self.order
    }
}

/// Reusable depth-first walk over a proposition's combinational ancestry.
struct AncestryWalker {
    stamps: Vec<u32>,
    generation: u32,
    stack: Vec<CompId>,
}

impl AncestryWalker {
    fn new(len: usize) -> Self {
        Self {
            stamps: vec![0; len],
            generation: 0,
            stack: Vec::new(),
        }
    }

    /// True when no unordered derived proposition feeds `candidate`.
    fn is_ready(&mut self, circuit: &Circuit, candidate: CompId, ordered: &[bool]) -> bool {
        self.generation = match self.generation.checked_add(1) {
            Some(next) => next,
            None => {
                self.stamps.fill(0);
                1
            }
        };
        self.stack.clear();
        self.stack.extend(circuit.node(candidate).inputs.iter().copied());

        while let Some(id) = self.stack.pop() {
            if self.stamps[id.index()] == self.generation {
                continue;
            }
            self.stamps[id.index()] = self.generation;

            let node = circuit.node(id);
            match &node.kind {
                NodeKind::Proposition { kind: PropKind::Derived, .. } => {
                    if !ordered[id.index()] {
                        return false;
                    }
                }
                NodeKind::Proposition { .. } | NodeKind::Transition | NodeKind::Constant(_) => {}
                NodeKind::And | NodeKind::Or | NodeKind::Not => {
                    self.stack.extend(node.inputs.iter().copied());
                }
            }
        }
        true
    }
}

/// Reject loops made only of gates, which no proposition ordering can see.
fn check_gate_cycles(circuit: &Circuit) -> Result<(), BuildError> {
    let is_gate = |id: CompId| {
        matches!(
            circuit.node(id).kind,
            NodeKind::And | NodeKind::Or | NodeKind::Not
        )
    };

    let mut in_degree = vec![0usize; circuit.len()];
    let mut ready = Vec::new();
    let mut gate_count = 0;
    for (id, node) in circuit.nodes() {
        if !is_gate(id) {
            continue;
        }
        gate_count += 1;
        in_degree[id.index()] = node.inputs.iter().filter(|&&i| is_gate(i)).count();
        if in_degree[id.index()] == 0 {
            ready.push(id);
        }
    }

    let mut seen = 0;
    while let Some(id) = ready.pop() {
        seen += 1;
        for &out in &circuit.node(id).outputs {
            if is_gate(out) {
                in_degree[out.index()] -= 1;
                if in_degree[out.index()] == 0 {
                    ready.push(out);
                }
            }
        }
    }

    if seen < gate_count {
        let stuck = circuit
            .nodes()
            .find(|&(id, _)| is_gate(id) && in_degree[id.index()] > 0)
            .map_or_else(|| Term::atom("gate"), |(id, _)| circuit.name_of(id));
        return Err(BuildError::CombinationalCycle {
            remaining: gate_count - seen,
            stuck,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::CircuitBuilder;

    fn chain() -> (Circuit, [CompId; 3]) {
        let mut b = CircuitBuilder::new();
        let me = b.role("me");
        let init = b.init();
        let p = b.base(Term::atom("p"));
        b.next(p, init);
        // declared out of dependency order on purpose
        let c_gate = b.constant(true);
        let c = b.derived(Term::atom("c"), c_gate);
        let a = b.derived(Term::atom("a"), p);
        let not_a = b.not(a);
        let b_prop = b.derived(Term::atom("b"), not_a);
        let and = b.and([b_prop, c]);
        let legal_src = b.derived(Term::atom("d"), and);
        b.legal(me, Term::atom("go"), legal_src);
        b.goal(me, 0, c);
        b.terminal(b_prop);
        (b.build().unwrap(), [a, b_prop, legal_src])
    }

    #[test]
    fn test_order_respects_ancestry() {
        let (circuit, [a, b, d]) = chain();
        let order = EvaluationOrder::build(&circuit).unwrap();

        assert_eq!(order.len(), circuit.propositions_of(PropKind::Derived).count());
        let pos = |id| order.position(id).unwrap();
        assert!(pos(a) < pos(b));
        assert!(pos(b) < pos(d));
    }

    #[test]
    fn test_walker_survives_generation_wrap() {
        let (circuit, [a, b, d]) = chain();
        let mut ordered = vec![false; circuit.len()];
        let mut walker = AncestryWalker::new(circuit.len());
        walker.stamps.fill(1);
        walker.generation = u32::MAX;

        assert!(!walker.is_ready(&circuit, b, &ordered));
        assert_eq!(walker.generation, 1);
        assert!(!walker.is_ready(&circuit, d, &ordered));

        ordered[a.index()] = true;
        assert!(walker.is_ready(&circuit, b, &ordered));
    }

    #[test]
    fn test_sources_are_not_ordered() {
        let (circuit, _) = chain();
        let order = EvaluationOrder::build(&circuit).unwrap();
        assert_eq!(order.position(circuit.init_proposition()), None);
        assert_eq!(order.position(circuit.base_propositions()[0]), None);
    }

    #[test]
    fn test_derived_cycle_detected() {
        let mut b = CircuitBuilder::new();
        let me = b.role("me");
        b.init();
        let t = b.constant(true);
        b.legal(me, Term::atom("go"), t);
        b.goal(me, 0, t);
        // x = not y, y = and(x, t)
        let and = b.and([t]);
        let y = b.derived(Term::atom("y"), and);
        let not = b.not(y);
        let x = b.derived(Term::atom("x"), not);
        b.connect(x, and);
        b.terminal(x);
        let circuit = b.build().unwrap();

        match EvaluationOrder::build(&circuit) {
            Err(BuildError::CombinationalCycle { remaining, .. }) => assert!(remaining >= 2),
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn test_gate_only_cycle_detected() {
        let mut b = CircuitBuilder::new();
        let me = b.role("me");
        b.init();
        let t = b.constant(true);
        b.legal(me, Term::atom("go"), t);
        b.goal(me, 0, t);
        let g1 = b.or([t]);
        let g2 = b.and([g1]);
        b.connect(g2, g1);
        b.terminal(g2);
        let circuit = b.build().unwrap();

        assert!(matches!(
            EvaluationOrder::build(&circuit),
            Err(BuildError::CombinationalCycle { remaining: 2, .. })
        ));
    }
}
