//! Incremental propagation over a compiled net.
//!
//! ## Two passes
//!
//! Each proposition carries two truth fields. The value pass computes real
//! truth from base, action and init values. The legal pass runs on a
//! separate field in which every action proposition is held true, so legal
//! moves can be read without knowing what the other roles will do.
//!
//! ## Dirty sets
//!
//! Flipping a source proposition ORs its dependency bit-set into the dirty
//! set of each pass it feeds. Draining a pass re-evaluates the dirty
//! positions in ascending order and clears the set. Writing a value a source
//! already holds marks nothing.
//!
//! ## Transition step
//!
//! Copies every transition's input onto its base proposition. Requires a
//! drained value pass; base values change nowhere else.

use super::bitset::BitSet;
use super::compiled::CompiledNet;
use super::stats::PropagationStats;
use crate::circuit::{Circuit, CompId, NodeKind, PropKind};
use crate::core::PropagationError;

/// Mutable per-instance propagation state.
#[derive(Clone, Debug)]
pub struct Propagator {
    value: Vec<bool>,
    legal: Vec<bool>,
    value_dirty: BitSet,
    legal_dirty: BitSet,
    stats: PropagationStats,
}

impl Propagator {
    /// Fresh state for `net`: every field false except action legality,
    /// every position dirty in both passes.
    pub fn new(net: &CompiledNet) -> Self {
        let circuit = net.circuit();
        let positions = net.order().len();
        let mut legal = vec![false; circuit.len()];
        for &input in circuit.input_propositions() {
            legal[input.index()] = true;
        }

        Self {
            value: vec![false; circuit.len()],
            legal,
            value_dirty: BitSet::full(positions),
            legal_dirty: BitSet::full(positions),
            stats: PropagationStats::default(),
        }
    }

    /// Set a source proposition. Returns whether its value changed.
    ///
    /// Base and init propositions feed both passes; action propositions
    /// feed only the value pass.
    pub fn set(&mut self, net: &CompiledNet, prop: CompId, value: bool) -> bool {
        let kind = net.circuit().node(prop).prop_kind();
        debug_assert!(
            kind.is_some_and(PropKind::is_source),
            "{prop} is not a source proposition"
        );
        if self.value[prop.index()] == value {
            return false;
        }

        let deps = net.dependencies().get(prop);
        self.value[prop.index()] = value;
        self.value_dirty.union_with(deps);
        self.stats.value_marks += 1;

        if kind != Some(PropKind::Input) {
            self.legal[prop.index()] = value;
            self.legal_dirty.union_with(deps);
            self.stats.legal_marks += 1;
        }
        true
    }

    /// Drain the value dirty-set.
    pub fn propagate_value(&mut self, net: &CompiledNet) {
        let evaluated = drain(net, &mut self.value, &mut self.value_dirty);
        self.stats.value_evaluations += evaluated;
    }

    /// Drain the legal dirty-set.
    pub fn propagate_legal(&mut self, net: &CompiledNet) {
        let evaluated = drain(net, &mut self.legal, &mut self.legal_dirty);
        self.stats.legal_evaluations += evaluated;
    }

    /// Advance base propositions one step.
    pub fn transition(&mut self, net: &CompiledNet) -> Result<(), PropagationError> {
        if !self.value_dirty.is_empty() {
            return Err(PropagationError::PendingPropagation {
                pending: self.value_dirty.count_ones(),
            });
        }

        let circuit = net.circuit();
        // read every next value before writing any
        let next: Vec<(CompId, bool)> = circuit
            .base_propositions()
            .iter()
            .map(|&base| {
                let value = circuit
                    .node(base)
                    .single_input()
                    .is_some_and(|transition| evaluate(circuit, &self.value, transition));
                (base, value)
            })
            .collect();

        for (base, value) in next {
            self.set(net, base, value);
        }
        self.stats.transitions += 1;
        Ok(())
    }

    /// Read a proposition's value-pass truth.
    pub fn value(&self, net: &CompiledNet, prop: CompId) -> Result<bool, PropagationError> {
        check_fresh(net, &self.value_dirty, prop)?;
        Ok(self.value[prop.index()])
    }

    /// Read a proposition's legal-pass truth.
    pub fn legal(&self, net: &CompiledNet, prop: CompId) -> Result<bool, PropagationError> {
        check_fresh(net, &self.legal_dirty, prop)?;
        Ok(self.legal[prop.index()])
    }

    /// Read a base, action or init proposition. Sources are never stale.
    #[inline]
    #[must_use]
    pub fn source_value(&self, prop: CompId) -> bool {
        self.value[prop.index()]
    }

    /// Positions awaiting the value pass.
    #[must_use]
    pub fn pending_value(&self) -> usize {
        self.value_dirty.count_ones()
    }

    /// Positions awaiting the legal pass.
    #[must_use]
    pub fn pending_legal(&self) -> usize {
        self.legal_dirty.count_ones()
    }

    #[must_use]
    pub fn stats(&self) -> &PropagationStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }
}

fn check_fresh(net: &CompiledNet, dirty: &BitSet, prop: CompId) -> Result<(), PropagationError> {
    match net.order().position(prop) {
        Some(position) if dirty.contains(position) => {
            Err(PropagationError::StaleRead { prop, position })
        }
        _ => Ok(()),
    }
}

/// Re-evaluate dirty positions in order, then clear. Returns the count.
fn drain(net: &CompiledNet, field: &mut [bool], dirty: &mut BitSet) -> u64 {
    let circuit = net.circuit();
    let order = net.order();
    let mut evaluated = 0;

    for position in dirty.ones() {
        let prop = order.at(position);
        let value = circuit
            .node(prop)
            .single_input()
            .is_some_and(|input| evaluate(circuit, field, input));
        field[prop.index()] = value;
        evaluated += 1;
    }
    dirty.clear();
    evaluated
}

/// Truth of a component over `field`. Gates are computed, propositions read.
fn evaluate(circuit: &Circuit, field: &[bool], id: CompId) -> bool {
    let node = circuit.node(id);
    match node.kind {
        NodeKind::Proposition { .. } => field[id.index()],
        NodeKind::Constant(value) => value,
        NodeKind::And => node.inputs.iter().all(|&i| evaluate(circuit, field, i)),
        NodeKind::Or => node.inputs.iter().any(|&i| evaluate(circuit, field, i)),
        NodeKind::Not => !node
            .single_input()
            .is_some_and(|i| evaluate(circuit, field, i)),
        NodeKind::Transition => node
            .single_input()
            .is_some_and(|i| evaluate(circuit, field, i)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::CircuitBuilder;
    use crate::core::Term;

    struct Fixture {
        net: CompiledNet,
        p: CompId,
        q: CompId,
        press: CompId,
        on: CompId,
        both: CompId,
    }

    /// `on = p or press`, `both = p and q`, `p' = on`, `q' = p`.
    fn fixture() -> Fixture {
        let mut b = CircuitBuilder::new();
        let me = b.role("me");
        let init = b.init();
        let p = b.base(Term::atom("p"));
        let q = b.base(Term::atom("q"));
        let press = b.input(me, Term::atom("press"));

        let or = b.or([p, press]);
        let on = b.derived(Term::atom("on"), or);
        let and = b.and([p, q]);
        let both = b.derived(Term::atom("both"), and);
        b.next(p, on);
        let q_next = b.or([p, init]);
        b.next(q, q_next);

        let t = b.constant(true);
        b.legal(me, Term::atom("press"), t);
        b.goal(me, 100, both);
        b.terminal(both);

        let net = CompiledNet::compile(b.build().unwrap()).unwrap();
        Fixture { net, p, q, press, on, both }
    }

    fn drained(f: &Fixture) -> Propagator {
        let mut prop = Propagator::new(&f.net);
        prop.propagate_value(&f.net);
        prop.propagate_legal(&f.net);
        prop.reset_stats();
        prop
    }

    #[test]
    fn test_initial_full_evaluation() {
        let f = fixture();
        let mut prop = Propagator::new(&f.net);
        assert_eq!(prop.pending_value(), f.net.order().len());

        prop.propagate_value(&f.net);
        assert_eq!(prop.pending_value(), 0);
        assert_eq!(prop.stats().value_evaluations, f.net.order().len() as u64);
        assert_eq!(prop.value(&f.net, f.on), Ok(false));
    }

    #[test]
    fn test_stale_read() {
        let f = fixture();
        let mut prop = drained(&f);
        prop.set(&f.net, f.press, true);

        let position = f.net.order().position(f.on).unwrap();
        assert_eq!(
            prop.value(&f.net, f.on),
            Err(PropagationError::StaleRead { prop: f.on, position })
        );

        prop.propagate_value(&f.net);
        assert_eq!(prop.value(&f.net, f.on), Ok(true));
    }

    #[test]
    fn test_same_value_marks_nothing() {
        let f = fixture();
        let mut prop = drained(&f);

        assert!(!prop.set(&f.net, f.p, false));
        assert_eq!(prop.pending_value(), 0);
        assert_eq!(prop.stats().value_marks, 0);

        assert!(prop.set(&f.net, f.p, true));
        assert_eq!(prop.stats().value_marks, 1);
        assert_eq!(prop.stats().legal_marks, 1);
        assert_eq!(prop.pending_value(), 2);
    }

    #[test]
    fn test_action_does_not_touch_legal_pass() {
        let f = fixture();
        let mut prop = drained(&f);

        prop.set(&f.net, f.press, true);
        assert_eq!(prop.pending_legal(), 0);
        assert_eq!(prop.stats().legal_marks, 0);
        // the legal pass always sees actions as true
        assert_eq!(prop.legal(&f.net, f.on), Ok(true));
    }

    #[test]
    fn test_transition_requires_drained_value_pass() {
        let f = fixture();
        let mut prop = drained(&f);
        prop.set(&f.net, f.press, true);

        assert_eq!(
            prop.transition(&f.net),
            Err(PropagationError::PendingPropagation { pending: 1 })
        );
    }

    #[test]
    fn test_transition_reads_pre_step_values() {
        let f = fixture();
        let mut prop = drained(&f);

        prop.set(&f.net, f.press, true);
        prop.propagate_value(&f.net);
        prop.transition(&f.net).unwrap();
        // p' = on = true, q' = old p = false
        assert_eq!(prop.value(&f.net, f.p), Ok(true));
        assert_eq!(prop.value(&f.net, f.q), Ok(false));

        prop.set(&f.net, f.press, false);
        prop.propagate_value(&f.net);
        prop.transition(&f.net).unwrap();
        assert_eq!(prop.value(&f.net, f.q), Ok(true));

        prop.propagate_value(&f.net);
        assert_eq!(prop.value(&f.net, f.both), Ok(true));
        assert_eq!(prop.stats().transitions, 2);
    }
}
