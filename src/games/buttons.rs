//! Buttons and lights: one role, three lights, a step limit.
//!
//! `a` toggles `p`, `b` swaps `p` and `q`, `c` swaps `q` and `r`. The game
//! ends when all lights are on or at step `max_steps`; all lights on pays 100.

use crate::circuit::{Circuit, CircuitBuilder};
use crate::core::{BuildError, Term};

/// Builder for buttons-and-lights circuits.
#[derive(Clone, Debug)]
pub struct ButtonsBuilder {
    max_steps: u32,
}

impl Default for ButtonsBuilder {
    fn default() -> Self {
        Self { max_steps: 7 }
    }
}

impl ButtonsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_steps(mut self, steps: u32) -> Self {
        assert!(steps >= 2, "Need at least 2 steps");
        self.max_steps = steps;
        self
    }

    /// Build the circuit.
    pub fn build(self) -> Result<Circuit, BuildError> {
        let mut b = CircuitBuilder::new();
        let robot = b.role("robot");
        let init = b.init();

        let p = b.base(Term::atom("p"));
        let q = b.base(Term::atom("q"));
        let r = b.base(Term::atom("r"));
        let steps: Vec<_> = (1..=self.max_steps)
            .map(|k| b.base(Term::compound("step", [Term::int(k)])))
            .collect();

        let a = b.input(robot, Term::atom("a"));
        let bb = b.input(robot, Term::atom("b"));
        let c = b.input(robot, Term::atom("c"));

        let always = b.constant(true);
        for action in ["a", "b", "c"] {
            b.legal(robot, Term::atom(action), always);
        }

        // p' = a & !p | b & q | c & p
        let not_p = b.not(p);
        let a_flip = b.and([a, not_p]);
        let b_take_q = b.and([bb, q]);
        let c_keep_p = b.and([c, p]);
        let p_next = b.or([a_flip, b_take_q, c_keep_p]);
        b.next(p, p_next);

        // q' = a & q | b & p | c & r
        let a_keep_q = b.and([a, q]);
        let b_take_p = b.and([bb, p]);
        let c_take_r = b.and([c, r]);
        let q_next = b.or([a_keep_q, b_take_p, c_take_r]);
        b.next(q, q_next);

        // r' = a & r | b & r | c & q
        let ab = b.or([a, bb]);
        let ab_keep_r = b.and([ab, r]);
        let c_take_q = b.and([c, q]);
        let r_next = b.or([ab_keep_r, c_take_q]);
        b.next(r, r_next);

        b.next(steps[0], init);
        for pair in steps.windows(2) {
            b.next(pair[1], pair[0]);
        }

        let lit = b.and([p, q, r]);
        let all_on = b.derived(Term::atom("all_on"), lit);
        let out_of_time = steps[steps.len() - 1];
        let over = b.or([all_on, out_of_time]);
        b.terminal(over);

        b.goal(robot, 100, all_on);
        let not_all = b.not(all_on);
        b.goal(robot, 0, not_all);

        b.build()
    }
}
