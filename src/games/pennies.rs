//! Matching pennies: two roles choose `heads` or `tails` simultaneously.
//!
//! One round. `even` scores 100 when the coins match, `odd` when they
//! differ. Base facts are `(picked role side)` and `done`.

use crate::circuit::{Circuit, CircuitBuilder};
use crate::core::{BuildError, Term};

const SIDES: [&str; 2] = ["heads", "tails"];

/// Builder for matching-pennies circuits.
#[derive(Clone, Debug, Default)]
pub struct PenniesBuilder;

impl PenniesBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build the circuit.
    pub fn build(self) -> Result<Circuit, BuildError> {
        let mut b = CircuitBuilder::new();
        let roles = [b.role("even"), b.role("odd")];
        let init = b.init();

        let done = b.base(Term::atom("done"));
        let not_init = b.not(init);
        b.next(done, not_init);
        let open = b.not(done);

        // picked[role][side]
        let mut picked = [[done; 2]; 2];
        for (r, &role) in roles.iter().enumerate() {
            let name = if r == 0 { "even" } else { "odd" };
            for (s, side) in SIDES.iter().enumerate() {
                let fact = b.base(Term::compound("picked", [Term::atom(name), Term::atom(*side)]));
                let does = b.input(role, Term::atom(*side));
                b.next(fact, does);
                b.legal(role, Term::atom(*side), open);
                picked[r][s] = fact;
            }
        }

        let both_heads = b.and([picked[0][0], picked[1][0]]);
        let both_tails = b.and([picked[0][1], picked[1][1]]);
        let either = b.or([both_heads, both_tails]);
        let matched = b.derived(Term::atom("matched"), either);
        let not_matched = b.not(matched);

        b.terminal(done);
        b.goal(roles[0], 100, matched);
        b.goal(roles[0], 0, not_matched);
        b.goal(roles[1], 100, not_matched);
        b.goal(roles[1], 0, matched);

        b.build()
    }
}
