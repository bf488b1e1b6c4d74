//! Tic-tac-toe on a `size`×`size` board, `size` in a row to win.
//!
//! Roles `x` and `o` alternate; the waiting role plays `noop`. Base facts
//! are `(cell i j x)`, `(cell i j o)` and `(control r)`.

use crate::circuit::{Circuit, CircuitBuilder, CompId};
use crate::core::{BuildError, Term};

/// Builder for tic-tac-toe circuits.
#[derive(Clone, Debug)]
pub struct TicTacToeBuilder {
    size: u32,
}

impl Default for TicTacToeBuilder {
    fn default() -> Self {
        Self { size: 3 }
    }
}

/// A cell fact.
pub fn cell(row: u32, col: u32, mark: &str) -> Term {
    Term::compound("cell", [Term::int(row), Term::int(col), Term::atom(mark)])
}

/// A mark move.
pub fn mark(row: u32, col: u32) -> Term {
    Term::compound("mark", [Term::int(row), Term::int(col)])
}

impl TicTacToeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(mut self, size: u32) -> Self {
        assert!((1..=8).contains(&size), "Board size must be 1-8");
        self.size = size;
        self
    }

    /// Build the circuit.
    pub fn build(self) -> Result<Circuit, BuildError> {
        let n = self.size;
        let mut b = CircuitBuilder::new();
        let roles = [b.role("x"), b.role("o")];
        let marks = ["x", "o"];
        let init = b.init();

        let control: Vec<CompId> = marks
            .iter()
            .map(|r| b.base(Term::compound("control", [Term::atom(*r)])))
            .collect();

        let cells: Vec<Vec<[CompId; 2]>> = (1..=n)
            .map(|i| {
                (1..=n)
                    .map(|j| [b.base(cell(i, j, "x")), b.base(cell(i, j, "o"))])
                    .collect()
            })
            .collect();
        let at = |i: u32, j: u32| cells[(i - 1) as usize][(j - 1) as usize];

        // actions
        let mut does_mark = vec![vec![[CompId::NONE; 2]; n as usize]; n as usize];
        for (r, &role) in roles.iter().enumerate() {
            for i in 1..=n {
                for j in 1..=n {
                    does_mark[(i - 1) as usize][(j - 1) as usize][r] = b.input(role, mark(i, j));
                }
            }
            b.input(role, Term::atom("noop"));
        }

        // blank cells and legality
        let mut blanks = Vec::new();
        for i in 1..=n {
            for j in 1..=n {
                let [cx, co] = at(i, j);
                let taken = b.or([cx, co]);
                let free = b.not(taken);
                let blank = b.derived(Term::compound("blank", [Term::int(i), Term::int(j)]), free);
                blanks.push(blank);
                for (r, &role) in roles.iter().enumerate() {
                    let can_mark = b.and([blank, control[r]]);
                    b.legal(role, mark(i, j), can_mark);
                }
            }
        }
        for (r, &role) in roles.iter().enumerate() {
            b.legal(role, Term::atom("noop"), control[1 - r]);
        }

        // next state
        for i in 1..=n {
            for j in 1..=n {
                let current = at(i, j);
                for r in 0..2 {
                    let placed = does_mark[(i - 1) as usize][(j - 1) as usize][r];
                    let next = b.or([current[r], placed]);
                    b.next(current[r], next);
                }
            }
        }
        let x_next = b.or([control[1], init]);
        b.next(control[0], x_next);
        b.next(control[1], control[0]);

        // lines
        let mut lines = Vec::new();
        for r in 0..2 {
            let mut all = Vec::new();
            for i in 1..=n {
                let row: Vec<_> = (1..=n).map(|j| at(i, j)[r]).collect();
                let col: Vec<_> = (1..=n).map(|j| at(j, i)[r]).collect();
                all.push(b.and(row));
                all.push(b.and(col));
            }
            let diag: Vec<_> = (1..=n).map(|k| at(k, k)[r]).collect();
            let anti: Vec<_> = (1..=n).map(|k| at(k, n + 1 - k)[r]).collect();
            all.push(b.and(diag));
            all.push(b.and(anti));
            let any = b.or(all);
            lines.push(b.derived(Term::compound("line", [Term::atom(marks[r])]), any));
        }

        let any_blank = b.or(blanks);
        let open = b.derived(Term::atom("open"), any_blank);
        let closed = b.not(open);
        let over = b.or([lines[0], lines[1], closed]);
        b.terminal(over);

        let some_line = b.or([lines[0], lines[1]]);
        let draw = b.not(some_line);
        for (r, &role) in roles.iter().enumerate() {
            b.goal(role, 100, lines[r]);
            b.goal(role, 50, draw);
            b.goal(role, 0, lines[1 - r]);
        }

        b.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{JointMove, MachineState, Move, Role};
    use crate::machine::{PropNetStateMachine, StateMachine};

    fn play(machine: &mut PropNetStateMachine, moves: &[(Term, Term)]) -> MachineState {
        let mut state = machine.initial_state();
        for (x, o) in moves {
            let joint = JointMove::new([Move(x.clone()), Move(o.clone())]);
            state = machine.next_state(&state, &joint).unwrap();
        }
        state
    }

    #[test]
    fn test_initial_legal_moves() {
        let mut machine = PropNetStateMachine::new(TicTacToeBuilder::new().build().unwrap()).unwrap();
        let start = machine.initial_state();

        assert_eq!(start.len(), 1);
        assert!(start.contains(&Term::compound("control", [Term::atom("x")])));
        assert_eq!(machine.legal_moves(&start, &Role::new("x")).unwrap().len(), 9);
        assert_eq!(
            machine.legal_moves(&start, &Role::new("o")).unwrap(),
            vec![Move::new("noop")]
        );
    }

    #[test]
    fn test_x_wins_top_row() {
        let mut machine = PropNetStateMachine::new(TicTacToeBuilder::new().build().unwrap()).unwrap();
        let noop = Term::atom("noop");
        let state = play(
            &mut machine,
            &[
                (mark(1, 1), noop.clone()),
                (noop.clone(), mark(2, 1)),
                (mark(1, 2), noop.clone()),
                (noop.clone(), mark(2, 2)),
                (mark(1, 3), noop.clone()),
            ],
        );

        assert!(state.contains(&cell(1, 3, "x")));
        assert!(machine.is_terminal(&state).unwrap());
        assert_eq!(machine.goal(&state, &Role::new("x")).unwrap(), 100);
        assert_eq!(machine.goal(&state, &Role::new("o")).unwrap(), 0);
    }

    #[test]
    fn test_taken_cell_is_not_legal() {
        let mut machine = PropNetStateMachine::new(TicTacToeBuilder::new().build().unwrap()).unwrap();
        let state = play(&mut machine, &[(mark(2, 2), Term::atom("noop"))]);

        let legal = machine.legal_moves(&state, &Role::new("o")).unwrap();
        assert_eq!(legal.len(), 8);
        assert!(!legal.contains(&Move(mark(2, 2))));
    }

    #[test]
    fn test_two_by_two_win() {
        let mut machine =
            PropNetStateMachine::new(TicTacToeBuilder::new().size(2).build().unwrap()).unwrap();
        let noop = Term::atom("noop");
        let state = play(
            &mut machine,
            &[(mark(1, 1), noop.clone()), (noop, mark(2, 2)), (mark(1, 2), Term::atom("noop"))],
        );

        assert!(machine.is_terminal(&state).unwrap());
        assert_eq!(machine.goal(&state, &Role::new("x")).unwrap(), 100);
    }
}
