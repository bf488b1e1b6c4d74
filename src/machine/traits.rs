//! The consumer-facing state-machine interface.
//!
//! Search strategies talk to games exclusively through `StateMachine`:
//! - What the initial state is
//! - Which moves each role may play
//! - How a joint move advances the state
//! - Whether the game is over and what each role scored

use crate::core::{JointMove, MachineResult, MachineState, Move, Role, RoleMap, SimRng, StateMachineError};

/// State-transition oracle for one game.
///
/// Queries take `&mut self` because implementations may mutate internal
/// evaluation state in place; share one instance only behind a lock.
///
/// ## Implementation Notes
///
/// - `legal_moves`: an empty list is a valid answer in terminal states
/// - `next_state`: must be deterministic
/// - `goal`: ill-defined goals are errors, never a default value
pub trait StateMachine {
    /// Roles in game order.
    fn roles(&self) -> &RoleMap<Role>;

    /// The state the game starts in.
    fn initial_state(&self) -> MachineState;

    /// Moves `role` may play in `state`.
    fn legal_moves(&mut self, state: &MachineState, role: &Role) -> MachineResult<Vec<Move>>;

    /// Successor of `state` under `joint`.
    fn next_state(&mut self, state: &MachineState, joint: &JointMove)
        -> MachineResult<MachineState>;

    /// Check if the game is over in `state`.
    fn is_terminal(&mut self, state: &MachineState) -> MachineResult<bool>;

    /// Payoff of `role` in `state`.
    fn goal(&mut self, state: &MachineState, role: &Role) -> MachineResult<u32>;

    // === Convenience Methods ===

    /// Payoffs of every role, in role order.
    fn goals(&mut self, state: &MachineState) -> MachineResult<RoleMap<u32>> {
        let roles: Vec<Role> = self.roles().values().cloned().collect();
        let mut values = Vec::with_capacity(roles.len());
        for role in &roles {
            values.push(self.goal(state, role)?);
        }
        RoleMap::from_vec(values)
            .ok_or_else(|| StateMachineError::transition("machine declares no roles"))
    }

    /// Every joint move with `role` fixed to `mv` and the other roles
    /// ranging over their legal moves.
    fn legal_joint_moves(
        &mut self,
        state: &MachineState,
        role: &Role,
        mv: &Move,
    ) -> MachineResult<Vec<JointMove>> {
        let roles: Vec<Role> = self.roles().values().cloned().collect();
        if !roles.contains(role) {
            return Err(StateMachineError::move_definition(role, "role not in game"));
        }

        let mut options = Vec::with_capacity(roles.len());
        for other in &roles {
            if other == role {
                options.push(vec![mv.clone()]);
            } else {
                options.push(self.legal_moves(state, other)?);
            }
        }
        Ok(cross_product(&options))
    }

    /// Every combination of legal moves.
    fn all_legal_joint_moves(&mut self, state: &MachineState) -> MachineResult<Vec<JointMove>> {
        let roles: Vec<Role> = self.roles().values().cloned().collect();
        let mut options = Vec::with_capacity(roles.len());
        for role in &roles {
            options.push(self.legal_moves(state, role)?);
        }
        Ok(cross_product(&options))
    }

    /// One uniformly random legal move per role.
    ///
    /// A role without legal moves is a move-definition fault.
    fn random_joint_move(
        &mut self,
        state: &MachineState,
        rng: &mut SimRng,
    ) -> MachineResult<JointMove> {
        let roles: Vec<Role> = self.roles().values().cloned().collect();
        let mut moves = Vec::with_capacity(roles.len());
        for role in &roles {
            let legal = self.legal_moves(state, role)?;
            let mv = rng
                .choose(&legal)
                .cloned()
                .ok_or_else(|| StateMachineError::move_definition(role, "no legal moves"))?;
            moves.push(mv);
        }
        Ok(JointMove::new(moves))
    }

    /// Successor of `state` under a random joint move.
    fn random_next_state(
        &mut self,
        state: &MachineState,
        rng: &mut SimRng,
    ) -> MachineResult<MachineState> {
        let joint = self.random_joint_move(state, rng)?;
        self.next_state(state, &joint)
    }
}

/// Enumerate the cartesian product of per-role move lists, in role order.
///
/// The first role varies slowest. Any empty list makes the product empty.
pub fn cross_product(options: &[Vec<Move>]) -> Vec<JointMove> {
    let mut joints: Vec<Vec<Move>> = vec![Vec::with_capacity(options.len())];
    for moves in options {
        let mut next = Vec::with_capacity(joints.len() * moves.len());
        for prefix in &joints {
            for mv in moves {
                let mut joint = prefix.clone();
                joint.push(mv.clone());
                next.push(joint);
            }
        }
        joints = next;
    }
    joints.into_iter().map(JointMove::new).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cross_product_order() {
        let options = vec![
            vec![Move::new("a"), Move::new("b")],
            vec![Move::new("x"), Move::new("y")],
        ];
        let joints = cross_product(&options);

        let rendered: Vec<String> = joints.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["[a, x]", "[a, y]", "[b, x]", "[b, y]"]);
    }

    #[test]
    fn test_cross_product_empty_role() {
        let options = vec![vec![Move::new("a")], Vec::new()];
        assert!(cross_product(&options).is_empty());
    }
}
