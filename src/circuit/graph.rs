//! The circuit graph consumed by the engine.
//!
//! A flat `Vec<Node>` with index-based edges, plus the designated
//! proposition sets (base, input, init, terminal, per-role legal and goal).
//! Structure is read-only once built; truth values live in the engine.

use serde::{Deserialize, Serialize};

use super::node::{CompId, Node, NodeKind, PropKind};
use crate::core::{BuildError, Role, RoleIndex, RoleMap, Term};

/// An already-built proposition network.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Circuit {
    pub(crate) nodes: Vec<Node>,
    pub(crate) roles: RoleMap<Role>,
    pub(crate) base: Vec<CompId>,
    pub(crate) inputs: Vec<CompId>,
    pub(crate) init: CompId,
    pub(crate) terminal: CompId,
    pub(crate) legals: RoleMap<Vec<CompId>>,
    pub(crate) goals: RoleMap<Vec<CompId>>,
}

impl Circuit {
    /// Number of components (propositions, gates, transitions, constants).
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the arena is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get a component by ID.
    #[inline]
    #[must_use]
    pub fn node(&self, id: CompId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Iterate over all (CompId, &Node) pairs.
    pub fn nodes(&self) -> impl Iterator<Item = (CompId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (CompId::new(i as u32), n))
    }

    /// Iterate over propositions of the given kind, in arena order.
    pub fn propositions_of(&self, kind: PropKind) -> impl Iterator<Item = CompId> + '_ {
        self.nodes()
            .filter(move |(_, n)| n.prop_kind() == Some(kind))
            .map(|(id, _)| id)
    }

    /// Roles in circuit order.
    #[must_use]
    pub fn roles(&self) -> &RoleMap<Role> {
        &self.roles
    }

    /// Base propositions in registration order.
    #[must_use]
    pub fn base_propositions(&self) -> &[CompId] {
        &self.base
    }

    /// Action propositions in registration order.
    #[must_use]
    pub fn input_propositions(&self) -> &[CompId] {
        &self.inputs
    }

    /// The init proposition.
    #[must_use]
    pub fn init_proposition(&self) -> CompId {
        self.init
    }

    /// The terminal proposition.
    #[must_use]
    pub fn terminal_proposition(&self) -> CompId {
        self.terminal
    }

    /// Legal propositions of a role.
    #[must_use]
    pub fn legal_propositions(&self, role: RoleIndex) -> &[CompId] {
        &self.legals[role]
    }

    /// Goal propositions of a role.
    #[must_use]
    pub fn goal_propositions(&self, role: RoleIndex) -> &[CompId] {
        &self.goals[role]
    }

    /// Name of a proposition (panics on gates; only call with proposition IDs).
    pub(crate) fn name_of(&self, id: CompId) -> Term {
        self.node(id)
            .name()
            .cloned()
            .unwrap_or_else(|| Term::atom(id.to_string()))
    }

    /// Check the structural rules the engine relies on.
    ///
    /// Does not check acyclicity; that falls out of ordering.
    pub fn validate(&self) -> Result<(), BuildError> {
        let len = self.nodes.len();

        for (id, node) in self.nodes() {
            for &target in node.inputs.iter().chain(node.outputs.iter()) {
                if target.index() >= len {
                    return Err(BuildError::DanglingEdge { node: id, target });
                }
            }
            for &input in &node.inputs {
                if !self.node(input).outputs.contains(&id) {
                    return Err(malformed(id, format!("input {input} does not list it as output")));
                }
            }
            self.validate_node(id, node)?;
        }

        self.validate_designations()
    }

    fn validate_node(&self, id: CompId, node: &Node) -> Result<(), BuildError> {
        let feeds_from_transition = node
            .inputs
            .iter()
            .any(|&i| self.node(i).kind == NodeKind::Transition);

        match &node.kind {
            NodeKind::Proposition { kind, .. } => match kind {
                PropKind::Base => {
                    if node.inputs.len() > 1 || (node.inputs.len() == 1 && !feeds_from_transition) {
                        return Err(malformed(id, "base proposition must be fed by one transition"));
                    }
                }
                PropKind::Input | PropKind::Init => {
                    if !node.inputs.is_empty() {
                        return Err(malformed(id, "externally set proposition has inputs"));
                    }
                }
                PropKind::Derived => {
                    if node.inputs.len() != 1 {
                        return Err(malformed(
                            id,
                            format!("derived proposition has {} inputs", node.inputs.len()),
                        ));
                    }
                    if feeds_from_transition {
                        return Err(malformed(id, "derived proposition fed by a transition"));
                    }
                }
            },
            NodeKind::And | NodeKind::Or => {
                if node.inputs.is_empty() {
                    return Err(malformed(id, "gate has no inputs"));
                }
                if feeds_from_transition {
                    return Err(malformed(id, "gate fed by a transition"));
                }
            }
            NodeKind::Not => {
                if node.inputs.len() != 1 {
                    return Err(malformed(id, "not gate needs exactly one input"));
                }
                if feeds_from_transition {
                    return Err(malformed(id, "gate fed by a transition"));
                }
            }
            NodeKind::Transition => {
                if node.inputs.len() != 1 || feeds_from_transition {
                    return Err(malformed(id, "transition needs one combinational input"));
                }
                let feeds_only_base = node
                    .outputs
                    .iter()
                    .all(|&o| self.node(o).prop_kind() == Some(PropKind::Base));
                if !feeds_only_base {
                    return Err(malformed(id, "transition feeds a non-base component"));
                }
            }
            NodeKind::Constant(_) => {
                if !node.inputs.is_empty() {
                    return Err(malformed(id, "constant has inputs"));
                }
            }
        }
        Ok(())
    }

    fn validate_designations(&self) -> Result<(), BuildError> {
        if self.init.is_none() {
            return Err(BuildError::MissingInit);
        }
        if self.terminal.is_none() {
            return Err(BuildError::MissingTerminal);
        }
        self.expect_kind(self.init, PropKind::Init)?;
        self.expect_kind(self.terminal, PropKind::Derived)?;
        for &id in &self.base {
            self.expect_kind(id, PropKind::Base)?;
        }
        for &id in &self.inputs {
            self.expect_kind(id, PropKind::Input)?;
        }

        let expected = self.roles.role_count();
        if expected == 0 {
            return Err(BuildError::NoRoles);
        }
        if expected > usize::from(u8::MAX) {
            return Err(BuildError::TooManyRoles { count: expected });
        }
        for (kind, found) in [
            ("legal", self.legals.role_count()),
            ("goal", self.goals.role_count()),
        ] {
            if found != expected {
                return Err(BuildError::RoleTableMismatch {
                    kind,
                    expected,
                    found,
                });
            }
        }

        for (role_index, role) in self.roles.iter() {
            if self.legals[role_index].is_empty() {
                return Err(BuildError::MissingRolePropositions {
                    role: role.clone(),
                    kind: "legal",
                });
            }
            if self.goals[role_index].is_empty() {
                return Err(BuildError::MissingRolePropositions {
                    role: role.clone(),
                    kind: "goal",
                });
            }
            for &id in self.legals[role_index].iter().chain(self.goals[role_index].iter()) {
                self.expect_kind(id, PropKind::Derived)?;
            }
        }
        Ok(())
    }

    fn expect_kind(&self, id: CompId, kind: PropKind) -> Result<(), BuildError> {
        if id.index() >= self.nodes.len() {
            return Err(BuildError::DanglingEdge {
                node: CompId::NONE,
                target: id,
            });
        }
        match self.node(id).prop_kind() {
            Some(actual) if actual == kind => Ok(()),
            _ => Err(malformed(id, format!("expected a {kind:?} proposition"))),
        }
    }
}

fn malformed(node: CompId, reason: impl Into<String>) -> BuildError {
    BuildError::MalformedNode {
        node,
        reason: reason.into(),
    }
}
