//! Fluent construction of circuits.
//!
//! Stands in for the rule compiler: games, tests and benchmarks describe
//! their circuits through this builder and get a validated `Circuit`.

use super::graph::Circuit;
use super::node::{CompId, Node, NodeKind, PropKind};
use crate::core::{BuildError, Move, Role, RoleIndex, RoleMap, Term};

/// Builder for creating a `Circuit`.
///
/// ## Example
///
/// ```
/// use propnet_ggp::circuit::CircuitBuilder;
/// use propnet_ggp::core::Term;
///
/// let mut b = CircuitBuilder::new();
/// let me = b.role("me");
/// let done = b.base(Term::atom("done"));
/// let init = b.init();
/// let press = b.input(me, Term::atom("press"));
/// let not_init = b.not(init);
/// let pressed = b.and([press, not_init]);
/// b.next(done, pressed);
/// let always = b.constant(true);
/// b.legal(me, Term::atom("press"), always);
/// b.goal(me, 100, done);
/// b.terminal(done);
///
/// let circuit = b.build().unwrap();
/// assert_eq!(circuit.base_propositions().len(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct CircuitBuilder {
    nodes: Vec<Node>,
    roles: Vec<Role>,
    base: Vec<CompId>,
    inputs: Vec<CompId>,
    init: Option<CompId>,
    terminal: Option<CompId>,
    legals: Vec<Vec<CompId>>,
    goals: Vec<Vec<CompId>>,
    duplicate_role: Option<Role>,
}

impl CircuitBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a role. Roles are indexed in declaration order.
    pub fn role(&mut self, name: impl AsRef<str>) -> RoleIndex {
        let role = Role::new(name);
        if let Some(pos) = self.roles.iter().position(|r| *r == role) {
            self.duplicate_role.get_or_insert(role);
            return RoleIndex::new(pos as u8);
        }
        assert!(self.roles.len() < 255, "At most 255 roles supported");
        self.roles.push(role);
        self.legals.push(Vec::new());
        self.goals.push(Vec::new());
        RoleIndex::new((self.roles.len() - 1) as u8)
    }

    /// Add a base proposition named by `fact`.
    pub fn base(&mut self, fact: Term) -> CompId {
        let id = self.proposition(fact, PropKind::Base);
        self.base.push(id);
        id
    }

    /// Add the action proposition `(does role mv)`.
    pub fn input(&mut self, role: RoleIndex, mv: impl Into<Move>) -> CompId {
        let name = Term::compound("does", [self.role_term(role), mv.into().0]);
        let id = self.proposition(name, PropKind::Input);
        self.inputs.push(id);
        id
    }

    /// Add the init proposition. Calling twice returns the same component.
    pub fn init(&mut self) -> CompId {
        if let Some(id) = self.init {
            return id;
        }
        let id = self.proposition(Term::atom("init"), PropKind::Init);
        self.init = Some(id);
        id
    }

    pub fn and(&mut self, inputs: impl IntoIterator<Item = CompId>) -> CompId {
        self.gate(NodeKind::And, inputs)
    }

    pub fn or(&mut self, inputs: impl IntoIterator<Item = CompId>) -> CompId {
        self.gate(NodeKind::Or, inputs)
    }

    pub fn not(&mut self, input: CompId) -> CompId {
        self.gate(NodeKind::Not, [input])
    }

    pub fn constant(&mut self, value: bool) -> CompId {
        self.push(Node::new(NodeKind::Constant(value)))
    }

    /// Add a derived proposition named `name` reading `input`.
    pub fn derived(&mut self, name: Term, input: CompId) -> CompId {
        let id = self.proposition(name, PropKind::Derived);
        self.connect(input, id);
        id
    }

    /// Add the legal proposition `(legal role mv)` reading `input`.
    pub fn legal(&mut self, role: RoleIndex, mv: impl Into<Move>, input: CompId) -> CompId {
        let name = Term::compound("legal", [self.role_term(role), mv.into().0]);
        let id = self.derived(name, input);
        self.legals[role.index()].push(id);
        id
    }

    /// Add the goal proposition `(goal role value)` reading `input`.
    pub fn goal(&mut self, role: RoleIndex, value: u32, input: CompId) -> CompId {
        self.goal_with_term(role, Term::int(value), input)
    }

    /// Add a goal proposition with an arbitrary value term.
    ///
    /// Non-integer values are accepted here and rejected at compile time.
    pub fn goal_with_term(&mut self, role: RoleIndex, value: Term, input: CompId) -> CompId {
        let name = Term::compound("goal", [self.role_term(role), value]);
        let id = self.derived(name, input);
        self.goals[role.index()].push(id);
        id
    }

    /// Add the terminal proposition reading `input`.
    pub fn terminal(&mut self, input: CompId) -> CompId {
        let id = self.derived(Term::atom("terminal"), input);
        self.terminal = Some(id);
        id
    }

    /// Feed `base` through a transition from `input`.
    pub fn next(&mut self, base: CompId, input: CompId) -> CompId {
        let transition = self.push(Node::new(NodeKind::Transition));
        self.connect(input, transition);
        self.connect(transition, base);
        transition
    }

    /// Wire `from` into `to`. Exposed for hand-built malformed circuits;
    /// out-of-range ids are kept on the other end and reported by `build`.
    pub fn connect(&mut self, from: CompId, to: CompId) {
        if let Some(node) = self.nodes.get_mut(to.index()) {
            node.inputs.push(from);
        }
        if let Some(node) = self.nodes.get_mut(from.index()) {
            node.outputs.push(to);
        }
    }

    /// Number of components added so far.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Finish and validate the circuit.
    pub fn build(self) -> Result<Circuit, BuildError> {
        if let Some(role) = self.duplicate_role {
            return Err(BuildError::DuplicateRole { role });
        }
        let roles = RoleMap::from_vec(self.roles).ok_or(BuildError::NoRoles)?;
        let legals = RoleMap::from_vec(self.legals).ok_or(BuildError::NoRoles)?;
        let goals = RoleMap::from_vec(self.goals).ok_or(BuildError::NoRoles)?;

        let circuit = Circuit {
            nodes: self.nodes,
            roles,
            base: self.base,
            inputs: self.inputs,
            init: self.init.unwrap_or(CompId::NONE),
            terminal: self.terminal.unwrap_or(CompId::NONE),
            legals,
            goals,
        };
        circuit.validate()?;
        Ok(circuit)
    }

    fn role_term(&self, role: RoleIndex) -> Term {
        self.roles[role.index()].term().clone()
    }

    fn proposition(&mut self, name: Term, kind: PropKind) -> CompId {
        self.push(Node::new(NodeKind::Proposition { name, kind }))
    }

    fn gate(&mut self, kind: NodeKind, inputs: impl IntoIterator<Item = CompId>) -> CompId {
        let id = self.push(Node::new(kind));
        for input in inputs {
            self.connect(input, id);
        }
        id
    }

    fn push(&mut self, node: Node) -> CompId {
        let id = CompId::new(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }
}
