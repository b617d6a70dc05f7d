use serde::{Serialize, Serializer};
use smol_str::SmolStr;
use std::{
    collections::BTreeSet,
    fmt::{self, Display, Formatter},
};

/// A handle to a [`Node`] in a [`Graph`].
///
/// Ids are dense and handed out in pre-order, so the root is always
/// `NodeId(0)` and a parent always comes before its children.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) const fn new(index: usize) -> Self { NodeId(index) }

    pub const fn index(self) -> usize { self.0 }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What sort of thing a [`Node`] represents.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Variable,
    Constant,
    Operator,
    Function,
    Equation,
}

impl NodeKind {
    pub const ALL: [NodeKind; 5] = [
        NodeKind::Variable,
        NodeKind::Constant,
        NodeKind::Operator,
        NodeKind::Function,
        NodeKind::Equation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Variable => "variable",
            NodeKind::Constant => "constant",
            NodeKind::Operator => "operator",
            NodeKind::Function => "function",
            NodeKind::Equation => "equation",
        }
    }
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    id: NodeId,
    #[serde(rename = "type")]
    kind: NodeKind,
    label: SmolStr,
}

impl Node {
    pub(crate) fn new(id: NodeId, kind: NodeKind, label: SmolStr) -> Self {
        Node { id, kind, label }
    }

    pub fn id(&self) -> NodeId { self.id }

    pub fn kind(&self) -> NodeKind { self.kind }

    /// The text used when displaying this node (a variable name, the
    /// literal as written, an operator symbol, or a function name).
    pub fn label(&self) -> &str { &self.label }
}

/// The position a child occupies under its parent.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    Left,
    Right,
    /// The operand of a negation.
    Operand,
    /// The n'th argument of a function call.
    Argument(usize),
    Lhs,
    Rhs,
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Role::Left => write!(f, "left"),
            Role::Right => write!(f, "right"),
            Role::Operand => write!(f, "operand"),
            Role::Argument(n) => write!(f, "arg{}", n),
            Role::Lhs => write!(f, "lhs"),
            Role::Rhs => write!(f, "rhs"),
        }
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    parent: NodeId,
    child: NodeId,
    role: Role,
}

impl Edge {
    pub(crate) fn new(parent: NodeId, child: NodeId, role: Role) -> Self {
        Edge {
            parent,
            child,
            role,
        }
    }

    pub fn parent(&self) -> NodeId { self.parent }

    pub fn child(&self) -> NodeId { self.child }

    pub fn role(&self) -> Role { self.role }
}

/// The finished, immutable graph for a single equation.
///
/// The graph is always a rooted tree: one root, and every other node has
/// exactly one incoming [`Edge`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    root: NodeId,
    /// For each node, the indices of its outgoing edges in operand order.
    #[serde(skip)]
    children: Vec<Vec<usize>>,
    /// For each node, the index of its incoming edge.
    #[serde(skip)]
    parents: Vec<Option<usize>>,
    #[serde(skip)]
    depths: Vec<usize>,
}

impl Graph {
    /// Assemble a graph from nodes in pre-order and edges whose parent
    /// always precedes their child. Siblings must already be in operand
    /// order.
    pub(crate) fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        debug_assert!(!nodes.is_empty(), "Every graph has a root");
        debug_assert_eq!(edges.len() + 1, nodes.len());

        let mut children = vec![Vec::new(); nodes.len()];
        let mut parents = vec![None; nodes.len()];

        for (index, edge) in edges.iter().enumerate() {
            debug_assert!(edge.parent < edge.child);
            children[edge.parent.index()].push(index);
            parents[edge.child.index()] = Some(index);
        }

        // parents always come first, so one pass is enough
        let mut depths = vec![0; nodes.len()];
        for edge in &edges {
            depths[edge.child.index()] = depths[edge.parent.index()] + 1;
        }

        Graph {
            nodes,
            edges,
            root: NodeId::new(0),
            children,
            parents,
            depths,
        }
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }

    pub fn edge_count(&self) -> usize { self.edges.len() }

    pub fn root(&self) -> &Node { &self.nodes[self.root.index()] }

    pub fn node(&self, id: NodeId) -> Option<&Node> { self.nodes.get(id.index()) }

    /// Every node, in pre-order.
    pub fn nodes(&self) -> &[Node] { &self.nodes }

    pub fn edges(&self) -> &[Edge] { &self.edges }

    /// Lazily iterate over every node of a particular kind, in pre-order.
    ///
    /// The iterator can be cloned to restart it.
    pub fn nodes_of_type(
        &self,
        kind: NodeKind,
    ) -> impl Iterator<Item = &Node> + Clone + '_ {
        self.nodes.iter().filter(move |node| node.kind == kind)
    }

    /// The children of a node in operand order, tagged with the role they
    /// play. Unknown ids have no children.
    pub fn children_of(
        &self,
        id: NodeId,
    ) -> impl ExactSizeIterator<Item = (Role, &Node)> + Clone + '_ {
        let outgoing = self
            .children
            .get(id.index())
            .map(|edges| edges.as_slice())
            .unwrap_or(&[]);

        outgoing.iter().map(move |&index| {
            let edge = &self.edges[index];
            (edge.role, &self.nodes[edge.child.index()])
        })
    }

    /// The node's parent and the role the node plays under it, or `None`
    /// for the root (or an unknown id).
    pub fn parent_of(&self, id: NodeId) -> Option<(Role, &Node)> {
        let index = (*self.parents.get(id.index())?)?;
        let edge = &self.edges[index];

        Some((edge.role, &self.nodes[edge.parent.index()]))
    }

    /// How many edges lie between the root and this node.
    pub fn depth_of(&self, id: NodeId) -> Option<usize> {
        self.depths.get(id.index()).copied()
    }

    /// The length of the longest path from the root to a leaf.
    pub fn depth(&self) -> usize {
        self.depths.iter().copied().max().unwrap_or(0)
    }

    /// The distinct variable names, in sorted order.
    pub fn variables(&self) -> BTreeSet<&str> {
        self.nodes_of_type(NodeKind::Variable)
            .map(Node::label)
            .collect()
    }

    pub fn statistics(&self) -> Statistics {
        let count = |kind| self.nodes_of_type(kind).count();

        Statistics {
            nodes: self.node_count(),
            edges: self.edge_count(),
            depth: self.depth(),
            variables: count(NodeKind::Variable),
            constants: count(NodeKind::Constant),
            operators: count(NodeKind::Operator),
            functions: count(NodeKind::Function),
            equations: count(NodeKind::Equation),
        }
    }
}

/// Renders the graph as an indented outline, one node per line.
impl Display for Graph {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for node in &self.nodes {
            let depth = self.depths[node.id.index()];
            write!(f, "{:indent$}", "", indent = depth * 2)?;

            if let Some((role, _)) = self.parent_of(node.id) {
                write!(f, "{}: ", role)?;
            }

            writeln!(f, "{} ({})", node.label, node.kind)?;
        }

        Ok(())
    }
}

/// A summary of a [`Graph`]'s size and shape.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub nodes: usize,
    pub edges: usize,
    pub depth: usize,
    pub variables: usize,
    pub constants: usize,
    pub operators: usize,
    pub functions: usize,
    pub equations: usize,
}

impl Statistics {
    pub fn count_of(&self, kind: NodeKind) -> usize {
        match kind {
            NodeKind::Variable => self.variables,
            NodeKind::Constant => self.constants,
            NodeKind::Operator => self.operators,
            NodeKind::Function => self.functions,
            NodeKind::Equation => self.equations,
        }
    }
}
