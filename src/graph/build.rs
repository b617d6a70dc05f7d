use crate::{
    graph::{Edge, Graph, Node, NodeId, NodeKind, Role},
    syntax::{Builtins, Expression},
};
use smol_str::SmolStr;

/// Lower an [`Expression`] tree into a [`Graph`], treating the default
/// [`Builtins`] constants (`e`, `pi`) as constants.
pub fn build(expr: Expression) -> Graph { build_with(expr, &Builtins::default()) }

/// Lower an [`Expression`] tree into a [`Graph`].
///
/// Node ids are handed out in pre-order, so building the same tree twice
/// always gives the same graph. The tree is taken apart with an explicit
/// stack rather than recursion, so arbitrarily deep expressions are fine.
pub fn build_with(expr: Expression, builtins: &Builtins<'_>) -> Graph {
    let mut nodes = Vec::new();
    let mut edges = Vec::new();
    let mut pending: Vec<(Expression, Option<(NodeId, Role)>)> =
        vec![(expr, None)];

    while let Some((expr, parent)) = pending.pop() {
        let id = NodeId::new(nodes.len());

        if let Some((parent, role)) = parent {
            edges.push(Edge::new(parent, id, role));
        }

        let Lowered {
            kind,
            label,
            children,
        } = lower(expr, builtins);
        nodes.push(Node::new(id, kind, label));

        // reversed so the first operand is popped (and numbered) first
        pending.extend(
            children
                .into_iter()
                .rev()
                .map(|(role, child)| (child, Some((id, role)))),
        );
    }

    log::trace!(
        "Built a graph with {} nodes and {} edges",
        nodes.len(),
        edges.len()
    );

    Graph::from_parts(nodes, edges)
}

struct Lowered {
    kind: NodeKind,
    label: SmolStr,
    children: Vec<(Role, Expression)>,
}

impl Lowered {
    fn leaf(kind: NodeKind, label: SmolStr) -> Self {
        Lowered {
            kind,
            label,
            children: Vec::new(),
        }
    }
}

fn lower(expr: Expression, builtins: &Builtins<'_>) -> Lowered {
    match expr {
        Expression::Constant(literal) => {
            Lowered::leaf(NodeKind::Constant, literal)
        },
        Expression::Variable(name) => {
            if builtins.is_constant(&name) {
                Lowered::leaf(NodeKind::Constant, name)
            } else {
                Lowered::leaf(NodeKind::Variable, name)
            }
        },
        Expression::Negate(operand) => Lowered {
            kind: NodeKind::Operator,
            label: SmolStr::new("-"),
            children: vec![(Role::Operand, *operand)],
        },
        Expression::Binary { left, right, op } => Lowered {
            kind: NodeKind::Operator,
            label: SmolStr::new(op.symbol()),
            children: vec![(Role::Left, *left), (Role::Right, *right)],
        },
        Expression::Call {
            function,
            arguments,
        } => Lowered {
            kind: NodeKind::Function,
            label: function,
            children: arguments
                .into_iter()
                .enumerate()
                .map(|(i, argument)| (Role::Argument(i), argument))
                .collect(),
        },
        Expression::Equation { left, right } => Lowered {
            kind: NodeKind::Equation,
            label: SmolStr::new("="),
            children: vec![(Role::Lhs, *left), (Role::Rhs, *right)],
        },
    }
}
