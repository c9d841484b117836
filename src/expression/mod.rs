pub mod formatter;

use crate::value::Value;
use compact_str::CompactString;
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpressionNodeRef(pub u32);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnaryOperator {
    Negate,
}

impl Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnaryOperator::Negate => write!(f, "-"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinaryOperator::Add => write!(f, "+"),
            BinaryOperator::Subtract => write!(f, "-"),
            BinaryOperator::Multiply => write!(f, "*"),
            BinaryOperator::Divide => write!(f, "/"),
        }
    }
}

/// Relational, equality and logical operators. They all evaluate to a
/// boolean value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConditionalOperator {
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
    Equal,
    NotEqual,
    And,
    Or,
}

impl Display for ConditionalOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConditionalOperator::Less => write!(f, "<"),
            ConditionalOperator::LessOrEqual => write!(f, "<="),
            ConditionalOperator::Greater => write!(f, ">"),
            ConditionalOperator::GreaterOrEqual => write!(f, ">="),
            ConditionalOperator::Equal => write!(f, "=="),
            ConditionalOperator::NotEqual => write!(f, "!="),
            ConditionalOperator::And => write!(f, "&&"),
            ConditionalOperator::Or => write!(f, "||"),
        }
    }
}

#[derive(Debug, Clone)]
pub enum ExpressionNode {
    Literal(Value),
    Variable(CompactString),
    Call(CompactString),
    Unary {
        operator: UnaryOperator,
        rhs: ExpressionNodeRef,
    },
    Binary {
        operator: BinaryOperator,
        lhs: ExpressionNodeRef,
        rhs: ExpressionNodeRef,
    },
    Conditional {
        operator: ConditionalOperator,
        lhs: ExpressionNodeRef,
        rhs: ExpressionNodeRef,
    },
}

/// An expression tree under construction. Nodes live in an arena and refer
/// to each other by index, so sub-expressions never own each other.
#[derive(Debug, Clone)]
pub struct IncompleteExpression {
    nodes: Vec<ExpressionNode>,
}

impl IncompleteExpression {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn push(&mut self, node: ExpressionNode) -> ExpressionNodeRef {
        self.nodes.push(node);
        ExpressionNodeRef(self.nodes.len() as u32 - 1)
    }

    pub fn get_node(&self, node: ExpressionNodeRef) -> Option<&ExpressionNode> {
        self.nodes.get(node.0 as usize)
    }
}

impl Default for IncompleteExpression {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct Expression {
    nodes: Vec<ExpressionNode>,
    root: ExpressionNodeRef,
}

impl Expression {
    pub fn new(tree: IncompleteExpression, root: ExpressionNodeRef) -> Option<Self> {
        if (root.0 as usize) < tree.nodes.len() {
            Some(Self {
                nodes: tree.nodes,
                root,
            })
        } else {
            None
        }
    }

    /// Wraps an already produced value, used when rebinding a variable to
    /// the result of an eager evaluation.
    pub fn from_value(value: Value) -> Self {
        Self {
            nodes: vec![ExpressionNode::Literal(value)],
            root: ExpressionNodeRef(0),
        }
    }

    pub fn get_root_ref(&self) -> ExpressionNodeRef {
        self.root
    }

    pub fn get_root(&self) -> &ExpressionNode {
        self.get_node(self.root)
            .expect("The root exists within the tree.")
    }

    pub fn get_node(&self, node: ExpressionNodeRef) -> Option<&ExpressionNode> {
        self.nodes.get(node.0 as usize)
    }
}
