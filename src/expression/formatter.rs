use super::{Expression, ExpressionNode, ExpressionNodeRef};

pub trait ExpressionFormatter {
    fn format(&self, expression: &Expression) -> String;
}

pub struct DebugFormatter;

impl ExpressionFormatter for DebugFormatter {
    fn format(&self, expression: &Expression) -> String {
        format!("{expression:?}")
    }
}

pub struct SExpressionFormatter;

impl SExpressionFormatter {
    fn format_node(expression: &Expression, node: ExpressionNodeRef) -> String {
        let current = expression
            .get_node(node)
            .expect("Node refs always come from the same tree.");
        match current {
            ExpressionNode::Literal(value) => format!("{value}"),
            ExpressionNode::Variable(name) => format!("{name}"),
            ExpressionNode::Call(name) => format!("(call {name})"),
            ExpressionNode::Unary { operator, rhs } => {
                format!("({operator} {})", Self::format_node(expression, *rhs))
            }
            ExpressionNode::Binary { operator, lhs, rhs } => format!(
                "({operator} {} {})",
                Self::format_node(expression, *lhs),
                Self::format_node(expression, *rhs)
            ),
            ExpressionNode::Conditional { operator, lhs, rhs } => format!(
                "({operator} {} {})",
                Self::format_node(expression, *lhs),
                Self::format_node(expression, *rhs)
            ),
        }
    }
}

impl ExpressionFormatter for SExpressionFormatter {
    fn format(&self, expression: &Expression) -> String {
        Self::format_node(expression, expression.get_root_ref())
    }
}
