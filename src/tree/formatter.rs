use super::{OperatorKind, OperatorRef, SemanticTree};

pub trait TreeFormatter {
    fn format(&self, tree: &SemanticTree) -> String;
}

pub struct DebugFormatter;

impl TreeFormatter for DebugFormatter {
    fn format(&self, tree: &SemanticTree) -> String {
        format!("{tree:#?}")
    }
}

/// Renders the operator tree as an indented outline, one operator per line.
pub struct OutlineFormatter;

impl OutlineFormatter {
    fn label(kind: &OperatorKind) -> String {
        match kind {
            OperatorKind::Module { name } => format!("module {name}"),
            OperatorKind::Block => "block".to_string(),
            OperatorKind::If { arms, .. } => format!("if ({} arms)", arms.len()),
            OperatorKind::While { .. } => "while".to_string(),
            OperatorKind::VariableDeclaration {
                semantic_type,
                name,
                ..
            } => format!("variable {name}: {semantic_type}"),
            OperatorKind::Let { name, .. } => format!("let {name}"),
            OperatorKind::Input { name } => format!("input {name}"),
            OperatorKind::Output { .. } => "output".to_string(),
            OperatorKind::Function(function) => format!("function {}", function.name),
            OperatorKind::MethodFunction(function) => format!(
                "method function {}.{}",
                function.class_parameter, function.name
            ),
            OperatorKind::Class { name, .. } => format!("class {name}"),
            OperatorKind::Return { .. } => "return".to_string(),
        }
    }

    fn format_chain(
        tree: &SemanticTree,
        start: Option<OperatorRef>,
        depth: usize,
        output: &mut String,
    ) {
        let mut cursor = start;
        while let Some(operator) = cursor {
            let Some(node) = tree.get(operator) else {
                return;
            };
            for _ in 0..depth {
                output.push_str("  ");
            }
            output.push_str(&Self::label(&node.kind));
            output.push('\n');
            match &node.kind {
                OperatorKind::While { body, .. } => {
                    Self::format_chain(tree, Some(*body), depth + 1, output);
                }
                OperatorKind::If { arms, otherwise } => {
                    for arm in arms {
                        Self::format_chain(tree, Some(arm.block), depth + 1, output);
                    }
                    if let Some(otherwise) = otherwise {
                        Self::format_chain(tree, Some(*otherwise), depth + 1, output);
                    }
                }
                OperatorKind::Function(function) => {
                    Self::format_chain(tree, Some(function.body), depth + 1, output);
                }
                OperatorKind::Class { methods, .. } => {
                    for method in methods {
                        Self::format_chain(tree, Some(*method), depth + 1, output);
                    }
                }
                OperatorKind::MethodFunction(function) => {
                    Self::format_chain(tree, Some(function.body), depth + 1, output);
                }
                _ => {}
            }
            Self::format_chain(tree, node.first_child, depth + 1, output);
            cursor = node.next_sibling;
        }
    }
}

impl TreeFormatter for OutlineFormatter {
    fn format(&self, tree: &SemanticTree) -> String {
        let mut output = String::new();
        Self::format_chain(tree, tree.root(), 0, &mut output);
        output
    }
}
