pub mod formatter;

use crate::expression::Expression;
use crate::symbol::{SymbolError, SymbolTable};
use crate::value::SemanticType;
use compact_str::CompactString;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperatorRef(pub u32);

/// One guarded branch of a conditional. The first arm is the `if` itself,
/// the remaining arms are its `else if` chain.
#[derive(Debug, Clone)]
pub struct ConditionalArm {
    pub condition: Expression,
    pub block: OperatorRef,
}

#[derive(Debug, Clone)]
pub struct FunctionOperator {
    pub name: CompactString,
    pub return_type: Option<SemanticType>,
    pub body: OperatorRef,
}

#[derive(Debug, Clone)]
pub struct MethodFunctionOperator {
    pub name: CompactString,
    pub class_parameter: CompactString,
    pub return_type: Option<SemanticType>,
    pub body: OperatorRef,
}

#[derive(Debug, Clone)]
pub enum OperatorKind {
    Module {
        name: CompactString,
    },
    Block,
    If {
        arms: Vec<ConditionalArm>,
        otherwise: Option<OperatorRef>,
    },
    While {
        condition: Expression,
        body: OperatorRef,
    },
    VariableDeclaration {
        semantic_type: SemanticType,
        name: CompactString,
        initializer: Option<Expression>,
    },
    Let {
        name: CompactString,
        value: Expression,
    },
    Input {
        name: CompactString,
    },
    Output {
        expression: Expression,
    },
    Function(FunctionOperator),
    MethodFunction(MethodFunctionOperator),
    Class {
        name: CompactString,
        methods: Vec<OperatorRef>,
    },
    Return {
        expression: Expression,
    },
}

/// A statement-level node. The child/sibling pair is the tree's sole
/// structural mechanism; there is no statement list container.
#[derive(Debug)]
pub struct OperatorNode {
    pub kind: OperatorKind,
    pub first_child: Option<OperatorRef>,
    pub next_sibling: Option<OperatorRef>,
}

#[derive(Debug)]
pub struct SemanticTree {
    nodes: Vec<OperatorNode>,
    root: Option<OperatorRef>,
    functions: SymbolTable<OperatorRef>,
    classes: SymbolTable<OperatorRef>,
}

impl SemanticTree {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
            functions: SymbolTable::new(),
            classes: SymbolTable::new(),
        }
    }

    /// The single structural primitive: the new operator becomes either the
    /// child of `previous` or the sibling following it. Without a previous
    /// operator the node anchors the tree, or stays detached when an anchor
    /// already exists (nested blocks are threaded this way).
    pub fn insert(
        &mut self,
        previous: Option<OperatorRef>,
        kind: OperatorKind,
        as_child: bool,
    ) -> OperatorRef {
        self.nodes.push(OperatorNode {
            kind,
            first_child: None,
            next_sibling: None,
        });
        let operator = OperatorRef(self.nodes.len() as u32 - 1);
        match previous {
            Some(previous) => {
                let previous = &mut self.nodes[previous.0 as usize];
                if as_child {
                    previous.first_child = Some(operator);
                } else {
                    previous.next_sibling = Some(operator);
                }
            }
            None => {
                if self.root.is_none() {
                    self.root = Some(operator);
                }
            }
        }
        operator
    }

    pub fn root(&self) -> Option<OperatorRef> {
        self.root
    }

    pub fn get(&self, operator: OperatorRef) -> Option<&OperatorNode> {
        self.nodes.get(operator.0 as usize)
    }

    pub fn has_child(&self, operator: OperatorRef) -> bool {
        self.get(operator)
            .map(|node| node.first_child.is_some())
            .unwrap_or(false)
    }

    pub fn functions(&self) -> &SymbolTable<OperatorRef> {
        &self.functions
    }

    pub fn classes(&self) -> &SymbolTable<OperatorRef> {
        &self.classes
    }

    pub(crate) fn declare_function(
        &mut self,
        name: &str,
        operator: OperatorRef,
    ) -> Result<(), SymbolError> {
        self.functions.declare(name, operator)
    }

    pub(crate) fn declare_class(
        &mut self,
        name: &str,
        operator: OperatorRef,
    ) -> Result<(), SymbolError> {
        self.classes.declare(name, operator)
    }

    /// Resolves a call target: plain functions first, then class method
    /// functions in declaration order.
    pub fn find_callable(&self, name: &str) -> Option<OperatorRef> {
        if let Ok(function) = self.functions.lookup(name) {
            return Some(*function);
        }
        for (_, class) in self.classes.iter() {
            let Some(node) = self.get(*class) else {
                continue;
            };
            let OperatorKind::Class { methods, .. } = &node.kind else {
                continue;
            };
            for method in methods {
                if let Some(node) = self.get(*method) {
                    if let OperatorKind::MethodFunction(function) = &node.kind {
                        if function.name == name {
                            return Some(*method);
                        }
                    }
                }
            }
        }
        None
    }
}

impl Default for SemanticTree {
    fn default() -> Self {
        Self::new()
    }
}
