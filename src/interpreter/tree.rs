use super::error::RuntimeError;
use super::{ProgramState, SystemContext};
use crate::expression::{
    BinaryOperator, ConditionalOperator, Expression, ExpressionNode, ExpressionNodeRef,
    UnaryOperator,
};
use crate::symbol::{ScopeStack, SymbolError, Variable};
use crate::tree::{ConditionalArm, OperatorKind, OperatorRef, SemanticTree};
use crate::value::{SemanticType, Value, ValueError, ValueKind};
use compact_str::{CompactString, CompactStringExt};

const NODE_MSG: &str = "Operator refs always come from the executed tree.";

pub struct TreeWalkInterpreter<C: SystemContext> {
    scopes: ScopeStack,
    context: C,
}

impl<C> TreeWalkInterpreter<C>
where
    C: SystemContext,
{
    pub fn new(context: C) -> Self {
        Self {
            scopes: ScopeStack::new(),
            context,
        }
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn into_context(self) -> C {
        self.context
    }

    pub fn scopes(&self) -> &ScopeStack {
        &self.scopes
    }

    pub fn run(&mut self, tree: &SemanticTree) -> Result<(), RuntimeError> {
        self.execute_chain(tree, tree.root())?;
        Ok(())
    }
}

// Statement execution
impl<C> TreeWalkInterpreter<C>
where
    C: SystemContext,
{
    fn execute_chain(
        &mut self,
        tree: &SemanticTree,
        start: Option<OperatorRef>,
    ) -> Result<ProgramState, RuntimeError> {
        let mut cursor = start;
        while let Some(operator) = cursor {
            match self.execute_operator(tree, operator)? {
                ProgramState::Run => {}
                state => return Ok(state),
            }
            cursor = tree.get(operator).expect(NODE_MSG).next_sibling;
        }
        Ok(ProgramState::Run)
    }

    fn execute_operator(
        &mut self,
        tree: &SemanticTree,
        operator: OperatorRef,
    ) -> Result<ProgramState, RuntimeError> {
        let node = tree.get(operator).expect(NODE_MSG);
        match &node.kind {
            OperatorKind::Module { .. } => self.execute_module(tree, node.first_child),
            OperatorKind::Block => self.execute_chain(tree, node.first_child),
            OperatorKind::If { arms, otherwise } => self.execute_if(tree, arms, *otherwise),
            OperatorKind::While { condition, body } => self.execute_while(tree, condition, *body),
            OperatorKind::VariableDeclaration {
                semantic_type,
                name,
                initializer,
            } => self.execute_variable_declaration(tree, *semantic_type, name, initializer),
            OperatorKind::Let { name, value } => self.execute_let(tree, name, value),
            OperatorKind::Input { name } => self.execute_input(name),
            OperatorKind::Output { expression } => self.execute_output(tree, expression),
            // Functions and classes are registered while parsing; walking
            // over their declarations does nothing.
            OperatorKind::Function(_)
            | OperatorKind::MethodFunction(_)
            | OperatorKind::Class { .. } => Ok(ProgramState::Run),
            OperatorKind::Return { expression } => {
                let value = self.evaluate(tree, expression)?;
                Ok(ProgramState::Return(value))
            }
        }
    }

    /// A module is a pure container: its declarations were registered at
    /// parse time, executing it just runs its block inside a fresh frame.
    fn execute_module(
        &mut self,
        tree: &SemanticTree,
        child: Option<OperatorRef>,
    ) -> Result<ProgramState, RuntimeError> {
        self.scopes.push_frame();
        let result = self.execute_chain(tree, child);
        self.scopes.pop_frame();
        result
    }

    fn execute_if(
        &mut self,
        tree: &SemanticTree,
        arms: &[ConditionalArm],
        otherwise: Option<OperatorRef>,
    ) -> Result<ProgramState, RuntimeError> {
        for arm in arms {
            if self.evaluate(tree, &arm.condition)?.as_integer()? != 0 {
                return self.execute_operator(tree, arm.block);
            }
        }
        match otherwise {
            Some(block) => self.execute_operator(tree, block),
            None => Ok(ProgramState::Run),
        }
    }

    fn execute_while(
        &mut self,
        tree: &SemanticTree,
        condition: &Expression,
        body: OperatorRef,
    ) -> Result<ProgramState, RuntimeError> {
        while self.evaluate(tree, condition)?.as_integer()? != 0 {
            match self.execute_operator(tree, body)? {
                ProgramState::Run => {}
                state => return Ok(state),
            }
        }
        Ok(ProgramState::Run)
    }

    fn execute_variable_declaration(
        &mut self,
        tree: &SemanticTree,
        semantic_type: SemanticType,
        name: &CompactString,
        initializer: &Option<Expression>,
    ) -> Result<ProgramState, RuntimeError> {
        let expression = match initializer {
            Some(initializer) => {
                let value = self.evaluate(tree, initializer)?;
                Some(Expression::from_value(value))
            }
            None => None,
        };
        self.scopes.declare(
            name,
            Variable {
                semantic_type,
                name: name.clone(),
                expression,
            },
        )?;
        Ok(ProgramState::Run)
    }

    fn execute_let(
        &mut self,
        tree: &SemanticTree,
        name: &CompactString,
        value: &Expression,
    ) -> Result<ProgramState, RuntimeError> {
        let value = self.evaluate(tree, value)?;
        self.scopes.rebind(name, Expression::from_value(value))?;
        Ok(ProgramState::Run)
    }

    fn execute_input(&mut self, name: &CompactString) -> Result<ProgramState, RuntimeError> {
        let semantic_type = self.scopes.lookup(name)?.semantic_type;
        let line = self.context.readln().ok_or(RuntimeError::InputExhausted)?;
        let value = Value::from_text(semantic_type, line.trim())?;
        self.scopes.rebind(name, Expression::from_value(value))?;
        Ok(ProgramState::Run)
    }

    fn execute_output(
        &mut self,
        tree: &SemanticTree,
        expression: &Expression,
    ) -> Result<ProgramState, RuntimeError> {
        let value = self.evaluate(tree, expression)?;
        self.context.writeln(&format!("{value}"));
        Ok(ProgramState::Run)
    }

    /// Runs the body of a function or method function in its own frame.
    /// The frame is torn down even when the body fails, and the failure is
    /// wrapped so callers learn which function failed without losing the
    /// underlying cause.
    fn call_function(
        &mut self,
        tree: &SemanticTree,
        callee: OperatorRef,
    ) -> Result<Option<Value>, RuntimeError> {
        let node = tree.get(callee).expect(NODE_MSG);
        let (name, return_type, body) = match &node.kind {
            OperatorKind::Function(function) => {
                (&function.name, function.return_type, function.body)
            }
            OperatorKind::MethodFunction(function) => {
                (&function.name, function.return_type, function.body)
            }
            _ => unreachable!("Callables resolve to function operators only."),
        };

        self.scopes.push_frame();
        let outcome = self.execute_operator(tree, body);
        self.scopes.pop_frame();

        match outcome {
            Ok(ProgramState::Return(value)) => Ok(Some(value)),
            Ok(ProgramState::Run) => {
                if return_type.is_some() {
                    Err(RuntimeError::MissingReturn(name.clone()))
                } else {
                    Ok(None)
                }
            }
            Err(cause) => Err(RuntimeError::Execution {
                name: name.clone(),
                cause: Box::new(cause),
            }),
        }
    }
}

// Expression evaluation
impl<C> TreeWalkInterpreter<C>
where
    C: SystemContext,
{
    pub fn evaluate(
        &mut self,
        tree: &SemanticTree,
        expression: &Expression,
    ) -> Result<Value, RuntimeError> {
        self.evaluate_node(tree, expression, expression.get_root_ref())
    }

    fn evaluate_node(
        &mut self,
        tree: &SemanticTree,
        expression: &Expression,
        node: ExpressionNodeRef,
    ) -> Result<Value, RuntimeError> {
        let current = expression
            .get_node(node)
            .expect("Node refs always come from the same tree.");
        match current {
            ExpressionNode::Literal(value) => Ok(value.clone()),
            ExpressionNode::Variable(name) => {
                let bound = self.scopes.lookup(name)?.expression.clone();
                match bound {
                    Some(bound) => self.evaluate(tree, &bound),
                    None => Err(RuntimeError::Unbound(name.clone())),
                }
            }
            ExpressionNode::Call(name) => {
                let callee = tree
                    .find_callable(name)
                    .ok_or_else(|| RuntimeError::Symbol(SymbolError::Undefined(name.clone())))?;
                let value = self.call_function(tree, callee)?;
                value.ok_or_else(|| RuntimeError::MissingReturn(name.clone()))
            }
            ExpressionNode::Unary { operator, rhs } => {
                let rhs = self.evaluate_node(tree, expression, *rhs)?;
                evaluate_unary(*operator, &rhs)
            }
            ExpressionNode::Binary { operator, lhs, rhs } => {
                let lhs = self.evaluate_node(tree, expression, *lhs)?;
                let rhs = self.evaluate_node(tree, expression, *rhs)?;
                evaluate_binary(*operator, &lhs, &rhs)
            }
            ExpressionNode::Conditional { operator, lhs, rhs } => {
                let lhs = self.evaluate_node(tree, expression, *lhs)?;
                let rhs = self.evaluate_node(tree, expression, *rhs)?;
                evaluate_conditional(*operator, &lhs, &rhs)
            }
        }
    }
}

fn evaluate_unary(operator: UnaryOperator, rhs: &Value) -> Result<Value, RuntimeError> {
    match operator {
        UnaryOperator::Negate => match rhs {
            Value::Integer(v) => Ok(Value::Integer(v.wrapping_neg())),
            Value::Real(v) => Ok(Value::Real(-v)),
            other => Err(ValueError::TypeConversion {
                from: other.kind(),
                to: ValueKind::Real,
            }
            .into()),
        },
    }
}

fn evaluate_binary(
    operator: BinaryOperator,
    lhs: &Value,
    rhs: &Value,
) -> Result<Value, RuntimeError> {
    // A string on either side of `+` concatenates.
    if matches!(operator, BinaryOperator::Add)
        && (lhs.kind() == ValueKind::String || rhs.kind() == ValueKind::String)
    {
        return Ok(Value::String(
            [lhs.as_string(), rhs.as_string()].concat_compact(),
        ));
    }

    if lhs.kind() == ValueKind::Real || rhs.kind() == ValueKind::Real {
        let lhs = lhs.as_real()?;
        let rhs = rhs.as_real()?;
        let result = match operator {
            BinaryOperator::Add => lhs + rhs,
            BinaryOperator::Subtract => lhs - rhs,
            BinaryOperator::Multiply => lhs * rhs,
            BinaryOperator::Divide => lhs / rhs,
        };
        return Ok(Value::Real(result));
    }

    let lhs = lhs.as_integer()?;
    let rhs = rhs.as_integer()?;
    let result = match operator {
        BinaryOperator::Add => lhs.wrapping_add(rhs),
        BinaryOperator::Subtract => lhs.wrapping_sub(rhs),
        BinaryOperator::Multiply => lhs.wrapping_mul(rhs),
        BinaryOperator::Divide => {
            if rhs == 0 {
                return Err(RuntimeError::DivisionByZero);
            }
            lhs.wrapping_div(rhs)
        }
    };
    Ok(Value::Integer(result))
}

fn evaluate_conditional(
    operator: ConditionalOperator,
    lhs: &Value,
    rhs: &Value,
) -> Result<Value, RuntimeError> {
    let result = match operator {
        ConditionalOperator::And => lhs.as_boolean()? && rhs.as_boolean()?,
        ConditionalOperator::Or => lhs.as_boolean()? || rhs.as_boolean()?,
        ConditionalOperator::Equal | ConditionalOperator::NotEqual => {
            // Both sides compare in the same representation: as strings
            // when a string participates, as reals otherwise.
            let equal = if lhs.kind() == ValueKind::String || rhs.kind() == ValueKind::String {
                lhs.as_string() == rhs.as_string()
            } else {
                lhs.as_real()? == rhs.as_real()?
            };
            match operator {
                ConditionalOperator::Equal => equal,
                _ => !equal,
            }
        }
        ConditionalOperator::Less
        | ConditionalOperator::LessOrEqual
        | ConditionalOperator::Greater
        | ConditionalOperator::GreaterOrEqual => {
            let lhs = lhs.as_real()?;
            let rhs = rhs.as_real()?;
            match operator {
                ConditionalOperator::Less => lhs < rhs,
                ConditionalOperator::LessOrEqual => lhs <= rhs,
                ConditionalOperator::Greater => lhs > rhs,
                _ => lhs >= rhs,
            }
        }
    };
    Ok(Value::Boolean(result))
}
