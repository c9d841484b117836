pub mod formatter;

use crate::expression::{
    BinaryOperator, ConditionalOperator, Expression, ExpressionNode, ExpressionNodeRef,
    IncompleteExpression, UnaryOperator,
};
use crate::symbol::{ScopeStack, SymbolError, Variable};
use crate::token::{Span, Token, TokenKind};
use crate::tree::{
    ConditionalArm, FunctionOperator, MethodFunctionOperator, OperatorKind, OperatorRef,
    SemanticTree,
};
use crate::value::{SemanticType, Value};
use compact_str::CompactString;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SyntaxErrorKind {
    #[error("Expected {expected} but found {actual} `{text}`")]
    UnexpectedToken {
        expected: TokenKind,
        actual: TokenKind,
        text: CompactString,
    },
    #[error("Expected an expression but found {0}")]
    NonExpression(TokenKind),
    #[error("Expected a statement but found {0}")]
    InvalidStatement(TokenKind),
    #[error("Found a statement outside of any module or block")]
    StatementOutsideBlock,
    #[error("The numeric literal `{0}` does not fit any numeric value")]
    InvalidNumericLiteral(CompactString),
    #[error("Unexpected end of the token stream")]
    UnexpectedEof,
    #[error(transparent)]
    Symbol(#[from] SymbolError),
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{kind}")]
pub struct ParserError {
    #[source]
    pub kind: SyntaxErrorKind,
    pub span: Span,
}

impl ParserError {
    pub fn code(&self) -> &'static str {
        match self.kind {
            SyntaxErrorKind::UnexpectedToken { .. } => "SX001",
            SyntaxErrorKind::NonExpression(_) => "SX002",
            SyntaxErrorKind::InvalidStatement(_) => "SX003",
            SyntaxErrorKind::StatementOutsideBlock => "SX004",
            SyntaxErrorKind::InvalidNumericLiteral(_) => "SX005",
            SyntaxErrorKind::UnexpectedEof => "SX006",
            SyntaxErrorKind::Symbol(SymbolError::Undefined(_)) => "SX007",
            SyntaxErrorKind::Symbol(SymbolError::Duplicate(_)) => "SX008",
        }
    }
}

/// Builds a semantic tree out of a finished token sequence. The parser
/// never reads source text itself; the lexer (or any other producer) hands
/// it the ordered tokens.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    end: Token,
    tree: SemanticTree,
    scopes: ScopeStack,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        let end = Token::end_of_stream(
            tokens
                .last()
                .map(|token| token.span.start + token.span.length)
                .unwrap_or(0),
        );
        Self {
            tokens,
            pos: 0,
            end,
            tree: SemanticTree::new(),
            scopes: ScopeStack::new(),
        }
    }

    fn get(&self, offset: usize) -> &Token {
        self.tokens.get(self.pos + offset).unwrap_or(&self.end)
    }

    pub fn peek_kind(&self) -> TokenKind {
        self.get(0).kind
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.get(0).kind == kind {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: TokenKind) -> Result<Token, ParserError> {
        let current = self.get(0).clone();
        if current.kind != expected {
            return Err(ParserError {
                kind: SyntaxErrorKind::UnexpectedToken {
                    expected,
                    actual: current.kind,
                    text: current.text,
                },
                span: current.span,
            });
        }
        self.pos += 1;
        Ok(current)
    }
}

// Statement parsing. The open-block stack and the last emitted operator
// drive where each new operator lands: the first statement of an open block
// becomes its child, every later one the sibling of its predecessor.
impl Parser {
    pub fn parse(mut self) -> Result<SemanticTree, ParserError> {
        let mut open_blocks: Vec<OperatorRef> = Vec::new();
        let mut last: Option<OperatorRef> = None;

        while !self.eat(TokenKind::Eof) {
            if self.eat(TokenKind::KeywordEnd) {
                self.eat(TokenKind::Dot);
                break;
            }

            let previous = last;
            let span = self.get(0).span;
            let kind = self.parse_operator()?;
            let (as_child, opens_block) = match &kind {
                OperatorKind::Module { .. } => (false, true),
                OperatorKind::Block => {
                    let closed = open_blocks.pop().ok_or(ParserError {
                        kind: SyntaxErrorKind::StatementOutsideBlock,
                        span,
                    })?;
                    (!self.tree.has_child(closed), true)
                }
                _ => {
                    let open = *open_blocks.last().ok_or(ParserError {
                        kind: SyntaxErrorKind::StatementOutsideBlock,
                        span,
                    })?;
                    (!self.tree.has_child(open), false)
                }
            };

            let operator = self.tree.insert(previous, kind, as_child);
            self.register_declaration(operator, span)?;
            if opens_block {
                open_blocks.push(operator);
            }
            last = Some(operator);
        }

        Ok(self.tree)
    }

    fn parse_operator(&mut self) -> Result<OperatorKind, ParserError> {
        if self.eat(TokenKind::KeywordModule) {
            return self.parse_module();
        }
        if self.eat(TokenKind::KeywordBegin) {
            return Ok(OperatorKind::Block);
        }
        if self.eat(TokenKind::KeywordWhile) {
            return self.parse_while();
        }
        if self.eat(TokenKind::KeywordVariable) {
            return self.parse_variable();
        }
        if self.eat(TokenKind::KeywordLet) {
            return self.parse_let();
        }
        if self.eat(TokenKind::KeywordInput) {
            return self.parse_input();
        }
        if self.eat(TokenKind::KeywordOutput) {
            return self.parse_output();
        }
        if self.eat(TokenKind::KeywordIf) {
            return self.parse_if();
        }
        if self.eat(TokenKind::KeywordFunction) {
            return self.parse_function().map(OperatorKind::Function);
        }
        if self.eat(TokenKind::KeywordClass) {
            return self.parse_class();
        }
        if self.eat(TokenKind::KeywordReturn) {
            return self.parse_return();
        }
        let current = self.get(0);
        Err(ParserError {
            kind: SyntaxErrorKind::InvalidStatement(current.kind),
            span: current.span,
        })
    }

    /// Functions and classes are registered as soon as their operator is in
    /// the tree, so later statements can call them.
    fn register_declaration(
        &mut self,
        operator: OperatorRef,
        span: Span,
    ) -> Result<(), ParserError> {
        enum Registration {
            Function(CompactString),
            Class(CompactString),
        }

        let node = self
            .tree
            .get(operator)
            .expect("The operator was just inserted.");
        let registration = match &node.kind {
            OperatorKind::Function(function) => Registration::Function(function.name.clone()),
            OperatorKind::Class { name, .. } => Registration::Class(name.clone()),
            _ => return Ok(()),
        };
        let result = match registration {
            Registration::Function(name) => self.tree.declare_function(&name, operator),
            Registration::Class(name) => self.tree.declare_class(&name, operator),
        };
        result.map_err(|error| ParserError {
            kind: error.into(),
            span,
        })
    }

    /// Parses a nested block of operators, stopping before any of the given
    /// terminator tokens. The statements are threaded under a fresh block
    /// node through the same child/sibling primitive the top level uses.
    fn parse_block_until(&mut self, stop: &[TokenKind]) -> Result<OperatorRef, ParserError> {
        let block = self.tree.insert(None, OperatorKind::Block, false);
        let mut last: Option<OperatorRef> = None;
        loop {
            let next = self.get(0);
            if stop.contains(&next.kind) {
                break;
            }
            if next.kind == TokenKind::Eof {
                return Err(ParserError {
                    kind: SyntaxErrorKind::UnexpectedEof,
                    span: next.span,
                });
            }
            let span = next.span;
            let kind = self.parse_operator()?;
            let operator = match last {
                None => self.tree.insert(Some(block), kind, true),
                Some(previous) => self.tree.insert(Some(previous), kind, false),
            };
            self.register_declaration(operator, span)?;
            last = Some(operator);
        }
        Ok(block)
    }

    fn parse_module(&mut self) -> Result<OperatorKind, ParserError> {
        let name = self.expect(TokenKind::Ident)?;
        self.eat(TokenKind::Dot);
        Ok(OperatorKind::Module { name: name.text })
    }

    fn parse_while(&mut self) -> Result<OperatorKind, ParserError> {
        let condition = self.parse_expression()?;
        self.expect(TokenKind::KeywordThen)?;
        let body = self.parse_block_until(&[TokenKind::KeywordEnd])?;
        self.expect(TokenKind::KeywordEnd)?;
        self.expect(TokenKind::KeywordWhile)?;
        self.expect(TokenKind::Dot)?;
        Ok(OperatorKind::While { condition, body })
    }

    fn parse_variable(&mut self) -> Result<OperatorKind, ParserError> {
        self.expect(TokenKind::Minus)?;
        let type_word = self.expect(TokenKind::Ident)?;
        let semantic_type = SemanticType::from_keyword(&type_word.text);
        let name = self.expect(TokenKind::Ident)?;
        let initializer = if self.eat(TokenKind::Assign) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.expect(TokenKind::Semicolon)?;
        self.scopes
            .declare(
                &name.text,
                Variable {
                    semantic_type,
                    name: name.text.clone(),
                    expression: initializer.clone(),
                },
            )
            .map_err(|error| ParserError {
                kind: error.into(),
                span: name.span,
            })?;
        Ok(OperatorKind::VariableDeclaration {
            semantic_type,
            name: name.text,
            initializer,
        })
    }

    fn parse_let(&mut self) -> Result<OperatorKind, ParserError> {
        let name = self.expect(TokenKind::Ident)?;
        self.expect(TokenKind::Assign)?;
        let value = self.parse_expression()?;
        self.expect(TokenKind::Semicolon)?;
        Ok(OperatorKind::Let {
            name: name.text,
            value,
        })
    }

    fn parse_input(&mut self) -> Result<OperatorKind, ParserError> {
        let name = self.expect(TokenKind::Ident)?;
        self.expect(TokenKind::Semicolon)?;
        Ok(OperatorKind::Input { name: name.text })
    }

    fn parse_output(&mut self) -> Result<OperatorKind, ParserError> {
        let expression = self.parse_expression()?;
        self.expect(TokenKind::Semicolon)?;
        Ok(OperatorKind::Output { expression })
    }

    fn parse_if(&mut self) -> Result<OperatorKind, ParserError> {
        let condition = self.parse_expression()?;
        self.expect(TokenKind::KeywordThen)?;
        let block = self.parse_block_until(&[TokenKind::KeywordElse, TokenKind::KeywordEnd])?;
        let mut arms = vec![ConditionalArm { condition, block }];
        let mut otherwise = None;
        while self.eat(TokenKind::KeywordElse) {
            if self.eat(TokenKind::KeywordIf) {
                let condition = self.parse_expression()?;
                self.expect(TokenKind::KeywordThen)?;
                let block =
                    self.parse_block_until(&[TokenKind::KeywordElse, TokenKind::KeywordEnd])?;
                arms.push(ConditionalArm { condition, block });
            } else {
                otherwise = Some(self.parse_block_until(&[TokenKind::KeywordEnd])?);
                break;
            }
        }
        self.expect(TokenKind::KeywordEnd)?;
        self.expect(TokenKind::KeywordIf)?;
        self.expect(TokenKind::Dot)?;
        Ok(OperatorKind::If { arms, otherwise })
    }

    fn parse_function(&mut self) -> Result<FunctionOperator, ParserError> {
        let name = self.expect(TokenKind::Ident)?;
        let return_type = if self.eat(TokenKind::Colon) {
            let type_word = self.expect(TokenKind::Ident)?;
            Some(SemanticType::from_keyword(&type_word.text))
        } else {
            None
        };
        // The function body gets its own parse-time frame so its locals do
        // not leak into the enclosing scope.
        self.scopes.push_frame();
        let body = self.parse_block_until(&[TokenKind::KeywordEnd]);
        self.scopes.pop_frame();
        let body = body?;
        self.expect(TokenKind::KeywordEnd)?;
        self.expect(TokenKind::KeywordFunction)?;
        self.expect(TokenKind::Dot)?;
        Ok(FunctionOperator {
            name: name.text,
            return_type,
            body,
        })
    }

    fn parse_class(&mut self) -> Result<OperatorKind, ParserError> {
        let name = self.expect(TokenKind::Ident)?;
        self.eat(TokenKind::Dot);
        let mut methods = Vec::new();
        while self.eat(TokenKind::KeywordFunction) {
            let function = self.parse_function()?;
            let method = MethodFunctionOperator {
                name: function.name,
                class_parameter: name.text.clone(),
                return_type: function.return_type,
                body: function.body,
            };
            methods.push(
                self.tree
                    .insert(None, OperatorKind::MethodFunction(method), false),
            );
        }
        self.expect(TokenKind::KeywordEnd)?;
        self.expect(TokenKind::KeywordClass)?;
        self.expect(TokenKind::Dot)?;
        Ok(OperatorKind::Class {
            name: name.text,
            methods,
        })
    }

    fn parse_return(&mut self) -> Result<OperatorKind, ParserError> {
        let expression = self.parse_expression()?;
        self.expect(TokenKind::Semicolon)?;
        Ok(OperatorKind::Return { expression })
    }
}

// Expression parsing by precedence climbing. Every level builds a
// left-leaning tree by looping over its own operators; the equality level
// is the exception and matches a single comparison only.
impl Parser {
    pub fn parse_expression(&mut self) -> Result<Expression, ParserError> {
        let mut tree = IncompleteExpression::new();
        let root = self.logical_or(&mut tree)?;
        Ok(Expression::new(tree, root).expect("The root was obtained from the tree itself."))
    }

    fn logical_or(
        &mut self,
        tree: &mut IncompleteExpression,
    ) -> Result<ExpressionNodeRef, ParserError> {
        let mut result = self.logical_and(tree)?;
        loop {
            if self.eat(TokenKind::OrOr) {
                let rhs = self.logical_and(tree)?;
                result = tree.push(ExpressionNode::Conditional {
                    operator: ConditionalOperator::Or,
                    lhs: result,
                    rhs,
                });
                continue;
            }
            break;
        }
        Ok(result)
    }

    fn logical_and(
        &mut self,
        tree: &mut IncompleteExpression,
    ) -> Result<ExpressionNodeRef, ParserError> {
        let mut result = self.equality(tree)?;
        loop {
            if self.eat(TokenKind::AndAnd) {
                let rhs = self.equality(tree)?;
                result = tree.push(ExpressionNode::Conditional {
                    operator: ConditionalOperator::And,
                    lhs: result,
                    rhs,
                });
                continue;
            }
            break;
        }
        Ok(result)
    }

    fn equality(
        &mut self,
        tree: &mut IncompleteExpression,
    ) -> Result<ExpressionNodeRef, ParserError> {
        let result = self.relational(tree)?;

        if self.eat(TokenKind::EqualEqual) {
            let rhs = self.relational(tree)?;
            return Ok(tree.push(ExpressionNode::Conditional {
                operator: ConditionalOperator::Equal,
                lhs: result,
                rhs,
            }));
        }

        if self.eat(TokenKind::BangEqual) {
            let rhs = self.relational(tree)?;
            return Ok(tree.push(ExpressionNode::Conditional {
                operator: ConditionalOperator::NotEqual,
                lhs: result,
                rhs,
            }));
        }

        Ok(result)
    }

    fn relational(
        &mut self,
        tree: &mut IncompleteExpression,
    ) -> Result<ExpressionNodeRef, ParserError> {
        let mut result = self.additive(tree)?;
        loop {
            let operator = if self.eat(TokenKind::LessThan) {
                ConditionalOperator::Less
            } else if self.eat(TokenKind::LessThanEqual) {
                ConditionalOperator::LessOrEqual
            } else if self.eat(TokenKind::GreaterThan) {
                ConditionalOperator::Greater
            } else if self.eat(TokenKind::GreaterThanEqual) {
                ConditionalOperator::GreaterOrEqual
            } else {
                break;
            };
            let rhs = self.additive(tree)?;
            result = tree.push(ExpressionNode::Conditional {
                operator,
                lhs: result,
                rhs,
            });
        }
        Ok(result)
    }

    fn additive(
        &mut self,
        tree: &mut IncompleteExpression,
    ) -> Result<ExpressionNodeRef, ParserError> {
        let mut result = self.multiplicative(tree)?;
        loop {
            let operator = if self.eat(TokenKind::Plus) {
                BinaryOperator::Add
            } else if self.eat(TokenKind::Minus) {
                BinaryOperator::Subtract
            } else {
                break;
            };
            let rhs = self.multiplicative(tree)?;
            result = tree.push(ExpressionNode::Binary {
                operator,
                lhs: result,
                rhs,
            });
        }
        Ok(result)
    }

    fn multiplicative(
        &mut self,
        tree: &mut IncompleteExpression,
    ) -> Result<ExpressionNodeRef, ParserError> {
        let mut result = self.unary(tree)?;
        loop {
            let operator = if self.eat(TokenKind::Star) {
                BinaryOperator::Multiply
            } else if self.eat(TokenKind::Slash) {
                BinaryOperator::Divide
            } else {
                break;
            };
            let rhs = self.unary(tree)?;
            result = tree.push(ExpressionNode::Binary {
                operator,
                lhs: result,
                rhs,
            });
        }
        Ok(result)
    }

    fn unary(&mut self, tree: &mut IncompleteExpression) -> Result<ExpressionNodeRef, ParserError> {
        if self.eat(TokenKind::Minus) {
            let rhs = self.primary(tree)?;
            return Ok(tree.push(ExpressionNode::Unary {
                operator: UnaryOperator::Negate,
                rhs,
            }));
        }
        self.primary(tree)
    }

    fn primary(
        &mut self,
        tree: &mut IncompleteExpression,
    ) -> Result<ExpressionNodeRef, ParserError> {
        let current = self.get(0).clone();

        if self.eat(TokenKind::NumericLiteral) {
            // No decimal point means an integer, otherwise a real. The
            // decimal point is always `.` regardless of locale.
            let node = if !current.text.contains('.') {
                let value = current.text.parse::<i32>().map_err(|_| ParserError {
                    kind: SyntaxErrorKind::InvalidNumericLiteral(current.text.clone()),
                    span: current.span,
                })?;
                ExpressionNode::Literal(Value::Integer(value))
            } else {
                let value = current.text.parse::<f64>().map_err(|_| ParserError {
                    kind: SyntaxErrorKind::InvalidNumericLiteral(current.text.clone()),
                    span: current.span,
                })?;
                ExpressionNode::Literal(Value::Real(value))
            };
            return Ok(tree.push(node));
        }

        if self.eat(TokenKind::Ident) {
            if self.eat(TokenKind::LeftParenthesis) {
                self.expect(TokenKind::RightParenthesis)?;
                return Ok(tree.push(ExpressionNode::Call(current.text)));
            }
            // Variable references resolve against the scope stack while
            // parsing; calls resolve at run time instead.
            if !self.scopes.exists(&current.text) {
                return Err(ParserError {
                    kind: SymbolError::Undefined(current.text).into(),
                    span: current.span,
                });
            }
            return Ok(tree.push(ExpressionNode::Variable(current.text)));
        }

        if self.eat(TokenKind::StringLiteral) {
            return Ok(tree.push(ExpressionNode::Literal(Value::String(current.text))));
        }

        if self.eat(TokenKind::LeftParenthesis) {
            let inner = self.logical_or(tree)?;
            self.expect(TokenKind::RightParenthesis)?;
            return Ok(inner);
        }

        Err(ParserError {
            kind: SyntaxErrorKind::NonExpression(current.kind),
            span: current.span,
        })
    }
}
