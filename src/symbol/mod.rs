use crate::expression::Expression;
use crate::value::SemanticType;
use compact_str::CompactString;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SymbolError {
    #[error("The name `{0}` has not been declared")]
    Undefined(CompactString),
    #[error("The name `{0}` has already been declared")]
    Duplicate(CompactString),
}

/// A declared variable. The declared type is fixed for the variable's whole
/// lifetime; only the bound expression can be replaced.
#[derive(Debug, Clone)]
pub struct Variable {
    pub semantic_type: SemanticType,
    pub name: CompactString,
    pub expression: Option<Expression>,
}

#[derive(Debug, Clone)]
pub struct SymbolTable<T> {
    entries: HashMap<CompactString, T>,
}

impl<T> SymbolTable<T> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn exists(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn lookup(&self, name: &str) -> Result<&T, SymbolError> {
        self.entries
            .get(name)
            .ok_or_else(|| SymbolError::Undefined(name.into()))
    }

    pub fn declare(&mut self, name: &str, entry: T) -> Result<(), SymbolError> {
        if self.exists(name) {
            return Err(SymbolError::Duplicate(name.into()));
        }
        self.entries.insert(name.into(), entry);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CompactString, &T)> {
        self.entries.iter()
    }
}

impl<T> Default for SymbolTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

pub type VariableStorage = SymbolTable<Variable>;

impl SymbolTable<Variable> {
    /// Replaces only the bound expression, preserving the declared type.
    pub fn rebind(&mut self, name: &str, expression: Expression) -> Result<(), SymbolError> {
        match self.entries.get_mut(name) {
            Some(variable) => {
                variable.expression = Some(expression);
                Ok(())
            }
            None => Err(SymbolError::Undefined(name.into())),
        }
    }
}

/// A stack of variable frames, one per active module or function.
/// Declarations always target the innermost frame, lookups walk outward and
/// teardown pops the frame.
#[derive(Debug)]
pub struct ScopeStack {
    frames: Vec<VariableStorage>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self {
            frames: vec![VariableStorage::new()],
        }
    }

    pub fn push_frame(&mut self) {
        self.frames.push(VariableStorage::new());
    }

    pub fn pop_frame(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn exists(&self, name: &str) -> bool {
        self.frames.iter().any(|frame| frame.exists(name))
    }

    pub fn lookup(&self, name: &str) -> Result<&Variable, SymbolError> {
        for frame in self.frames.iter().rev() {
            if let Ok(variable) = frame.lookup(name) {
                return Ok(variable);
            }
        }
        Err(SymbolError::Undefined(name.into()))
    }

    pub fn declare(&mut self, name: &str, variable: Variable) -> Result<(), SymbolError> {
        self.frames
            .last_mut()
            .expect("The scope stack always holds at least the global frame.")
            .declare(name, variable)
    }

    /// Rebinds in the frame that owns the name, walking outward from the
    /// innermost frame.
    pub fn rebind(&mut self, name: &str, expression: Expression) -> Result<(), SymbolError> {
        for frame in self.frames.iter_mut().rev() {
            if frame.exists(name) {
                return frame.rebind(name, expression);
            }
        }
        Err(SymbolError::Undefined(name.into()))
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}
