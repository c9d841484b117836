use crate::symbol::SymbolError;
use crate::value::ValueError;
use compact_str::CompactString;
use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum RuntimeError {
    #[error(transparent)]
    Value(#[from] ValueError),
    #[error(transparent)]
    Symbol(#[from] SymbolError),
    #[error("The variable `{0}` has no bound value")]
    Unbound(CompactString),
    #[error("Division by zero")]
    DivisionByZero,
    #[error("The input source is exhausted")]
    InputExhausted,
    #[error("The function `{0}` did not produce a return value")]
    MissingReturn(CompactString),
    #[error("Execution of `{name}` failed")]
    Execution {
        name: CompactString,
        #[source]
        cause: Box<RuntimeError>,
    },
}
