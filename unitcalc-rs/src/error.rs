use std::num::ParseFloatError;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CalcError>;

#[derive(Debug, PartialEq, Clone, Default, Error)]
pub enum LexingError {
    #[error("invalid number: {0}")]
    ParseFloatError(#[from] ParseFloatError),
    #[default]
    #[error("invalid token")]
    InvalidToken,
}

#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum UnitTableError {
    #[error("unit '{0}' is already defined")]
    AlreadyRegistered(String),

    #[error("'{0}' is not a valid unit name")]
    InvalidName(String),
}

/// Structural problems found before any unit or value is computed.
#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum ValidationError {
    #[error("malformed {0}")]
    Malformed(&'static str),

    #[error("missing operand in {0}")]
    MissingOperand(&'static str),

    #[error("{0} must be a unit expression")]
    ExpectedUnit(&'static str),

    #[error("{0} must be a number")]
    ExpectedNumber(&'static str),

    #[error("unit degree must be an integer literal")]
    InvalidDegree,

    #[error("'{0}' cannot be used inside an expression")]
    MisplacedCommand(&'static str),

    #[error("unknown variable '{0}'")]
    UnboundVariable(String),
}

#[derive(Debug, PartialEq, Clone, Error)]
pub enum EvalError {
    #[error("unknown variable '{0}'")]
    UnboundVariable(String),

    #[error("unit degree {0} is not an integer")]
    InvalidDegree(f64),

    #[error("'{0}' does not produce a value")]
    NotAValue(&'static str),

    #[error("cannot evaluate a malformed expression")]
    Malformed,
}

#[derive(Debug, PartialEq, Clone, Error)]
pub enum CalcError {
    #[error("invalid input")]
    InvalidInput,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("cannot determine a consistent unit")]
    InconsistentUnits,

    #[error(transparent)]
    Eval(#[from] EvalError),

    #[error(transparent)]
    UnitTable(#[from] UnitTableError),
}
