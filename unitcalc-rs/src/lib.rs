mod error;
mod eval;
mod infer;
mod lexer;
mod memory;
mod parser;
mod session;
mod unit;
mod unit_table;
mod validate;

pub use crate::error::{
    CalcError, EvalError, LexingError, Result, UnitTableError, ValidationError,
};
pub use crate::eval::{Quantity, evaluate};
pub use crate::infer::infer_unit;
pub use crate::lexer::{MAX_INPUT, Token, tokenize};
pub use crate::memory::{Memory, VariableStore};
pub use crate::parser::{Expression, parse};
pub use crate::session::{Calculator, Outcome};
pub use crate::unit::{AffineModel, Unit, UnitDisplay, UnitPower, convert, model};
pub use crate::unit_table::{BUILTIN_UNITS, UnitCategory, UnitTable, UnitType, resolve_builtin};
pub use crate::validate::check_valid;
