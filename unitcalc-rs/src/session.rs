//! One calculator session: the full line pipeline over a persistent memory.

use tracing::debug;

use crate::error::{CalcError, Result};
use crate::eval::{Quantity, evaluate};
use crate::infer::infer_unit;
use crate::lexer::{Token, tokenize};
use crate::memory::{Memory, VariableStore};
use crate::parser::{Expression, parse};
use crate::unit_table::{UnitTable, UnitType};
use crate::validate::check_valid;

/// What a successfully processed line produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Empty,
    Value(Quantity),
    Assigned { name: String, quantity: Quantity },
    Quit,
    Help,
    ShowMemory,
    ShowUnits,
    Examples,
}

#[derive(Debug, Clone, Default)]
pub struct Calculator {
    memory: Memory,
}

impl Calculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn units(&self) -> &UnitTable {
        self.memory.units()
    }

    /// Registers a unit with its own category for the rest of the session.
    pub fn define_unit(&mut self, name: &str) -> Result<UnitType> {
        Ok(self.memory.units_mut().register(name)?)
    }

    pub fn eval_line(&mut self, line: &str) -> Result<Outcome> {
        let tokens = tokenize(line, self.memory.units());
        if tokens == [Token::Invalid] {
            debug!(line, "rejected by the lexer");
            return Err(CalcError::InvalidInput);
        }
        let expr = parse(&tokens);
        if let Err(err) = check_valid(&expr, &self.memory) {
            debug!(line, %err, "rejected by the validator");
            return Err(err.into());
        }
        match expr {
            Expression::Empty => return Ok(Outcome::Empty),
            Expression::Quit => return Ok(Outcome::Quit),
            Expression::Help => return Ok(Outcome::Help),
            Expression::ShowMemory => return Ok(Outcome::ShowMemory),
            Expression::ShowUnits => return Ok(Outcome::ShowUnits),
            Expression::Examples => return Ok(Outcome::Examples),
            _ => {}
        }
        if infer_unit(&expr, &self.memory).is_unknown() {
            debug!(line, "no consistent unit");
            return Err(CalcError::InconsistentUnits);
        }
        let quantity = evaluate(&expr, &self.memory)?;
        match expr {
            Expression::Assign { name, .. } => {
                self.memory
                    .set(&name, quantity.clone().into_expression());
                Ok(Outcome::Assigned { name, quantity })
            }
            _ => Ok(Outcome::Value(quantity)),
        }
    }
}
