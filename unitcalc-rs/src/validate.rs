//! Structural checks run between parsing and evaluation.
//!
//! Nothing here looks at units or values; it only makes sure every node has
//! the shape its evaluator expects and that referenced variables exist.

use crate::error::ValidationError;
use crate::memory::VariableStore;
use crate::parser::Expression;

pub fn check_valid(expr: &Expression, vars: &dyn VariableStore) -> Result<(), ValidationError> {
    match expr {
        Expression::Empty
        | Expression::Quit
        | Expression::Help
        | Expression::ShowMemory
        | Expression::ShowUnits
        | Expression::Examples => Ok(()),
        Expression::Assign { value, .. } => check_value(value, "assignment", vars),
        _ => check_value(expr, "expression", vars),
    }
}

fn check_value(
    expr: &Expression,
    context: &'static str,
    vars: &dyn VariableStore,
) -> Result<(), ValidationError> {
    match expr {
        Expression::Constant(_) => Ok(()),
        Expression::Variable(name) if vars.contains(name) => Ok(()),
        Expression::Variable(name) => Err(ValidationError::UnboundVariable(name.clone())),
        Expression::ConstWithUnit(value, unit) => {
            if !matches!(**value, Expression::Constant(_)) {
                return Err(ValidationError::ExpectedNumber("quantity magnitude"));
            }
            check_unit(unit, "quantity unit")
        }
        Expression::UnitLiteral(_)
        | Expression::CompositeUnit(..)
        | Expression::Pow(..)
        | Expression::DivUnit(..) => check_unit(expr, context),
        Expression::Negate(operand) => check_value(operand, "negation", vars),
        Expression::Add(left, right) => check_operands(left, right, "addition", vars),
        Expression::Sub(left, right) => check_operands(left, right, "subtraction", vars),
        Expression::Mul(left, right) => check_operands(left, right, "multiplication", vars),
        Expression::Div(left, right) => check_operands(left, right, "division", vars),
        Expression::Convert(value, target) => {
            check_value(value, "conversion", vars)?;
            check_unit(target, "conversion target")
        }
        Expression::Empty => Err(ValidationError::MissingOperand(context)),
        Expression::Invalid => Err(ValidationError::Malformed(context)),
        Expression::Assign { .. } => Err(ValidationError::MisplacedCommand("=")),
        Expression::Quit => Err(ValidationError::MisplacedCommand("quit")),
        Expression::Help => Err(ValidationError::MisplacedCommand("help")),
        Expression::ShowMemory => Err(ValidationError::MisplacedCommand("memory")),
        Expression::ShowUnits => Err(ValidationError::MisplacedCommand("units")),
        Expression::Examples => Err(ValidationError::MisplacedCommand("examples")),
    }
}

fn check_operands(
    left: &Expression,
    right: &Expression,
    context: &'static str,
    vars: &dyn VariableStore,
) -> Result<(), ValidationError> {
    check_value(left, context, vars)?;
    check_value(right, context, vars)
}

fn check_unit(expr: &Expression, context: &'static str) -> Result<(), ValidationError> {
    match expr {
        Expression::UnitLiteral(_) => Ok(()),
        Expression::CompositeUnit(left, right) | Expression::DivUnit(left, right) => {
            check_unit(left, context)?;
            check_unit(right, context)
        }
        Expression::Pow(base, degree) => {
            check_unit(base, context)?;
            check_degree(degree)
        }
        Expression::Invalid => Err(ValidationError::Malformed(context)),
        Expression::Empty => Err(ValidationError::MissingOperand(context)),
        _ => Err(ValidationError::ExpectedUnit(context)),
    }
}

/// Degrees are integer literals under any number of negations.
fn check_degree(expr: &Expression) -> Result<(), ValidationError> {
    match expr {
        Expression::Constant(value) if value.fract() == 0.0 && value.abs() <= f64::from(i32::MAX) => {
            Ok(())
        }
        Expression::Negate(operand) => check_degree(operand),
        _ => Err(ValidationError::InvalidDegree),
    }
}
