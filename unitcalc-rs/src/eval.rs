use tracing::debug;

use crate::error::EvalError;
use crate::infer::{degree_of, degree_value, infer_unit};
use crate::memory::VariableStore;
use crate::parser::Expression;
use crate::unit::Unit;

/// A magnitude together with its unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Quantity {
    pub value: f64,
    pub unit: Unit,
}

impl Quantity {
    pub fn new(value: f64, unit: Unit) -> Self {
        Quantity { value, unit }
    }

    fn unknown() -> Self {
        Quantity::new(f64::NAN, Unit::unknown())
    }

    pub fn into_expression(self) -> Expression {
        Expression::quantity(self.value, self.unit)
    }
}

fn unit_only(expr: &Expression, vars: &dyn VariableStore) -> Result<Quantity, EvalError> {
    if let Expression::Pow(_, degree) = expr {
        if degree_of(degree).is_none() {
            return Err(EvalError::InvalidDegree(
                degree_value(degree).unwrap_or(f64::NAN),
            ));
        }
    }
    Ok(Quantity::new(1.0, infer_unit(expr, vars)))
}

/// Sum or difference; the right operand is converted into the left unit.
fn additive(
    left: Quantity,
    right: Quantity,
    op: impl Fn(f64, f64) -> f64,
) -> Quantity {
    if left.unit.is_unknown() || right.unit.is_unknown() {
        return Quantity::unknown();
    }
    match right.unit.convert_value(right.value, &left.unit) {
        Some(converted) => Quantity::new(op(left.value, converted), left.unit),
        None => Quantity::unknown(),
    }
}

/// Product or quotient; `right` already carries the unit to fold in.
fn multiplicative(
    left: Quantity,
    right: Quantity,
    op: impl Fn(f64, f64) -> f64,
) -> Quantity {
    if left.unit.is_unknown() || right.unit.is_unknown() {
        return Quantity::unknown();
    }
    let (unit, factor) = left.unit.combine_scaled(&right.unit, false);
    if unit.is_unknown() {
        return Quantity::unknown();
    }
    Quantity::new(op(left.value, right.value) * factor, unit)
}

/// Evaluates an expression tree bottom-up.
///
/// Unit mismatches do not fail: they produce a quantity whose unit is
/// unknown. Division by zero follows IEEE semantics.
pub fn evaluate(expr: &Expression, vars: &dyn VariableStore) -> Result<Quantity, EvalError> {
    match expr {
        Expression::Constant(value) => Ok(Quantity::new(*value, Unit::none())),
        Expression::UnitLiteral(_)
        | Expression::CompositeUnit(..)
        | Expression::Pow(..)
        | Expression::DivUnit(..) => unit_only(expr, vars),
        Expression::ConstWithUnit(value, unit) => {
            let magnitude = evaluate(value, vars)?;
            let unit = unit_only(unit, vars)?;
            Ok(multiplicative(magnitude, unit, |l, r| l * r))
        }
        Expression::Negate(operand) => {
            let operand = evaluate(operand, vars)?;
            Ok(Quantity::new(-operand.value, operand.unit))
        }
        Expression::Add(left, right) => Ok(additive(
            evaluate(left, vars)?,
            evaluate(right, vars)?,
            |l, r| l + r,
        )),
        Expression::Sub(left, right) => Ok(additive(
            evaluate(left, vars)?,
            evaluate(right, vars)?,
            |l, r| l - r,
        )),
        Expression::Mul(left, right) => {
            let left = evaluate(left, vars)?;
            let right = evaluate(right, vars)?;
            Ok(multiplicative(left, right, |l, r| l * r))
        }
        Expression::Div(left, right) => {
            let left = evaluate(left, vars)?;
            let right = evaluate(right, vars)?;
            let right = Quantity::new(right.value, right.unit.inverse());
            Ok(multiplicative(left, right, |l, r| l / r))
        }
        Expression::Convert(value, target) => {
            let value = evaluate(value, vars)?;
            let target = unit_only(target, vars)?.unit;
            match value.unit.convert_value(value.value, &target) {
                Some(converted) => {
                    debug!(from = value.value, to = converted, "converted quantity");
                    Ok(Quantity::new(converted, target))
                }
                None => Ok(Quantity::unknown()),
            }
        }
        Expression::Variable(name) => match vars.get(name) {
            Some(value) => evaluate(value, vars),
            None => Err(EvalError::UnboundVariable(name.clone())),
        },
        Expression::Assign { value, .. } => evaluate(value, vars),
        Expression::Empty => Err(EvalError::NotAValue("empty input")),
        Expression::Quit => Err(EvalError::NotAValue("quit")),
        Expression::Help => Err(EvalError::NotAValue("help")),
        Expression::ShowMemory => Err(EvalError::NotAValue("memory")),
        Expression::ShowUnits => Err(EvalError::NotAValue("units")),
        Expression::Examples => Err(EvalError::NotAValue("examples")),
        Expression::Invalid => Err(EvalError::Malformed),
    }
}
