//! Unit inference: the evaluator's walk without the arithmetic.
//!
//! Any inconsistency collapses to [`Unit::unknown`], which is absorbing; the
//! unit engine is never called with an unknown operand.

use crate::memory::VariableStore;
use crate::parser::Expression;
use crate::unit::Unit;

/// Integer value of a degree expression: a constant under negations.
pub(crate) fn degree_value(expr: &Expression) -> Option<f64> {
    match expr {
        Expression::Constant(value) => Some(*value),
        Expression::Negate(operand) => degree_value(operand).map(|value| -value),
        _ => None,
    }
}

pub(crate) fn degree_of(expr: &Expression) -> Option<i32> {
    degree_value(expr)
        .filter(|value| value.fract() == 0.0 && value.abs() <= f64::from(i32::MAX))
        .map(|value| value as i32)
}

fn combine_known(left: Unit, right: Unit, reject_cross_category: bool) -> Unit {
    if left.is_unknown() || right.is_unknown() {
        return Unit::unknown();
    }
    left.combine(&right, reject_cross_category)
}

pub fn infer_unit(expr: &Expression, vars: &dyn VariableStore) -> Unit {
    match expr {
        Expression::Constant(_) => Unit::none(),
        Expression::UnitLiteral(unit) => unit.clone(),
        Expression::ConstWithUnit(_, unit) => infer_unit(unit, vars),
        Expression::CompositeUnit(left, right) => {
            combine_known(infer_unit(left, vars), infer_unit(right, vars), true)
        }
        Expression::DivUnit(left, right) => combine_known(
            infer_unit(left, vars),
            infer_unit(right, vars).inverse(),
            true,
        ),
        Expression::Pow(base, degree) => match degree_of(degree) {
            Some(degree) => infer_unit(base, vars).pow(degree),
            None => Unit::unknown(),
        },
        Expression::Negate(operand) => infer_unit(operand, vars),
        Expression::Add(left, right) | Expression::Sub(left, right) => {
            let left = infer_unit(left, vars);
            if infer_unit(right, vars).is_convertible_to(&left) {
                left
            } else {
                Unit::unknown()
            }
        }
        Expression::Mul(left, right) => {
            combine_known(infer_unit(left, vars), infer_unit(right, vars), false)
        }
        Expression::Div(left, right) => combine_known(
            infer_unit(left, vars),
            infer_unit(right, vars).inverse(),
            false,
        ),
        Expression::Convert(value, target) => {
            let target = infer_unit(target, vars);
            if infer_unit(value, vars).is_convertible_to(&target) {
                target
            } else {
                Unit::unknown()
            }
        }
        Expression::Variable(name) => vars
            .get(name)
            .map_or_else(Unit::unknown, |value| infer_unit(value, vars)),
        Expression::Assign { value, .. } => infer_unit(value, vars),
        Expression::Empty
        | Expression::Quit
        | Expression::Help
        | Expression::ShowMemory
        | Expression::ShowUnits
        | Expression::Examples
        | Expression::Invalid => Unit::unknown(),
    }
}
