//! State kept between input lines: variable bindings and user-defined units.

use std::collections::BTreeMap;

use tracing::debug;

use crate::parser::Expression;
use crate::unit_table::UnitTable;

/// Name to expression bindings consulted by the validator, the unit
/// inference and the evaluator.
pub trait VariableStore {
    fn get(&self, name: &str) -> Option<&Expression>;
    fn set(&mut self, name: &str, value: Expression);
    fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
    fn show_all(&self) -> String;
}

#[derive(Debug, Clone, Default)]
pub struct Memory {
    vars: BTreeMap<String, Expression>,
    units: UnitTable,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn units(&self) -> &UnitTable {
        &self.units
    }

    pub fn units_mut(&mut self) -> &mut UnitTable {
        &mut self.units
    }

    fn display_var(&self, name: &str, value: &Expression) -> String {
        match value {
            Expression::Constant(constant) => format!("{} = {}", name, constant),
            Expression::ConstWithUnit(constant, unit) => match (&**constant, &**unit) {
                (Expression::Constant(constant), Expression::UnitLiteral(unit)) => {
                    format!("{} = {} {}", name, constant, unit.display(&self.units))
                }
                _ => format!("{} = {}", name, value),
            },
            Expression::UnitLiteral(unit) => {
                format!("{} = {}", name, unit.display(&self.units))
            }
            other => format!("{} = {}", name, other),
        }
    }
}

impl VariableStore for Memory {
    fn get(&self, name: &str) -> Option<&Expression> {
        self.vars.get(name)
    }

    fn set(&mut self, name: &str, value: Expression) {
        debug!(name, %value, "storing variable");
        self.vars.insert(name.to_string(), value);
    }

    fn show_all(&self) -> String {
        self.vars
            .iter()
            .map(|(name, value)| self.display_var(name, value))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::Unit;
    use crate::unit_table::UnitType;

    #[test]
    fn shows_bindings_sorted_by_name() {
        let mut memory = Memory::new();
        memory.set(
            "speed",
            Expression::quantity(
                12.5,
                Unit::from_powers([
                    crate::unit::UnitPower::new(UnitType::Kilometer, 1),
                    crate::unit::UnitPower::new(UnitType::Hour, -1),
                ]),
            ),
        );
        memory.set("answer", Expression::quantity(42.0, Unit::none()));
        assert_eq!(memory.show_all(), "answer = 42\nspeed = 12.5 km h^-1");
    }

    #[test]
    fn rebinding_overwrites() {
        let mut memory = Memory::new();
        memory.set("x", Expression::Constant(1.0));
        memory.set("x", Expression::Constant(2.0));
        assert!(memory.contains("x"));
        assert!(!memory.contains("y"));
        assert_eq!(memory.get("x"), Some(&Expression::Constant(2.0)));
    }
}
