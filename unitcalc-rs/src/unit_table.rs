//! Registry of unit names.
//!
//! Built-in units are a closed set with fixed spellings. A [`UnitTable`] adds
//! user-defined names on top of them; each user unit gets a fresh
//! [`UnitType::User`] id and a category of its own.

use std::collections::HashMap;
use std::fmt::{self, Display};

use tracing::debug;

use crate::error::UnitTableError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UnitType {
    // Distance
    Centimeter,
    Meter,
    Kilometer,
    Inch,
    Foot,
    Mile,
    // Time
    Second,
    Minute,
    Hour,
    // Mass
    Gram,
    Kilogram,
    Pound,
    Ounce,
    // Temperature
    Kelvin,
    Celsius,
    Fahrenheit,

    User(u32),
    Dimensionless,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitCategory {
    Distance,
    Time,
    Mass,
    Temperature,
    User(u32),
    None,
}

pub const BUILTIN_UNITS: [UnitType; 16] = [
    UnitType::Centimeter,
    UnitType::Meter,
    UnitType::Kilometer,
    UnitType::Inch,
    UnitType::Foot,
    UnitType::Mile,
    UnitType::Second,
    UnitType::Minute,
    UnitType::Hour,
    UnitType::Gram,
    UnitType::Kilogram,
    UnitType::Pound,
    UnitType::Ounce,
    UnitType::Kelvin,
    UnitType::Celsius,
    UnitType::Fahrenheit,
];

const KEYWORDS: [&str; 6] = ["quit", "exit", "help", "memory", "units", "examples"];

impl UnitType {
    pub fn category(self) -> UnitCategory {
        match self {
            UnitType::Centimeter
            | UnitType::Meter
            | UnitType::Kilometer
            | UnitType::Inch
            | UnitType::Foot
            | UnitType::Mile => UnitCategory::Distance,
            UnitType::Second | UnitType::Minute | UnitType::Hour => UnitCategory::Time,
            UnitType::Gram | UnitType::Kilogram | UnitType::Pound | UnitType::Ounce => {
                UnitCategory::Mass
            }
            UnitType::Kelvin | UnitType::Celsius | UnitType::Fahrenheit => {
                UnitCategory::Temperature
            }
            UnitType::User(id) => UnitCategory::User(id),
            UnitType::Dimensionless | UnitType::Unknown => UnitCategory::None,
        }
    }

    /// Canonical spelling, `None` for user units whose name lives in a table.
    pub fn symbol(self) -> Option<&'static str> {
        let symbol = match self {
            UnitType::Centimeter => "cm",
            UnitType::Meter => "m",
            UnitType::Kilometer => "km",
            UnitType::Inch => "in",
            UnitType::Foot => "ft",
            UnitType::Mile => "mi",
            UnitType::Second => "s",
            UnitType::Minute => "min",
            UnitType::Hour => "h",
            UnitType::Gram => "g",
            UnitType::Kilogram => "kg",
            UnitType::Pound => "lb",
            UnitType::Ounce => "oz",
            UnitType::Kelvin => "K",
            UnitType::Celsius => "C",
            UnitType::Fahrenheit => "F",
            UnitType::Dimensionless => "none",
            UnitType::Unknown => "unknown",
            UnitType::User(_) => return None,
        };
        Some(symbol)
    }
}

impl Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self, self.symbol()) {
            (_, Some(symbol)) => f.write_str(symbol),
            (UnitType::User(id), None) => write!(f, "user#{}", id),
            (_, None) => Ok(()),
        }
    }
}

impl Display for UnitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitCategory::Distance => f.write_str("distance"),
            UnitCategory::Time => f.write_str("time"),
            UnitCategory::Mass => f.write_str("mass"),
            UnitCategory::Temperature => f.write_str("temperature"),
            UnitCategory::User(_) => f.write_str("user"),
            UnitCategory::None => f.write_str("none"),
        }
    }
}

/// Looks up a built-in unit by any accepted spelling.
pub fn resolve_builtin(name: &str) -> UnitType {
    match name {
        "cm" | "centimeter" | "centimeters" => UnitType::Centimeter,
        "m" | "meter" | "meters" => UnitType::Meter,
        "km" | "kilometer" | "kilometers" => UnitType::Kilometer,
        "in" | "inch" | "inches" => UnitType::Inch,
        "ft" | "foot" | "feet" => UnitType::Foot,
        "mi" | "mile" | "miles" => UnitType::Mile,
        "s" | "sec" | "second" | "seconds" => UnitType::Second,
        "min" | "minute" | "minutes" => UnitType::Minute,
        "h" | "hr" | "hour" | "hours" => UnitType::Hour,
        "g" | "gram" | "grams" => UnitType::Gram,
        "kg" | "kilogram" | "kilograms" => UnitType::Kilogram,
        "lb" | "lbs" | "pound" | "pounds" => UnitType::Pound,
        "oz" | "ounce" | "ounces" => UnitType::Ounce,
        // Single letters are case-sensitive: `k` is a name, not kelvin.
        "K" | "kelvin" | "kelvins" => UnitType::Kelvin,
        "k" => UnitType::Unknown,
        "C" | "celsius" => UnitType::Celsius,
        "F" | "fahrenheit" => UnitType::Fahrenheit,
        _ => UnitType::Unknown,
    }
}

#[derive(Debug, Clone, Default)]
pub struct UnitTable {
    names: Vec<String>,
    ids: HashMap<String, u32>,
}

impl UnitTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns [`UnitType::Unknown`] when the name matches nothing.
    pub fn resolve(&self, name: &str) -> UnitType {
        match resolve_builtin(name) {
            UnitType::Unknown => self
                .ids
                .get(name)
                .map_or(UnitType::Unknown, |&id| UnitType::User(id)),
            unit_type => unit_type,
        }
    }

    pub fn register(&mut self, name: &str) -> Result<UnitType, UnitTableError> {
        let mut chars = name.chars();
        let starts_with_letter = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
        if !starts_with_letter || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(UnitTableError::InvalidName(name.to_string()));
        }
        if KEYWORDS.contains(&name) {
            return Err(UnitTableError::InvalidName(name.to_string()));
        }
        if self.resolve(name) != UnitType::Unknown {
            return Err(UnitTableError::AlreadyRegistered(name.to_string()));
        }
        let id = self.names.len() as u32;
        self.names.push(name.to_string());
        self.ids.insert(name.to_string(), id);
        debug!(name, id, "registered user unit");
        Ok(UnitType::User(id))
    }

    pub fn name(&self, unit_type: UnitType) -> &str {
        match unit_type {
            UnitType::User(id) => self
                .names
                .get(id as usize)
                .map_or("unknown", String::as_str),
            other => other.symbol().unwrap_or("unknown"),
        }
    }

    /// Every unit this table knows, built-ins first.
    pub fn all(&self) -> impl Iterator<Item = UnitType> + '_ {
        BUILTIN_UNITS
            .into_iter()
            .chain((0..self.names.len() as u32).map(UnitType::User))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_symbols_words_and_plurals() {
        let table = UnitTable::new();
        assert_eq!(table.resolve("km"), UnitType::Kilometer);
        assert_eq!(table.resolve("kilometer"), UnitType::Kilometer);
        assert_eq!(table.resolve("kilometers"), UnitType::Kilometer);
        assert_eq!(table.resolve("feet"), UnitType::Foot);
        assert_eq!(table.resolve("lbs"), UnitType::Pound);
        assert_eq!(table.resolve("furlong"), UnitType::Unknown);
    }

    #[test]
    fn single_letters_are_case_sensitive() {
        let table = UnitTable::new();
        assert_eq!(table.resolve("K"), UnitType::Kelvin);
        assert_eq!(table.resolve("k"), UnitType::Unknown);
        assert_eq!(table.resolve("M"), UnitType::Unknown);
        assert_eq!(table.resolve("KM"), UnitType::Unknown);
    }

    #[test]
    fn registered_units_get_their_own_category() {
        let mut table = UnitTable::new();
        let apple = table.register("apple").unwrap();
        let pear = table.register("pear").unwrap();
        assert_eq!(apple, UnitType::User(0));
        assert_eq!(pear, UnitType::User(1));
        assert_ne!(apple.category(), pear.category());
        assert_eq!(table.resolve("pear"), pear);
        assert_eq!(table.name(pear), "pear");
    }

    #[test]
    fn registering_twice_fails() {
        let mut table = UnitTable::new();
        table.register("apple").unwrap();
        assert_eq!(
            table.register("apple"),
            Err(UnitTableError::AlreadyRegistered("apple".to_string()))
        );
        assert_eq!(
            table.register("km"),
            Err(UnitTableError::AlreadyRegistered("km".to_string()))
        );
    }

    #[test]
    fn rejects_names_the_lexer_cannot_produce() {
        let mut table = UnitTable::new();
        assert!(table.register("").is_err());
        assert!(table.register("2x").is_err());
        assert!(table.register("a-b").is_err());
        assert!(table.register("help").is_err());
    }

    #[test]
    fn every_builtin_has_a_category() {
        for unit_type in BUILTIN_UNITS {
            assert_ne!(unit_type.category(), UnitCategory::None);
            assert!(unit_type.symbol().is_some());
        }
    }
}
