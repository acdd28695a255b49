//! Symbolic unit algebra.
//!
//! A [`Unit`] is a product of unit types raised to integer degrees. Units of
//! the same category never appear twice in a combined unit: multiplication
//! folds them into the first one seen, rescaling the magnitude by the ratio
//! of their conversion slopes.

use std::fmt::{self, Display};

use once_cell::sync::Lazy;
use tracing::debug;
use uom::si::f64::{Length, Mass, ThermodynamicTemperature, Time};
use uom::si::{length, mass, thermodynamic_temperature, time};

use crate::unit_table::{BUILTIN_UNITS, UnitTable, UnitType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitPower {
    pub unit_type: UnitType,
    pub degree: i32,
}

impl UnitPower {
    pub fn new(unit_type: UnitType, degree: i32) -> Self {
        UnitPower { unit_type, degree }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Unit {
    powers: Vec<UnitPower>,
}

/// `y = slope * x + intercept`, mapping a unit onto the canonical unit of its
/// category (meter, second, kilogram, kelvin).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineModel {
    pub slope: f64,
    pub intercept: f64,
}

impl AffineModel {
    const IDENTITY: AffineModel = AffineModel {
        slope: 1.0,
        intercept: 0.0,
    };

    fn fit(to_canonical: impl Fn(f64) -> f64) -> Self {
        let intercept = to_canonical(0.0);
        AffineModel {
            slope: to_canonical(1.0) - intercept,
            intercept,
        }
    }

    pub fn to_canonical(&self, value: f64) -> f64 {
        self.slope * value + self.intercept
    }

    pub fn from_canonical(&self, value: f64) -> f64 {
        (value - self.intercept) / self.slope
    }
}

/// International avoirdupois pound, exact by definition.
const POUND_IN_KILOGRAMS: f64 = 0.453_592_37;

static MODELS: Lazy<Vec<(UnitType, AffineModel)>> = Lazy::new(|| {
    BUILTIN_UNITS
        .into_iter()
        .map(|unit_type| (unit_type, builtin_model(unit_type)))
        .collect()
});

fn builtin_model(unit_type: UnitType) -> AffineModel {
    match unit_type {
        UnitType::Centimeter => {
            AffineModel::fit(|x| Length::new::<length::centimeter>(x).get::<length::meter>())
        }
        UnitType::Meter => AffineModel::IDENTITY,
        UnitType::Kilometer => {
            AffineModel::fit(|x| Length::new::<length::kilometer>(x).get::<length::meter>())
        }
        UnitType::Inch => {
            AffineModel::fit(|x| Length::new::<length::inch>(x).get::<length::meter>())
        }
        UnitType::Foot => {
            AffineModel::fit(|x| Length::new::<length::foot>(x).get::<length::meter>())
        }
        UnitType::Mile => {
            AffineModel::fit(|x| Length::new::<length::mile>(x).get::<length::meter>())
        }
        UnitType::Second => AffineModel::IDENTITY,
        UnitType::Minute => AffineModel::fit(|x| Time::new::<time::minute>(x).get::<time::second>()),
        UnitType::Hour => AffineModel::fit(|x| Time::new::<time::hour>(x).get::<time::second>()),
        UnitType::Gram => AffineModel::fit(|x| Mass::new::<mass::gram>(x).get::<mass::kilogram>()),
        UnitType::Kilogram => AffineModel::IDENTITY,
        // uom rounds pound and ounce to seven digits.
        UnitType::Pound => AffineModel::fit(|x| {
            Mass::new::<mass::kilogram>(x * POUND_IN_KILOGRAMS).get::<mass::kilogram>()
        }),
        UnitType::Ounce => AffineModel::fit(|x| {
            Mass::new::<mass::kilogram>(x * POUND_IN_KILOGRAMS / 16.0).get::<mass::kilogram>()
        }),
        UnitType::Kelvin => AffineModel::IDENTITY,
        UnitType::Celsius => AffineModel::fit(|x| {
            ThermodynamicTemperature::new::<thermodynamic_temperature::degree_celsius>(x)
                .get::<thermodynamic_temperature::kelvin>()
        }),
        UnitType::Fahrenheit => AffineModel::fit(|x| {
            ThermodynamicTemperature::new::<thermodynamic_temperature::degree_fahrenheit>(x)
                .get::<thermodynamic_temperature::kelvin>()
        }),
        UnitType::User(_) | UnitType::Dimensionless | UnitType::Unknown => AffineModel::IDENTITY,
    }
}

pub fn model(unit_type: UnitType) -> AffineModel {
    MODELS
        .iter()
        .find(|(candidate, _)| *candidate == unit_type)
        .map_or(AffineModel::IDENTITY, |(_, model)| *model)
}

/// Converts `value` from one unit power to another of the same category and
/// degree.
///
/// For degrees other than one the value is first reduced to a single
/// dimension with `powf(1 / degree)`, mapped through the affine models and
/// raised back with `powf(degree)`. Negative values under an even degree
/// therefore come out as NaN.
pub fn convert(value: f64, from: UnitPower, to: UnitPower) -> f64 {
    debug_assert_eq!(from.unit_type.category(), to.unit_type.category());
    debug_assert_eq!(from.degree, to.degree);
    if from.unit_type == to.unit_type {
        return value;
    }
    let degree = f64::from(from.degree);
    let base = value.powf(1.0 / degree);
    let canonical = model(from.unit_type).to_canonical(base);
    let converted = model(to.unit_type).from_canonical(canonical).powf(degree);
    debug!(
        from = %from.unit_type,
        to = %to.unit_type,
        degree = from.degree,
        value,
        converted,
        "converted unit power"
    );
    converted
}

impl Unit {
    pub fn none() -> Self {
        Unit { powers: Vec::new() }
    }

    pub fn unknown() -> Self {
        Unit {
            powers: vec![UnitPower::new(UnitType::Unknown, 0)],
        }
    }

    pub fn single(unit_type: UnitType, degree: i32) -> Self {
        Unit::from_powers([UnitPower::new(unit_type, degree)])
    }

    /// Builds a unit, summing the degrees of repeated types and dropping
    /// zero degrees.
    pub fn from_powers(powers: impl IntoIterator<Item = UnitPower>) -> Self {
        let mut merged: Vec<UnitPower> = Vec::new();
        for power in powers {
            if power.unit_type == UnitType::Unknown {
                return Unit::unknown();
            }
            if power.unit_type == UnitType::Dimensionless {
                continue;
            }
            match merged.iter_mut().find(|p| p.unit_type == power.unit_type) {
                Some(existing) => match existing.degree.checked_add(power.degree) {
                    Some(degree) => existing.degree = degree,
                    None => return Unit::unknown(),
                },
                None => merged.push(power),
            }
        }
        merged.retain(|p| p.degree != 0);
        Unit { powers: merged }
    }

    pub fn powers(&self) -> &[UnitPower] {
        if self.is_unknown() { &[] } else { &self.powers }
    }

    pub fn is_none(&self) -> bool {
        self.powers.is_empty()
            || (self.powers.len() == 1 && self.powers[0].unit_type == UnitType::Dimensionless)
    }

    pub fn is_unknown(&self) -> bool {
        self.powers.len() == 1 && self.powers[0].unit_type == UnitType::Unknown
    }

    /// Raises every entry to `degree`. A degree that leaves `i32` makes the
    /// result unknown.
    pub fn pow(&self, degree: i32) -> Unit {
        if self.is_unknown() {
            return Unit::unknown();
        }
        self.powers()
            .iter()
            .map(|p| {
                p.degree
                    .checked_mul(degree)
                    .map(|d| UnitPower::new(p.unit_type, d))
            })
            .collect::<Option<Vec<_>>>()
            .map_or_else(Unit::unknown, Unit::from_powers)
    }

    pub fn inverse(&self) -> Unit {
        self.pow(-1)
    }

    /// Multiplies two units symbolically.
    ///
    /// With `reject_cross_category` set, two different types of one category
    /// make the result [`Unit::unknown`].
    pub fn combine(&self, other: &Unit, reject_cross_category: bool) -> Unit {
        self.combine_scaled(other, reject_cross_category).0
    }

    /// Like [`Unit::combine`], also returning the factor the product of the
    /// two magnitudes must be multiplied by after entries of `other` were
    /// folded into differently-typed entries of `self`.
    pub fn combine_scaled(&self, other: &Unit, reject_cross_category: bool) -> (Unit, f64) {
        debug_assert!(!self.is_unknown() && !other.is_unknown());
        if self.is_none() {
            return (other.clone(), 1.0);
        }
        if other.is_none() {
            return (self.clone(), 1.0);
        }
        let mut powers = self.powers.clone();
        let mut factor = 1.0;
        for power in &other.powers {
            let category = power.unit_type.category();
            match powers
                .iter_mut()
                .find(|p| p.unit_type.category() == category)
            {
                Some(existing) => {
                    if existing.unit_type != power.unit_type {
                        if reject_cross_category {
                            return (Unit::unknown(), f64::NAN);
                        }
                        let ratio =
                            model(power.unit_type).slope / model(existing.unit_type).slope;
                        factor *= ratio.powi(power.degree);
                        debug!(
                            into = %existing.unit_type,
                            from = %power.unit_type,
                            degrees = ?(existing.degree, power.degree),
                            "combining convertible units' degrees"
                        );
                    }
                    match existing.degree.checked_add(power.degree) {
                        Some(degree) => existing.degree = degree,
                        None => return (Unit::unknown(), f64::NAN),
                    }
                }
                None => powers.push(*power),
            }
        }
        powers.retain(|p| p.degree != 0);
        (Unit { powers }, factor)
    }

    /// True when `self` can be converted into `target`: same number of
    /// entries, each matched by category and degree.
    pub fn is_convertible_to(&self, target: &Unit) -> bool {
        if self.is_unknown() || target.is_unknown() {
            return false;
        }
        let (from, to) = (self.powers(), target.powers());
        from.len() == to.len()
            && from.iter().all(|f| {
                to.iter().any(|t| {
                    t.unit_type.category() == f.unit_type.category() && t.degree == f.degree
                })
            })
    }

    /// Converts `value` expressed in `self` into `target`, entry by entry.
    pub fn convert_value(&self, value: f64, target: &Unit) -> Option<f64> {
        if !self.is_convertible_to(target) {
            return None;
        }
        let to = target.powers();
        self.powers().iter().try_fold(value, |value, from| {
            to.iter()
                .find(|t| t.unit_type.category() == from.unit_type.category())
                .map(|t| convert(value, *from, *t))
        })
    }

    pub fn display<'a>(&'a self, table: &'a UnitTable) -> UnitDisplay<'a> {
        UnitDisplay { unit: self, table }
    }
}

/// Order-independent, degree-exact comparison. Convertible units such as `m`
/// and `km` are not equal.
impl PartialEq for Unit {
    fn eq(&self, other: &Self) -> bool {
        if self.is_none() || other.is_none() {
            return self.is_none() && other.is_none();
        }
        if self.is_unknown() || other.is_unknown() {
            return self.is_unknown() && other.is_unknown();
        }
        self.powers.len() == other.powers.len()
            && self.powers.iter().all(|p| other.powers.contains(p))
            && other.powers.iter().all(|p| self.powers.contains(p))
    }
}

/// Renders a unit with the names of a [`UnitTable`].
///
/// The alternate flag (`{:#}`) spells a dimensionless unit as `none` instead
/// of leaving it empty.
pub struct UnitDisplay<'a> {
    unit: &'a Unit,
    table: &'a UnitTable,
}

impl Display for UnitDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unit.is_unknown() {
            return f.write_str("unknown");
        }
        if self.unit.is_none() {
            return if f.alternate() { f.write_str("none") } else { Ok(()) };
        }
        for (i, power) in self.unit.powers.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(self.table.name(power.unit_type))?;
            if power.degree != 1 {
                write!(f, "^{}", power.degree)?;
            }
        }
        Ok(())
    }
}
