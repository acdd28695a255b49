use unitcalc_rs::{Memory, Unit, UnitPower, UnitType, infer_unit, parse, tokenize};

fn infer(input: &str) -> Unit {
    let memory = Memory::new();
    let expr = parse(&tokenize(input, memory.units()));
    infer_unit(&expr, &memory)
}

fn unit(powers: &[(UnitType, i32)]) -> Unit {
    Unit::from_powers(powers.iter().map(|&(t, d)| UnitPower::new(t, d)))
}

#[test]
fn plain_numbers_have_no_unit() {
    assert!(infer("3000 - 600*20/2.5 + 20").is_none());
}

#[test]
fn different_categories_stay_separate() {
    assert_eq!(
        infer("1 km * 2 oz * 3 h"),
        unit(&[
            (UnitType::Kilometer, 1),
            (UnitType::Ounce, 1),
            (UnitType::Hour, 1)
        ])
    );
}

#[test]
fn same_category_merges_into_the_first_type() {
    assert_eq!(
        infer("1km*2mi*3h*4km*5mi*2s"),
        unit(&[(UnitType::Kilometer, 4), (UnitType::Hour, 2)])
    );
}

#[test]
fn adjacent_units_of_one_category_are_inconsistent() {
    assert!(infer("2 km m cm").is_unknown());
    assert_eq!(infer("2 km km"), unit(&[(UnitType::Kilometer, 2)]));
}

#[test]
fn powers_multiply_degrees() {
    assert_eq!(infer("50 km ^ -2 ^ 3"), unit(&[(UnitType::Kilometer, -6)]));
    assert_eq!(infer("50 km ^ -2 km"), unit(&[(UnitType::Kilometer, -1)]));
    assert!(infer("km ^ 0").is_none());
}

#[test]
fn opposite_degrees_cancel() {
    assert!(infer("1 kg * 2 g ^-1").is_none());
    assert!(infer("6 min / 2 min").is_none());
}

#[test]
fn addition_requires_convertible_operands() {
    assert_eq!(
        infer("50 km s^-1 + 50 s^-1 km"),
        unit(&[(UnitType::Kilometer, 1), (UnitType::Second, -1)])
    );
    assert_eq!(
        infer("1 m / s + 2 km / h"),
        unit(&[(UnitType::Meter, 1), (UnitType::Second, -1)])
    );
    assert!(infer("1 mi + 1 h").is_unknown());
    assert!(infer("1 km + 1").is_unknown());
    assert!(infer("1km*2mi*3h*4km*5mi*2s + km").is_unknown());
}

#[test]
fn conversion_requires_matching_degrees() {
    assert_eq!(infer("2 m^2 -> cm^2"), unit(&[(UnitType::Centimeter, 2)]));
    assert!(infer("2 m^2 -> cm^1").is_unknown());
    assert!(infer("1 -> km").is_unknown());
    assert_eq!(
        infer("2 min^2 km -> m h^2"),
        unit(&[(UnitType::Meter, 1), (UnitType::Hour, 2)])
    );
}

#[test]
fn division_inverts_the_right_operand() {
    assert_eq!(
        infer("1 m^2 / s^2 kg^2"),
        unit(&[
            (UnitType::Meter, 2),
            (UnitType::Second, -2),
            (UnitType::Kilogram, -2)
        ])
    );
    assert_eq!(
        infer("1 kg * 2 kg ^ -3 km"),
        unit(&[(UnitType::Kilogram, -2), (UnitType::Kilometer, 1)])
    );
}

#[test]
fn unknown_is_absorbing() {
    assert!(infer("2 km m cm * 3 s").is_unknown());
    assert!(infer("2 km m cm -> km").is_unknown());
}
