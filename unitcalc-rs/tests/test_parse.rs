use unitcalc_rs::{Expression, Unit, UnitTable, UnitType, parse, tokenize};

fn parse_str(input: &str) -> Expression {
    parse(&tokenize(input, &UnitTable::new()))
}

fn num(value: f64) -> Box<Expression> {
    Box::new(Expression::Constant(value))
}

fn unit(unit_type: UnitType) -> Box<Expression> {
    Box::new(Expression::UnitLiteral(Unit::single(unit_type, 1)))
}

fn neg(expr: Box<Expression>) -> Box<Expression> {
    Box::new(Expression::Negate(expr))
}

fn pow(base: Box<Expression>, degree: Box<Expression>) -> Box<Expression> {
    Box::new(Expression::Pow(base, degree))
}

fn composite(left: Box<Expression>, right: Box<Expression>) -> Box<Expression> {
    Box::new(Expression::CompositeUnit(left, right))
}

fn quantity(value: f64, unit: Box<Expression>) -> Box<Expression> {
    Box::new(Expression::ConstWithUnit(num(value), unit))
}

#[test]
fn test_can_parse_two_factors() {
    assert_eq!(parse_str("1 * 2"), Expression::Mul(num(1.0), num(2.0)));
}

#[test]
fn test_can_parse_three_factors() {
    assert_eq!(
        parse_str("1 * 2 * 3"),
        Expression::Mul(Box::new(Expression::Mul(num(1.0), num(2.0))), num(3.0))
    );
}

#[test]
fn test_subtraction_is_left_associative() {
    assert_eq!(
        parse_str("1 - 2 - 3"),
        Expression::Sub(Box::new(Expression::Sub(num(1.0), num(2.0))), num(3.0))
    );
}

#[test]
fn test_addition_binds_looser_than_multiplication() {
    assert_eq!(
        parse_str("2 cm * 3 + 1.5cm"),
        Expression::Add(
            Box::new(Expression::Mul(quantity(2.0, unit(UnitType::Centimeter)), num(3.0))),
            quantity(1.5, unit(UnitType::Centimeter)),
        )
    );
}

#[test]
fn test_multiplication_and_division_share_a_level() {
    assert_eq!(
        parse_str("6 min / 2 min * 3 s"),
        Expression::Mul(
            Box::new(Expression::Div(
                quantity(6.0, unit(UnitType::Minute)),
                quantity(2.0, unit(UnitType::Minute)),
            )),
            quantity(3.0, unit(UnitType::Second)),
        )
    );
}

#[test]
fn test_negation_after_operator() {
    assert_eq!(
        parse_str("2 * -3"),
        Expression::Mul(num(2.0), neg(num(3.0)))
    );
    assert_eq!(parse_str("--1"), *neg(neg(num(1.0))));
}

#[test]
fn test_unit_sequence_with_degrees() {
    assert_eq!(
        parse_str("--1 s^-2 km ^3 cm^4"),
        *neg(neg(quantity(
            1.0,
            composite(
                composite(
                    pow(unit(UnitType::Second), neg(num(2.0))),
                    pow(unit(UnitType::Kilometer), num(3.0)),
                ),
                pow(unit(UnitType::Centimeter), num(4.0)),
            )
        )))
    );
}

#[test]
fn test_repeated_negation_in_degree() {
    assert_eq!(
        parse_str("oz ^--5"),
        *pow(unit(UnitType::Ounce), neg(neg(num(5.0))))
    );
}

#[test]
fn test_chained_powers() {
    assert_eq!(
        parse_str("50 km ^ -2 ^ 3"),
        *quantity(
            50.0,
            pow(pow(unit(UnitType::Kilometer), neg(num(2.0))), num(3.0))
        )
    );
}

#[test]
fn test_binary_minus_after_unit() {
    assert_eq!(
        parse_str("---6lb---7oz"),
        Expression::Sub(
            neg(neg(neg(quantity(6.0, unit(UnitType::Pound))))),
            neg(neg(quantity(7.0, unit(UnitType::Ounce)))),
        )
    );
}

#[test]
fn test_conversion_is_loosest() {
    assert_eq!(
        parse_str("1 km * 3 -> in"),
        Expression::Convert(
            Box::new(Expression::Mul(quantity(1.0, unit(UnitType::Kilometer)), num(3.0))),
            unit(UnitType::Inch),
        )
    );
}

#[test]
fn test_conversion_target_quotient() {
    assert_eq!(
        parse_str("1 -> m / s"),
        Expression::Convert(
            num(1.0),
            Box::new(Expression::DivUnit(unit(UnitType::Meter), unit(UnitType::Second))),
        )
    );
}

#[test]
fn test_assignment_and_variables() {
    assert_eq!(
        parse_str("speed = d / 2 h"),
        Expression::Assign {
            name: "speed".to_string(),
            value: Box::new(Expression::Div(
                Box::new(Expression::Variable("d".to_string())),
                quantity(2.0, unit(UnitType::Hour)),
            )),
        }
    );
}

#[test]
fn test_commands() {
    assert_eq!(parse_str("help"), Expression::Help);
    assert_eq!(parse_str("units"), Expression::ShowUnits);
    assert_eq!(parse_str("memory"), Expression::ShowMemory);
    assert_eq!(parse_str("examples"), Expression::Examples);
    assert_eq!(parse_str("quit"), Expression::Quit);
    assert_eq!(
        parse_str("1 + help"),
        Expression::Add(num(1.0), Box::new(Expression::Help))
    );
}

#[test]
fn test_malformed_operands() {
    assert_eq!(parse_str("1 +"), Expression::Invalid);
    assert_eq!(parse_str("-> km"), Expression::Invalid);
    assert_eq!(parse_str("1 asdf 2"), Expression::Invalid);
    assert_eq!(
        parse_str("1 km ^ asdf"),
        Expression::Invalid
    );
}
