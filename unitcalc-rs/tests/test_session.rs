use unitcalc_rs::{CalcError, Calculator, Outcome, UnitTableError, VariableStore};

#[test]
fn commands_return_outcomes() {
    let mut calc = Calculator::new();
    assert_eq!(calc.eval_line("help"), Ok(Outcome::Help));
    assert_eq!(calc.eval_line("units"), Ok(Outcome::ShowUnits));
    assert_eq!(calc.eval_line("examples"), Ok(Outcome::Examples));
    assert_eq!(calc.eval_line("quit"), Ok(Outcome::Quit));
    assert_eq!(calc.eval_line("  exit "), Ok(Outcome::Quit));
}

#[test]
fn inconsistent_units_are_reported() {
    let mut calc = Calculator::new();
    assert_eq!(calc.eval_line("2 km m cm"), Err(CalcError::InconsistentUnits));
    assert_eq!(calc.eval_line("1 mi + 1 h"), Err(CalcError::InconsistentUnits));
    assert_eq!(calc.eval_line("1 -> km"), Err(CalcError::InconsistentUnits));
}

#[test]
fn variables_persist_between_lines() {
    let mut calc = Calculator::new();
    calc.eval_line("distance = 3 km + 500 m").unwrap();
    calc.eval_line("time = 30 min").unwrap();
    let Ok(Outcome::Value(speed)) = calc.eval_line("distance / time -> km / h") else {
        panic!("speed did not evaluate");
    };
    assert!((speed.value - 7.0).abs() < 1e-9);
    assert_eq!(speed.unit.display(calc.units()).to_string(), "km h^-1");
    assert_eq!(
        calc.memory().show_all(),
        "distance = 3.5 km\ntime = 30 min"
    );
}

#[test]
fn rebinding_replaces_the_value() {
    let mut calc = Calculator::new();
    calc.eval_line("x = 1").unwrap();
    calc.eval_line("x = x + 1").unwrap();
    let Ok(Outcome::Value(x)) = calc.eval_line("x") else {
        panic!("x did not evaluate");
    };
    assert_eq!(x.value, 2.0);
    assert!(x.unit.is_none());
}

#[test]
fn user_units_behave_like_their_own_category() {
    let mut calc = Calculator::new();
    calc.define_unit("apple").unwrap();
    let Ok(Outcome::Value(q)) = calc.eval_line("3 apple * 2 apple / h") else {
        panic!("user unit did not evaluate");
    };
    assert_eq!(q.value, 6.0);
    assert_eq!(q.unit.display(calc.units()).to_string(), "apple^2 h^-1");
    assert_eq!(calc.eval_line("1 apple + 1 km"), Err(CalcError::InconsistentUnits));
    assert_eq!(calc.eval_line("1 apple -> km"), Err(CalcError::InconsistentUnits));
}

#[test]
fn user_unit_names_are_checked() {
    let mut calc = Calculator::new();
    assert_eq!(
        calc.define_unit("km"),
        Err(CalcError::UnitTable(UnitTableError::AlreadyRegistered(
            "km".to_string()
        )))
    );
    assert_eq!(
        calc.define_unit("help"),
        Err(CalcError::UnitTable(UnitTableError::InvalidName(
            "help".to_string()
        )))
    );
    assert_eq!(
        calc.define_unit("2x"),
        Err(CalcError::UnitTable(UnitTableError::InvalidName(
            "2x".to_string()
        )))
    );
    calc.define_unit("apple").unwrap();
    assert_eq!(
        calc.define_unit("apple"),
        Err(CalcError::UnitTable(UnitTableError::AlreadyRegistered(
            "apple".to_string()
        )))
    );
}

#[test]
fn degrees_beyond_i32_are_inconsistent() {
    let mut calc = Calculator::new();
    assert_eq!(
        calc.eval_line("1 km^2147483647 km"),
        Err(CalcError::InconsistentUnits)
    );
    assert_eq!(
        calc.eval_line("1 km^2147483647^2"),
        Err(CalcError::InconsistentUnits)
    );
    assert_eq!(
        calc.eval_line("1 km^2147483647 * 1 mi"),
        Err(CalcError::InconsistentUnits)
    );
    let Ok(Outcome::Value(q)) = calc.eval_line("1 km^2147483647") else {
        panic!("largest degree did not evaluate");
    };
    assert_eq!(q.value, 1.0);
}
