use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Config, Editor};
use tracing::{debug, warn};
use unitcalc_rs::{CalcError, Calculator, Outcome, Quantity, UnitTable, VariableStore};

use crate::ReplConfig;

const PROMPT: &str = "> ";

const HELP: &str = "\
Enter an expression to evaluate it, e.g. `2 km + 300 m -> mi`.

  + - * /         arithmetic; units follow their number: `3 km`, `9.81 m s^-2`
  ^ N             integer power of a unit: `km^2`, `s^-1`
  a -> b          convert the value on the left into the unit on the right
  name = expr     store a value; use `name` in later lines
  unit NAME       define a new unit that only combines with itself

Commands: help, examples, units, memory, quit (or exit)";

const EXAMPLES: &str = "\
  2 cm * 3 + 1.5 cm
  1 km * 3 -> in
  2 s + 3 h - 6 min -> min
  36 km / h -> m / s
  2 min^2 km -> m h^2
  100 C -> F
  speed = 5 km / 30 min
  speed -> m / s";

enum Response {
    Print(String),
    Silent,
    Quit,
}

/// Renders a value with `precision` fractional digits followed by its unit.
pub fn format_quantity(
    quantity: &Quantity,
    units: &UnitTable,
    precision: usize,
    show_none: bool,
) -> String {
    let unit = if show_none {
        format!("{:#}", quantity.unit.display(units))
    } else {
        quantity.unit.display(units).to_string()
    };
    let value = format!("{:.*}", precision, quantity.value);
    if unit.is_empty() {
        value
    } else {
        format!("{} {}", value, unit)
    }
}

/// One line per category, in table order.
pub fn format_units(units: &UnitTable) -> String {
    let mut groups: Vec<(String, Vec<&str>)> = Vec::new();
    for unit_type in units.all() {
        let category = unit_type.category().to_string();
        let name = units.name(unit_type);
        match groups.iter_mut().find(|(c, _)| *c == category) {
            Some((_, names)) => names.push(name),
            None => groups.push((category, vec![name])),
        }
    }
    groups
        .into_iter()
        .map(|(category, names)| format!("{}: {}", category, names.join(" ")))
        .collect::<Vec<_>>()
        .join("\n")
}

pub struct Repl {
    config: ReplConfig,
    calc: Calculator,
}

impl Repl {
    pub fn new(config: ReplConfig) -> Self {
        Repl {
            config,
            calc: Calculator::new(),
        }
    }

    pub fn run(&mut self) -> rustyline::Result<()> {
        let config = Config::builder().history_ignore_space(true).build();
        let mut rl: Editor<(), DefaultHistory> = Editor::with_config(config)?;
        if let Some(path) = &self.config.history {
            if let Err(err) = rl.load_history(path) {
                debug!(%err, path = %path.display(), "no history loaded");
            }
        }
        println!("unitcalc {}. Type `help` for help.", env!("CARGO_PKG_VERSION"));

        loop {
            match rl.readline(PROMPT) {
                Ok(line) => {
                    let _ = rl.add_history_entry(line.as_str());
                    if !self.handle_line(&line) {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => break,
                Err(err) => {
                    eprintln!("error: {}", err);
                    break;
                }
            }
        }

        if let Some(path) = &self.config.history {
            if let Err(err) = rl.save_history(path) {
                warn!(%err, path = %path.display(), "could not save history");
            }
        }
        Ok(())
    }

    pub fn run_batch(&mut self, lines: &[String]) {
        for line in lines {
            if !self.handle_line(line) {
                break;
            }
        }
    }

    /// Prints the response to one line. Returns false once the user quits.
    fn handle_line(&mut self, line: &str) -> bool {
        match self.respond(line) {
            Ok(Response::Print(text)) => println!("{}", text),
            Ok(Response::Silent) => {}
            Ok(Response::Quit) => return false,
            Err(err) => eprintln!("error: {}", err),
        }
        true
    }

    fn respond(&mut self, line: &str) -> Result<Response, CalcError> {
        if let Some(name) = line.trim().strip_prefix("unit ") {
            let name = name.trim();
            self.calc.define_unit(name)?;
            return Ok(Response::Print(format!("defined unit {}", name)));
        }
        let response = match self.calc.eval_line(line)? {
            Outcome::Empty => Response::Silent,
            Outcome::Quit => Response::Quit,
            Outcome::Help => Response::Print(HELP.to_string()),
            Outcome::Examples => Response::Print(EXAMPLES.to_string()),
            Outcome::ShowUnits => Response::Print(format_units(self.calc.units())),
            Outcome::ShowMemory => {
                let listing = self.calc.memory().show_all();
                if listing.is_empty() {
                    Response::Print("no variables defined".to_string())
                } else {
                    Response::Print(listing)
                }
            }
            Outcome::Value(quantity) => Response::Print(self.format(&quantity)),
            Outcome::Assigned { name, quantity } => {
                Response::Print(format!("{} = {}", name, self.format(&quantity)))
            }
        };
        Ok(response)
    }

    fn format(&self, quantity: &Quantity) -> String {
        format_quantity(
            quantity,
            self.calc.units(),
            self.config.precision,
            self.config.show_none,
        )
    }
}
