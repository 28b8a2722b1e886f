//! Interpret command - show what a prompt parses into.

use std::error::Error;

use colored::Colorize;

use scenarist::extract_value_drivers;
use scenarist::interpret::{InterpretContext, WireChange};

use crate::cli::{Inputs, InterpreterChoice};

use super::{build_interpreter, load_inputs};

pub fn run(
    prompt: String,
    inputs: Inputs,
    interpreter: InterpreterChoice,
) -> Result<(), Box<dyn Error>> {
    let (table, catalog) = load_inputs(&inputs)?;
    let context = InterpretContext::from_table(extract_value_drivers(&catalog), &table);

    let interpreter = build_interpreter(interpreter)?;
    let specs = interpreter.interpret(&prompt, &context)?;

    println!(
        "{} {} change spec(s) via {}",
        "Parsed".green().bold(),
        specs.len(),
        interpreter.name()
    );
    // Wire format, so the output can feed `generate --changes`.
    let wire: Vec<WireChange> = specs.iter().map(WireChange::from_change_spec).collect();
    println!("{}", serde_json::to_string_pretty(&wire)?);
    Ok(())
}
