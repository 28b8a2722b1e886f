//! Command implementations.

pub mod drivers;
pub mod generate;
pub mod interpret;

use std::error::Error;
use std::fs;

use scenarist::{Product, Table, input};

use crate::cli::{Inputs, InterpreterChoice};

/// Load the base table and catalog from the chosen input form.
pub fn load_inputs(inputs: &Inputs) -> Result<(Table, Vec<Product>), Box<dyn Error>> {
    if let Some(archive) = &inputs.archive {
        let bytes = fs::read(archive)?;
        return Ok(input::parse_archive_bytes(&bytes)?);
    }

    let (Some(table), Some(catalog)) = (&inputs.table, &inputs.catalog) else {
        return Err("provide --table and --catalog, or --archive".into());
    };
    Ok((
        input::parse_table_file(table)?,
        input::parse_catalog_file(catalog)?,
    ))
}

/// Build the selected intent interpreter.
pub fn build_interpreter(
    choice: InterpreterChoice,
) -> Result<Box<dyn scenarist::IntentInterpreter>, Box<dyn Error>> {
    Ok(match choice {
        InterpreterChoice::Heuristic => Box::new(scenarist::HeuristicInterpreter::new()),
        InterpreterChoice::Openai => {
            Box::new(scenarist::interpret::OpenAiInterpreter::from_env()?)
        }
    })
}
