//! Drivers command - list value drivers and their options.

use std::error::Error;

use colored::Colorize;

use scenarist::extract_value_drivers;

use crate::cli::Inputs;

use super::load_inputs;

pub fn run(inputs: Inputs, json: bool) -> Result<(), Box<dyn Error>> {
    let (_, catalog) = load_inputs(&inputs)?;
    let drivers = extract_value_drivers(&catalog);

    if json {
        println!("{}", serde_json::to_string_pretty(&drivers)?);
        return Ok(());
    }

    if drivers.is_empty() {
        println!("No value drivers found in the catalog.");
        return Ok(());
    }

    for (driver, values) in &drivers {
        println!("{} ({} values)", driver.cyan().bold(), values.len());
        for value in values {
            println!("  {}", value);
        }
    }
    Ok(())
}
