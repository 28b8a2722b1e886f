//! Generate command - expand changes and write scenario files.

use std::error::Error;
use std::fs;
use std::path::PathBuf;

use chrono::Utc;
use colored::Colorize;

use scenarist::export::{archive_filename, scenario_to_csv, write_archive};
use scenarist::interpret::{InterpretContext, changes_from_slice};
use scenarist::{
    AttributeIndex, ExpandOptions, FileStore, KindConflict, ScenarioSession,
    extract_value_drivers,
};

use crate::cli::{Inputs, InterpreterChoice};

use super::{build_interpreter, load_inputs};

#[allow(clippy::too_many_arguments)]
pub fn run(
    inputs: Inputs,
    changes: Option<PathBuf>,
    prompt: Option<String>,
    interpreter: InterpreterChoice,
    out_dir: PathBuf,
    zip: bool,
    store: Option<PathBuf>,
    strict_kinds: bool,
    verbose: bool,
) -> Result<(), Box<dyn Error>> {
    let (table, catalog) = load_inputs(&inputs)?;
    let index = AttributeIndex::build(&catalog);

    let specs = if let Some(changes_path) = changes {
        changes_from_slice(&fs::read(&changes_path)?)?
    } else if let Some(prompt) = prompt {
        let context = InterpretContext::from_table(extract_value_drivers(&catalog), &table);
        let interpreter = build_interpreter(interpreter)?;
        if verbose {
            println!("Interpreting prompt via {}...", interpreter.name());
        }
        interpreter.interpret(&prompt, &context)?
    } else {
        return Err("provide --changes or --prompt".into());
    };

    let options = ExpandOptions {
        kind_conflict: if strict_kinds {
            KindConflict::Reject
        } else {
            KindConflict::FirstWins
        },
    };
    let mut session = ScenarioSession::new().with_options(options);
    if let Some(store_dir) = store {
        session = session.with_store(FileStore::new(store_dir)?);
    }

    let created = session.create_scenarios(&table, &index, &specs)?;

    println!(
        "{} {} scenario(s) from {} change spec(s)",
        "Created".green().bold(),
        created.len(),
        specs.len()
    );
    for scenario in created {
        println!(
            "  {} ({}/{} rows modified)",
            scenario.name.white().bold(),
            scenario.meta.modified_rows,
            scenario.meta.total_rows
        );
    }

    fs::create_dir_all(&out_dir)?;
    if zip {
        let path = out_dir.join(archive_filename(Utc::now().date_naive()));
        write_archive(&path, created)?;
        println!("{} {}", "Wrote".green().bold(), path.display());
    } else {
        for scenario in created {
            let path = out_dir.join(format!("{}.csv", scenario.name));
            fs::write(&path, scenario_to_csv(scenario)?)?;
            if verbose {
                println!("{} {}", "Wrote".green().bold(), path.display());
            }
        }
        println!(
            "{} {} CSV file(s) to {}",
            "Wrote".green().bold(),
            created.len(),
            out_dir.display()
        );
    }

    Ok(())
}
