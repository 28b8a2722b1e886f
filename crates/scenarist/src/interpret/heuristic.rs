//! Pattern-matching fallback interpreter. Works offline; recognizes
//! the common phrasings and leaves everything subtler to the
//! model-backed interpreter.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Result, ScenaristError};
use crate::scenario::{ChangeKind, ChangeSpec, MetricChange, MetricSpec};
use crate::table::parse_decimal;

use super::{InterpretContext, IntentInterpreter};

static PRICE_VALUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)price\s*(?:increase|decrease|change|by|to)?\s*([+-]?\d+(?:[.,]\d+)?)")
        .unwrap()
});
static AVAILABILITY_VALUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:availability|stock)\s*(?:increase|decrease|change|by)?\s*([+-]?\d+(?:[.,]\d+)?)")
        .unwrap()
});
static COST_VALUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)cost\s*(?:increase|decrease|change|by)?\s*([+-]?\d+(?:[.,]\d+)?)").unwrap()
});
static RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+(?:[.,]\d+)?)\s*%?\s*(?:to|-|through)\s*(\d+(?:[.,]\d+)?)").unwrap()
});

/// Regex-and-keyword interpretation over the dataset context.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicInterpreter;

impl HeuristicInterpreter {
    /// Create a heuristic interpreter.
    pub fn new() -> Self {
        Self
    }
}

impl IntentInterpreter for HeuristicInterpreter {
    fn interpret(&self, prompt: &str, context: &InterpretContext) -> Result<Vec<ChangeSpec>> {
        let lower = prompt.to_lowercase();
        let mut spec = ChangeSpec::new();

        extract_column_filters(&lower, context, &mut spec);
        extract_attribute_filters(&lower, context, &mut spec);
        extract_metrics(&lower, &mut spec);
        extract_ranges(&lower, &mut spec);

        if spec == ChangeSpec::default() {
            return Err(ScenaristError::Interpretation(
                "could not interpret the prompt; try naming a metric, a value, or a filter"
                    .to_string(),
            ));
        }
        Ok(vec![spec])
    }

    fn name(&self) -> &str {
        "heuristic"
    }
}

/// Competitor, region, and retailer column cues.
fn extract_column_filters(lower: &str, context: &InterpretContext, spec: &mut ChangeSpec) {
    if lower.contains("competitor") {
        if let Some(column) = find_column(context, "competitor") {
            spec.column_filters.insert(column, vec!["Yes".to_string()]);
        }
    }
    if ["own product", "our product", "own brand"]
        .iter()
        .any(|cue| lower.contains(cue))
    {
        if let Some(column) = find_column(context, "competitor") {
            spec.column_filters.insert(column, vec!["No".to_string()]);
        }
    }

    for cue in ["region", "retailer"] {
        for column in &context.columns {
            if !column.to_lowercase().contains(cue) {
                continue;
            }
            let mentioned: Vec<String> = context
                .samples(column)
                .iter()
                .filter(|value| lower.contains(&value.to_lowercase()))
                .cloned()
                .collect();
            if !mentioned.is_empty() {
                spec.column_filters.insert(column.clone(), mentioned);
            }
        }
    }
}

/// Match value-driver names and their options against the prompt.
fn extract_attribute_filters(lower: &str, context: &InterpretContext, spec: &mut ChangeSpec) {
    for (driver, options) in &context.value_drivers {
        if !word_mentioned(lower, driver) {
            continue;
        }
        let mentioned: Vec<String> = options
            .iter()
            .filter(|option| word_mentioned(lower, option))
            .cloned()
            .collect();
        if !mentioned.is_empty() {
            spec.attribute_filters.insert(driver.clone(), mentioned);
        }
    }
}

/// Whether the prompt mentions an underscore-separated identifier,
/// either verbatim or by any of its words.
fn word_mentioned(lower: &str, identifier: &str) -> bool {
    let identifier = identifier.to_lowercase();
    if lower.contains(&identifier) {
        return true;
    }
    identifier.split('_').any(|word| lower.contains(word))
}

fn extract_metrics(lower: &str, spec: &mut ChangeSpec) {
    let negate = lower.contains("decrease") || lower.contains("reduce") || lower.contains("lower");
    let percent = lower.contains('%') || lower.contains("percent");
    let kind = if percent {
        ChangeKind::Percentage
    } else {
        ChangeKind::Absolute
    };

    if let Some(value) = captured_value(&PRICE_VALUE, lower, negate) {
        let kind = if lower.contains("target price") {
            ChangeKind::Target
        } else {
            kind
        };
        spec.price = MetricChange::value(value, kind);
    }
    if let Some(value) = captured_value(&AVAILABILITY_VALUE, lower, negate) {
        spec.availability = MetricChange::value(value, kind);
    }
    if let Some(value) = captured_value(&COST_VALUE, lower, negate) {
        spec.cost = MetricChange::value(value, kind);
    }
}

/// A `from .. to ..` phrasing replaces the single value for whichever
/// metric the prompt names, price taking priority.
fn extract_ranges(lower: &str, spec: &mut ChangeSpec) {
    let Some(captures) = RANGE.captures(lower) else {
        return;
    };
    let (Some(from), Some(to)) = (
        captures.get(1).and_then(|m| parse_decimal(m.as_str())),
        captures.get(2).and_then(|m| parse_decimal(m.as_str())),
    ) else {
        return;
    };

    let percent = lower.contains('%') || lower.contains("percent");
    let kind = if percent {
        ChangeKind::Percentage
    } else {
        ChangeKind::Absolute
    };
    let range = MetricChange {
        spec: MetricSpec::Range {
            from,
            to,
            step: 1.0,
        },
        kind,
    };

    if lower.contains("price") {
        spec.price = range;
    } else if lower.contains("availability") {
        spec.availability = range;
    } else if lower.contains("cost") {
        spec.cost = range;
    }
}

fn captured_value(regex: &Regex, lower: &str, negate: bool) -> Option<f64> {
    let capture = regex.captures(lower)?.get(1)?;
    let value = parse_decimal(capture.as_str())?;
    let signed = capture.as_str().starts_with(['+', '-']);
    if negate && !signed {
        Some(-value)
    } else {
        Some(value)
    }
}

fn find_column(context: &InterpretContext, cue: &str) -> Option<String> {
    context
        .columns
        .iter()
        .find(|column| column.to_lowercase().contains(cue))
        .cloned()
}
