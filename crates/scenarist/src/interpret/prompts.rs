//! Prompt templates for the model-backed interpreter.

use serde_json::json;

use super::InterpretContext;

/// How many options/samples to inline per driver or column.
const CONTEXT_LIMIT: usize = 10;

/// Build the system prompt describing the dataset and the wire format
/// the model must return.
pub fn system_prompt(context: &InterpretContext) -> String {
    let drivers: Vec<_> = context
        .value_drivers
        .iter()
        .map(|(driver, options)| {
            json!({
                "name": driver,
                "options": options.iter().take(CONTEXT_LIMIT).collect::<Vec<_>>(),
            })
        })
        .collect();

    let columns: Vec<_> = context
        .columns
        .iter()
        .map(|column| {
            json!({
                "name": column,
                "sampleValues": context
                    .samples(column)
                    .iter()
                    .take(CONTEXT_LIMIT)
                    .collect::<Vec<_>>(),
            })
        })
        .collect();

    let driver_context =
        serde_json::to_string_pretty(&drivers).unwrap_or_else(|_| "[]".to_string());
    let column_context =
        serde_json::to_string_pretty(&columns).unwrap_or_else(|_| "[]".to_string());

    format!(
        r#"You are a scenario creation assistant. Interpret user requests and convert them into structured scenario change parameters.

Available CSV columns (for direct filtering):
{column_context}

Available value drivers (from the product master, for product-level filtering):
{driver_context}

Return a JSON array of change objects. Each change object has this structure:
{{
  "filters": {{ "valueDriverId": ["option1", "option2"] }},
  "csvFilters": {{ "Column Name": ["value1", "value2"] }},
  "priceChange": number or null,
  "priceChangeType": "Absolute" | "Percentage" | "Target",
  "priceChangeRange": boolean,
  "priceChangeFrom": number or null,
  "priceChangeTo": number or null,
  "priceChangeStep": number or null,
  "availabilityChange": number or null,
  "availabilityChangeType": "Absolute" | "Percentage",
  "availabilityChangeRange": boolean,
  "availabilityChangeFrom": number or null,
  "availabilityChangeTo": number or null,
  "availabilityChangeStep": number or null,
  "costChange": number or null,
  "costChangeType": "Absolute" | "Percentage",
  "costChangeRange": boolean,
  "costChangeFrom": number or null,
  "costChangeTo": number or null,
  "costChangeStep": number or null
}}

Rules:
- If the user mentions a range (e.g. "5% to 15%"), set the range fields and leave the single value null.
- If the user mentions a single value, set the single value and the range flag to false.
- Use "filters" for value drivers (brand, format, ...) and "csvFilters" for CSV columns (Is Competitor, Region, Retailer, ...).
- "competitor products" means csvFilters {{"Is Competitor": ["Yes"]}}; "own products" means ["No"].
- Use "Absolute" for fixed amounts, "Percentage" for percentages, and "Target" only when the user names a target price.
- Return only valid JSON, no markdown or explanations."#
    )
}
