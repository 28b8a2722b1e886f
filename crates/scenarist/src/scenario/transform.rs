//! Row transformation: apply one concrete scenario's changes to every
//! matching row of the base table.

use crate::table::{CellValue, Row, Table, number_or_zero};

use super::change::{ChangeKind, Metric};
use super::expand::{MetricParam, ScenarioParams};
use super::filter::{FilterEvaluator, LookupKey};

/// A derived table plus the count of rows that actually changed.
#[derive(Debug, Clone)]
pub struct TransformOutcome {
    pub table: Table,
    pub modified_rows: usize,
}

/// Apply one scenario's parameters to a base table.
///
/// Every base row is emitted; filters only decide which rows change.
/// Matching rows get their current values rewritten and one pair of
/// annotation columns per present metric. Rows whose product name does
/// not resolve in the index stay untouched.
pub fn apply_params(
    table: &Table,
    params: &ScenarioParams,
    evaluator: &FilterEvaluator<'_>,
) -> TransformOutcome {
    let mut derived = Table::new(table.columns.clone(), Vec::with_capacity(table.rows.len()));
    for metric in Metric::ALL {
        if params.metric(metric).is_some() {
            derived.ensure_column(metric.current_column());
            derived.ensure_column(metric.change_column());
            derived.ensure_column(metric.change_type_column());
        }
    }

    let mut modified_rows = 0;
    for row in &table.rows {
        let mut out = row.clone();
        if evaluator.matches(
            row,
            &params.column_filters,
            &params.attribute_filters,
            LookupKey::ProductName,
        ) {
            for metric in Metric::ALL {
                if let Some(param) = params.metric(metric) {
                    apply_metric(&mut out, metric, param);
                }
            }
        }
        if is_modified(&out) {
            modified_rows += 1;
        }
        derived.rows.push(out);
    }

    TransformOutcome {
        table: derived,
        modified_rows,
    }
}

/// Rewrite one metric on a row and record the annotation columns.
fn apply_metric(row: &mut Row, metric: Metric, param: &MetricParam) {
    let current = number_or_zero(row, metric.current_column());
    let declared = param.value;

    // Target is price-only, enforced at expansion time.
    let (new_value, recorded) = match param.kind {
        ChangeKind::Target => (declared, declared - current),
        ChangeKind::Percentage => (current * (1.0 + declared / 100.0), declared),
        ChangeKind::Absolute => (current + declared, declared),
    };

    let new_value = match metric {
        Metric::Availability => new_value.clamp(0.0, 100.0),
        Metric::Price | Metric::Cost => new_value,
    };

    row.insert(metric.change_column().to_string(), CellValue::Number(recorded));
    row.insert(
        metric.change_type_column().to_string(),
        CellValue::from(change_type_label(recorded, param.kind)),
    );
    row.insert(
        metric.current_column().to_string(),
        CellValue::from(format!("{new_value:.2}")),
    );
}

/// The change-type label for a recorded change value.
fn change_type_label(recorded: f64, kind: ChangeKind) -> &'static str {
    match kind {
        ChangeKind::Target => "TARGET_PRICE",
        ChangeKind::Percentage => {
            if recorded >= 0.0 {
                "INCREASE_PERCENT"
            } else {
                "DECREASE_PERCENT"
            }
        }
        ChangeKind::Absolute => {
            if recorded >= 0.0 {
                "INCREASE_AMOUNT"
            } else {
                "DECREASE_AMOUNT"
            }
        }
    }
}

/// A row counts as modified when any change column is populated.
fn is_modified(row: &Row) -> bool {
    Metric::ALL
        .iter()
        .any(|m| row.get(m.change_column()).is_some_and(|cell| !cell.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AttributeIndex, Product};
    use crate::scenario::expand::ScenarioParams;
    use crate::scenario::filter::FilterSet;
    use crate::table::{
        COL_CURRENT_AVAILABILITY, COL_CURRENT_COST, COL_CURRENT_PRICE, COL_PRODUCT_NAME,
        COL_VARIANT_ID,
    };

    fn base_row(name: &str, price: &str, availability: &str, cost: &str) -> Row {
        let mut row = Row::new();
        row.insert(COL_VARIANT_ID.to_string(), CellValue::from("var_01"));
        row.insert(COL_PRODUCT_NAME.to_string(), CellValue::from(name));
        row.insert(COL_CURRENT_PRICE.to_string(), CellValue::from(price));
        row.insert(COL_CURRENT_AVAILABILITY.to_string(), CellValue::from(availability));
        row.insert(COL_CURRENT_COST.to_string(), CellValue::from(cost));
        row.insert("Region".to_string(), CellValue::from("North"));
        row
    }

    fn base_table() -> Table {
        Table::new(
            vec![
                COL_VARIANT_ID.to_string(),
                COL_PRODUCT_NAME.to_string(),
                COL_CURRENT_PRICE.to_string(),
                COL_CURRENT_AVAILABILITY.to_string(),
                COL_CURRENT_COST.to_string(),
                "Region".to_string(),
            ],
            vec![base_row("Ice Tea Lemon", "10.00", "95", "4.00")],
        )
    }

    fn index() -> AttributeIndex {
        AttributeIndex::build(&[
            Product::new("prod_01", "Ice Tea Lemon").with_attribute("brand", "brand_own"),
        ])
    }

    fn price_params(value: f64, kind: ChangeKind) -> ScenarioParams {
        ScenarioParams {
            price: Some(MetricParam { value, kind }),
            ..ScenarioParams::default()
        }
    }

    #[test]
    fn test_absolute_price_change() {
        let idx = index();
        let evaluator = FilterEvaluator::new(&idx);
        let outcome = apply_params(&base_table(), &price_params(2.5, ChangeKind::Absolute), &evaluator);

        let row = &outcome.table.rows[0];
        assert_eq!(row[COL_CURRENT_PRICE], CellValue::from("12.50"));
        assert_eq!(row["Price Change"], CellValue::Number(2.5));
        assert_eq!(row["Price Change Type"], CellValue::from("INCREASE_AMOUNT"));
        assert_eq!(outcome.modified_rows, 1);
    }

    #[test]
    fn test_percentage_price_decrease() {
        let idx = index();
        let evaluator = FilterEvaluator::new(&idx);
        let outcome =
            apply_params(&base_table(), &price_params(-10.0, ChangeKind::Percentage), &evaluator);

        let row = &outcome.table.rows[0];
        assert_eq!(row[COL_CURRENT_PRICE], CellValue::from("9.00"));
        assert_eq!(row["Price Change"], CellValue::Number(-10.0));
        assert_eq!(row["Price Change Type"], CellValue::from("DECREASE_PERCENT"));
    }

    #[test]
    fn test_target_price_records_implied_delta() {
        let idx = index();
        let evaluator = FilterEvaluator::new(&idx);
        let outcome =
            apply_params(&base_table(), &price_params(12.5, ChangeKind::Target), &evaluator);

        let row = &outcome.table.rows[0];
        assert_eq!(row[COL_CURRENT_PRICE], CellValue::from("12.50"));
        assert_eq!(row["Price Change"], CellValue::Number(2.5));
        assert_eq!(row["Price Change Type"], CellValue::from("TARGET_PRICE"));
    }

    #[test]
    fn test_availability_clamped_to_hundred() {
        let idx = index();
        let evaluator = FilterEvaluator::new(&idx);
        let params = ScenarioParams {
            availability: Some(MetricParam {
                value: 20.0,
                kind: ChangeKind::Percentage,
            }),
            ..ScenarioParams::default()
        };
        let outcome = apply_params(&base_table(), &params, &evaluator);

        let row = &outcome.table.rows[0];
        // 95 * 1.2 = 114, clamped; the recorded change stays raw.
        assert_eq!(row[COL_CURRENT_AVAILABILITY], CellValue::from("100.00"));
        assert_eq!(row["Availability Change"], CellValue::Number(20.0));
        assert_eq!(row["Availability Change Type"], CellValue::from("INCREASE_PERCENT"));
    }

    #[test]
    fn test_availability_clamped_to_zero() {
        let idx = index();
        let evaluator = FilterEvaluator::new(&idx);
        let params = ScenarioParams {
            availability: Some(MetricParam {
                value: -120.0,
                kind: ChangeKind::Absolute,
            }),
            ..ScenarioParams::default()
        };
        let outcome = apply_params(&base_table(), &params, &evaluator);
        assert_eq!(
            outcome.table.rows[0][COL_CURRENT_AVAILABILITY],
            CellValue::from("0.00")
        );
    }

    #[test]
    fn test_cost_change_is_not_clamped() {
        let idx = index();
        let evaluator = FilterEvaluator::new(&idx);
        let params = ScenarioParams {
            cost: Some(MetricParam {
                value: -10.0,
                kind: ChangeKind::Absolute,
            }),
            ..ScenarioParams::default()
        };
        let outcome = apply_params(&base_table(), &params, &evaluator);

        let row = &outcome.table.rows[0];
        assert_eq!(row[COL_CURRENT_COST], CellValue::from("-6.00"));
        assert_eq!(row["Cost Change Type"], CellValue::from("DECREASE_AMOUNT"));
    }

    #[test]
    fn test_non_matching_rows_pass_through_unchanged() {
        let idx = index();
        let evaluator = FilterEvaluator::new(&idx);
        let mut params = price_params(5.0, ChangeKind::Absolute);
        params.column_filters = FilterSet::new().allow("Region", ["South"]);

        let outcome = apply_params(&base_table(), &params, &evaluator);
        assert_eq!(outcome.modified_rows, 0);
        assert_eq!(outcome.table.row_count(), 1);
        let row = &outcome.table.rows[0];
        assert_eq!(row[COL_CURRENT_PRICE], CellValue::from("10.00"));
        assert!(!row.contains_key("Price Change"));
        // Annotation columns still exist in the header for export.
        assert!(outcome.table.has_column("Price Change"));
    }

    #[test]
    fn test_unresolvable_product_name_is_left_alone() {
        let idx = index();
        let evaluator = FilterEvaluator::new(&idx);
        let mut table = base_table();
        table.rows[0].insert(COL_PRODUCT_NAME.to_string(), CellValue::from("Ghost"));

        let mut params = price_params(5.0, ChangeKind::Absolute);
        params.attribute_filters = FilterSet::new().allow("brand", ["brand_own"]);

        let outcome = apply_params(&table, &params, &evaluator);
        assert_eq!(outcome.modified_rows, 0);
        assert_eq!(outcome.table.rows[0][COL_CURRENT_PRICE], CellValue::from("10.00"));
    }

    #[test]
    fn test_unknown_columns_pass_through() {
        let idx = index();
        let evaluator = FilterEvaluator::new(&idx);
        let mut table = base_table();
        table.columns.push("Custom Note".to_string());
        table.rows[0].insert("Custom Note".to_string(), CellValue::from("keep me"));

        let outcome = apply_params(&table, &price_params(1.0, ChangeKind::Absolute), &evaluator);
        assert_eq!(outcome.table.rows[0]["Custom Note"], CellValue::from("keep me"));
    }

    #[test]
    fn test_zero_change_labels_as_increase() {
        assert_eq!(change_type_label(0.0, ChangeKind::Absolute), "INCREASE_AMOUNT");
        assert_eq!(change_type_label(0.0, ChangeKind::Percentage), "INCREASE_PERCENT");
    }
}
