//! Scenarist: what-if scenario generation for merchandising datasets.
//!
//! Scenarist takes a base price/availability table and a hierarchical
//! product catalog, lets callers describe parametrized changes
//! (price/availability/cost deltas scoped by filters, possibly
//! range-valued), and materializes each concrete combination as a new
//! derived table.
//!
//! # Core Principles
//!
//! - **Non-destructive**: the base table is never modified; every
//!   scenario is a fresh copy with its own annotation columns.
//! - **Tolerant indexing**: malformed catalog data is dropped by
//!   omission, never raised as an error.
//! - **Explicit session state**: the scenario ordinal and list live in
//!   a [`ScenarioSession`], not in globals.
//!
//! # Example
//!
//! ```no_run
//! use scenarist::{
//!     AttributeIndex, ChangeKind, ChangeSpec, MetricChange, ScenarioSession,
//!     input,
//! };
//!
//! let table = input::parse_table_file("base.csv").unwrap();
//! let catalog = input::parse_catalog_file("master.json").unwrap();
//! let index = AttributeIndex::build(&catalog);
//!
//! let spec = ChangeSpec::new()
//!     .with_attribute_filter("brand", ["brand_own"])
//!     .with_price(MetricChange::value(5.0, ChangeKind::Percentage));
//!
//! let mut session = ScenarioSession::new();
//! let created = session.create_scenarios(&table, &index, &[spec]).unwrap();
//! println!("{}: {} of {} rows changed",
//!     created[0].name, created[0].meta.modified_rows, created[0].meta.total_rows);
//! ```

pub mod catalog;
pub mod error;
pub mod export;
pub mod input;
pub mod interpret;
pub mod scenario;
pub mod store;
pub mod table;

pub use catalog::{
    AttributeIndex, AttributeSet, AttributeValue, Product, ValueDriverMap, Variant,
    extract_value_drivers,
};
pub use error::{Result, ScenaristError};
pub use interpret::{HeuristicInterpreter, IntentInterpreter, InterpretContext};
pub use scenario::{
    ChangeKind, ChangeSpec, ExpandOptions, FilterEvaluator, FilterSet, KindConflict, LookupKey,
    Metric, MetricChange, MetricSpec, Scenario, ScenarioMeta, ScenarioParams, ScenarioSession,
    expand_changes,
};
pub use store::{FileStore, MemoryStore, ScenarioStore, StoredScenario};
pub use table::{CellValue, Row, Table};
