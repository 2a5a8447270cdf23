use clap::Args;
use serde_json::{json, Value};

use lease_cashflow_core::scenario::edit::{apply_edits, ScenarioEdit};
use lease_cashflow_core::Scenario;

use crate::input;

/// Arguments for applying field edits to a scenario
#[derive(Args)]
pub struct EditArgs {
    /// Path to the scenario file (JSON or YAML); stdin when omitted
    #[arg(long)]
    pub input: Option<String>,

    /// Path to the edits file: one `{"field": .., "value": ..}` object or an array of them
    #[arg(long)]
    pub edits: String,
}

pub fn run_edit(args: EditArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let document = input::read_document(args.input.as_deref(), "scenario edits")?;
    let scenario: Scenario = serde_json::from_value(document)?;

    let edits: Vec<ScenarioEdit> = match input::file::read_value(&args.edits)? {
        Value::Array(items) => items
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<_, _>>()?,
        single => vec![serde_json::from_value(single)?],
    };
    let edit_count = edits.len();
    let edited = apply_edits(&scenario, edits);
    tracing::debug!(edits = edit_count, scenario = %edited.key(0), "scenario edits applied");

    Ok(json!({
        "result": edited,
        "term_months": edited.term_months(),
        "free_rent": edited.free_rent_window(),
        "premises_name": edited.premises_name(),
    }))
}
