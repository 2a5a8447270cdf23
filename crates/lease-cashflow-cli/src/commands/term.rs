use clap::Args;
use serde_json::{json, Value};

use lease_cashflow_core::calendar;
use lease_cashflow_core::error::LeaseCashflowError;
use lease_cashflow_core::scenario::lenient;

/// Arguments for deriving a term length from two dates
#[derive(Args)]
pub struct TermArgs {
    /// Commencement date (YYYY-MM-DD or MM/DD/YYYY)
    #[arg(long)]
    pub commencement: String,

    /// Expiration date (inclusive)
    #[arg(long)]
    pub expiration: String,
}

pub fn run_term(args: TermArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let parse = |field: &str, raw: &str| {
        lenient::parse_date(raw)
            .ok_or_else(|| LeaseCashflowError::DateError(format!("{field}: unrecognised date '{raw}'")))
    };
    let commencement = parse("commencement", &args.commencement)?;
    let expiration = parse("expiration", &args.expiration)?;
    let term_months = calendar::term_months(commencement, expiration);

    Ok(json!({
        "result": {
            "commencement": commencement,
            "expiration": expiration,
            "term_months": term_months,
            "last_month_start": calendar::month_start_date(commencement, term_months - 1),
        }
    }))
}
