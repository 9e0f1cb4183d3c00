//! Report command handler
//!
//! The API has no report endpoint yet, so this checks the report and prints
//! the payload instead of filing it.

use super::print_validation;
use crate::models::{ReportForm, ReportType};
use crate::validation;

pub fn cmd_report(
    report_type: ReportType,
    entity_id: &str,
    reason: Option<String>,
    content: &str,
) -> anyhow::Result<()> {
    let form = ReportForm {
        report_type,
        reported_entity_id: entity_id.to_string(),
        reason,
        content: content.trim().to_string(),
    };

    if let Err(errors) = validation::validate_report(&form) {
        print_validation(&errors);
        println!();
        println!("Reasons for reporting a {report_type}:");
        for reason in report_type.reasons() {
            println!("  • {reason}");
        }
        return Ok(());
    }

    println!("✓ Report is valid:");
    println!("{}", serde_json::to_string_pretty(&form)?);
    Ok(())
}
