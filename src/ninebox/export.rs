//! Tabular evidence export for audit consumers.

use std::io::Write;

use crate::ninebox::domain::EvidenceRecord;

/// Write one CSV row per evidence record, in the order given (callers pass
/// the repository's axis-then-ordinal ordering through unchanged).
pub fn write_evidence_csv<W: Write>(
    writer: W,
    records: &[EvidenceRecord],
) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record([
        "assessment_id",
        "axis",
        "source",
        "source_ref",
        "value",
        "weight",
        "confidence",
        "summary",
        "recorded_at",
    ])?;

    for record in records {
        csv_writer.write_record([
            record.assessment_id.0.to_string(),
            record.axis.label().to_string(),
            record.source.label(),
            record.source_ref.clone().unwrap_or_default(),
            format!("{:.4}", record.value),
            format!("{:.4}", record.weight),
            format!("{:.4}", record.confidence),
            record.summary.clone(),
            record.recorded_at.to_rfc3339(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}
