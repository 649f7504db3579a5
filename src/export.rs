// Snapshot export: structured JSON or flat CSV.

use crate::error::MetricsError;
use crate::models::{
    CSV_HEADER, CsvExport, ExportFormat, ExportMetadata, ExportOutput, JsonExport, Sample,
};

pub fn export(
    samples: &[Sample],
    format: ExportFormat,
    exported_at: u64,
) -> Result<ExportOutput, MetricsError> {
    match format {
        ExportFormat::Json => Ok(ExportOutput::Json(to_json(samples, exported_at))),
        ExportFormat::Csv => Ok(ExportOutput::Csv(to_csv(samples, exported_at)?)),
    }
}

pub fn to_json(samples: &[Sample], exported_at: u64) -> JsonExport {
    JsonExport {
        data: samples.to_vec(),
        metadata: ExportMetadata {
            total_points: samples.len(),
            start_time: samples.first().map(|s| s.timestamp),
            end_time: samples.last().map(|s| s.timestamp),
            exported_at,
        },
    }
}

/// Header row plus one row per sample. All fields are numeric, so nothing needs quoting.
pub fn to_csv(samples: &[Sample], exported_at: u64) -> Result<CsvExport, MetricsError> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(CSV_HEADER)?;
    for s in samples {
        wtr.write_record([
            s.timestamp.to_string(),
            s.cpu.to_string(),
            s.memory.to_string(),
            s.disk.to_string(),
            s.network_upload.to_string(),
            s.network_download.to_string(),
            s.temperature.to_string(),
        ])?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| MetricsError::Csv(e.into_error().into()))?;
    Ok(CsvExport {
        filename: csv_filename(exported_at),
        content: String::from_utf8(bytes)?,
    })
}

pub fn csv_filename(exported_at: u64) -> String {
    format!("metrics_{}.csv", exported_at)
}
