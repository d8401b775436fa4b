//! CSV/JSON downloads for table screens and the schedule summary.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    pub fn content_type(self) -> mime::Mime {
        match self {
            Self::Csv => mime::TEXT_CSV_UTF_8,
            Self::Json => mime::APPLICATION_JSON,
        }
    }

    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(ExportError::UnknownFormat(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("unsupported export format '{0}' (expected csv or json)")]
    UnknownFormat(String),
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV output was not valid UTF-8")]
    Encoding,
}

/// Rendered export ready to be sent as a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    pub format: ExportFormat,
    pub file_name: String,
    pub body: String,
}

impl ExportDocument {
    pub fn content_type(&self) -> mime::Mime {
        self.format.content_type()
    }

    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.file_name)
    }
}

/// One CSV row per record, header taken from the serde field names.
/// Records must be flat; nested sequences are rejected by the CSV writer.
pub fn export_csv<S: Serialize>(records: &[S]) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in records {
        writer.serialize(record)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| ExportError::Csv(err.into_error().into()))?;
    String::from_utf8(bytes).map_err(|_| ExportError::Encoding)
}

pub fn export_json<S: Serialize>(records: &[S]) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(records)?)
}

pub fn export<S: Serialize>(
    format: ExportFormat,
    stem: &str,
    records: &[S],
) -> Result<ExportDocument, ExportError> {
    let body = match format {
        ExportFormat::Csv => export_csv(records)?,
        ExportFormat::Json => export_json(records)?,
    };

    Ok(ExportDocument {
        format,
        file_name: format!("{stem}.{}", format.extension()),
        body,
    })
}
