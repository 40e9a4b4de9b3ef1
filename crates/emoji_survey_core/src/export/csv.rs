//! CSV export of stored responses.
//!
//! # Invariants
//! - The header row and column order are fixed.
//! - Rows follow store order; every row has exactly eight fields.
//! - Exporting zero responses is an error, not an empty file.

use crate::model::response::SurveyResponse;
use chrono::NaiveDate;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const CSV_HEADERS: [&str; 8] = [
    "ID",
    "Data/Hora",
    "Frequência",
    "Impacto na Clareza",
    "Influência no Tom",
    "Contexto Profissional",
    "Idade",
    "Gênero",
];

const FILE_PREFIX: &str = "emoji_survey_";

#[derive(Debug)]
pub enum ExportError {
    /// There is nothing to export.
    EmptyDataset,
    Io(std::io::Error),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyDataset => write!(f, "no survey responses available to export"),
            Self::Io(err) => write!(f, "failed to write export: {err}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::EmptyDataset => None,
            Self::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ExportError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Rendered export ready to be handed to a download/save facility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    /// `emoji_survey_<YYYY-MM-DD>.csv` for the export date.
    pub file_name: String,
    /// UTF-8 text, `\n` separated, no trailing newline.
    pub content: String,
    pub row_count: usize,
}

/// Renders responses as CSV text.
///
/// # Errors
/// - `EmptyDataset` when `responses` is empty.
pub fn render_csv(responses: &[SurveyResponse]) -> Result<String, ExportError> {
    if responses.is_empty() {
        return Err(ExportError::EmptyDataset);
    }

    let mut lines = Vec::with_capacity(responses.len() + 1);
    lines.push(CSV_HEADERS.join(","));
    for response in responses {
        let age = response.age.to_string();
        let fields = [
            response.id.as_str(),
            response.timestamp.as_str(),
            response.frequency.as_str(),
            response.clarity_impact.as_str(),
            response.tone_influence.as_str(),
            response.professional_context.as_str(),
            age.as_str(),
            response.gender.as_str(),
        ];
        let row = fields
            .iter()
            .map(|field| escape_field(field))
            .collect::<Vec<_>>()
            .join(",");
        lines.push(row);
    }

    Ok(lines.join("\n"))
}

/// Builds the full export for `export_date`.
pub fn build_export(
    responses: &[SurveyResponse],
    export_date: NaiveDate,
) -> Result<CsvExport, ExportError> {
    let content = render_csv(responses)?;
    Ok(CsvExport {
        file_name: export_file_name(export_date),
        content,
        row_count: responses.len(),
    })
}

pub fn export_file_name(export_date: NaiveDate) -> String {
    format!("{FILE_PREFIX}{}.csv", export_date.format("%Y-%m-%d"))
}

/// Writes `export` into `dir` under its file name and returns the path.
pub fn write_export(dir: impl AsRef<Path>, export: &CsvExport) -> Result<PathBuf, ExportError> {
    let path = dir.as_ref().join(&export.file_name);
    std::fs::write(&path, export.content.as_bytes())?;
    info!(
        "event=csv_export module=export status=ok rows={} file={}",
        export.row_count, export.file_name
    );
    Ok(path)
}

fn escape_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{escape_field, export_file_name};
    use chrono::NaiveDate;

    #[test]
    fn plain_fields_are_not_quoted() {
        assert_eq!(escape_field("positive"), "positive");
    }

    #[test]
    fn delimiters_and_quotes_are_escaped() {
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn file_name_uses_export_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(export_file_name(date), "emoji_survey_2024-03-09.csv");
    }
}
