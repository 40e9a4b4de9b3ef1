//! Display report for a shared snapshot.

use crate::share::link::ShareSnapshot;
use chrono::{DateTime, Local, TimeZone};
use serde::Serialize;

pub const REPORT_TITLE: &str = "Relatório de Pesquisa - Impacto dos Emojis";
pub const UNAVAILABLE_SUMMARY: &str = "Dados não disponíveis";

const GENERATED_AT_FORMAT: &str = "%d/%m/%Y, %H:%M:%S";

/// One row of the shared results table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportMetric {
    pub label: &'static str,
    pub value: u64,
    /// Whole-number share of the total, 0 when the total is 0.
    pub percentage: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareReport {
    pub title: &'static str,
    pub summary: String,
    pub metrics: Vec<ReportMetric>,
    pub generated_at: String,
}

/// Builds the report at the current local time.
pub fn generate_report(snapshot: Option<&ShareSnapshot>) -> ShareReport {
    generate_report_at(snapshot, Local::now())
}

/// Builds the report with an explicit generation time.
///
/// A missing snapshot yields the placeholder report with no metrics.
pub fn generate_report_at<Tz>(snapshot: Option<&ShareSnapshot>, now: DateTime<Tz>) -> ShareReport
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let generated_at = now.format(GENERATED_AT_FORMAT).to_string();

    let Some(snapshot) = snapshot else {
        return ShareReport {
            title: REPORT_TITLE,
            summary: UNAVAILABLE_SUMMARY.to_string(),
            metrics: Vec::new(),
            generated_at,
        };
    };

    let total = snapshot.total_responses;
    let noun = if total == 1 {
        "resposta coletada"
    } else {
        "respostas coletadas"
    };

    ShareReport {
        title: REPORT_TITLE,
        summary: format!("Análise baseada em {total} {noun}"),
        metrics: vec![
            metric("Impacto Positivo", snapshot.positive_impact, total),
            metric("Impacto Neutro", snapshot.neutral_impact, total),
            metric("Impacto Negativo", snapshot.negative_impact, total),
        ],
        generated_at,
    }
}

fn metric(label: &'static str, value: u64, total: u64) -> ReportMetric {
    ReportMetric {
        label,
        value,
        percentage: percentage(value, total),
    }
}

fn percentage(value: u64, total: u64) -> u64 {
    if total == 0 {
        return 0;
    }
    (value as f64 / total as f64 * 100.0).round() as u64
}

#[cfg(test)]
mod tests {
    use super::percentage;

    #[test]
    fn percentage_rounds_half_up_and_guards_zero_total() {
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(5, 0), 0);
    }
}
