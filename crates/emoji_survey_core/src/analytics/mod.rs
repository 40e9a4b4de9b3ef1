//! Dashboard aggregates over survey responses.
//!
//! # Responsibility
//! - Count responses per impact category, age bracket, gender and day.
//!
//! # Invariants
//! - Functions are pure: they take the response list from the caller and
//!   never touch the store.
//! - An empty list yields the zero-filled structure, never an error.
//! - A value that maps to no category is left out of every bucket.

use crate::model::response::{Gender, Impact, SurveyResponse};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Responses per calendar day (`YYYY-MM-DD`), ordered by date.
pub type DailyDistribution = BTreeMap<String, u64>;

/// Responses per `clarityImpact` answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImpactDistribution {
    pub positive: u64,
    pub neutral: u64,
    pub negative: u64,
}

impl ImpactDistribution {
    pub fn get(&self, impact: Impact) -> u64 {
        match impact {
            Impact::Positive => self.positive,
            Impact::Neutral => self.neutral,
            Impact::Negative => self.negative,
        }
    }

    pub fn total(&self) -> u64 {
        self.positive + self.neutral + self.negative
    }

    fn bump(&mut self, impact: Impact) {
        match impact {
            Impact::Positive => self.positive += 1,
            Impact::Neutral => self.neutral += 1,
            Impact::Negative => self.negative += 1,
        }
    }
}

/// Fixed age brackets used by the dashboard.
///
/// Ages 13 to 17 are accepted by the questionnaire but belong to no bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AgeBracket {
    From18To25,
    From26To35,
    From36To45,
    From46To55,
    From56,
}

impl AgeBracket {
    pub const ALL: [Self; 5] = [
        Self::From18To25,
        Self::From26To35,
        Self::From36To45,
        Self::From46To55,
        Self::From56,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::From18To25 => "18-25",
            Self::From26To35 => "26-35",
            Self::From36To45 => "36-45",
            Self::From46To55 => "46-55",
            Self::From56 => "56+",
        }
    }

    pub fn for_age(age: i64) -> Option<Self> {
        match age {
            18..=25 => Some(Self::From18To25),
            26..=35 => Some(Self::From26To35),
            36..=45 => Some(Self::From36To45),
            46..=55 => Some(Self::From46To55),
            56.. => Some(Self::From56),
            _ => None,
        }
    }
}

/// Responses per age bracket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AgeBracketDistribution {
    #[serde(rename = "18-25")]
    pub from_18_to_25: u64,
    #[serde(rename = "26-35")]
    pub from_26_to_35: u64,
    #[serde(rename = "36-45")]
    pub from_36_to_45: u64,
    #[serde(rename = "46-55")]
    pub from_46_to_55: u64,
    #[serde(rename = "56+")]
    pub from_56: u64,
}

impl AgeBracketDistribution {
    pub fn get(&self, bracket: AgeBracket) -> u64 {
        match bracket {
            AgeBracket::From18To25 => self.from_18_to_25,
            AgeBracket::From26To35 => self.from_26_to_35,
            AgeBracket::From36To45 => self.from_36_to_45,
            AgeBracket::From46To55 => self.from_46_to_55,
            AgeBracket::From56 => self.from_56,
        }
    }

    /// `(label, count)` pairs in bracket order, for chart axes.
    pub fn entries(&self) -> Vec<(&'static str, u64)> {
        AgeBracket::ALL
            .iter()
            .map(|bracket| (bracket.label(), self.get(*bracket)))
            .collect()
    }

    fn bump(&mut self, bracket: AgeBracket) {
        let slot = match bracket {
            AgeBracket::From18To25 => &mut self.from_18_to_25,
            AgeBracket::From26To35 => &mut self.from_26_to_35,
            AgeBracket::From36To45 => &mut self.from_36_to_45,
            AgeBracket::From46To55 => &mut self.from_46_to_55,
            AgeBracket::From56 => &mut self.from_56,
        };
        *slot += 1;
    }
}

/// Responses per gender answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GenderDistribution {
    pub male: u64,
    pub female: u64,
    #[serde(rename = "non-binary")]
    pub non_binary: u64,
    #[serde(rename = "prefer-not-to-say")]
    pub prefer_not_to_say: u64,
    pub other: u64,
}

impl GenderDistribution {
    pub fn get(&self, gender: Gender) -> u64 {
        match gender {
            Gender::Male => self.male,
            Gender::Female => self.female,
            Gender::NonBinary => self.non_binary,
            Gender::PreferNotToSay => self.prefer_not_to_say,
            Gender::Other => self.other,
        }
    }

    fn bump(&mut self, gender: Gender) {
        let slot = match gender {
            Gender::Male => &mut self.male,
            Gender::Female => &mut self.female,
            Gender::NonBinary => &mut self.non_binary,
            Gender::PreferNotToSay => &mut self.prefer_not_to_say,
            Gender::Other => &mut self.other,
        };
        *slot += 1;
    }
}

/// Everything the dashboard renders, computed in one call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_responses: u64,
    pub clarity: ImpactDistribution,
    pub age_brackets: AgeBracketDistribution,
    pub gender: GenderDistribution,
    pub daily: DailyDistribution,
}

pub fn distribution_by_clarity(responses: &[SurveyResponse]) -> ImpactDistribution {
    let mut counts = ImpactDistribution::default();
    for response in responses {
        counts.bump(response.clarity_impact);
    }
    counts
}

pub fn distribution_by_age_bracket(responses: &[SurveyResponse]) -> AgeBracketDistribution {
    let mut counts = AgeBracketDistribution::default();
    for bracket in responses
        .iter()
        .filter_map(|response| AgeBracket::for_age(i64::from(response.age)))
    {
        counts.bump(bracket);
    }
    counts
}

pub fn distribution_by_gender(responses: &[SurveyResponse]) -> GenderDistribution {
    let mut counts = GenderDistribution::default();
    for response in responses {
        counts.bump(response.gender);
    }
    counts
}

/// Groups responses by the `YYYY-MM-DD` prefix of their timestamp.
///
/// Timestamps whose first ten characters are not a calendar date are
/// skipped.
pub fn distribution_by_day(responses: &[SurveyResponse]) -> DailyDistribution {
    let mut counts = DailyDistribution::new();
    for response in responses {
        match day_key(&response.timestamp) {
            Some(day) => *counts.entry(day.to_string()).or_insert(0) += 1,
            None => log::debug!(
                "event=timestamp_skipped module=analytics status=skipped response_id={}",
                response.id
            ),
        }
    }
    counts
}

pub fn dashboard_summary(responses: &[SurveyResponse]) -> DashboardSummary {
    DashboardSummary {
        total_responses: responses.len() as u64,
        clarity: distribution_by_clarity(responses),
        age_brackets: distribution_by_age_bracket(responses),
        gender: distribution_by_gender(responses),
        daily: distribution_by_day(responses),
    }
}

fn day_key(timestamp: &str) -> Option<&str> {
    let day = timestamp.get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()?;
    Some(day)
}

#[cfg(test)]
mod tests {
    use super::{day_key, AgeBracket};

    #[test]
    fn bracket_edges() {
        assert_eq!(AgeBracket::for_age(17), None);
        assert_eq!(AgeBracket::for_age(18), Some(AgeBracket::From18To25));
        assert_eq!(AgeBracket::for_age(25), Some(AgeBracket::From18To25));
        assert_eq!(AgeBracket::for_age(26), Some(AgeBracket::From26To35));
        assert_eq!(AgeBracket::for_age(55), Some(AgeBracket::From46To55));
        assert_eq!(AgeBracket::for_age(56), Some(AgeBracket::From56));
        assert_eq!(AgeBracket::for_age(120), Some(AgeBracket::From56));
    }

    #[test]
    fn day_key_requires_a_calendar_date_prefix() {
        assert_eq!(day_key("2024-01-01T10:00:00Z"), Some("2024-01-01"));
        assert_eq!(day_key("2024-02-30T10:00:00Z"), None);
        assert_eq!(day_key("2024-01"), None);
        assert_eq!(day_key("not a timestamp"), None);
    }
}
