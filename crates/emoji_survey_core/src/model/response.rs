//! Survey response record and answer enums.
//!
//! # Invariants
//! - `id` is non-empty and unique within one store.
//! - `timestamp` parses as RFC 3339.
//! - `age` lies in `AGE_MIN..=AGE_MAX`.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Youngest accepted respondent age.
pub const AGE_MIN: i64 = 13;
/// Oldest accepted respondent age.
pub const AGE_MAX: i64 = 120;

/// Caller-supplied response identifier.
pub type ResponseId = String;

/// How often the respondent uses emojis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Rarely,
}

impl Frequency {
    pub const ALL: [Self; 3] = [Self::Daily, Self::Weekly, Self::Rarely];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Rarely => "rarely",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "rarely" => Some(Self::Rarely),
            _ => None,
        }
    }
}

/// Perceived effect of emojis, shared by the three opinion questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Positive,
    Neutral,
    Negative,
}

impl Impact {
    pub const ALL: [Self; 3] = [Self::Positive, Self::Neutral, Self::Negative];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "positive" => Some(Self::Positive),
            "neutral" => Some(Self::Neutral),
            "negative" => Some(Self::Negative),
            _ => None,
        }
    }
}

/// Self-reported gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Gender {
    Male,
    Female,
    NonBinary,
    PreferNotToSay,
    Other,
}

impl Gender {
    pub const ALL: [Self; 5] = [
        Self::Male,
        Self::Female,
        Self::NonBinary,
        Self::PreferNotToSay,
        Self::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::NonBinary => "non-binary",
            Self::PreferNotToSay => "prefer-not-to-say",
            Self::Other => "other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "male" => Some(Self::Male),
            "female" => Some(Self::Female),
            "non-binary" => Some(Self::NonBinary),
            "prefer-not-to-say" => Some(Self::PreferNotToSay),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

macro_rules! from_str_via_parse {
    ($answer:ty, $field:literal) => {
        impl FromStr for $answer {
            type Err = ValidationError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Self::parse(value).ok_or_else(|| ValidationError::InvalidValue {
                    field: $field,
                    value: value.to_string(),
                })
            }
        }
    };
}

from_str_via_parse!(Frequency, "frequency");
from_str_via_parse!(Impact, "impact");
from_str_via_parse!(Gender, "gender");

/// Field constraint violation on caller-supplied survey data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyId,
    InvalidTimestamp(String),
    AgeOutOfRange(i64),
    /// A required answer was not given.
    MissingField(&'static str),
    /// An answer is outside its closed value set.
    InvalidValue { field: &'static str, value: String },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "response id must not be empty"),
            Self::InvalidTimestamp(value) => {
                write!(f, "timestamp `{value}` is not a valid RFC 3339 date-time")
            }
            Self::AgeOutOfRange(age) => {
                write!(f, "age {age} is outside the accepted range {AGE_MIN}..={AGE_MAX}")
            }
            Self::MissingField(field) => write!(f, "missing required answer `{field}`"),
            Self::InvalidValue { field, value } => {
                write!(f, "invalid value `{value}` for `{field}`")
            }
        }
    }
}

impl Error for ValidationError {}

/// One completed questionnaire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyResponse {
    pub id: ResponseId,
    /// ISO-8601 date-time assigned at creation.
    pub timestamp: String,
    pub frequency: Frequency,
    pub clarity_impact: Impact,
    pub tone_influence: Impact,
    pub professional_context: Impact,
    pub age: u8,
    pub gender: Gender,
}

impl SurveyResponse {
    /// Checks the constraints the type system cannot express.
    ///
    /// # Errors
    /// - `EmptyId` when `id` is blank.
    /// - `InvalidTimestamp` when `timestamp` is not RFC 3339.
    /// - `AgeOutOfRange` when `age` is outside `AGE_MIN..=AGE_MAX`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::EmptyId);
        }
        if DateTime::parse_from_rfc3339(&self.timestamp).is_err() {
            return Err(ValidationError::InvalidTimestamp(self.timestamp.clone()));
        }
        validate_age(i64::from(self.age))?;
        Ok(())
    }
}

/// Validates a raw age answer and narrows it to the stored width.
pub fn validate_age(age: i64) -> Result<u8, ValidationError> {
    if !(AGE_MIN..=AGE_MAX).contains(&age) {
        return Err(ValidationError::AgeOutOfRange(age));
    }
    u8::try_from(age).map_err(|_| ValidationError::AgeOutOfRange(age))
}

/// Current UTC time in the stored timestamp format, e.g.
/// `2024-01-01T10:00:00.000Z`.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SurveyResponse {
        SurveyResponse {
            id: "r-1".to_string(),
            timestamp: "2024-01-01T10:00:00.000Z".to_string(),
            frequency: Frequency::Daily,
            clarity_impact: Impact::Positive,
            tone_influence: Impact::Neutral,
            professional_context: Impact::Negative,
            age: 30,
            gender: Gender::NonBinary,
        }
    }

    #[test]
    fn valid_response_passes() {
        assert_eq!(sample().validate(), Ok(()));
    }

    #[test]
    fn age_bounds_are_inclusive() {
        assert_eq!(validate_age(13), Ok(13));
        assert_eq!(validate_age(120), Ok(120));
        assert_eq!(validate_age(12), Err(ValidationError::AgeOutOfRange(12)));
        assert_eq!(validate_age(121), Err(ValidationError::AgeOutOfRange(121)));

        let mut response = sample();
        response.age = 200;
        assert_eq!(
            response.validate(),
            Err(ValidationError::AgeOutOfRange(200))
        );
    }

    #[test]
    fn blank_id_and_bad_timestamp_are_rejected() {
        let mut response = sample();
        response.id = "  ".to_string();
        assert_eq!(response.validate(), Err(ValidationError::EmptyId));

        let mut response = sample();
        response.timestamp = "yesterday".to_string();
        assert!(matches!(
            response.validate(),
            Err(ValidationError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn serializes_with_camel_case_fields_and_wire_values() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["clarityImpact"], "positive");
        assert_eq!(value["professionalContext"], "negative");
        assert_eq!(value["gender"], "non-binary");
        assert_eq!(value["frequency"], "daily");
    }

    #[test]
    fn parse_matches_as_str_for_every_variant() {
        for frequency in Frequency::ALL {
            assert_eq!(Frequency::parse(frequency.as_str()), Some(frequency));
        }
        for impact in Impact::ALL {
            assert_eq!(Impact::parse(impact.as_str()), Some(impact));
        }
        for gender in Gender::ALL {
            assert_eq!(Gender::parse(gender.as_str()), Some(gender));
        }
        assert_eq!(Gender::parse("Male"), None);
    }

    #[test]
    fn from_str_reports_the_rejected_value() {
        assert_eq!("weekly".parse::<Frequency>(), Ok(Frequency::Weekly));
        assert_eq!("prefer-not-to-say".parse(), Ok(Gender::PreferNotToSay));
        assert_eq!(
            "Positive".parse::<Impact>(),
            Err(ValidationError::InvalidValue {
                field: "impact",
                value: "Positive".to_string()
            })
        );
    }

    #[test]
    fn now_timestamp_is_valid_rfc3339_utc() {
        let stamp = now_timestamp();
        assert!(stamp.ends_with('Z'));
        assert!(DateTime::parse_from_rfc3339(&stamp).is_ok());
    }
}
