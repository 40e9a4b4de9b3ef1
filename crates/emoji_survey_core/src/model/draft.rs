//! In-progress questionnaire draft.
//!
//! A draft mirrors the wizard's form state: every answer is optional and
//! stored as raw input. `into_response` is the only way to turn one into a
//! `SurveyResponse`.

use crate::model::response::{
    validate_age, Frequency, Gender, Impact, ResponseId, SurveyResponse, ValidationError,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Partial, unvalidated answers collected so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SurveyDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clarity_impact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tone_influence: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub professional_context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

impl SurveyDraft {
    /// Returns whether no answer has been given yet.
    pub fn is_empty(&self) -> bool {
        self.frequency.is_none()
            && self.clarity_impact.is_none()
            && self.tone_influence.is_none()
            && self.professional_context.is_none()
            && self.age.is_none()
            && self.gender.is_none()
    }

    /// Validates every answer and builds the final response.
    ///
    /// Answers are checked in questionnaire order; the first failure wins so
    /// the UI can jump back to that step.
    ///
    /// # Errors
    /// - `MissingField` for an unanswered question.
    /// - `InvalidValue` for an answer outside its value set.
    /// - `AgeOutOfRange`, `EmptyId`, `InvalidTimestamp` from record checks.
    pub fn into_response(
        &self,
        id: impl Into<ResponseId>,
        timestamp: impl Into<String>,
    ) -> Result<SurveyResponse, ValidationError> {
        let frequency: Frequency = required(&self.frequency, "frequency")?;
        let clarity_impact: Impact = required(&self.clarity_impact, "clarityImpact")?;
        let tone_influence: Impact = required(&self.tone_influence, "toneInfluence")?;
        let professional_context: Impact =
            required(&self.professional_context, "professionalContext")?;
        let age = validate_age(self.age.ok_or(ValidationError::MissingField("age"))?)?;
        let gender: Gender = required(&self.gender, "gender")?;

        let response = SurveyResponse {
            id: id.into(),
            timestamp: timestamp.into(),
            frequency,
            clarity_impact,
            tone_influence,
            professional_context,
            age,
            gender,
        };
        response.validate()?;
        Ok(response)
    }
}

fn required<T>(value: &Option<String>, field: &'static str) -> Result<T, ValidationError>
where
    T: FromStr<Err = ValidationError>,
{
    let raw = match value.as_deref() {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Err(ValidationError::MissingField(field)),
    };
    raw.parse().map_err(|err| match err {
        ValidationError::InvalidValue { value, .. } => {
            ValidationError::InvalidValue { field, value }
        }
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::SurveyDraft;
    use crate::model::response::{Gender, Impact, ValidationError};

    fn complete() -> SurveyDraft {
        SurveyDraft {
            frequency: Some("weekly".to_string()),
            clarity_impact: Some("positive".to_string()),
            tone_influence: Some("negative".to_string()),
            professional_context: Some("neutral".to_string()),
            age: Some(42),
            gender: Some("prefer-not-to-say".to_string()),
        }
    }

    #[test]
    fn complete_draft_becomes_response() {
        let response = complete()
            .into_response("abc", "2024-03-05T08:00:00.000Z")
            .unwrap();
        assert_eq!(response.id, "abc");
        assert_eq!(response.clarity_impact, Impact::Positive);
        assert_eq!(response.tone_influence, Impact::Negative);
        assert_eq!(response.age, 42);
        assert_eq!(response.gender, Gender::PreferNotToSay);
    }

    #[test]
    fn first_missing_answer_is_reported_in_question_order() {
        let draft = SurveyDraft {
            frequency: Some("daily".to_string()),
            ..SurveyDraft::default()
        };
        assert_eq!(
            draft.into_response("x", "2024-03-05T08:00:00Z"),
            Err(ValidationError::MissingField("clarityImpact"))
        );

        let mut blank_gender = complete();
        blank_gender.gender = Some(String::new());
        assert_eq!(
            blank_gender.into_response("x", "2024-03-05T08:00:00Z"),
            Err(ValidationError::MissingField("gender"))
        );
    }

    #[test]
    fn out_of_domain_answers_are_rejected() {
        let mut draft = complete();
        draft.tone_influence = Some("ecstatic".to_string());
        assert_eq!(
            draft.into_response("x", "2024-03-05T08:00:00Z"),
            Err(ValidationError::InvalidValue {
                field: "toneInfluence",
                value: "ecstatic".to_string()
            })
        );

        let mut draft = complete();
        draft.age = Some(7);
        assert_eq!(
            draft.into_response("x", "2024-03-05T08:00:00Z"),
            Err(ValidationError::AgeOutOfRange(7))
        );
    }

    #[test]
    fn partial_draft_json_omits_unanswered_fields() {
        let draft = SurveyDraft {
            frequency: Some("rarely".to_string()),
            age: Some(19),
            ..SurveyDraft::default()
        };
        let json = serde_json::to_string(&draft).unwrap();
        assert_eq!(json, r#"{"frequency":"rarely","age":19}"#);

        let parsed: SurveyDraft = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, draft);
        assert!(!parsed.is_empty());
        assert!(SurveyDraft::default().is_empty());
    }
}
