//! Participant data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::{ParticipantError, ParticipantResult};

/// Participant ID type
pub type ParticipantId = i64;

/// A registered club member who can be entered into tournaments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    /// Participant ID
    pub id: ParticipantId,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Belt rank (free text, e.g. "blue" or "2nd dan")
    pub belt: String,
    /// Age in years
    pub age: Option<i32>,
    /// Weight in kilograms
    pub weight_kg: Option<f64>,
    /// Tournaments won. Only the result recorder changes this.
    pub wins: i32,
    /// Registration timestamp
    pub created_at: DateTime<Utc>,
}

impl Participant {
    /// "First Last"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Fields supplied when registering or editing a participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantDraft {
    pub first_name: String,
    pub last_name: String,
    pub belt: String,
    #[serde(default)]
    pub age: Option<i32>,
    #[serde(default)]
    pub weight_kg: Option<f64>,
}

impl ParticipantDraft {
    /// Create a draft with the required fields only
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        belt: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            belt: belt.into(),
            age: None,
            weight_kg: None,
        }
    }

    pub fn with_age(mut self, age: i32) -> Self {
        self.age = Some(age);
        self
    }

    pub fn with_weight(mut self, weight_kg: f64) -> Self {
        self.weight_kg = Some(weight_kg);
        self
    }

    /// Check field presence and return a copy with surrounding whitespace removed.
    ///
    /// # Errors
    ///
    /// * `MissingField` - a required text field is blank
    /// * `InvalidField` - age is negative, or weight is not a positive number
    pub fn validated(&self) -> ParticipantResult<Self> {
        let first_name = required("first_name", &self.first_name)?;
        let last_name = required("last_name", &self.last_name)?;
        let belt = required("belt", &self.belt)?;

        if let Some(age) = self.age
            && age < 0
        {
            return Err(ParticipantError::InvalidField {
                field: "age",
                reason: format!("must not be negative, got {age}"),
            });
        }

        if let Some(weight) = self.weight_kg
            && !(weight.is_finite() && weight > 0.0)
        {
            return Err(ParticipantError::InvalidField {
                field: "weight_kg",
                reason: format!("must be a positive number, got {weight}"),
            });
        }

        Ok(Self {
            first_name,
            last_name,
            belt,
            age: self.age,
            weight_kg: self.weight_kg,
        })
    }
}

fn required(field: &'static str, value: &str) -> ParticipantResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ParticipantError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validated_trims_fields() {
        let draft = ParticipantDraft::new("  Ana ", "Silva", " purple ").with_age(24);
        let clean = draft.validated().unwrap();
        assert_eq!(clean.first_name, "Ana");
        assert_eq!(clean.belt, "purple");
        assert_eq!(clean.age, Some(24));
    }

    #[test]
    fn test_validated_rejects_blank_name() {
        let draft = ParticipantDraft::new("   ", "Silva", "white");
        let err = draft.validated().unwrap_err();
        assert!(matches!(err, ParticipantError::MissingField("first_name")));
    }

    #[test]
    fn test_validated_rejects_blank_belt() {
        let err = ParticipantDraft::new("Ana", "Silva", "")
            .validated()
            .unwrap_err();
        assert!(matches!(err, ParticipantError::MissingField("belt")));
    }

    #[test]
    fn test_validated_rejects_negative_age() {
        let err = ParticipantDraft::new("Ana", "Silva", "white")
            .with_age(-1)
            .validated()
            .unwrap_err();
        assert!(matches!(err, ParticipantError::InvalidField { field: "age", .. }));
    }

    #[test]
    fn test_validated_rejects_bad_weight() {
        for weight in [0.0, -70.0, f64::NAN] {
            let err = ParticipantDraft::new("Ana", "Silva", "white")
                .with_weight(weight)
                .validated()
                .unwrap_err();
            assert!(matches!(
                err,
                ParticipantError::InvalidField {
                    field: "weight_kg",
                    ..
                }
            ));
        }
    }

    #[test]
    fn test_draft_deserializes_without_optional_fields() {
        let draft: ParticipantDraft =
            serde_json::from_str(r#"{"first_name":"Kenji","last_name":"Mori","belt":"brown"}"#)
                .unwrap();
        assert_eq!(draft.age, None);
        assert_eq!(draft.weight_kg, None);
    }

    #[test]
    fn test_full_name() {
        let participant = Participant {
            id: 1,
            first_name: "Kenji".to_string(),
            last_name: "Mori".to_string(),
            belt: "brown".to_string(),
            age: None,
            weight_kg: Some(81.5),
            wins: 0,
            created_at: Utc::now(),
        };
        assert_eq!(participant.full_name(), "Kenji Mori");
    }
}
