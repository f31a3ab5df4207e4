//! Publisher aggregate: a publisher and its ordered series.
//!
//! Raw input arrives as [`PublisherInput`]. [`PublisherDraft::validate`]
//! collects every field violation at once, so callers can report them
//! together rather than one per round trip.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Maximum length of a publisher or series name.
pub const CATALOGUE_NAME_MAX: usize = 255;

macro_rules! catalogue_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a new random identifier.
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Access the underlying UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

catalogue_id!(
    /// Publisher identifier.
    PublisherId
);
catalogue_id!(
    /// Series identifier.
    SeriesId
);
catalogue_id!(
    /// Book identifier.
    BookId
);

/// A series as stored under its publisher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    #[schema(value_type = String, format = "uuid")]
    pub id: SeriesId,
    pub name: String,
    /// Zero-based order within the publisher.
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A persisted publisher with its series in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Publisher {
    #[schema(value_type = String, format = "uuid")]
    pub id: PublisherId,
    pub name: String,
    pub series: Vec<Series>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Unvalidated series entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeriesInput {
    pub id: Option<Uuid>,
    pub name: String,
}

/// Unvalidated publisher save request.
///
/// `id` selects update instead of create. A missing `series` list is the same
/// as an empty one: the stored collection is replaced either way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublisherInput {
    pub id: Option<Uuid>,
    pub name: String,
    pub series: Option<Vec<SeriesInput>>,
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    /// Path of the offending field, e.g. `series[1].name`.
    #[schema(example = "series[1].name")]
    pub field: String,
    #[schema(example = "series name must not be empty")]
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Every field violation found in one input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }
}

impl From<Vec<FieldError>> for ValidationErrors {
    fn from(value: Vec<FieldError>) -> Self {
        Self(value)
    }
}

/// Validated series entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesDraft {
    pub id: Option<SeriesId>,
    pub name: String,
}

/// Validated publisher aggregate ready for persistence.
///
/// ## Invariants
/// - `name` and every series name are trimmed, non-empty, and at most
///   [`CATALOGUE_NAME_MAX`] characters.
/// - Series ids are unique within the draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublisherDraft {
    pub id: Option<PublisherId>,
    pub name: String,
    pub series: Vec<SeriesDraft>,
}

impl PublisherDraft {
    /// Validate raw input, collecting every violation.
    ///
    /// # Examples
    /// ```
    /// use longbox::domain::{PublisherDraft, PublisherInput, SeriesInput};
    ///
    /// let input = PublisherInput {
    ///     id: None,
    ///     name: " ".into(),
    ///     series: Some(vec![SeriesInput { id: None, name: "".into() }]),
    /// };
    /// let errors = PublisherDraft::validate(input).unwrap_err();
    /// let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
    /// assert_eq!(fields, ["name", "series[0].name"]);
    /// ```
    pub fn validate(input: PublisherInput) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let name = checked_name(&input.name, "name", "name", &mut errors);

        let mut seen = HashSet::new();
        let mut series = Vec::new();
        for (index, entry) in input.series.unwrap_or_default().into_iter().enumerate() {
            let path = format!("series[{index}]");
            if entry.id.is_some_and(|id| !seen.insert(id)) {
                errors.push(FieldError::new(
                    format!("{path}.id"),
                    "series id must not repeat",
                ));
            }
            let series_name =
                checked_name(&entry.name, &format!("{path}.name"), "series name", &mut errors);
            series.push(SeriesDraft {
                id: entry.id.map(SeriesId::from),
                name: series_name,
            });
        }

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(Self {
            id: input.id.map(PublisherId::from),
            name,
            series,
        })
    }
}

fn checked_name(raw: &str, field: &str, label: &str, errors: &mut ValidationErrors) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        errors.push(FieldError::new(field, format!("{label} must not be empty")));
    } else if trimmed.chars().count() > CATALOGUE_NAME_MAX {
        errors.push(FieldError::new(
            field,
            format!("{label} must be at most {CATALOGUE_NAME_MAX} characters"),
        ));
    }
    trimmed.to_owned()
}

/// Result of a publisher save: the persisted aggregate or the field errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SavePublisherOutcome {
    Saved(Publisher),
    Invalid(ValidationErrors),
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn series(names: &[&str]) -> Option<Vec<SeriesInput>> {
        Some(
            names
                .iter()
                .map(|name| SeriesInput {
                    id: None,
                    name: (*name).to_owned(),
                })
                .collect(),
        )
    }

    #[rstest]
    #[case("", &[], &["name"])]
    #[case("   ", &["Saga"], &["name"])]
    #[case("Image", &["Saga", " "], &["series[1].name"])]
    #[case("", &["", "X", ""], &["name", "series[0].name", "series[2].name"])]
    fn collects_every_violation(
        #[case] name: &str,
        #[case] series_names: &[&str],
        #[case] expected: &[&str],
    ) {
        let input = PublisherInput {
            id: None,
            name: name.to_owned(),
            series: series(series_names),
        };
        let errors = PublisherDraft::validate(input).expect_err("invalid input");
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, expected);
    }

    #[rstest]
    fn messages_name_the_field() {
        let input = PublisherInput {
            id: None,
            name: String::new(),
            series: series(&["ok", ""]),
        };
        let errors = PublisherDraft::validate(input).expect_err("invalid input");
        let messages: Vec<_> = errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            ["name must not be empty", "series name must not be empty"]
        );
    }

    #[rstest]
    fn rejects_overlong_names() {
        let input = PublisherInput {
            id: None,
            name: "x".repeat(CATALOGUE_NAME_MAX + 1),
            series: None,
        };
        let errors = PublisherDraft::validate(input).expect_err("invalid input");
        assert_eq!(errors.len(), 1);
    }

    #[rstest]
    fn rejects_repeated_series_ids() {
        let id = Uuid::new_v4();
        let input = PublisherInput {
            id: None,
            name: "Image".into(),
            series: Some(vec![
                SeriesInput {
                    id: Some(id),
                    name: "Saga".into(),
                },
                SeriesInput {
                    id: Some(id),
                    name: "Spawn".into(),
                },
            ]),
        };
        let errors = PublisherDraft::validate(input).expect_err("invalid input");
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["series[1].id"]);
    }

    #[rstest]
    fn trims_and_keeps_order() {
        let input = PublisherInput {
            id: None,
            name: "  Image Comics ".into(),
            series: series(&[" Saga", "Spawn "]),
        };
        let draft = PublisherDraft::validate(input).expect("valid input");
        assert_eq!(draft.name, "Image Comics");
        let names: Vec<_> = draft.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Saga", "Spawn"]);
    }

    #[rstest]
    fn missing_series_is_empty() {
        let input = PublisherInput {
            id: None,
            name: "Image".into(),
            series: None,
        };
        let draft = PublisherDraft::validate(input).expect("valid input");
        assert!(draft.series.is_empty());
    }
}
