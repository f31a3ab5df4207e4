//! Ranked list requests and entity summaries.
//!
//! Each rankable entity declares the fields it can be ordered by. Parsing a
//! request never falls back to a default field: unknown names are rejected
//! along with the list of accepted ones.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;

use super::{BookId, Error, PublisherId, SeriesId};

/// Default upper bound applied to requested limits.
pub const DEFAULT_RANK_LIMIT_MAX: u32 = 100;

/// Rejections raised while parsing a ranked-list request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RankingError {
    #[error("{value} is not a sortable field for {entity}")]
    InvalidSortField {
        entity: &'static str,
        value: String,
        allowed: &'static [&'static str],
    },
    #[error("direction must be ASC or DESC")]
    InvalidDirection { value: String },
    #[error("limit must be a positive integer")]
    InvalidLimit { value: i64 },
}

impl From<RankingError> for Error {
    fn from(value: RankingError) -> Self {
        let message = value.to_string();
        let details = match value {
            RankingError::InvalidSortField { value, allowed, .. } => json!({
                "field": "field",
                "value": value,
                "code": "invalid_sort_field",
                "allowed": allowed,
            }),
            RankingError::InvalidDirection { value } => json!({
                "field": "direction",
                "value": value,
                "code": "invalid_direction",
                "allowed": ["ASC", "DESC"],
            }),
            RankingError::InvalidLimit { value } => json!({
                "field": "limit",
                "value": value,
                "code": "invalid_limit",
            }),
        };
        Error::invalid_request(message).with_details(details)
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = RankingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(Self::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(Self::Desc)
        } else {
            Err(RankingError::InvalidDirection {
                value: s.to_owned(),
            })
        }
    }
}

/// A positive limit already clamped to the configured maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankLimit(u32);

impl RankLimit {
    /// Validate `requested` and clamp it to `max`.
    ///
    /// # Examples
    /// ```
    /// use longbox::domain::RankLimit;
    ///
    /// assert_eq!(RankLimit::new(500, 100).unwrap().get(), 100);
    /// assert_eq!(RankLimit::new(5, 100).unwrap().get(), 5);
    /// assert!(RankLimit::new(0, 100).is_err());
    /// ```
    pub fn new(requested: i64, max: u32) -> Result<Self, RankingError> {
        if requested <= 0 {
            return Err(RankingError::InvalidLimit { value: requested });
        }
        let clamped = u32::try_from(requested).unwrap_or(u32::MAX).min(max.max(1));
        Ok(Self(clamped))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn as_usize(self) -> usize {
        self.0 as usize
    }

    pub fn as_i64(self) -> i64 {
        i64::from(self.0)
    }
}

/// A field an entity can be ranked by.
pub trait SortField: Copy + fmt::Debug + Send + Sync + 'static {
    /// Entity name used in error messages.
    const ENTITY: &'static str;
    /// Every accepted field name, in declaration order.
    const ALLOWED: &'static [&'static str];

    /// Wire name of the field.
    fn as_str(self) -> &'static str;

    /// Parse a wire name, rejecting anything not in [`SortField::ALLOWED`].
    fn parse(value: &str) -> Result<Self, RankingError>;
}

macro_rules! sort_fields {
    (
        $(#[$meta:meta])*
        $name:ident for $entity:literal {
            $($variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant),+
        }

        impl SortField for $name {
            const ENTITY: &'static str = $entity;
            const ALLOWED: &'static [&'static str] = &[$($wire),+];

            fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }

            fn parse(value: &str) -> Result<Self, RankingError> {
                match value {
                    $($wire => Ok(Self::$variant),)+
                    _ => Err(RankingError::InvalidSortField {
                        entity: Self::ENTITY,
                        value: value.to_owned(),
                        allowed: Self::ALLOWED,
                    }),
                }
            }
        }
    };
}

sort_fields! {
    /// Sortable publisher fields.
    PublisherSortField for "publishers" {
        SeriesCount => "series_count",
        Name => "name",
        CreatedAt => "created_at",
    }
}

sort_fields! {
    /// Sortable series fields.
    SeriesSortField for "series" {
        BookCount => "book_count",
        Name => "name",
        CreatedAt => "created_at",
    }
}

sort_fields! {
    /// Sortable book fields.
    BookSortField for "books" {
        CreatedAt => "created_at",
        UpdatedAt => "updated_at",
        PageCount => "page_count",
    }
}

/// Validated ranked-list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankRequest<F> {
    pub field: F,
    pub direction: SortDirection,
    pub limit: RankLimit,
}

impl<F: SortField> RankRequest<F> {
    /// Parse raw query values. A missing direction means descending.
    pub fn parse(
        field: &str,
        direction: Option<&str>,
        limit: i64,
        limit_max: u32,
    ) -> Result<Self, RankingError> {
        Ok(Self {
            field: F::parse(field)?,
            direction: direction
                .map(str::parse::<SortDirection>)
                .transpose()?
                .unwrap_or_default(),
            limit: RankLimit::new(limit, limit_max)?,
        })
    }
}

/// Bounded ordered list of summaries plus the entity's total count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RankedList<T> {
    pub nodes: Vec<T>,
    pub total_count: i64,
}

/// Publisher projection used by ranked lists and the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublisherSummary {
    #[schema(value_type = String, format = "uuid")]
    pub id: PublisherId,
    pub name: String,
    pub series_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Series projection used by ranked lists and the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SeriesSummary {
    #[schema(value_type = String, format = "uuid")]
    pub id: SeriesId,
    pub name: String,
    #[schema(value_type = String, format = "uuid")]
    pub publisher_id: PublisherId,
    pub publisher_name: String,
    pub book_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Book projection used by ranked lists, listings, and the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookSummary {
    #[schema(value_type = String, format = "uuid")]
    pub id: BookId,
    #[schema(example = "Saga #1")]
    pub display_name: String,
    pub issue: Option<String>,
    #[schema(value_type = String, format = "uuid")]
    pub series_id: SeriesId,
    pub series_name: String,
    pub publisher_name: String,
    pub format: Option<String>,
    pub page_count: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// `"<series> #<issue>"`, or the bare series name without an issue.
pub fn book_display_name(series_name: &str, issue: Option<&str>) -> String {
    match issue.map(str::trim).filter(|issue| !issue.is_empty()) {
        Some(issue) => format!("{series_name} #{issue}"),
        None => series_name.to_owned(),
    }
}

/// Comparable value of a summary's sort field. Text compares bytewise.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey<'a> {
    Count(Option<i64>),
    Text(&'a str),
    Time(DateTime<Utc>),
}

/// Summaries that can be ordered in memory.
pub trait Rankable {
    type Field: SortField;

    fn sort_key(&self, field: Self::Field) -> SortKey<'_>;
    fn tie_breaker(&self) -> uuid::Uuid;
}

impl Rankable for PublisherSummary {
    type Field = PublisherSortField;

    fn sort_key(&self, field: Self::Field) -> SortKey<'_> {
        match field {
            PublisherSortField::SeriesCount => SortKey::Count(Some(self.series_count)),
            PublisherSortField::Name => SortKey::Text(&self.name),
            PublisherSortField::CreatedAt => SortKey::Time(self.created_at),
        }
    }

    fn tie_breaker(&self) -> uuid::Uuid {
        *self.id.as_uuid()
    }
}

impl Rankable for SeriesSummary {
    type Field = SeriesSortField;

    fn sort_key(&self, field: Self::Field) -> SortKey<'_> {
        match field {
            SeriesSortField::BookCount => SortKey::Count(Some(self.book_count)),
            SeriesSortField::Name => SortKey::Text(&self.name),
            SeriesSortField::CreatedAt => SortKey::Time(self.created_at),
        }
    }

    fn tie_breaker(&self) -> uuid::Uuid {
        *self.id.as_uuid()
    }
}

impl Rankable for BookSummary {
    type Field = BookSortField;

    fn sort_key(&self, field: Self::Field) -> SortKey<'_> {
        match field {
            BookSortField::CreatedAt => SortKey::Time(self.created_at),
            BookSortField::UpdatedAt => SortKey::Time(self.updated_at),
            BookSortField::PageCount => SortKey::Count(self.page_count.map(i64::from)),
        }
    }

    fn tie_breaker(&self) -> uuid::Uuid {
        *self.id.as_uuid()
    }
}

fn compare_keys(left: &SortKey<'_>, right: &SortKey<'_>, direction: SortDirection) -> Ordering {
    let directed = |ordering: Ordering| match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    };
    match (left, right) {
        (SortKey::Count(None), SortKey::Count(None)) => Ordering::Equal,
        (SortKey::Count(None), SortKey::Count(Some(_))) => Ordering::Greater,
        (SortKey::Count(Some(_)), SortKey::Count(None)) => Ordering::Less,
        _ => directed(left.cmp(right)),
    }
}

/// Order `items` by the request, nulls last, ties by id ascending, and keep
/// the first `limit` entries.
pub fn rank_in_memory<T: Rankable>(mut items: Vec<T>, request: &RankRequest<T::Field>) -> Vec<T> {
    items.sort_by(|left, right| {
        compare_keys(
            &left.sort_key(request.field),
            &right.sort_key(request.field),
            request.direction,
        )
        .then_with(|| left.tie_breaker().cmp(&right.tie_breaker()))
    });
    items.truncate(request.limit.as_usize());
    items
}
