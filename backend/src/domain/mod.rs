//! Domain primitives, services, and ports.
//!
//! Purpose: define the catalogue's strongly typed entities and use-cases
//! independently of HTTP and persistence. Adapters talk to the domain only
//! through the traits in [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User, Email, LoginCredentials: the credential store's vocabulary.
//! - TokenSigner: signs and verifies stateless session tokens.
//! - Publisher, PublisherDraft: the publisher aggregate and its validation.
//! - RankRequest, RankedList and summaries: ranked catalogue projections.
//! - SessionIssuer, PublisherService, CatalogueQueryService,
//!   DashboardAggregator, DemoDataSeeder: the use-case services.

pub mod auth;
pub mod catalogue_query_service;
pub mod dashboard;
pub mod error;
pub mod password;
pub mod ports;
pub mod publisher;
pub mod publisher_service;
pub mod ranking;
pub mod seed;
pub mod session_issuer;
pub mod session_token;
pub mod trace_id;
pub mod user;

pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::catalogue_query_service::CatalogueQueryService;
pub use self::dashboard::{
    DEFAULT_PANEL_TIMEOUT, DashboardAggregator, DashboardView, PANEL_ERROR_MESSAGE, Panel,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::publisher::{
    BookId, FieldError, Publisher, PublisherDraft, PublisherId, PublisherInput,
    SavePublisherOutcome, Series, SeriesDraft, SeriesId, SeriesInput, ValidationErrors,
};
pub use self::publisher_service::PublisherService;
pub use self::ranking::{
    BookSortField, BookSummary, DEFAULT_RANK_LIMIT_MAX, PublisherSortField, PublisherSummary,
    RankLimit, RankRequest, RankedList, RankingError, SeriesSortField, SeriesSummary,
    SortDirection, SortField, book_display_name,
};
pub use self::seed::{DemoDataSeeder, SeedPlan, SeedReport};
pub use self::session_issuer::{INVALID_CREDENTIALS, SessionIssuer};
pub use self::session_token::{TokenClaims, TokenError, TokenSigner, TokenSignerError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{Email, User, UserCredentials, UserId, UserName, UserValidationError};
