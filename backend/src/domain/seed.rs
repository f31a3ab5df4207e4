//! Demo and reference data loaded on request at startup.

use std::sync::Arc;

use mockable::Clock;
use tracing::info;

use super::password::hash_password;
use super::ports::{SeedRepository, SeedRepositoryError};
use super::{Email, Error, UserName};

/// Credit roles every catalogue starts with.
pub const CREDIT_ROLES: &[&str] = &[
    "Creator",
    "Writer",
    "Penciller",
    "Colorist",
    "Inker",
    "Cover Artist",
    "Letterer",
    "Editor",
    "Assistant Editor",
];

/// Book formats every catalogue starts with.
pub const BOOK_FORMATS: &[&str] = &["Comic", "Trade Paperback", "Hard Cover"];

/// A user to create, with the password already hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedUser {
    pub name: UserName,
    pub email: Email,
    pub password_hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedBook {
    pub issue: String,
    pub format: &'static str,
    pub page_count: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSeries {
    pub name: &'static str,
    pub books: Vec<SeedBook>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedPublisher {
    pub name: &'static str,
    pub series: Vec<SeedSeries>,
}

/// Everything a seed run should ensure exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedPlan {
    pub users: Vec<SeedUser>,
    pub credit_roles: &'static [&'static str],
    pub book_formats: &'static [&'static str],
    pub publishers: Vec<SeedPublisher>,
}

/// Rows created by one seed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub users: usize,
    pub reference_rows: usize,
    pub publishers: usize,
    pub series: usize,
    pub books: usize,
}

fn books(count: u16, format: &'static str, page_count: Option<i32>) -> Vec<SeedBook> {
    (1..=count)
        .map(|issue| SeedBook {
            issue: issue.to_string(),
            format,
            page_count,
        })
        .collect()
}

fn demo_publishers() -> Vec<SeedPublisher> {
    vec![
        SeedPublisher {
            name: "Image Comics",
            series: vec![
                SeedSeries {
                    name: "Saga",
                    books: books(6, "Comic", Some(32)),
                },
                SeedSeries {
                    name: "Paper Girls",
                    books: books(3, "Comic", Some(28)),
                },
                SeedSeries {
                    name: "Monstress",
                    books: books(2, "Trade Paperback", Some(152)),
                },
            ],
        },
        SeedPublisher {
            name: "Dark Horse",
            series: vec![
                SeedSeries {
                    name: "Hellboy",
                    books: books(4, "Comic", Some(24)),
                },
                SeedSeries {
                    name: "Usagi Yojimbo",
                    books: books(1, "Hard Cover", None),
                },
            ],
        },
        SeedPublisher {
            name: "Fantagraphics",
            series: vec![SeedSeries {
                name: "Love and Rockets",
                books: books(2, "Comic", Some(36)),
            }],
        },
    ]
}

/// Demo credentials created by [`SeedPlan::demo`].
pub const DEMO_USER_EMAIL: &str = "daryl@example.com";
pub const DEMO_USER_PASSWORD: &str = "password";
pub const DEMO_USER_NAME: &str = "Daryl";

impl SeedPlan {
    /// The development plan: the demo user, reference data, and a small
    /// catalogue.
    pub fn demo() -> Result<Self, Error> {
        let password_hash = hash_password(DEMO_USER_PASSWORD)
            .map_err(|err| Error::internal(format!("failed to hash demo password: {err}")))?;
        let name = UserName::new(DEMO_USER_NAME)
            .map_err(|err| Error::internal(format!("invalid demo user name: {err}")))?;
        let email = Email::new(DEMO_USER_EMAIL)
            .map_err(|err| Error::internal(format!("invalid demo user email: {err}")))?;
        Ok(Self {
            users: vec![SeedUser {
                name,
                email,
                password_hash,
            }],
            credit_roles: CREDIT_ROLES,
            book_formats: BOOK_FORMATS,
            publishers: demo_publishers(),
        })
    }
}

fn map_seed_error(error: SeedRepositoryError) -> Error {
    match error {
        SeedRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("seed repository unavailable: {message}"))
        }
        SeedRepositoryError::Query { message } => {
            Error::internal(format!("seed repository error: {message}"))
        }
    }
}

/// Applies a [`SeedPlan`] through a [`SeedRepository`].
#[derive(Clone)]
pub struct DemoDataSeeder<R> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R: SeedRepository> DemoDataSeeder<R> {
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Apply `plan`, logging what was created.
    pub async fn seed(&self, plan: &SeedPlan) -> Result<SeedReport, Error> {
        let report = self
            .repository
            .apply(plan, self.clock.utc())
            .await
            .map_err(map_seed_error)?;
        info!(
            users = report.users,
            reference_rows = report.reference_rows,
            publishers = report.publishers,
            series = report.series,
            books = report.books,
            "demo data seeded"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::password::verify_password;
    use crate::domain::ports::MockSeedRepository;
    use mockable::DefaultClock;
    use rstest::rstest;

    #[rstest]
    fn demo_plan_contains_daryl_and_reference_data() {
        let plan = SeedPlan::demo().expect("demo plan");
        let user = plan.users.first().expect("demo user");
        assert_eq!(user.email.as_ref(), DEMO_USER_EMAIL);
        assert_eq!(user.name.as_ref(), DEMO_USER_NAME);
        assert!(verify_password(DEMO_USER_PASSWORD, &user.password_hash).expect("verify"));
        assert_eq!(plan.credit_roles.len(), 9);
        assert_eq!(plan.book_formats, ["Comic", "Trade Paperback", "Hard Cover"]);
    }

    #[rstest]
    #[tokio::test]
    async fn seeder_returns_repository_report() {
        let mut repository = MockSeedRepository::new();
        repository.expect_apply().times(1).returning(|_, _| {
            Ok(SeedReport {
                users: 1,
                ..SeedReport::default()
            })
        });
        let seeder = DemoDataSeeder::new(Arc::new(repository), Arc::new(DefaultClock));
        let plan = SeedPlan::demo().expect("demo plan");
        let report = seeder.seed(&plan).await.expect("seeded");
        assert_eq!(report.users, 1);
    }

    #[rstest]
    #[case(SeedRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case(SeedRepositoryError::query("boom"), ErrorCode::InternalError)]
    #[tokio::test]
    async fn seeder_maps_repository_errors(
        #[case] failure: SeedRepositoryError,
        #[case] expected: ErrorCode,
    ) {
        let mut repository = MockSeedRepository::new();
        repository
            .expect_apply()
            .returning(move |_, _| Err(failure.clone()));
        let seeder = DemoDataSeeder::new(Arc::new(repository), Arc::new(DefaultClock));
        let plan = SeedPlan::demo().expect("demo plan");
        let err = seeder.seed(&plan).await.expect_err("seed fails");
        assert_eq!(err.code(), expected);
    }
}
