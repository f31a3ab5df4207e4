//! Catalogue adapters against embedded PostgreSQL.
//!
//! Each test clones a migrated template database, seeds the demo catalogue
//! through `DieselSeedRepository`, and drives the read and publisher adapters
//! with their real SQL. Set `SKIP_TEST_CLUSTER=1` where the cluster cannot
//! start.

use chrono::Utc;
use longbox::domain::ports::{
    CatalogueReadRepository, PublisherRepository, PublisherRepositoryError, SeedRepository,
};
use longbox::domain::{
    BookSortField, BookSummary, PublisherDraft, PublisherId, PublisherSortField, RankLimit,
    RankRequest, SeedPlan, SeedReport, SeriesDraft, SeriesSortField, SeriesSummary, SortField,
};
use longbox::outbound::persistence::{
    DbPool, DieselCatalogueReadRepository, DieselPublisherRepository, DieselSeedRepository,
    PoolConfig,
};
use pg_embedded_setup_unpriv::TemporaryDatabase;
use rstest::{fixture, rstest};
use tokio::runtime::Runtime;

#[path = "support/pg_embed.rs"]
mod pg_embed;

mod support;

use pg_embed::shared_cluster;
use support::{handle_cluster_setup_failure, provision_template_database};

struct SeededCatalogue {
    runtime: Runtime,
    pool: DbPool,
    _database: TemporaryDatabase,
}

impl SeededCatalogue {
    fn reads(&self) -> DieselCatalogueReadRepository {
        DieselCatalogueReadRepository::new(self.pool.clone())
    }

    fn publishers(&self) -> DieselPublisherRepository {
        DieselPublisherRepository::new(self.pool.clone())
    }

    fn seed(&self) -> SeedReport {
        let plan = SeedPlan::demo().expect("demo plan");
        self.runtime
            .block_on(DieselSeedRepository::new(self.pool.clone()).apply(&plan, Utc::now()))
            .expect("seed demo catalogue")
    }

    fn books(&self, direction: &str) -> Vec<BookSummary> {
        let reads = self.reads();
        self.runtime
            .block_on(reads.rank_books(&request::<BookSortField>("page_count", direction, 100)))
            .expect("rank books")
            .nodes
    }

    fn publisher_names(&self, field: &str, direction: &str) -> Vec<String> {
        let reads = self.reads();
        self.runtime
            .block_on(reads.rank_publishers(&request::<PublisherSortField>(field, direction, 10)))
            .expect("rank publishers")
            .nodes
            .into_iter()
            .map(|summary| summary.name)
            .collect()
    }

    fn series_named(&self, name: &str) -> SeriesSummary {
        let reads = self.reads();
        self.runtime
            .block_on(reads.rank_series(&request::<SeriesSortField>("name", "ASC", 100)))
            .expect("rank series")
            .nodes
            .into_iter()
            .find(|summary| summary.name == name)
            .expect("seeded series")
    }
}

fn request<F: SortField>(field: &str, direction: &str, limit: i64) -> RankRequest<F> {
    RankRequest::parse(field, Some(direction), limit, 100).expect("valid rank request")
}

fn setup_catalogue() -> Result<SeededCatalogue, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = shared_cluster()?;
    let database = provision_template_database(cluster)?;

    let config = PoolConfig::new(database.url())
        .with_max_size(2)
        .with_min_idle(Some(1));
    let pool = runtime
        .block_on(DbPool::new(config))
        .map_err(|err| err.to_string())?;

    let catalogue = SeededCatalogue {
        runtime,
        pool,
        _database: database,
    };
    catalogue.seed();
    Ok(catalogue)
}

#[fixture]
fn catalogue() -> Option<SeededCatalogue> {
    match setup_catalogue() {
        Ok(catalogue) => Some(catalogue),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

#[rstest]
#[case("DESC", Some(152))]
#[case("ASC", Some(24))]
fn books_rank_by_page_count_with_missing_counts_last(
    catalogue: Option<SeededCatalogue>,
    #[case] direction: &str,
    #[case] first_pages: Option<i32>,
) {
    let Some(catalogue) = catalogue else {
        return;
    };
    let books = catalogue.books(direction);

    assert_eq!(books.len(), 18);
    assert_eq!(books[0].page_count, first_pages);
    let last = books.last().expect("ranked books");
    assert_eq!(last.page_count, None);
    assert_eq!(last.display_name, "Usagi Yojimbo #1");

    for pair in books[..17].windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        let (Some(a_pages), Some(b_pages)) = (a.page_count, b.page_count) else {
            panic!("only the final book lacks a page count");
        };
        if a_pages == b_pages {
            assert!(a.id < b.id, "ties break on ascending id");
        } else if direction == "DESC" {
            assert!(a_pages > b_pages);
        } else {
            assert!(a_pages < b_pages);
        }
    }
}

#[rstest]
#[case("series_count", "DESC", &["Image Comics", "Dark Horse", "Fantagraphics"])]
#[case("name", "ASC", &["Dark Horse", "Fantagraphics", "Image Comics"])]
fn publishers_rank_by_computed_and_text_fields(
    catalogue: Option<SeededCatalogue>,
    #[case] field: &str,
    #[case] direction: &str,
    #[case] expected: &[&str],
) {
    let Some(catalogue) = catalogue else {
        return;
    };
    assert_eq!(catalogue.publisher_names(field, direction), expected);
}

#[rstest]
fn book_listing_follows_catalogue_order(catalogue: Option<SeededCatalogue>) {
    let Some(catalogue) = catalogue else {
        return;
    };
    let reads = catalogue.reads();
    let limit = RankLimit::new(5, 100).expect("valid limit");
    let listing = catalogue
        .runtime
        .block_on(reads.list_books(limit))
        .expect("list books");

    assert_eq!(listing.total_count, 18);
    let names: Vec<&str> = listing
        .nodes
        .iter()
        .map(|book| book.display_name.as_str())
        .collect();
    assert_eq!(
        names,
        [
            "Hellboy #1",
            "Hellboy #2",
            "Hellboy #3",
            "Hellboy #4",
            "Usagi Yojimbo #1"
        ]
    );
}

#[rstest]
fn save_with_a_foreign_series_writes_nothing(catalogue: Option<SeededCatalogue>) {
    let Some(catalogue) = catalogue else {
        return;
    };
    let saga = catalogue.series_named("Saga");
    let hellboy = catalogue.series_named("Hellboy");
    let repository = catalogue.publishers();
    let before = catalogue
        .runtime
        .block_on(repository.find_by_id(&saga.publisher_id))
        .expect("load publisher")
        .expect("seeded publisher");

    let draft = PublisherDraft {
        id: Some(saga.publisher_id),
        name: "Image Renamed".into(),
        series: vec![
            SeriesDraft {
                id: Some(saga.id),
                name: "Saga Renamed".into(),
            },
            SeriesDraft {
                id: Some(hellboy.id),
                name: "Stolen".into(),
            },
        ],
    };
    let result = catalogue.runtime.block_on(repository.save(&draft, Utc::now()));

    assert!(
        matches!(result, Err(PublisherRepositoryError::SeriesNotFound { id }) if id == hellboy.id),
        "{result:?}"
    );
    let after = catalogue
        .runtime
        .block_on(repository.find_by_id(&saga.publisher_id))
        .expect("reload publisher")
        .expect("publisher survives");
    assert_eq!(after, before);
    assert_eq!(catalogue.series_named("Hellboy"), hellboy);
}

#[rstest]
fn update_of_an_unknown_publisher_inserts_nothing(catalogue: Option<SeededCatalogue>) {
    let Some(catalogue) = catalogue else {
        return;
    };
    let missing = PublisherId::random();
    let draft = PublisherDraft {
        id: Some(missing),
        name: "Ghost Press".into(),
        series: Vec::new(),
    };
    let result = catalogue
        .runtime
        .block_on(catalogue.publishers().save(&draft, Utc::now()));

    assert!(
        matches!(result, Err(PublisherRepositoryError::PublisherNotFound { id }) if id == missing),
        "{result:?}"
    );
    assert_eq!(catalogue.publisher_names("name", "ASC").len(), 3);
}

#[rstest]
fn reseeding_leaves_the_catalogue_unchanged(catalogue: Option<SeededCatalogue>) {
    let Some(catalogue) = catalogue else {
        return;
    };
    assert_eq!(catalogue.seed(), SeedReport::default());
    assert_eq!(catalogue.books("DESC").len(), 18);
}
