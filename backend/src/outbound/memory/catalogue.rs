//! `RwLock`-backed catalogue store.
//!
//! Writes take the lock once and check every precondition before mutating,
//! which gives publisher saves the same all-or-nothing behaviour as the
//! PostgreSQL transaction.

use std::collections::{BTreeSet, HashMap};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    CatalogueReadError, CatalogueReadRepository, PublisherRepository, PublisherRepositoryError,
    SeedRepository, SeedRepositoryError, UserPersistenceError, UserRepository,
};
use crate::domain::ranking::rank_in_memory;
use crate::domain::{
    BookId, BookSortField, BookSummary, Publisher, PublisherDraft, PublisherId,
    PublisherSortField, PublisherSummary, RankLimit, RankRequest, RankedList, SeedPlan,
    SeedReport, Series, SeriesId, SeriesSortField, SeriesSummary, User, UserCredentials, UserId,
    book_display_name,
};

#[derive(Debug, Clone)]
struct PublisherRecord {
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct SeriesRecord {
    publisher_id: PublisherId,
    name: String,
    position: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct BookRecord {
    series_id: SeriesId,
    issue: Option<String>,
    format: Option<String>,
    page_count: Option<i32>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Store {
    users: Vec<UserCredentials>,
    credit_roles: BTreeSet<String>,
    book_formats: BTreeSet<String>,
    publishers: HashMap<PublisherId, PublisherRecord>,
    series: HashMap<SeriesId, SeriesRecord>,
    books: HashMap<BookId, BookRecord>,
}

impl Store {
    fn publisher(&self, id: PublisherId) -> Option<Publisher> {
        let record = self.publishers.get(&id)?;
        let mut series: Vec<Series> = self
            .series
            .iter()
            .filter(|(_, entry)| entry.publisher_id == id)
            .map(|(series_id, entry)| Series {
                id: *series_id,
                name: entry.name.clone(),
                position: entry.position,
                created_at: entry.created_at,
                updated_at: entry.updated_at,
            })
            .collect();
        series.sort_by_key(|entry| (entry.position, entry.id));
        Some(Publisher {
            id,
            name: record.name.clone(),
            series,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }

    fn check_series_owner(
        &self,
        draft: &PublisherDraft,
        publisher_id: Option<PublisherId>,
    ) -> Result<(), PublisherRepositoryError> {
        for series_id in draft.series.iter().filter_map(|entry| entry.id) {
            let owned = match (publisher_id, self.series.get(&series_id)) {
                (Some(owner), Some(record)) => record.publisher_id == owner,
                _ => false,
            };
            if !owned {
                return Err(PublisherRepositoryError::series_not_found(series_id));
            }
        }
        Ok(())
    }

    fn save(
        &mut self,
        draft: &PublisherDraft,
        now: DateTime<Utc>,
    ) -> Result<PublisherId, PublisherRepositoryError> {
        if let Some(id) = draft.id {
            if !self.publishers.contains_key(&id) {
                return Err(PublisherRepositoryError::publisher_not_found(id));
            }
        }
        self.check_series_owner(draft, draft.id)?;

        let publisher_id = draft.id.unwrap_or_else(PublisherId::random);
        self.publishers
            .entry(publisher_id)
            .and_modify(|record| {
                record.name.clone_from(&draft.name);
                record.updated_at = now;
            })
            .or_insert_with(|| PublisherRecord {
                name: draft.name.clone(),
                created_at: now,
                updated_at: now,
            });

        let mut kept = BTreeSet::new();
        for (position, entry) in draft.series.iter().enumerate() {
            let position = i32::try_from(position)
                .map_err(|_| PublisherRepositoryError::query("too many series"))?;
            let series_id = entry.id.unwrap_or_else(SeriesId::random);
            kept.insert(series_id);
            self.series
                .entry(series_id)
                .and_modify(|record| {
                    record.name.clone_from(&entry.name);
                    record.position = position;
                    record.updated_at = now;
                })
                .or_insert_with(|| SeriesRecord {
                    publisher_id,
                    name: entry.name.clone(),
                    position,
                    created_at: now,
                    updated_at: now,
                });
        }

        let dropped: BTreeSet<SeriesId> = self
            .series
            .iter()
            .filter(|(id, record)| record.publisher_id == publisher_id && !kept.contains(*id))
            .map(|(id, _)| *id)
            .collect();
        self.series.retain(|id, _| !dropped.contains(id));
        self.books
            .retain(|_, record| !dropped.contains(&record.series_id));

        Ok(publisher_id)
    }

    fn publisher_summaries(&self) -> Vec<PublisherSummary> {
        self.publishers
            .iter()
            .map(|(id, record)| PublisherSummary {
                id: *id,
                name: record.name.clone(),
                series_count: self
                    .series
                    .values()
                    .filter(|series| series.publisher_id == *id)
                    .count() as i64,
                created_at: record.created_at,
                updated_at: record.updated_at,
            })
            .collect()
    }

    fn series_summaries(&self) -> Vec<SeriesSummary> {
        self.series
            .iter()
            .map(|(id, record)| SeriesSummary {
                id: *id,
                name: record.name.clone(),
                publisher_id: record.publisher_id,
                publisher_name: self
                    .publishers
                    .get(&record.publisher_id)
                    .map(|publisher| publisher.name.clone())
                    .unwrap_or_default(),
                book_count: self
                    .books
                    .values()
                    .filter(|book| book.series_id == *id)
                    .count() as i64,
                created_at: record.created_at,
                updated_at: record.updated_at,
            })
            .collect()
    }

    fn book_summaries(&self) -> Vec<BookSummary> {
        self.books
            .iter()
            .filter_map(|(id, record)| {
                let series = self.series.get(&record.series_id)?;
                let publisher = self.publishers.get(&series.publisher_id)?;
                Some(BookSummary {
                    id: *id,
                    display_name: book_display_name(&series.name, record.issue.as_deref()),
                    issue: record.issue.clone(),
                    series_id: record.series_id,
                    series_name: series.name.clone(),
                    publisher_name: publisher.name.clone(),
                    format: record.format.clone(),
                    page_count: record.page_count,
                    created_at: record.created_at,
                    updated_at: record.updated_at,
                })
            })
            .collect()
    }

    fn apply_seed(&mut self, plan: &SeedPlan, now: DateTime<Utc>) -> SeedReport {
        let mut report = SeedReport::default();

        for seed_user in &plan.users {
            if self
                .users
                .iter()
                .any(|existing| existing.user.email() == &seed_user.email)
            {
                continue;
            }
            self.users.push(UserCredentials {
                user: User::new(
                    UserId::random(),
                    seed_user.name.clone(),
                    seed_user.email.clone(),
                ),
                password_hash: seed_user.password_hash.clone(),
            });
            report.users += 1;
        }

        for role in plan.credit_roles {
            if self.credit_roles.insert((*role).to_owned()) {
                report.reference_rows += 1;
            }
        }
        for format in plan.book_formats {
            if self.book_formats.insert((*format).to_owned()) {
                report.reference_rows += 1;
            }
        }

        for seed_publisher in &plan.publishers {
            if self
                .publishers
                .values()
                .any(|existing| existing.name == seed_publisher.name)
            {
                continue;
            }
            let publisher_id = PublisherId::random();
            self.publishers.insert(
                publisher_id,
                PublisherRecord {
                    name: seed_publisher.name.to_owned(),
                    created_at: now,
                    updated_at: now,
                },
            );
            report.publishers += 1;

            for (position, seed_series) in seed_publisher.series.iter().enumerate() {
                let series_id = SeriesId::random();
                self.series.insert(
                    series_id,
                    SeriesRecord {
                        publisher_id,
                        name: seed_series.name.to_owned(),
                        position: i32::try_from(position).unwrap_or(i32::MAX),
                        created_at: now,
                        updated_at: now,
                    },
                );
                report.series += 1;

                for seed_book in &seed_series.books {
                    self.books.insert(
                        BookId::random(),
                        BookRecord {
                            series_id,
                            issue: Some(seed_book.issue.clone()),
                            format: Some(seed_book.format.to_owned()),
                            page_count: seed_book.page_count,
                            created_at: now,
                            updated_at: now,
                        },
                    );
                    report.books += 1;
                }
            }
        }

        report
    }
}

fn catalogue_order(left: &BookSummary, right: &BookSummary) -> std::cmp::Ordering {
    left.publisher_name
        .cmp(&right.publisher_name)
        .then_with(|| left.series_name.cmp(&right.series_name))
        .then_with(|| match (&left.issue, &right.issue) {
            (Some(a), Some(b)) => a.cmp(b),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        })
        .then_with(|| left.id.cmp(&right.id))
}

/// Catalogue, credential store, and seed target held in process memory.
///
/// # Examples
/// ```
/// use longbox::outbound::memory::InMemoryCatalogue;
///
/// let catalogue = InMemoryCatalogue::new();
/// # let _ = catalogue;
/// ```
#[derive(Debug, Default)]
pub struct InMemoryCatalogue {
    store: RwLock<Store>,
}

impl InMemoryCatalogue {
    pub fn new() -> Self {
        Self::default()
    }

    fn read<E>(&self, poisoned: impl FnOnce(String) -> E) -> Result<RwLockReadGuard<'_, Store>, E> {
        self.store
            .read()
            .map_err(|err: PoisonError<_>| poisoned(err.to_string()))
    }

    fn write<E>(
        &self,
        poisoned: impl FnOnce(String) -> E,
    ) -> Result<RwLockWriteGuard<'_, Store>, E> {
        self.store
            .write()
            .map_err(|err: PoisonError<_>| poisoned(err.to_string()))
    }

    fn ranked<T>(nodes: Vec<T>, total_count: usize) -> RankedList<T> {
        RankedList {
            nodes,
            total_count: total_count as i64,
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryCatalogue {
    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, UserPersistenceError> {
        let store = self.read(UserPersistenceError::query)?;
        Ok(store
            .users
            .iter()
            .find(|record| record.user.email().as_ref() == email)
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let store = self.read(UserPersistenceError::query)?;
        Ok(store
            .users
            .iter()
            .find(|record| record.user.id() == id)
            .map(|record| record.user.clone()))
    }
}

#[async_trait]
impl PublisherRepository for InMemoryCatalogue {
    async fn save(
        &self,
        draft: &PublisherDraft,
        now: DateTime<Utc>,
    ) -> Result<Publisher, PublisherRepositoryError> {
        let mut store = self.write(PublisherRepositoryError::query)?;
        let id = store.save(draft, now)?;
        store
            .publisher(id)
            .ok_or_else(|| PublisherRepositoryError::query("saved publisher vanished"))
    }

    async fn find_by_id(
        &self,
        id: &PublisherId,
    ) -> Result<Option<Publisher>, PublisherRepositoryError> {
        let store = self.read(PublisherRepositoryError::query)?;
        Ok(store.publisher(*id))
    }
}

#[async_trait]
impl CatalogueReadRepository for InMemoryCatalogue {
    async fn rank_publishers(
        &self,
        request: &RankRequest<PublisherSortField>,
    ) -> Result<RankedList<PublisherSummary>, CatalogueReadError> {
        let store = self.read(CatalogueReadError::query)?;
        let all = store.publisher_summaries();
        let total = all.len();
        Ok(Self::ranked(rank_in_memory(all, request), total))
    }

    async fn rank_series(
        &self,
        request: &RankRequest<SeriesSortField>,
    ) -> Result<RankedList<SeriesSummary>, CatalogueReadError> {
        let store = self.read(CatalogueReadError::query)?;
        let all = store.series_summaries();
        let total = all.len();
        Ok(Self::ranked(rank_in_memory(all, request), total))
    }

    async fn rank_books(
        &self,
        request: &RankRequest<BookSortField>,
    ) -> Result<RankedList<BookSummary>, CatalogueReadError> {
        let store = self.read(CatalogueReadError::query)?;
        let all = store.book_summaries();
        let total = all.len();
        Ok(Self::ranked(rank_in_memory(all, request), total))
    }

    async fn list_books(
        &self,
        limit: RankLimit,
    ) -> Result<RankedList<BookSummary>, CatalogueReadError> {
        let store = self.read(CatalogueReadError::query)?;
        let mut all = store.book_summaries();
        let total = all.len();
        all.sort_by(catalogue_order);
        all.truncate(limit.as_usize());
        Ok(Self::ranked(all, total))
    }
}

#[async_trait]
impl SeedRepository for InMemoryCatalogue {
    async fn apply(
        &self,
        plan: &SeedPlan,
        now: DateTime<Utc>,
    ) -> Result<SeedReport, SeedRepositoryError> {
        let mut store = self.write(SeedRepositoryError::query)?;
        Ok(store.apply_seed(plan, now))
    }
}
