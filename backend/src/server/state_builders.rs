//! Adapter selection and service wiring for the HTTP state.
//!
//! With a database URL every port is served by its Diesel adapter over one
//! shared pool; without one, a single [`InMemoryCatalogue`] serves them all.

use std::sync::Arc;
use std::time::Duration;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::info;

use longbox::domain::ports::{
    CatalogueReadRepository, PublisherRepository, SeedRepository, UserRepository,
};
use longbox::domain::{
    CatalogueQueryService, DashboardAggregator, DemoDataSeeder, Error, PublisherService, SeedPlan,
    SessionIssuer, TokenSigner,
};
use longbox::inbound::http::state::HttpState;
use longbox::outbound::memory::InMemoryCatalogue;
use longbox::outbound::persistence::{
    DbPool, DieselCatalogueReadRepository, DieselPublisherRepository, DieselSeedRepository,
    DieselUserRepository,
};

/// Driven adapters for every port the HTTP layer depends on.
pub(super) struct Adapters<U, P, C, S> {
    pub users: Arc<U>,
    pub publishers: Arc<P>,
    pub catalogue: Arc<C>,
    pub seed: Arc<S>,
}

pub(super) type DieselAdapters = Adapters<
    DieselUserRepository,
    DieselPublisherRepository,
    DieselCatalogueReadRepository,
    DieselSeedRepository,
>;

pub(super) type MemoryAdapters =
    Adapters<InMemoryCatalogue, InMemoryCatalogue, InMemoryCatalogue, InMemoryCatalogue>;

pub(super) fn diesel_adapters(pool: &DbPool) -> DieselAdapters {
    Adapters {
        users: Arc::new(DieselUserRepository::new(pool.clone())),
        publishers: Arc::new(DieselPublisherRepository::new(pool.clone())),
        catalogue: Arc::new(DieselCatalogueReadRepository::new(pool.clone())),
        seed: Arc::new(DieselSeedRepository::new(pool.clone())),
    }
}

pub(super) fn memory_adapters() -> MemoryAdapters {
    let store = Arc::new(InMemoryCatalogue::new());
    Adapters {
        users: store.clone(),
        publishers: store.clone(),
        catalogue: store.clone(),
        seed: store,
    }
}

/// Tunables the services take from configuration.
#[derive(Debug, Clone, Copy)]
pub(super) struct ServiceLimits {
    pub rank_limit_max: u32,
    pub panel_timeout: Duration,
}

impl<U, P, C, S> Adapters<U, P, C, S>
where
    U: UserRepository + 'static,
    P: PublisherRepository + 'static,
    C: CatalogueReadRepository + 'static,
    S: SeedRepository + 'static,
{
    /// Apply the demo plan through the seed adapter.
    pub(super) async fn seed_demo_data(&self) -> Result<(), Error> {
        let plan = SeedPlan::demo()?;
        let seeder = DemoDataSeeder::new(self.seed.clone(), Arc::new(DefaultClock));
        let report = seeder.seed(&plan).await?;
        info!(users = report.users, books = report.books, "startup seeding finished");
        Ok(())
    }

    /// Build the domain services and bundle them as handler state.
    pub(super) fn http_state(&self, signer: TokenSigner, limits: ServiceLimits) -> web::Data<HttpState> {
        let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
        let sessions = Arc::new(SessionIssuer::new(self.users.clone(), signer.clone()));
        let publishers = Arc::new(PublisherService::new(self.publishers.clone(), clock));
        let catalogue = Arc::new(CatalogueQueryService::new(
            self.catalogue.clone(),
            limits.rank_limit_max,
        ));
        let dashboard = Arc::new(DashboardAggregator::new(
            catalogue.clone(),
            limits.panel_timeout,
        ));

        web::Data::new(HttpState {
            login: sessions.clone(),
            users: sessions,
            publishers: publishers.clone(),
            publishers_query: publishers,
            catalogue,
            dashboard,
            tokens: signer,
        })
    }
}
