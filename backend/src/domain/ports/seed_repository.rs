//! Driven port for loading demo and reference data.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{SeedPlan, SeedReport};

use super::define_port_error;

define_port_error! {
    /// Errors raised while applying a seed plan.
    pub enum SeedRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "seed repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "seed repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SeedRepository: Send + Sync {
    /// Apply `plan` atomically, creating only rows that do not exist yet.
    ///
    /// Users match on email, reference data on name, and publishers on name.
    /// Re-applying the same plan creates nothing.
    async fn apply(
        &self,
        plan: &SeedPlan,
        now: DateTime<Utc>,
    ) -> Result<SeedReport, SeedRepositoryError>;
}
