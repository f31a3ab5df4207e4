//! Driving port for the dashboard.

use async_trait::async_trait;

use crate::domain::DashboardView;

/// Domain use-case port for loading every dashboard panel.
///
/// Never fails as a whole: each panel carries its own outcome.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DashboardQuery: Send + Sync {
    async fn load(&self) -> DashboardView;
}
