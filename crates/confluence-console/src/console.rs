//! Admin console state: loaded list, filter/sort/page, decisions.

use confluence_core::error::ConfluenceResult;
use confluence_core::models::application::{Application, ApplicationStatus};
use confluence_core::repository::ApplicationRepository;
use uuid::Uuid;

use crate::filter::{self, ConsoleFilter, SortKey};

/// One page of the filtered, sorted list.
#[derive(Debug, Clone)]
pub struct PageView {
    pub items: Vec<Application>,
    pub page: usize,
    pub total_pages: usize,
    /// Number of applications after filtering, across all pages.
    pub total: usize,
}

/// The review console for one admin session.
///
/// Holds the last fetched list in memory; filtering, sorting, and
/// pagination are applied on read. Decisions write through to the
/// store and patch the loaded list in place, so no re-fetch is needed.
/// Concurrent admin decisions are last-write-wins at the store.
pub struct AdminConsole<A: ApplicationRepository> {
    applications: A,
    loaded: Vec<Application>,
    filter: ConsoleFilter,
    sort: SortKey,
    page: usize,
}

impl<A: ApplicationRepository> AdminConsole<A> {
    pub fn new(applications: A) -> Self {
        Self {
            applications,
            loaded: Vec::new(),
            filter: ConsoleFilter::default(),
            sort: SortKey::default(),
            page: 1,
        }
    }

    /// Fetch all applications, newest first.
    pub async fn refresh(&mut self) -> ConfluenceResult<()> {
        self.loaded = self.applications.list_all().await?;
        tracing::debug!(count = self.loaded.len(), "console refreshed");
        Ok(())
    }

    /// Everything currently loaded, unfiltered. Export reads this.
    pub fn all(&self) -> &[Application] {
        &self.loaded
    }

    pub fn filter(&self) -> &ConsoleFilter {
        &self.filter
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Change the filter; the page resets to 1.
    pub fn set_filter(&mut self, filter: ConsoleFilter) {
        self.filter = filter;
        self.page = 1;
    }

    /// Change the sort; the page resets to 1.
    pub fn set_sort(&mut self, sort: SortKey) {
        self.sort = sort;
        self.page = 1;
    }

    /// Jump to a page, clamped to the valid range.
    pub fn set_page(&mut self, page: usize) {
        let last = filter::total_pages(self.filtered().len()).max(1);
        self.page = page.clamp(1, last);
    }

    /// The filtered, sorted list across all pages.
    pub fn filtered(&self) -> Vec<Application> {
        let mut matched = self.filter.apply(&self.loaded);
        filter::sort_applications(&mut matched, self.sort);
        matched
    }

    /// The current page.
    pub fn visible(&self) -> PageView {
        let matched = self.filtered();
        let total = matched.len();
        let total_pages = filter::total_pages(total);
        let items = filter::page_slice(&matched, self.page).to_vec();
        PageView {
            items,
            page: self.page,
            total_pages,
            total,
        }
    }

    /// Look up one loaded application for the review detail pane.
    pub fn get(&self, id: Uuid) -> Option<&Application> {
        self.loaded.iter().find(|a| a.id == id)
    }

    /// Record a decision. On success the loaded list is patched in
    /// place; on failure it is left untouched and the error surfaces.
    pub async fn decide(
        &mut self,
        id: Uuid,
        target: ApplicationStatus,
    ) -> ConfluenceResult<Application> {
        let updated = self.applications.set_status(id, target).await?;

        tracing::info!(application_id = %id, status = target.as_str(), "decision recorded");

        if let Some(slot) = self.loaded.iter_mut().find(|a| a.id == id) {
            *slot = updated.clone();
        }
        Ok(updated)
    }
}
