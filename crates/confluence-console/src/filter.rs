//! Console filter, sort, and pagination pipeline.
//!
//! Filters run in a fixed order (status, then kind, then search) and
//! are pure functions of their input, so reapplying one is a no-op.

use confluence_core::models::application::{ApplicantKind, Application, ApplicationStatus};

/// Applications shown per console page.
pub const PAGE_SIZE: usize = 10;

/// The active filter set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsoleFilter {
    pub status: Option<ApplicationStatus>,
    pub kind: Option<ApplicantKind>,
    /// Case-insensitive substring over name, phone, startup name, and
    /// individual/firm. ANDs with the other filters.
    pub search: String,
}

impl ConsoleFilter {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.kind.is_none() && self.search.trim().is_empty()
    }

    pub fn matches(&self, app: &Application) -> bool {
        if let Some(status) = self.status
            && app.status != status
        {
            return false;
        }

        if let Some(kind) = self.kind
            && app.kind() != kind
        {
            return false;
        }

        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        let mut haystacks = vec![app.name.to_lowercase(), app.phone.to_lowercase()];
        if let Some(startup) = app.profile.startup_name() {
            haystacks.push(startup.to_lowercase());
        }
        if let Some(kind) = app.profile.individual_or_firm() {
            haystacks.push(kind.as_str().to_lowercase());
        }

        haystacks.iter().any(|h| h.contains(&needle))
    }

    pub fn apply(&self, apps: &[Application]) -> Vec<Application> {
        apps.iter().filter(|a| self.matches(a)).cloned().collect()
    }
}

/// Sort applied after filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    DateNewest,
    DateOldest,
    NameAsc,
    NameDesc,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DateNewest => "date-newest",
            Self::DateOldest => "date-oldest",
            Self::NameAsc => "name-asc",
            Self::NameDesc => "name-desc",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "date-newest" => Some(Self::DateNewest),
            "date-oldest" => Some(Self::DateOldest),
            "name-asc" => Some(Self::NameAsc),
            "name-desc" => Some(Self::NameDesc),
            _ => None,
        }
    }
}

pub fn sort_applications(apps: &mut [Application], key: SortKey) {
    match key {
        SortKey::DateNewest => apps.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortKey::DateOldest => apps.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortKey::NameAsc => apps.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase())),
        SortKey::NameDesc => apps.sort_by(|a, b| b.name.to_lowercase().cmp(&a.name.to_lowercase())),
    }
}

/// `ceil(len / PAGE_SIZE)`; an empty list has zero pages.
pub fn total_pages(len: usize) -> usize {
    len.div_ceil(PAGE_SIZE)
}

/// The slice shown on a 1-based page number.
pub fn page_slice(apps: &[Application], page: usize) -> &[Application] {
    let start = page.saturating_sub(1) * PAGE_SIZE;
    if start >= apps.len() {
        return &[];
    }
    let end = (start + PAGE_SIZE).min(apps.len());
    &apps[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_keys_round_trip() {
        for key in [
            SortKey::DateNewest,
            SortKey::DateOldest,
            SortKey::NameAsc,
            SortKey::NameDesc,
        ] {
            assert_eq!(SortKey::parse(key.as_str()), Some(key));
        }
        assert_eq!(SortKey::parse("unknown"), None);
    }

    #[test]
    fn page_math() {
        assert_eq!(total_pages(0), 0);
        assert_eq!(total_pages(1), 1);
        assert_eq!(total_pages(10), 1);
        assert_eq!(total_pages(11), 2);
        assert_eq!(total_pages(25), 3);
    }
}
