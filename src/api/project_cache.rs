//! Project Cache
//!
//! Typed view of the shared cache for the HTTP handlers: which keys exist,
//! what shape is stored under each, and what a mutation must invalidate.
//!
//! # Keys
//! - `projects:all` - the full project listing
//! - `project:<id>` - one project with its notes
//! - `notes:<id>:limit:<n>` - one page of a project's notes

use crate::cache::{CacheOptions, TtlCache};
use crate::models::{NotesPage, Project};
use crate::models::requests::MAX_NOTES_LIMIT;

/// Key of the cached project listing
pub const LIST_CACHE_KEY: &str = "projects:all";

/// Namespace of individually cached projects
pub const PROJECT_PREFIX: &str = "project";

/// Every shape the service stores in the cache.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedValue {
    Project(Project),
    ProjectList(Vec<Project>),
    NotesPage(NotesPage),
}

/// The cache as owned by the service.
pub type ApiCache = TtlCache<CachedValue>;

/// Namespace of a project's note pages.
pub fn notes_prefix(project_id: &str) -> String {
    format!("notes:{project_id}")
}

/// Key of one note page inside [`notes_prefix`].
pub fn notes_page_key(limit: usize) -> String {
    format!("limit:{limit}")
}

// == Project Cache ==
/// Read-through helpers over [`ApiCache`]. Entries are written with the
/// configured resource TTL. A value of the wrong shape reads as a miss.
#[derive(Debug, Clone)]
pub struct ProjectCache {
    cache: ApiCache,
    ttl: i64,
}

impl ProjectCache {
    pub fn new(cache: ApiCache, ttl: i64) -> Self {
        Self { cache, ttl }
    }

    /// The underlying generic cache.
    pub fn inner(&self) -> &ApiCache {
        &self.cache
    }

    // == Projects ==
    pub fn project(&self, id: &str) -> Option<Project> {
        match self.cache.get(id, &CacheOptions::prefixed(PROJECT_PREFIX))? {
            CachedValue::Project(project) => Some(project),
            _ => None,
        }
    }

    pub fn put_project(&self, project: &Project) -> bool {
        let options = CacheOptions::prefixed(PROJECT_PREFIX).with_ttl(self.ttl);
        self.cache
            .set(&project.id, CachedValue::Project(project.clone()), &options)
    }

    // == Listing ==
    pub fn project_list(&self) -> Option<Vec<Project>> {
        match self.cache.get(LIST_CACHE_KEY, &CacheOptions::new())? {
            CachedValue::ProjectList(projects) => Some(projects),
            _ => None,
        }
    }

    pub fn put_project_list(&self, projects: &[Project]) -> bool {
        let options = CacheOptions::new().with_ttl(self.ttl);
        self.cache.set(
            LIST_CACHE_KEY,
            CachedValue::ProjectList(projects.to_vec()),
            &options,
        )
    }

    // == Note Pages ==
    pub fn notes_page(&self, project_id: &str, limit: usize) -> Option<NotesPage> {
        let options = CacheOptions::prefixed(notes_prefix(project_id));
        match self.cache.get(&notes_page_key(limit), &options)? {
            CachedValue::NotesPage(page) => Some(page),
            _ => None,
        }
    }

    pub fn put_notes_page(&self, page: &NotesPage) -> bool {
        let options = CacheOptions::prefixed(notes_prefix(&page.project_id)).with_ttl(self.ttl);
        self.cache.set(
            &notes_page_key(page.limit),
            CachedValue::NotesPage(page.clone()),
            &options,
        )
    }

    // == Invalidation ==
    /// Drops every derived entry that includes `project_id`: the project
    /// listing and all of the project's note pages. Returns the count removed.
    pub fn invalidate_listings(&self, project_id: &str) -> usize {
        let listing = self.cache.del_one(LIST_CACHE_KEY, &CacheOptions::new());

        let page_keys = (1..=MAX_NOTES_LIMIT).map(notes_page_key);
        let pages = self
            .cache
            .del(page_keys, &CacheOptions::prefixed(notes_prefix(project_id)));

        listing + pages
    }
}
