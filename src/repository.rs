//! Project Repository
//!
//! The backing store behind the cache. Handlers read through the cache and
//! fall back here on a miss; every write goes here first.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::models::{Note, Project};

/// Storage for projects and their notes.
pub trait ProjectRepository: Send + Sync {
    /// All projects in creation order.
    fn list(&self) -> Vec<Project>;

    fn find(&self, id: &str) -> Option<Project>;

    fn insert(&self, project: Project);

    /// Appends a note to its project. Returns the updated project, or `None`
    /// if the project does not exist.
    fn add_note(&self, note: Note) -> Option<Project>;

    /// Replaces a note's text. Returns the owning project after the update,
    /// or `None` if no project holds the note.
    fn update_note(&self, note_id: &str, text: &str) -> Option<Project>;
}

#[derive(Debug, Default)]
struct Table {
    projects: HashMap<String, Project>,
    /// Ids in creation order
    order: Vec<String>,
}

/// In-memory repository.
#[derive(Debug, Default)]
pub struct InMemoryProjectRepository {
    table: RwLock<Table>,
}

impl InMemoryProjectRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

// A poisoned table is still structurally valid: every write below is a
// single insert or push, so the data is used as-is.
impl ProjectRepository for InMemoryProjectRepository {
    fn list(&self) -> Vec<Project> {
        let table = self.table.read().unwrap_or_else(PoisonError::into_inner);
        table
            .order
            .iter()
            .filter_map(|id| table.projects.get(id).cloned())
            .collect()
    }

    fn find(&self, id: &str) -> Option<Project> {
        let table = self.table.read().unwrap_or_else(PoisonError::into_inner);
        table.projects.get(id).cloned()
    }

    fn insert(&self, project: Project) {
        let mut table = self.table.write().unwrap_or_else(PoisonError::into_inner);
        if !table.projects.contains_key(&project.id) {
            table.order.push(project.id.clone());
        }
        table.projects.insert(project.id.clone(), project);
    }

    fn add_note(&self, note: Note) -> Option<Project> {
        let mut table = self.table.write().unwrap_or_else(PoisonError::into_inner);
        let project = table.projects.get_mut(&note.project_id)?;
        project.notes.push(note);
        Some(project.clone())
    }

    fn update_note(&self, note_id: &str, text: &str) -> Option<Project> {
        let mut table = self.table.write().unwrap_or_else(PoisonError::into_inner);
        let project = table
            .projects
            .values_mut()
            .find(|project| project.notes.iter().any(|note| note.id == note_id))?;

        let note = project.notes.iter_mut().find(|note| note.id == note_id)?;
        note.text = text.to_string();
        Some(project.clone())
    }
}
