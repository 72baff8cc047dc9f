//! API Handlers
//!
//! HTTP request handlers for projects and notes. Reads go through the cache
//! first and fall back to the repository; writes go to the repository and
//! then invalidate every cached entry they made stale.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::{debug, info};

use crate::api::project_cache::{ApiCache, ProjectCache};
use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use crate::models::{
    HealthResponse, MessageResponse, Note, NoteRequest, NotesPage, NotesQuery, Project,
    ProjectRequest, StatsResponse,
};
use crate::repository::ProjectRepository;

/// Application state shared across all handlers.
///
/// The cache and repository are built once by the caller and injected here.
#[derive(Clone)]
pub struct AppState {
    pub cache: ProjectCache,
    pub projects: Arc<dyn ProjectRepository>,
}

impl AppState {
    /// Creates a new AppState from an existing cache and repository.
    pub fn new(cache: ApiCache, projects: Arc<dyn ProjectRepository>, resource_ttl: i64) -> Self {
        Self {
            cache: ProjectCache::new(cache, resource_ttl),
            projects,
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(
        config: &Config,
        cache: ApiCache,
        projects: Arc<dyn ProjectRepository>,
    ) -> Self {
        Self::new(cache, projects, config.resource_ttl)
    }
}

/// Handler for GET /
pub async fn root_handler() -> Json<MessageResponse> {
    Json(MessageResponse::new("Welcome to the Projects and Notes API!"))
}

/// Handler for GET /projects
///
/// Serves the cached listing when present, otherwise lists the repository
/// and caches the result.
pub async fn list_projects_handler(State(state): State<AppState>) -> Json<Vec<Project>> {
    if let Some(projects) = state.cache.project_list() {
        debug!("Cache HIT for projects list");
        return Json(projects);
    }

    let projects = state.projects.list();
    state.cache.put_project_list(&projects);

    Json(projects)
}

/// Handler for POST /projects
pub async fn create_project_handler(
    State(state): State<AppState>,
    payload: Result<Json<ProjectRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    let Json(req) = payload?;
    let name = req.validate().map_err(ApiError::Validation)?;

    let project = Project::new(name);
    state.projects.insert(project.clone());

    state.cache.put_project(&project);
    state.cache.invalidate_listings(&project.id);
    info!(project_id = %project.id, "Created project, invalidated list cache");

    Ok((StatusCode::CREATED, Json(project)))
}

/// Handler for GET /projects/:id/notes?limit=N
///
/// Serves a cached page when present. On a miss the project is read through
/// the project cache, then the repository.
pub async fn list_notes_handler(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    Query(query): Query<NotesQuery>,
) -> ApiResult<Json<NotesPage>> {
    let limit = query.limit().map_err(ApiError::BadRequest)?;

    if let Some(page) = state.cache.notes_page(&project_id, limit) {
        debug!(project_id = %project_id, limit, "Cache HIT for notes list");
        return Ok(Json(page));
    }

    let project = match state.cache.project(&project_id) {
        Some(project) => project,
        None => {
            let project = state
                .projects
                .find(&project_id)
                .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;
            state.cache.put_project(&project);
            project
        }
    };

    let notes = project.notes_newest_first();
    let page = NotesPage {
        total: notes.len(),
        notes: notes.into_iter().take(limit).collect(),
        project_id,
        limit,
    };
    state.cache.put_notes_page(&page);

    Ok(Json(page))
}

/// Handler for POST /projects/:id/notes
pub async fn create_note_handler(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    payload: Result<Json<NoteRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    let Json(req) = payload?;
    let text = req.validate().map_err(ApiError::Validation)?;

    let project = state
        .projects
        .add_note(Note::new(&project_id, text))
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    state.cache.put_project(&project);
    state.cache.invalidate_listings(&project.id);
    info!(project_id = %project.id, "Added note, invalidated caches");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Note has been added successfully.")),
    ))
}

/// Handler for PATCH /notes/:id
pub async fn update_note_handler(
    State(state): State<AppState>,
    Path(note_id): Path<String>,
    payload: Result<Json<NoteRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Json(req) = payload?;
    if req.is_blank() {
        return Err(ApiError::BadRequest("Text is required".to_string()));
    }

    let project = state
        .projects
        .update_note(&note_id, req.text.trim())
        .ok_or_else(|| ApiError::NotFound("Note not found".to_string()))?;

    state.cache.put_project(&project);
    state.cache.invalidate_listings(&project.id);
    info!(note_id = %note_id, project_id = %project.id, "Updated note, invalidated caches");

    Ok(Json(MessageResponse::new("Note has been updated.")))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.cache.inner();
    Json(StatsResponse::new(cache.stats(), cache.max_keys()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
