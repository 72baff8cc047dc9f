//! API Module
//!
//! HTTP handlers and routing for the projects and notes service.
//!
//! # Endpoints
//! - `GET /` - Welcome message
//! - `GET /projects` - List projects
//! - `POST /projects` - Create a project
//! - `GET /projects/:id/notes` - Page through a project's notes
//! - `POST /projects/:id/notes` - Add a note to a project
//! - `PATCH /notes/:id` - Edit a note
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod project_cache;
pub mod routes;

pub use handlers::*;
pub use project_cache::{ApiCache, CachedValue, ProjectCache};
pub use routes::create_router;
