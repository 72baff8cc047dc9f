//! Domain and transport models
//!
//! Projects and notes, plus the DTOs used for serializing/deserializing
//! HTTP request and response bodies.

pub mod project;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use project::{Note, Project};
pub use requests::{FieldError, NoteRequest, NotesQuery, ProjectRequest};
pub use responses::{
    ErrorResponse, HealthResponse, MessageResponse, NotesPage, StatsResponse,
    ValidationErrorResponse,
};
