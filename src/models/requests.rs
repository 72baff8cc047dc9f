//! Request DTOs for the HTTP API
//!
//! Defines the structure of incoming request bodies and query strings,
//! together with their validation rules.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Notes returned per page when no usable `limit` is given
pub const DEFAULT_NOTES_LIMIT: usize = 10;

/// Largest accepted `limit` for a notes page
pub const MAX_NOTES_LIMIT: usize = 50;

/// One failed validation rule, reported back to the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    pub value: Value,
}

impl FieldError {
    pub fn new(field: &str, message: &str, value: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
            value: Value::String(value.to_string()),
        }
    }
}

/// Request body for POST /projects
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectRequest {
    #[serde(default)]
    pub name: String,
}

impl ProjectRequest {
    /// Validates the name and returns it trimmed.
    ///
    /// Rules: 2 to 50 characters, letters and spaces only.
    pub fn validate(&self) -> Result<String, Vec<FieldError>> {
        let name = self.name.trim();
        let mut errors = Vec::new();
        let len = name.chars().count();

        if len < 2 {
            errors.push(FieldError::new("name", "Name must be at least 2 characters long", name));
        }
        if len > 50 {
            errors.push(FieldError::new("name", "Name must be less than 50 characters", name));
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_alphabetic() || c.is_whitespace())
        {
            errors.push(FieldError::new(
                "name",
                "Name can only contain letters and spaces",
                name,
            ));
        }

        if errors.is_empty() {
            Ok(name.to_string())
        } else {
            Err(errors)
        }
    }
}

/// Request body for POST /projects/:id/notes and PATCH /notes/:id
#[derive(Debug, Clone, Deserialize)]
pub struct NoteRequest {
    #[serde(default)]
    pub text: String,
}

impl NoteRequest {
    /// Validates the text and returns it trimmed.
    ///
    /// Rules: 2 to 255 characters.
    pub fn validate(&self) -> Result<String, Vec<FieldError>> {
        let text = self.text.trim();
        let len = text.chars().count();

        if len < 2 {
            Err(vec![FieldError::new("text", "Text must be at least 2 characters long", text)])
        } else if len > 255 {
            Err(vec![FieldError::new("text", "Text must be less than 255 characters", text)])
        } else {
            Ok(text.to_string())
        }
    }

    /// True if the text is empty after trimming.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Query string for GET /projects/:id/notes
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotesQuery {
    /// Kept as text so that garbage falls back to the default instead of failing
    pub limit: Option<String>,
}

impl NotesQuery {
    /// Resolves the page size.
    ///
    /// Missing, unparseable or non-positive values mean the default of 10.
    /// Values above 50 are an error.
    pub fn limit(&self) -> Result<usize, String> {
        let requested = self
            .limit
            .as_deref()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .filter(|limit| *limit > 0);

        match requested {
            None => Ok(DEFAULT_NOTES_LIMIT),
            Some(limit) if limit as u64 > MAX_NOTES_LIMIT as u64 => Err(format!(
                "Limit cannot exceed {MAX_NOTES_LIMIT} notes per request"
            )),
            Some(limit) => Ok(limit as usize),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_request_deserialize() {
        let req: ProjectRequest = serde_json::from_str(r#"{"name": "Alpha"}"#).unwrap();
        assert_eq!(req.name, "Alpha");

        let req: ProjectRequest = serde_json::from_str("{}").unwrap();
        assert!(req.name.is_empty());
    }

    #[test]
    fn test_project_name_trimmed() {
        let req = ProjectRequest {
            name: "  New Project ".to_string(),
        };
        assert_eq!(req.validate().unwrap(), "New Project");
    }

    #[test]
    fn test_project_name_rules() {
        let short = ProjectRequest { name: "A".into() };
        assert_eq!(short.validate().unwrap_err().len(), 1);

        let digits = ProjectRequest { name: "Project 9".into() };
        let errors = digits.validate().unwrap_err();
        assert_eq!(errors[0].field, "name");
        assert_eq!(errors[0].value, "Project 9");

        let long = ProjectRequest { name: "a".repeat(51) };
        assert!(long.validate().is_err());

        let max = ProjectRequest { name: "a".repeat(50) };
        assert!(max.validate().is_ok());

        // Both length and charset rules fail
        let bad = ProjectRequest { name: "1".into() };
        assert_eq!(bad.validate().unwrap_err().len(), 2);
    }

    #[test]
    fn test_note_text_rules() {
        assert_eq!(
            NoteRequest { text: " hi ".into() }.validate().unwrap(),
            "hi"
        );
        assert!(NoteRequest { text: "x".into() }.validate().is_err());
        assert!(NoteRequest { text: "x".repeat(256) }.validate().is_err());
        assert!(NoteRequest { text: "   ".into() }.is_blank());
    }

    #[test]
    fn test_notes_limit() {
        let query = |limit: Option<&str>| NotesQuery {
            limit: limit.map(str::to_string),
        };

        assert_eq!(query(None).limit(), Ok(10));
        assert_eq!(query(Some("25")).limit(), Ok(25));
        assert_eq!(query(Some("50")).limit(), Ok(50));
        assert_eq!(query(Some("0")).limit(), Ok(10));
        assert_eq!(query(Some("-4")).limit(), Ok(10));
        assert_eq!(query(Some("abc")).limit(), Ok(10));
        assert!(query(Some("51")).limit().is_err());
    }
}
