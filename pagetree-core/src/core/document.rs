use serde::{Deserialize, Serialize};

/// A project that owns a set of documents.
///
/// The numeric `id` is the storage identity; `slug` is the stable
/// human-readable key used in URLs and lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub slug: String,
    pub name: String,
    pub created_at: i64,
}

/// A document within a project.
///
/// `parent_id` points at another document in the same project; `None` means
/// the document sits at the root of the project's tree. `project_id` is
/// assigned at creation and never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub body: Option<String>,
    pub project_id: i64,
    pub parent_id: Option<i64>,
    pub created_at: i64,
    pub modified_at: i64,
}

/// Attributes for a document about to be created.
///
/// The slug and timestamps are derived at insert time; `parent_id` must
/// already be resolved to an in-project document (or `None` for root level).
#[derive(Debug, Clone, Default)]
pub struct NewDocument {
    pub title: String,
    pub body: Option<String>,
    pub parent_id: Option<i64>,
}

/// A lookup key for a project or document: either a numeric id or a slug.
///
/// Callers supply references as strings; a string of ASCII digits is taken
/// to be an id, anything else a slug. Both forms resolve to the same record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityRef {
    Id(i64),
    Slug(String),
}

impl EntityRef {
    /// Parses a caller-supplied reference string.
    ///
    /// An empty string parses as `Slug("")`, which can never match a stored
    /// record; rejecting it is left to resolution rather than parsing.
    pub fn parse(raw: &str) -> Self {
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            match raw.parse::<i64>() {
                Ok(id) => Self::Id(id),
                Err(_) => Self::Slug(raw.to_string()),
            }
        } else {
            Self::Slug(raw.to_string())
        }
    }
}

impl std::fmt::Display for EntityRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Slug(slug) => write!(f, "{slug}"),
        }
    }
}

impl From<i64> for EntityRef {
    fn from(id: i64) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for EntityRef {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}
