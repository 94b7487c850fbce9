//! Delete strategy and result types for document removal operations.
//!
//! This module defines [`DeleteStrategy`] and [`DeleteResult`], which are used
//! when removing documents from a [`DocumentStore`](super::store::DocumentStore).
//!
//! ## Strategies
//!
//! Two strategies are supported:
//!
//! - [`DeleteStrategy::DeleteAll`] — removes the target document and all of
//!   its descendants recursively.
//! - [`DeleteStrategy::PromoteChildren`] — removes only the target document
//!   and re-parents its direct children to the deleted document's parent.
//!
//! ## Serialization
//!
//! Both types are serde-serializable so a boundary layer (HTTP handler,
//! desktop front-end) can pass them through as JSON:
//!
//! - `DeleteStrategy` variants serialize as PascalCase strings
//!   (`"DeleteAll"`, `"PromoteChildren"`).
//! - `DeleteResult` fields serialize in camelCase (`deletedCount`,
//!   `affectedIds`), consistent with the other return types in this crate.
//!
//! ## Examples
//!
//! ```rust
//! use pagetree_core::{DeleteStrategy, DeleteResult};
//!
//! let strategy = DeleteStrategy::PromoteChildren;
//! let json = serde_json::to_string(&strategy).unwrap();
//! assert_eq!(json, r#""PromoteChildren""#);
//!
//! let result = DeleteResult {
//!     deleted_count: 3,
//!     affected_ids: vec![11, 12, 13],
//! };
//! let json = serde_json::to_string(&result).unwrap();
//! assert!(json.contains("deletedCount"));
//! assert!(json.contains("affectedIds"));
//! ```

use serde::{Deserialize, Serialize};

/// Determines how children are handled when a document is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum DeleteStrategy {
    /// Delete the target document and all of its descendants recursively.
    DeleteAll,

    /// Delete only the target document and re-parent its children to its
    /// former parent.
    PromoteChildren,
}

/// The outcome of a delete operation performed on a
/// [`DocumentStore`](super::store::DocumentStore).
///
/// Contains a count of removed documents and the IDs of every document whose
/// position in the tree was affected — either because it was deleted or
/// because it was re-parented by [`DeleteStrategy::PromoteChildren`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    /// The total number of documents that were permanently removed.
    pub deleted_count: usize,

    /// IDs of all documents that were deleted or structurally affected by
    /// the operation.
    pub affected_ids: Vec<i64>,
}
