//! Core library for Pagetree — a project-scoped, hierarchical document store.
//!
//! Documents belong to a project and may nest under a parent document in the
//! same project. The primary entry point is [`DocumentStore`], which opens a
//! SQLite-backed store and exposes project-scoped resolution, category
//! (direct-children) queries, and reparenting with a user-facing confirmation
//! notice. Every lookup is scoped: resolving a document under the wrong
//! project fails identically to resolving a missing one.
//!
//! Types are re-exported from their respective sub-modules for convenience;
//! consumers should import from the crate root rather than the `core` module.

pub mod core;

// Re-export commonly used types.
#[doc(inline)]
pub use core::{
    delete::{DeleteResult, DeleteStrategy},
    document::{Document, EntityRef, NewDocument, Project},
    error::{PagetreeError, Result},
    notice::move_notice,
    repository::DocumentRepository,
    storage::Storage,
    store::{DocumentStore, MoveOutcome},
};
