//! Internal domain modules for the Pagetree core library.
//!
//! All public types from these modules are re-exported at the crate root
//! with `#[doc(inline)]`; import from there in preference to this module.

pub mod delete;
pub mod document;
pub mod error;
pub mod notice;
pub mod repository;
pub mod storage;
pub mod store;

#[doc(inline)]
pub use delete::{DeleteResult, DeleteStrategy};
#[doc(inline)]
pub use document::{Document, EntityRef, NewDocument, Project};
#[doc(inline)]
pub use error::{PagetreeError, Result};
#[doc(inline)]
pub use notice::move_notice;
#[doc(inline)]
pub use repository::DocumentRepository;
#[doc(inline)]
pub use storage::Storage;
#[doc(inline)]
pub use store::{DocumentStore, MoveOutcome};
