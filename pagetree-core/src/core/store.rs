//! High-level, project-scoped operations over a Pagetree SQLite database.

use crate::core::notice;
use crate::{
    DeleteResult, DeleteStrategy, Document, DocumentRepository, EntityRef, NewDocument,
    PagetreeError, Project, Result, Storage,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The result of successfully moving a document under a new parent.
///
/// Carries the mutated document and a ready-to-display confirmation notice,
/// the way a web layer would pair the updated entity with a flash message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveOutcome {
    /// The document after the move, with its new `parent_id`.
    pub document: Document,

    /// Human-readable confirmation, e.g.
    /// `"You have successfully moved Title-1 to the Title-2 section."`.
    pub notice: String,
}

/// An open Pagetree store backed by a SQLite database.
///
/// `DocumentStore` is the primary interface for all document operations. Every
/// lookup is scoped to a project: a document reference is only meaningful
/// together with a project reference, and resolving a valid document under the
/// wrong project fails exactly like resolving a missing one. All storage
/// access goes through the embedded [`DocumentRepository`].
pub struct DocumentStore {
    repository: DocumentRepository,
}

impl DocumentStore {
    /// Creates a new store database at `path` and initialises the schema.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PagetreeError::Database`] for any SQLite failure.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let storage = Storage::create(path)?;
        Ok(Self {
            repository: DocumentRepository::new(storage),
        })
    }

    /// Opens an existing store database at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PagetreeError::InvalidStore`] if the file is not a
    /// Pagetree database, or [`crate::PagetreeError::Database`] for any
    /// SQLite failure.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let storage = Storage::open(path)?;
        Ok(Self {
            repository: DocumentRepository::new(storage),
        })
    }

    /// Returns the underlying SQLite connection.
    pub fn connection(&self) -> &rusqlite::Connection {
        self.repository.connection()
    }

    /// Creates a new project named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PagetreeError::ValidationFailed`] if `name` is blank,
    /// or [`crate::PagetreeError::Database`] for any SQLite failure.
    pub fn create_project(&mut self, name: &str) -> Result<Project> {
        self.repository.create_project(name)
    }

    /// Creates a document in `project`, optionally under `parent`.
    ///
    /// The parent reference, when given, is resolved within the same project;
    /// a parent living in another project is indistinguishable from a missing
    /// one.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PagetreeError::ValidationFailed`] if `title` is blank,
    /// [`crate::PagetreeError::NotFound`] if the project or parent cannot be
    /// resolved, or [`crate::PagetreeError::Database`] for any SQLite failure.
    pub fn create_document(
        &mut self,
        project: &EntityRef,
        title: &str,
        body: Option<String>,
        parent: Option<&EntityRef>,
    ) -> Result<Document> {
        if title.trim().is_empty() {
            return Err(PagetreeError::ValidationFailed(
                "Title cannot be empty".to_string(),
            ));
        }

        let project = self.resolve_project(project)?;
        let parent_id = match parent {
            Some(reference) => Some(self.resolve_document(&project, reference)?.id),
            None => None,
        };

        self.repository.insert(
            project.id,
            &NewDocument {
                title: title.to_string(),
                body,
                parent_id,
            },
        )
    }

    /// Fetches the document identified by `document` within `project`.
    ///
    /// Resolution is strictly project-first: the project reference is
    /// resolved, then the document is looked up filtered by that project's
    /// id. There is no global document lookup, so a reference that exists
    /// under another project can never be observed from here.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PagetreeError::NotFound`] if the project does not
    /// exist, the document does not exist, or the document belongs to a
    /// different project — the three cases are deliberately indistinguishable.
    pub fn get_document(&self, project: &EntityRef, document: &EntityRef) -> Result<Document> {
        let project = self.resolve_project(project)?;
        self.resolve_document(&project, document)
    }

    /// Returns the categories of `node`: its direct children within `project`,
    /// in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PagetreeError::NotFound`] per [`Self::get_document`]
    /// rules, or [`crate::PagetreeError::Database`] for any SQLite failure.
    pub fn categories(&self, project: &EntityRef, node: &EntityRef) -> Result<Vec<Document>> {
        let project = self.resolve_project(project)?;
        let node = self.resolve_document(&project, node)?;
        self.repository.children_of(project.id, node.id)
    }

    /// Fetches a document and, when requested, its categories in one call.
    ///
    /// This is the read surface a boundary layer maps a `show` request onto:
    /// the document itself plus `Some(children)` when `with_categories` is
    /// set, `None` otherwise.
    ///
    /// # Errors
    ///
    /// Same rules as [`Self::get_document`].
    pub fn show(
        &self,
        project: &EntityRef,
        document: &EntityRef,
        with_categories: bool,
    ) -> Result<(Document, Option<Vec<Document>>)> {
        let project = self.resolve_project(project)?;
        let document = self.resolve_document(&project, document)?;
        let categories = if with_categories {
            Some(self.repository.children_of(project.id, document.id)?)
        } else {
            None
        };
        Ok((document, categories))
    }

    /// Moves `node` under `new_parent` within `project`.
    ///
    /// Both references are resolved under the same project, so a new parent
    /// belonging to another project fails resolution rather than producing a
    /// cross-project edge. The move itself is rejected when it would make the
    /// document its own parent or pull one of its descendants above it.
    ///
    /// Exactly one row is mutated; the node's own children stay attached to
    /// it and travel with it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PagetreeError::NotFound`] if either reference fails
    /// to resolve within `project`, [`crate::PagetreeError::InvalidMove`] for
    /// self-parenting or cycle-forming moves, and
    /// [`crate::PagetreeError::Database`] for any SQLite failure.
    pub fn move_document(
        &mut self,
        project: &EntityRef,
        node: &EntityRef,
        new_parent: &EntityRef,
    ) -> Result<MoveOutcome> {
        let project = self.resolve_project(project)?;
        let node = self.resolve_document(&project, node)?;
        let new_parent = self.resolve_document(&project, new_parent)?;

        // 1. Self-move check
        if new_parent.id == node.id {
            return Err(PagetreeError::InvalidMove(
                "A document cannot be its own parent".to_string(),
            ));
        }

        // 2. Cycle check: walk the ancestor chain of the new parent
        let mut current = new_parent.id;
        loop {
            match self.repository.parent_id_of(current)? {
                Some(pid) => {
                    if pid == node.id {
                        return Err(PagetreeError::InvalidMove(
                            "Move would create a cycle".to_string(),
                        ));
                    }
                    current = pid;
                }
                None => break,
            }
        }

        // 3. Persist and narrate
        let document = self.repository.set_parent(node.id, Some(new_parent.id))?;
        log::debug!(
            "moved document {} under {} in project {}",
            node.id,
            new_parent.id,
            project.id
        );
        Ok(MoveOutcome {
            notice: notice::move_notice(&node.title, &new_parent.title),
            document,
        })
    }

    /// Deletes the document identified by `document` within `project` using
    /// `strategy`.
    ///
    /// With [`DeleteStrategy::PromoteChildren`] exactly one document is
    /// removed and its direct children are re-parented to its former parent;
    /// with [`DeleteStrategy::DeleteAll`] the whole subtree goes. Unrelated
    /// documents keep their parent pointers either way.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PagetreeError::NotFound`] per [`Self::get_document`]
    /// rules, or [`crate::PagetreeError::Database`] for any SQLite failure.
    pub fn delete_document(
        &mut self,
        project: &EntityRef,
        document: &EntityRef,
        strategy: DeleteStrategy,
    ) -> Result<DeleteResult> {
        let project = self.resolve_project(project)?;
        let document = self.resolve_document(&project, document)?;
        self.repository.delete(document.id, strategy)
    }

    /// Returns the total number of documents across all projects.
    pub fn count_documents(&self) -> Result<usize> {
        self.repository.count_documents()
    }

    fn resolve_project(&self, reference: &EntityRef) -> Result<Project> {
        self.repository
            .find_project(reference)?
            .ok_or_else(|| PagetreeError::NotFound(reference.to_string()))
    }

    /// Resolves a document reference within an already-resolved project.
    ///
    /// Missing documents and documents under other projects produce the same
    /// error; nothing about out-of-scope records leaks to the caller.
    fn resolve_document(&self, project: &Project, reference: &EntityRef) -> Result<Document> {
        self.repository
            .find_document(project.id, reference)?
            .ok_or_else(|| PagetreeError::NotFound(reference.to_string()))
    }
}
