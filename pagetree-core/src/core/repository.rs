//! SQL-backed repository for projects and documents.
//!
//! [`DocumentRepository`] is the only module in this crate that issues SQL;
//! everything above it (scoped resolution, hierarchy moves, deletion policy)
//! goes through this interface rather than touching [`Storage`] directly.
//! It deliberately knows nothing about project scoping rules: callers pass
//! an already-resolved `project_id` and the repository filters by it.

use crate::{
    DeleteResult, DeleteStrategy, Document, EntityRef, NewDocument, PagetreeError, Project,
    Result, Storage,
};

pub struct DocumentRepository {
    storage: Storage,
}

impl DocumentRepository {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Returns the underlying SQLite connection.
    pub fn connection(&self) -> &rusqlite::Connection {
        self.storage.connection()
    }

    /// Looks a project up by numeric id or slug.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PagetreeError::Database`] for any SQLite failure.
    /// A missing project is `Ok(None)`, not an error; callers decide how
    /// absence is surfaced.
    pub fn find_project(&self, reference: &EntityRef) -> Result<Option<Project>> {
        let (clause, key) = match reference {
            EntityRef::Id(id) => ("id = ?1", id.to_string()),
            EntityRef::Slug(slug) => ("slug = ?1", slug.clone()),
        };
        let sql = format!(
            "SELECT id, slug, name, created_at FROM projects WHERE {clause}"
        );
        match self.storage.connection().query_row(
            &sql,
            rusqlite::params![key],
            map_project_row,
        ) {
            Ok(project) => Ok(Some(project)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Creates a new project, deriving its slug from `name`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PagetreeError::ValidationFailed`] if `name` is blank,
    /// or [`crate::PagetreeError::Database`] for any SQLite failure.
    pub fn create_project(&mut self, name: &str) -> Result<Project> {
        if name.trim().is_empty() {
            return Err(PagetreeError::ValidationFailed(
                "Project name cannot be empty".to_string(),
            ));
        }

        let slug = self.unique_project_slug(&slugify(name))?;
        let now = chrono::Utc::now().timestamp();

        self.storage.connection().execute(
            "INSERT INTO projects (slug, name, created_at) VALUES (?1, ?2, ?3)",
            rusqlite::params![slug, name, now],
        )?;
        let id = self.storage.connection().last_insert_rowid();

        log::debug!("created project {id} ({slug})");
        Ok(Project {
            id,
            slug,
            name: name.to_string(),
            created_at: now,
        })
    }

    /// Looks a document up by numeric id or slug, **within** `project_id`.
    ///
    /// The project filter is part of the query itself — there is no global
    /// lookup to leak the existence of documents in other projects.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PagetreeError::Database`] for any SQLite failure.
    pub fn find_document(
        &self,
        project_id: i64,
        reference: &EntityRef,
    ) -> Result<Option<Document>> {
        let (clause, key) = match reference {
            EntityRef::Id(id) => ("id = ?2", id.to_string()),
            EntityRef::Slug(slug) => ("slug = ?2", slug.clone()),
        };
        let sql = format!(
            "SELECT id, slug, title, body, project_id, parent_id, created_at, modified_at
             FROM documents WHERE project_id = ?1 AND {clause}"
        );
        match self.storage.connection().query_row(
            &sql,
            rusqlite::params![project_id, key],
            map_document_row,
        ) {
            Ok(doc) => Ok(Some(doc)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Fetches a document by its storage id alone.
    ///
    /// Internal plumbing for re-reads after a mutation; scope checks happen
    /// before ids are handed to this method.
    fn get_document(&self, document_id: i64) -> Result<Document> {
        self.storage
            .connection()
            .query_row(
                "SELECT id, slug, title, body, project_id, parent_id, created_at, modified_at
                 FROM documents WHERE id = ?1",
                rusqlite::params![document_id],
                map_document_row,
            )
            .map_err(|_| PagetreeError::NotFound(document_id.to_string()))
    }

    /// Inserts a new document into `project_id` and returns the stored row.
    ///
    /// The slug is derived from the title and de-duplicated within the
    /// project; `created_at` and `modified_at` are set to the current UTC
    /// second.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PagetreeError::Database`] for any SQLite failure.
    pub fn insert(&mut self, project_id: i64, new: &NewDocument) -> Result<Document> {
        let slug = self.unique_document_slug(project_id, &slugify(&new.title))?;
        let now = chrono::Utc::now().timestamp();

        self.storage.connection().execute(
            "INSERT INTO documents (slug, title, body, project_id, parent_id, created_at, modified_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![slug, new.title, new.body, project_id, new.parent_id, now, now],
        )?;
        let id = self.storage.connection().last_insert_rowid();

        self.get_document(id)
    }

    /// Repoints `document_id` at `parent_id`, refreshing `modified_at`.
    ///
    /// Runs in a single transaction and touches exactly one row. Structural
    /// validation (self-parenting, cycles, scope) is the caller's job; this
    /// method only persists an already-validated move.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PagetreeError::NotFound`] if no document with
    /// `document_id` exists, or [`crate::PagetreeError::Database`] for any
    /// other SQLite failure.
    pub fn set_parent(&mut self, document_id: i64, parent_id: Option<i64>) -> Result<Document> {
        let now = chrono::Utc::now().timestamp();
        let tx = self.storage.connection_mut().transaction()?;

        tx.execute(
            "UPDATE documents SET parent_id = ?1, modified_at = ?2 WHERE id = ?3",
            rusqlite::params![parent_id, now, document_id],
        )?;
        if tx.changes() == 0 {
            return Err(PagetreeError::NotFound(document_id.to_string()));
        }

        tx.commit()?;
        self.get_document(document_id)
    }

    /// Returns the direct children of `parent_id` within `project_id`,
    /// ordered by creation (`created_at`, then `id` as a tiebreaker).
    ///
    /// Only immediate children are returned; grandchildren and deeper
    /// descendants are not included.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PagetreeError::Database`] if the query fails.
    pub fn children_of(&self, project_id: i64, parent_id: i64) -> Result<Vec<Document>> {
        let mut stmt = self.storage.connection().prepare(
            "SELECT id, slug, title, body, project_id, parent_id, created_at, modified_at
             FROM documents
             WHERE project_id = ?1 AND parent_id = ?2
             ORDER BY created_at, id",
        )?;

        let rows = stmt
            .query_map(rusqlite::params![project_id, parent_id], map_document_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Returns the `parent_id` of `document_id`, or an error if the document
    /// does not exist. Used by ancestor-chain walks.
    pub fn parent_id_of(&self, document_id: i64) -> Result<Option<i64>> {
        self.storage
            .connection()
            .query_row(
                "SELECT parent_id FROM documents WHERE id = ?1",
                rusqlite::params![document_id],
                |row| row.get(0),
            )
            .map_err(|_| PagetreeError::NotFound(document_id.to_string()))
    }

    /// Returns the total number of documents across all projects.
    pub fn count_documents(&self) -> Result<usize> {
        let count: i64 = self.storage.connection().query_row(
            "SELECT COUNT(*) FROM documents",
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Deletes `document_id` using the specified [`DeleteStrategy`].
    ///
    /// - [`DeleteStrategy::DeleteAll`] removes the document and every
    ///   descendant in a single atomic transaction.
    /// - [`DeleteStrategy::PromoteChildren`] removes only the document itself
    ///   and re-parents its direct children to the deleted document's former
    ///   parent. Grandchildren keep their existing parent.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PagetreeError::NotFound`] if no document with
    /// `document_id` exists. Returns [`crate::PagetreeError::Database`] for
    /// any other SQLite failure; the transaction is rolled back on failure.
    pub fn delete(&mut self, document_id: i64, strategy: DeleteStrategy) -> Result<DeleteResult> {
        match strategy {
            DeleteStrategy::DeleteAll => self.delete_recursive(document_id),
            DeleteStrategy::PromoteChildren => self.delete_promote(document_id),
        }
    }

    fn delete_recursive(&mut self, document_id: i64) -> Result<DeleteResult> {
        let tx = self.storage.connection_mut().transaction()?;
        let result = Self::delete_recursive_in_tx(&tx, document_id)?;
        tx.commit()?;
        log::debug!("deleted document {document_id} and {} descendants", result.deleted_count - 1);
        Ok(result)
    }

    /// Recursively deletes `document_id` and all descendants within an
    /// existing transaction.
    ///
    /// Only child IDs are fetched, and deletion proceeds depth-first so
    /// children are removed before their parent, keeping the self-referencing
    /// foreign key satisfied throughout.
    ///
    /// This helper must not open its own transaction; SQLite does not support
    /// nested transactions.
    fn delete_recursive_in_tx(
        tx: &rusqlite::Transaction,
        document_id: i64,
    ) -> Result<DeleteResult> {
        let mut affected_ids = vec![document_id];

        let mut stmt = tx.prepare("SELECT id FROM documents WHERE parent_id = ?1")?;
        let child_ids: Vec<i64> = stmt
            .query_map(rusqlite::params![document_id], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        // Recurse into children before deleting this node (leaves-first order).
        for child_id in child_ids {
            let child_result = Self::delete_recursive_in_tx(tx, child_id)?;
            affected_ids.extend(child_result.affected_ids);
        }

        tx.execute(
            "DELETE FROM documents WHERE id = ?1",
            rusqlite::params![document_id],
        )?;

        // SQLite DELETE silently affects zero rows when the ID does not
        // exist; surface that as NotFound for the root of the subtree.
        if tx.changes() == 0 {
            return Err(PagetreeError::NotFound(document_id.to_string()));
        }

        Ok(DeleteResult {
            deleted_count: affected_ids.len(),
            affected_ids,
        })
    }

    /// Deletes `document_id` and promotes its children to its grandparent.
    ///
    /// The returned [`DeleteResult`] always has `deleted_count == 1`;
    /// `affected_ids` lists the deleted document followed by every
    /// re-parented child.
    fn delete_promote(&mut self, document_id: i64) -> Result<DeleteResult> {
        let tx = self.storage.connection_mut().transaction()?;

        // Fetch the document's parent — surfaces NotFound for missing IDs.
        let parent_id: Option<i64> = tx
            .query_row(
                "SELECT parent_id FROM documents WHERE id = ?1",
                rusqlite::params![document_id],
                |row| row.get(0),
            )
            .map_err(|_| PagetreeError::NotFound(document_id.to_string()))?;

        let child_ids: Vec<i64> = {
            let mut stmt = tx.prepare("SELECT id FROM documents WHERE parent_id = ?1")?;
            let ids = stmt
                .query_map(rusqlite::params![document_id], |row| row.get(0))?
                .collect::<rusqlite::Result<_>>()?;
            ids
        };

        // Re-parent all direct children to the grandparent (may be NULL).
        tx.execute(
            "UPDATE documents SET parent_id = ?1 WHERE parent_id = ?2",
            rusqlite::params![parent_id, document_id],
        )?;

        // Delete the document itself after its children have been safely
        // re-parented.
        tx.execute(
            "DELETE FROM documents WHERE id = ?1",
            rusqlite::params![document_id],
        )?;

        tx.commit()?;

        let mut affected_ids = vec![document_id];
        affected_ids.extend(child_ids);
        Ok(DeleteResult {
            deleted_count: 1,
            affected_ids,
        })
    }

    fn unique_project_slug(&self, base: &str) -> Result<String> {
        let exists = |candidate: &str| -> Result<bool> {
            let count: i64 = self.storage.connection().query_row(
                "SELECT COUNT(*) FROM projects WHERE slug = ?1",
                rusqlite::params![candidate],
                |row| row.get(0),
            )?;
            Ok(count > 0)
        };
        Self::dedupe_slug(base, exists)
    }

    fn unique_document_slug(&self, project_id: i64, base: &str) -> Result<String> {
        let exists = |candidate: &str| -> Result<bool> {
            let count: i64 = self.storage.connection().query_row(
                "SELECT COUNT(*) FROM documents WHERE project_id = ?1 AND slug = ?2",
                rusqlite::params![project_id, candidate],
                |row| row.get(0),
            )?;
            Ok(count > 0)
        };
        Self::dedupe_slug(base, exists)
    }

    /// Appends `-2`, `-3`, ... to `base` until the candidate is unused.
    fn dedupe_slug<F>(base: &str, exists: F) -> Result<String>
    where
        F: Fn(&str) -> Result<bool>,
    {
        if !exists(base)? {
            return Ok(base.to_string());
        }
        let mut n = 2u32;
        loop {
            let candidate = format!("{base}-{n}");
            if !exists(&candidate)? {
                return Ok(candidate);
            }
            n += 1;
        }
    }
}

fn map_project_row(row: &rusqlite::Row) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get(0)?,
        slug: row.get(1)?,
        name: row.get(2)?,
        created_at: row.get(3)?,
    })
}

fn map_document_row(row: &rusqlite::Row) -> rusqlite::Result<Document> {
    Ok(Document {
        id: row.get(0)?,
        slug: row.get(1)?,
        title: row.get(2)?,
        body: row.get(3)?,
        project_id: row.get(4)?,
        parent_id: row.get(5)?,
        created_at: row.get(6)?,
        modified_at: row.get(7)?,
    })
}

/// Lowercases `text` and collapses runs of non-alphanumeric characters into
/// single hyphens, the usual URL-slug form.
pub(crate) fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    slug
}
