mod schema;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use crate::models::*;
use crate::tree::BranchTree;

pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: PathBuf) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(&path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_default() -> Result<Self> {
        let dirs = directories::ProjectDirs::from("", "", "docbranch")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        let db_path = dirs.data_dir().join("docbranch.db");
        Self::open(db_path)
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        schema::run_migrations(&conn)
    }

    // ============================================================
    // Document operations
    // ============================================================

    /// Store a document. When no pages are given the whole text is stored as
    /// page 1.
    pub fn create_document(&self, input: CreateDocumentInput) -> Result<Document> {
        let mut conn = self.conn.lock().expect("database lock poisoned");
        let id = Uuid::new_v4();
        let now = Utc::now();
        let pages = if input.pages.is_empty() {
            vec![input.text.clone()]
        } else {
            input.pages
        };
        let page_count = pages.len() as u32;

        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO documents (id, title, full_text, page_count, created_at)
             VALUES (?, ?, ?, ?, ?)",
            params![
                id.to_string(),
                &input.title,
                &input.text,
                page_count,
                now.to_rfc3339()
            ],
        )?;
        for (i, text) in pages.iter().enumerate() {
            tx.execute(
                "INSERT INTO document_pages (document_id, page_number, text) VALUES (?, ?, ?)",
                params![id.to_string(), i as u32 + 1, text],
            )?;
        }
        tx.commit()?;

        Ok(Document {
            id,
            title: input.title,
            full_text: input.text,
            page_count,
            created_at: now,
        })
    }

    pub fn get_document(&self, id: Uuid) -> Result<Option<Document>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, title, full_text, page_count, created_at FROM documents WHERE id = ?",
        )?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            Ok(Some(Document {
                id: parse_uuid(row.get::<_, String>(0)?),
                title: row.get(1)?,
                full_text: row.get(2)?,
                page_count: row.get(3)?,
                created_at: parse_datetime(row.get::<_, String>(4)?),
            }))
        } else {
            Ok(None)
        }
    }

    pub fn get_document_pages(&self, document_id: Uuid) -> Result<Vec<DocumentPage>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT page_number, text FROM document_pages
             WHERE document_id = ? ORDER BY page_number",
        )?;

        let pages = stmt
            .query_map([document_id.to_string()], |row| {
                Ok(DocumentPage {
                    page_number: row.get(0)?,
                    text: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(pages)
    }

    /// All documents, newest first, without their text.
    pub fn list_documents(&self) -> Result<Vec<DocumentSummary>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, title, page_count, created_at FROM documents ORDER BY created_at DESC",
        )?;

        let docs = stmt
            .query_map([], |row| {
                Ok(DocumentSummary {
                    id: parse_uuid(row.get::<_, String>(0)?),
                    title: row.get(1)?,
                    page_count: row.get(2)?,
                    created_at: parse_datetime(row.get::<_, String>(3)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(docs)
    }

    /// Delete a document with its pages, branches, highlights and summaries.
    pub fn delete_document(&self, id: Uuid) -> Result<bool> {
        let mut conn = self.conn.lock().expect("database lock poisoned");
        let tx = conn.transaction()?;
        let key = id.to_string();
        tx.execute("DELETE FROM summaries WHERE document_id = ?", [&key])?;
        tx.execute("DELETE FROM highlights WHERE document_id = ?", [&key])?;
        tx.execute("DELETE FROM branches WHERE document_id = ?", [&key])?;
        tx.execute("DELETE FROM document_pages WHERE document_id = ?", [&key])?;
        let rows = tx.execute("DELETE FROM documents WHERE id = ?", [&key])?;
        tx.commit()?;
        Ok(rows > 0)
    }

    // ============================================================
    // Branch operations
    // ============================================================

    pub fn insert_branch(&self, document_id: Uuid, branch: &Branch) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        conn.execute(
            "INSERT INTO branches (id, document_id, parent_id, question, answer, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                branch.id.to_string(),
                document_id.to_string(),
                branch.parent_id.map(|id| id.to_string()),
                &branch.question,
                &branch.answer,
                branch.created_at.to_rfc3339(),
            ],
        )
        .with_context(|| format!("Failed to store branch {}", branch.id))?;
        Ok(())
    }

    pub fn get_branches(&self, document_id: Uuid) -> Result<Vec<Branch>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, parent_id, question, answer, created_at
             FROM branches WHERE document_id = ? ORDER BY created_at, rowid",
        )?;

        let branches = stmt
            .query_map([document_id.to_string()], branch_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(branches)
    }

    /// Rebuild the in-memory tree for a document.
    pub fn load_branch_tree(&self, document_id: Uuid) -> Result<BranchTree> {
        Ok(BranchTree::from_branches(self.get_branches(document_id)?))
    }

    pub fn delete_branches(&self, ids: &[Uuid]) -> Result<usize> {
        let mut conn = self.conn.lock().expect("database lock poisoned");
        let tx = conn.transaction()?;
        let mut removed = 0;
        // Deepest first so no child outlives its parent row.
        for id in ids.iter().rev() {
            removed += tx.execute("DELETE FROM branches WHERE id = ?", [id.to_string()])?;
        }
        tx.commit()?;
        Ok(removed)
    }

    // ============================================================
    // Highlight operations
    // ============================================================

    pub fn insert_highlight(&self, document_id: Uuid, highlight: &HighlightRegion) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let r = &highlight.rect;
        conn.execute(
            "INSERT INTO highlights
                (id, document_id, page_number, x1, y1, x2, y2, width, height, text, color, note, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                highlight.id.to_string(),
                document_id.to_string(),
                highlight.page_number,
                r.x1,
                r.y1,
                r.x2,
                r.y2,
                r.width,
                r.height,
                &highlight.text,
                &highlight.color,
                &highlight.note,
                highlight.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn get_highlights(&self, document_id: Uuid) -> Result<Vec<HighlightRegion>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(&format!(
            "SELECT {HIGHLIGHT_COLUMNS} FROM highlights
             WHERE document_id = ? ORDER BY page_number, created_at"
        ))?;

        let highlights = stmt
            .query_map([document_id.to_string()], highlight_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(highlights)
    }

    pub fn get_highlight(&self, id: Uuid) -> Result<Option<HighlightRegion>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(&format!(
            "SELECT {HIGHLIGHT_COLUMNS} FROM highlights WHERE id = ?"
        ))?;

        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(highlight_from_row(row)?)),
            None => Ok(None),
        }
    }

    pub fn update_highlight(
        &self,
        id: Uuid,
        input: HighlightUpdate,
    ) -> Result<Option<HighlightRegion>> {
        let Some(mut existing) = self.get_highlight(id)? else {
            return Ok(None);
        };

        if let Some(color) = input.color {
            existing.color = color;
        }
        if let Some(note) = input.note {
            existing.note = note;
        }

        let conn = self.conn.lock().expect("database lock poisoned");
        conn.execute(
            "UPDATE highlights SET color = ?, note = ? WHERE id = ?",
            params![&existing.color, &existing.note, id.to_string()],
        )?;

        Ok(Some(existing))
    }

    /// Persist the result of merging two highlights: `merged` overwrites the
    /// surviving row and `absorbed` is deleted.
    pub fn save_merged_highlight(&self, merged: &HighlightRegion, absorbed: Uuid) -> Result<()> {
        let mut conn = self.conn.lock().expect("database lock poisoned");
        let tx = conn.transaction()?;
        let r = &merged.rect;
        tx.execute(
            "UPDATE highlights SET x1 = ?, y1 = ?, x2 = ?, y2 = ?, width = ?, height = ?,
                text = ?, color = ?, note = ?, created_at = ?
             WHERE id = ?",
            params![
                r.x1,
                r.y1,
                r.x2,
                r.y2,
                r.width,
                r.height,
                &merged.text,
                &merged.color,
                &merged.note,
                merged.created_at.to_rfc3339(),
                merged.id.to_string(),
            ],
        )?;
        tx.execute("DELETE FROM highlights WHERE id = ?", [absorbed.to_string()])?;
        tx.commit()?;
        Ok(())
    }

    pub fn delete_highlight(&self, id: Uuid) -> Result<bool> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let rows = conn.execute("DELETE FROM highlights WHERE id = ?", [id.to_string()])?;
        Ok(rows > 0)
    }

    // ============================================================
    // Summary operations
    // ============================================================

    /// Store a generated summary. A summary already saved for the same
    /// document and branch is overwritten and keeps its id.
    pub fn save_summary(
        &self,
        document_id: Uuid,
        branch_id: Option<Uuid>,
        title: &str,
        content: &str,
    ) -> Result<Summary> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let now = Utc::now();
        let branch_key = branch_id.map(|id| id.to_string());

        let existing: Option<(String, String)> = conn
            .query_row(
                "SELECT id, created_at FROM summaries WHERE document_id = ? AND branch_id IS ?",
                params![document_id.to_string(), &branch_key],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let (id, created_at) = match existing {
            Some((id, created_at)) => {
                conn.execute(
                    "UPDATE summaries SET title = ?, content = ?, updated_at = ? WHERE id = ?",
                    params![title, content, now.to_rfc3339(), &id],
                )?;
                (parse_uuid(id), parse_datetime(created_at))
            }
            None => {
                let id = Uuid::new_v4();
                conn.execute(
                    "INSERT INTO summaries (id, document_id, branch_id, title, content, created_at, updated_at)
                     VALUES (?, ?, ?, ?, ?, ?, ?)",
                    params![
                        id.to_string(),
                        document_id.to_string(),
                        &branch_key,
                        title,
                        content,
                        now.to_rfc3339(),
                        now.to_rfc3339(),
                    ],
                )
                .with_context(|| format!("Failed to store summary for document {}", document_id))?;
                (id, now)
            }
        };

        Ok(Summary {
            id,
            document_id,
            branch_id,
            title: title.to_string(),
            content: content.to_string(),
            created_at,
            updated_at: now,
        })
    }

    /// Summaries of a document, most recently updated first.
    pub fn get_summaries(&self, document_id: Uuid) -> Result<Vec<Summary>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(&format!(
            "SELECT {SUMMARY_COLUMNS} FROM summaries
             WHERE document_id = ? ORDER BY updated_at DESC, rowid DESC"
        ))?;

        let summaries = stmt
            .query_map([document_id.to_string()], summary_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(summaries)
    }

    pub fn get_summary(&self, id: Uuid) -> Result<Option<Summary>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(&format!(
            "SELECT {SUMMARY_COLUMNS} FROM summaries WHERE id = ?"
        ))?;

        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(summary_from_row(row)?)),
            None => Ok(None),
        }
    }

    pub fn update_summary(&self, id: Uuid, input: UpdateSummaryInput) -> Result<Option<Summary>> {
        let Some(existing) = self.get_summary(id)? else {
            return Ok(None);
        };

        let conn = self.conn.lock().expect("database lock poisoned");
        let now = Utc::now();
        let title = input.title.unwrap_or(existing.title);
        let content = input.content.unwrap_or(existing.content);

        conn.execute(
            "UPDATE summaries SET title = ?, content = ?, updated_at = ? WHERE id = ?",
            params![&title, &content, now.to_rfc3339(), id.to_string()],
        )?;

        Ok(Some(Summary {
            title,
            content,
            updated_at: now,
            ..existing
        }))
    }

    pub fn delete_summary(&self, id: Uuid) -> Result<bool> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let rows = conn.execute("DELETE FROM summaries WHERE id = ?", [id.to_string()])?;
        Ok(rows > 0)
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
        }
    }
}

const HIGHLIGHT_COLUMNS: &str =
    "id, page_number, x1, y1, x2, y2, width, height, text, color, note, created_at";

const SUMMARY_COLUMNS: &str =
    "id, document_id, branch_id, title, content, created_at, updated_at";

fn summary_from_row(row: &Row<'_>) -> rusqlite::Result<Summary> {
    Ok(Summary {
        id: parse_uuid(row.get::<_, String>(0)?),
        document_id: parse_uuid(row.get::<_, String>(1)?),
        branch_id: row.get::<_, Option<String>>(2)?.map(parse_uuid),
        title: row.get(3)?,
        content: row.get(4)?,
        created_at: parse_datetime(row.get::<_, String>(5)?),
        updated_at: parse_datetime(row.get::<_, String>(6)?),
    })
}

fn branch_from_row(row: &Row<'_>) -> rusqlite::Result<Branch> {
    Ok(Branch {
        id: parse_uuid(row.get::<_, String>(0)?),
        parent_id: row.get::<_, Option<String>>(1)?.map(parse_uuid),
        question: row.get(2)?,
        answer: row.get(3)?,
        created_at: parse_datetime(row.get::<_, String>(4)?),
    })
}

fn highlight_from_row(row: &Row<'_>) -> rusqlite::Result<HighlightRegion> {
    Ok(HighlightRegion {
        id: parse_uuid(row.get::<_, String>(0)?),
        page_number: row.get(1)?,
        rect: Rect {
            x1: row.get(2)?,
            y1: row.get(3)?,
            x2: row.get(4)?,
            y2: row.get(5)?,
            width: row.get(6)?,
            height: row.get(7)?,
        },
        text: row.get(8)?,
        color: row.get(9)?,
        note: row.get(10)?,
        created_at: parse_datetime(row.get::<_, String>(11)?),
    })
}

fn parse_uuid(s: String) -> Uuid {
    Uuid::parse_str(&s).unwrap_or_else(|_| Uuid::nil())
}

fn parse_datetime(s: String) -> chrono::DateTime<Utc> {
    chrono::DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
