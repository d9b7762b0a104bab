//! SQLite persistence for generated website ideas.
//!
//! The [`IdeaStore`] owns `sitesmith.db`. It attaches identity and
//! timestamps to a generation result; it knows nothing about how the
//! sections were produced.

use std::path::Path;

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::generation::Section;

/// Owner recorded when none is given.
pub const ANONYMOUS_USER: &str = "anonymous";

const SCHEMA: &str = include_str!("../migrations/001_schema.sql");

// ---------------------------------------------------------------------------
// Domain types
// ---------------------------------------------------------------------------

/// Lifecycle status of a stored idea.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdeaStatus {
    /// Created but not yet generated.
    Pending,
    /// Sections generated and stored.
    Completed,
}

impl IdeaStatus {
    /// Returns the string representation stored in SQLite.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }

    /// Parse from a SQLite text value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a recognised status.
    pub fn parse(s: &str) -> Result<Self, StoreError> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            other => Err(StoreError::InvalidValue {
                field: "status",
                value: other.to_owned(),
            }),
        }
    }
}

/// A stored website idea.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebsiteIdea {
    /// UUID v4 identifier.
    pub id: String,
    /// The idea text as submitted.
    pub idea: String,
    /// Owner identifier.
    pub user_id: String,
    /// Generated sections, in display order.
    pub sections: Vec<Section>,
    /// Lifecycle status.
    pub status: IdeaStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// Input for [`IdeaStore::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIdea {
    /// The idea text.
    pub idea: String,
    /// Owner; `None` records [`ANONYMOUS_USER`].
    pub user_id: Option<String>,
    /// Sections to store.
    pub sections: Vec<Section>,
    /// Initial status.
    pub status: IdeaStatus,
}

/// Partial update for [`IdeaStore::update`]. `None` fields are untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdeaUpdate {
    /// Replacement idea text.
    pub idea: Option<String>,
    /// Replacement sections.
    pub sections: Option<Vec<Section>>,
    /// Replacement status.
    pub status: Option<IdeaStatus>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from idea store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Filesystem preparation failed.
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    /// Sections column could not be encoded or decoded.
    #[error("sections encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    /// No idea with this id exists.
    #[error("website idea not found: {0}")]
    NotFound(String),

    /// A column held a value this version cannot read.
    #[error("invalid {field} value: {value:?}")]
    InvalidValue {
        /// Which column contained the bad value.
        field: &'static str,
        /// The unexpected value.
        value: String,
    },
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

type IdeaRow = (String, String, String, String, String, String, String);

const SELECT_COLUMNS: &str =
    "SELECT id, idea, user_id, sections, status, created_at, updated_at FROM website_ideas";

/// SQLite-backed website idea store.
#[derive(Debug, Clone)]
pub struct IdeaStore {
    db: SqlitePool,
}

impl IdeaStore {
    /// Open (creating if needed) the database at `path` and apply the schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or the
    /// database cannot be opened or migrated.
    pub async fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let opts = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let db = SqlitePoolOptions::new().connect_with(opts).await?;
        info!(path = %path.display(), "idea store opened");
        Self::with_pool(db).await
    }

    /// Open a private in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be applied.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let opts = SqliteConnectOptions::new()
            .filename(":memory:")
            .create_if_missing(true);
        // In-memory databases are per-connection.
        let db = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(opts)
            .await?;
        Self::with_pool(db).await
    }

    /// Wrap an existing pool and apply the schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be applied.
    pub async fn with_pool(db: SqlitePool) -> Result<Self, StoreError> {
        sqlx::raw_sql(SCHEMA).execute(&db).await?;
        Ok(Self { db })
    }

    /// Persist a new idea, assigning id and timestamps.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the insert fails.
    pub async fn create(&self, new: NewIdea) -> Result<WebsiteIdea, StoreError> {
        let now = now();
        let record = WebsiteIdea {
            id: uuid::Uuid::new_v4().to_string(),
            idea: new.idea,
            user_id: new.user_id.unwrap_or_else(|| ANONYMOUS_USER.to_owned()),
            sections: new.sections,
            status: new.status,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            "INSERT INTO website_ideas (id, idea, user_id, sections, status, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(&record.id)
        .bind(&record.idea)
        .bind(&record.user_id)
        .bind(serde_json::to_string(&record.sections)?)
        .bind(record.status.as_str())
        .bind(timestamp(&record.created_at))
        .bind(timestamp(&record.updated_at))
        .execute(&self.db)
        .await?;

        debug!(id = %record.id, sections = record.sections.len(), "website idea stored");
        Ok(record)
    }

    /// All ideas, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be decoded.
    pub async fn list(&self) -> Result<Vec<WebsiteIdea>, StoreError> {
        let rows: Vec<IdeaRow> =
            sqlx::query_as(&format!("{SELECT_COLUMNS} ORDER BY created_at DESC, rowid DESC"))
                .fetch_all(&self.db)
                .await?;
        rows.into_iter().map(decode_row).collect()
    }

    /// Fetch one idea by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no such idea exists.
    pub async fn get(&self, id: &str) -> Result<WebsiteIdea, StoreError> {
        let row: Option<IdeaRow> = sqlx::query_as(&format!("{SELECT_COLUMNS} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        match row {
            Some(row) => decode_row(row),
            None => Err(StoreError::NotFound(id.to_owned())),
        }
    }

    /// Apply a partial update and return the updated idea.
    ///
    /// The write runs first inside the transaction so SQLite takes the
    /// write lock before the row is read back; concurrent updates to the
    /// same idea serialize instead of overwriting each other.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no such idea exists.
    pub async fn update(&self, id: &str, update: IdeaUpdate) -> Result<WebsiteIdea, StoreError> {
        let sections = update
            .sections
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let mut tx = self.db.begin().await?;

        let result = sqlx::query(
            "UPDATE website_ideas SET idea = COALESCE(?1, idea), \
             sections = COALESCE(?2, sections), status = COALESCE(?3, status), \
             updated_at = ?4 WHERE id = ?5",
        )
        .bind(update.idea)
        .bind(sections)
        .bind(update.status.map(|s| s.as_str()))
        .bind(timestamp(&now()))
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id.to_owned()));
        }

        let row: IdeaRow = sqlx::query_as(&format!("{SELECT_COLUMNS} WHERE id = ?1"))
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;

        debug!(id, "website idea updated");
        decode_row(row)
    }

    /// Delete an idea by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no such idea exists.
    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM website_ideas WHERE id = ?1")
            .bind(id)
            .execute(&self.db)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id.to_owned()));
        }
        debug!(id, "website idea deleted");
        Ok(())
    }

}

/// Current time at the precision stored on disk.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Fixed-width UTC timestamp so text ordering matches time ordering.
fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(field: &'static str, value: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| StoreError::InvalidValue {
            field,
            value: value.to_owned(),
        })
}

fn decode_row(row: IdeaRow) -> Result<WebsiteIdea, StoreError> {
    let (id, idea, user_id, sections, status, created_at, updated_at) = row;
    Ok(WebsiteIdea {
        id,
        idea,
        user_id,
        sections: serde_json::from_str(&sections)?,
        status: IdeaStatus::parse(&status)?,
        created_at: parse_timestamp("created_at", &created_at)?,
        updated_at: parse_timestamp("updated_at", &updated_at)?,
    })
}
