//! Unified storage interface
//!
//! The `Store` owns the single SQLite connection for the process. It is
//! opened once at startup and passed by reference; nothing else in the
//! crate reconstructs or caches a connection.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = Store::open()?;
//!
//! // Add data
//! store.add_post(&post)?;
//!
//! // Paginated listing
//! let page = store.list_posts(None, &PostFilter::default(), &ListOptions::default())?;
//! ```
//!
//! Update and delete of posts are owner-scoped: acting on a post the
//! caller does not own reports not-found, the same as a missing id.

use anyhow::Context;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{StoreError, StoreResult};
use crate::models::{Category, Post, PostDetails, User, MAX_TITLE_LEN};
use crate::query::filter::{self, PostFilter};
use crate::query::page::{fetch_page, ListOptions, Page};
use crate::storage::schema::{init_schema, needs_init};

/// Column list shared by every post select
pub(crate) const POST_COLUMNS: &str =
    "id, title, content, category_id, author_id, created_at, updated_at";

/// Unified storage interface for Scrawl
pub struct Store {
    conn: Connection,
    config: Config,
}

impl Store {
    /// Open the store, creating the database if none exists
    pub fn open() -> anyhow::Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        Self::open_with_config(config)
    }

    /// Open the store with a specific configuration
    pub fn open_with_config(config: Config) -> anyhow::Result<Self> {
        let path = config.sqlite_path();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }

        let conn = Connection::open(&path)
            .with_context(|| format!("Failed to open SQLite database at {:?}", path))?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        if needs_init(&conn) {
            init_schema(&conn).context("Failed to initialize SQLite schema")?;
        }

        Ok(Self { conn, config })
    }

    /// Open an in-memory store (for testing)
    pub fn open_in_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        init_schema(&conn)?;
        Ok(Self {
            conn,
            config: Config::default(),
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get a reference to the underlying connection
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    // ==================== Post Operations ====================

    /// Add a new post
    ///
    /// The referenced category and author must exist.
    pub fn add_post(&mut self, post: &Post) -> StoreResult<()> {
        check_title(&post.title)?;
        let tx = self.conn.transaction()?;

        ensure_exists(&tx, "categories", "Category", post.category_id)?;
        ensure_exists(&tx, "users", "User", post.author_id)?;

        tx.execute(
            "INSERT INTO posts (id, title, content, category_id, author_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            params![
                post.id.to_string(),
                post.title,
                post.content,
                post.category_id.to_string(),
                post.author_id.to_string(),
                post.created_at.timestamp_millis(),
                post.updated_at.timestamp_millis(),
            ],
        )?;

        insert_post_tags(&tx, post)?;

        tx.commit()?;
        debug!(post_id = %post.id, "added post");
        Ok(())
    }

    /// Get a post by ID (tags included)
    pub fn get_post(&self, id: Uuid) -> StoreResult<Option<Post>> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {} FROM posts WHERE id = ?", POST_COLUMNS),
                params![id.to_string()],
                PostRow::from_row,
            )
            .optional()?;

        match row {
            Some(row) => Ok(Some(hydrate_post(&self.conn, row)?)),
            None => Ok(None),
        }
    }

    /// Get a post joined with its category and author names
    pub fn get_post_details(&self, id: Uuid) -> StoreResult<Option<PostDetails>> {
        let result = self
            .conn
            .query_row(
                "SELECT p.id, p.title, p.content, p.category_id, p.author_id,
                        p.created_at, p.updated_at,
                        c.name, u.first_name, u.last_name, u.email
                 FROM posts p
                 JOIN categories c ON p.category_id = c.id
                 JOIN users u ON p.author_id = u.id
                 WHERE p.id = ?",
                params![id.to_string()],
                |row| {
                    let post_row = PostRow::from_row(row)?;
                    let category_name: String = row.get(7)?;
                    let first_name: String = row.get(8)?;
                    let last_name: Option<String> = row.get(9)?;
                    let email: String = row.get(10)?;
                    Ok((post_row, category_name, first_name, last_name, email))
                },
            )
            .optional()?;

        match result {
            Some((post_row, category_name, first_name, last_name, email)) => {
                let post = hydrate_post(&self.conn, post_row)?;
                let author_name = match last_name {
                    Some(last) => format!("{} {}", first_name, last),
                    None => first_name,
                };
                Ok(Some(PostDetails {
                    post,
                    category_name,
                    author_name,
                    author_email: email,
                }))
            }
            None => Ok(None),
        }
    }

    /// Update a post owned by `caller`
    ///
    /// Updating someone else's post reports not-found, same as a
    /// missing id.
    pub fn update_post(&mut self, caller: Uuid, post: &Post) -> StoreResult<()> {
        check_title(&post.title)?;
        let tx = self.conn.transaction()?;

        ensure_exists(&tx, "categories", "Category", post.category_id)?;

        let updated = tx.execute(
            "UPDATE posts SET title = ?, content = ?, category_id = ?, updated_at = ?
             WHERE id = ? AND author_id = ?",
            params![
                post.title,
                post.content,
                post.category_id.to_string(),
                post.updated_at.timestamp_millis(),
                post.id.to_string(),
                caller.to_string(),
            ],
        )?;

        if updated == 0 {
            return Err(StoreError::NotFound {
                kind: "Post",
                id: post.id.to_string(),
            });
        }

        tx.execute(
            "DELETE FROM post_tags WHERE post_id = ?",
            params![post.id.to_string()],
        )?;
        insert_post_tags(&tx, post)?;
        prune_orphan_tags(&tx)?;

        tx.commit()?;
        debug!(post_id = %post.id, "updated post");
        Ok(())
    }

    /// Delete a post owned by `caller`
    pub fn delete_post(&mut self, caller: Uuid, id: Uuid) -> StoreResult<()> {
        let tx = self.conn.transaction()?;

        let deleted = tx.execute(
            "DELETE FROM posts WHERE id = ? AND author_id = ?",
            params![id.to_string(), caller.to_string()],
        )?;

        if deleted == 0 {
            return Err(StoreError::NotFound {
                kind: "Post",
                id: id.to_string(),
            });
        }

        prune_orphan_tags(&tx)?;
        tx.commit()?;
        debug!(post_id = %id, "deleted post");
        Ok(())
    }

    /// List posts matching `filter`, one page at a time
    ///
    /// `caller` is the resolved identity of the requesting user,
    /// consulted only when the filter asks for "mine". Each call is one
    /// self-consistent read; writers landing between two calls may or
    /// may not appear in later pages depending on where their sort key
    /// falls relative to the cursor.
    pub fn list_posts(
        &self,
        caller: Option<Uuid>,
        filter: &PostFilter,
        options: &ListOptions,
    ) -> StoreResult<Page<Post>> {
        let predicate = filter::compile(filter, caller)?;
        fetch_page(&self.conn, predicate, options)
    }

    // ==================== Category Operations ====================

    /// Add a new category
    pub fn add_category(&self, category: &Category) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO categories (id, name, created_at, updated_at) VALUES (?, ?, ?, ?)",
            params![
                category.id.to_string(),
                category.name,
                category.created_at.timestamp_millis(),
                category.updated_at.timestamp_millis(),
            ],
        )?;
        debug!(category_id = %category.id, name = %category.name, "added category");
        Ok(())
    }

    /// Get a category by ID
    pub fn get_category(&self, id: Uuid) -> StoreResult<Option<Category>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, name, created_at, updated_at FROM categories WHERE id = ?",
                params![id.to_string()],
                category_from_row,
            )
            .optional()?;
        row.map(|r| r.into_category()).transpose()
    }

    /// Find a category by exact name
    pub fn find_category_by_name(&self, name: &str) -> StoreResult<Option<Category>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, name, created_at, updated_at FROM categories WHERE name = ?",
                params![name],
                category_from_row,
            )
            .optional()?;
        row.map(|r| r.into_category()).transpose()
    }

    /// Get all categories, sorted by name
    pub fn get_all_categories(&self) -> StoreResult<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, created_at, updated_at FROM categories ORDER BY name")?;
        let rows = stmt.query_map([], category_from_row)?;

        let mut categories = Vec::new();
        for row in rows {
            categories.push(row?.into_category()?);
        }
        Ok(categories)
    }

    /// Delete a category
    ///
    /// Fails while posts still reference it.
    pub fn delete_category(&self, id: Uuid) -> StoreResult<()> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM posts WHERE category_id = ?",
            params![id.to_string()],
            |row| row.get(0),
        )?;
        if count > 0 {
            return Err(StoreError::CategoryInUse { count });
        }

        let deleted = self.conn.execute(
            "DELETE FROM categories WHERE id = ?",
            params![id.to_string()],
        )?;
        if deleted == 0 {
            return Err(StoreError::NotFound {
                kind: "Category",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    // ==================== User Operations ====================

    /// Add a new user
    ///
    /// Emails are unique across users.
    pub fn add_user(&self, user: &User) -> StoreResult<()> {
        if self.find_user_by_email(&user.email)?.is_some() {
            return Err(StoreError::DuplicateEmail(user.email.clone()));
        }

        self.conn.execute(
            "INSERT INTO users (id, email, first_name, last_name, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                user.id.to_string(),
                user.email,
                user.first_name,
                user.last_name,
                user.created_at.timestamp_millis(),
                user.updated_at.timestamp_millis(),
            ],
        )?;
        debug!(user_id = %user.id, "added user");
        Ok(())
    }

    /// Get a user by ID
    pub fn get_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, email, first_name, last_name, created_at, updated_at
                 FROM users WHERE id = ?",
                params![id.to_string()],
                user_from_row,
            )
            .optional()?;
        row.map(|r| r.into_user()).transpose()
    }

    /// Find a user by email
    pub fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, email, first_name, last_name, created_at, updated_at
                 FROM users WHERE email = ?",
                params![email],
                user_from_row,
            )
            .optional()?;
        row.map(|r| r.into_user()).transpose()
    }

    /// Get all users, sorted by email
    pub fn get_all_users(&self) -> StoreResult<Vec<User>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, email, first_name, last_name, created_at, updated_at
             FROM users ORDER BY email",
        )?;
        let rows = stmt.query_map([], user_from_row)?;

        let mut users = Vec::new();
        for row in rows {
            users.push(row?.into_user()?);
        }
        Ok(users)
    }

    // ==================== Tag Operations ====================

    /// Get all unique tags
    pub fn get_all_tags(&self) -> StoreResult<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT name FROM tags ORDER BY name")?;
        let tags = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(tags)
    }

    /// Get tags with usage counts
    pub fn get_tags_with_counts(&self) -> StoreResult<Vec<(String, i64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT t.name, COUNT(pt.post_id) as count
             FROM tags t
             LEFT JOIN post_tags pt ON t.id = pt.tag_id
             GROUP BY t.id
             ORDER BY count DESC, t.name",
        )?;
        let tags = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<(String, i64)>, _>>()?;
        Ok(tags)
    }

    // ==================== Counts ====================

    /// Get post count
    pub fn post_count(&self) -> StoreResult<i64> {
        self.scalar_count("SELECT COUNT(*) FROM posts")
    }

    /// Get category count
    pub fn category_count(&self) -> StoreResult<i64> {
        self.scalar_count("SELECT COUNT(*) FROM categories")
    }

    /// Get user count
    pub fn user_count(&self) -> StoreResult<i64> {
        self.scalar_count("SELECT COUNT(*) FROM users")
    }

    fn scalar_count(&self, sql: &str) -> StoreResult<i64> {
        let count = self.conn.query_row(sql, [], |row| row.get(0))?;
        Ok(count)
    }
}

// ==================== Internal structs ====================

/// Raw post row as stored
pub(crate) struct PostRow {
    pub id: String,
    pub title: String,
    pub content: String,
    pub category_id: String,
    pub author_id: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl PostRow {
    pub(crate) fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(PostRow {
            id: row.get(0)?,
            title: row.get(1)?,
            content: row.get(2)?,
            category_id: row.get(3)?,
            author_id: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }
}

struct CategoryRow {
    id: String,
    name: String,
    created_at: i64,
    updated_at: i64,
}

impl CategoryRow {
    fn into_category(self) -> StoreResult<Category> {
        Ok(Category {
            id: parse_row_uuid("categories", &self.id)?,
            name: self.name,
            created_at: millis_to_datetime("categories", self.created_at)?,
            updated_at: millis_to_datetime("categories", self.updated_at)?,
        })
    }
}

fn category_from_row(row: &rusqlite::Row) -> rusqlite::Result<CategoryRow> {
    Ok(CategoryRow {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: row.get(2)?,
        updated_at: row.get(3)?,
    })
}

struct UserRow {
    id: String,
    email: String,
    first_name: String,
    last_name: Option<String>,
    created_at: i64,
    updated_at: i64,
}

impl UserRow {
    fn into_user(self) -> StoreResult<User> {
        Ok(User {
            id: parse_row_uuid("users", &self.id)?,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            created_at: millis_to_datetime("users", self.created_at)?,
            updated_at: millis_to_datetime("users", self.updated_at)?,
        })
    }
}

fn user_from_row(row: &rusqlite::Row) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        email: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

// ==================== Row helpers ====================

/// Hydrate a post row with its tags
pub(crate) fn hydrate_post(conn: &Connection, row: PostRow) -> StoreResult<Post> {
    let tags = tags_for_post(conn, &row.id)?;

    Ok(Post {
        id: parse_row_uuid("posts", &row.id)?,
        title: row.title,
        content: row.content,
        tags,
        category_id: parse_row_uuid("posts", &row.category_id)?,
        author_id: parse_row_uuid("posts", &row.author_id)?,
        created_at: millis_to_datetime("posts", row.created_at)?,
        updated_at: millis_to_datetime("posts", row.updated_at)?,
    })
}

pub(crate) fn tags_for_post(conn: &Connection, post_id: &str) -> StoreResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT t.name FROM tags t
         JOIN post_tags pt ON t.id = pt.tag_id
         WHERE pt.post_id = ?
         ORDER BY t.name",
    )?;
    let tags = stmt
        .query_map(params![post_id], |row| row.get(0))?
        .collect::<Result<Vec<String>, _>>()?;
    Ok(tags)
}

/// Reject titles longer than the model allows.
///
/// Enforced on every write so a stored title always fits inside a
/// continuation cursor when sorting by title.
fn check_title(title: &str) -> StoreResult<()> {
    let len = title.chars().count();
    if len > MAX_TITLE_LEN {
        return Err(StoreError::TitleTooLong {
            len,
            max: MAX_TITLE_LEN,
        });
    }
    Ok(())
}

pub(crate) fn parse_row_uuid(table: &'static str, value: &str) -> StoreResult<Uuid> {
    Uuid::parse_str(value).map_err(|_| StoreError::CorruptRow {
        table,
        details: format!("invalid UUID: {}", value),
    })
}

fn millis_to_datetime(
    table: &'static str,
    millis: i64,
) -> StoreResult<chrono::DateTime<chrono::Utc>> {
    chrono::DateTime::from_timestamp_millis(millis).ok_or_else(|| StoreError::CorruptRow {
        table,
        details: format!("timestamp out of range: {}", millis),
    })
}

fn ensure_exists(
    conn: &Connection,
    table: &'static str,
    kind: &'static str,
    id: Uuid,
) -> StoreResult<()> {
    let exists: bool = conn
        .prepare(&format!("SELECT 1 FROM {} WHERE id = ?", table))?
        .exists(params![id.to_string()])?;
    if exists {
        Ok(())
    } else {
        Err(StoreError::NotFound {
            kind,
            id: id.to_string(),
        })
    }
}

/// Insert a post's tags, creating tag rows as needed
fn insert_post_tags(conn: &Connection, post: &Post) -> StoreResult<()> {
    for tag in &post.tags {
        let tag_id = get_or_create_tag(conn, tag)?;
        conn.execute(
            "INSERT OR IGNORE INTO post_tags (post_id, tag_id) VALUES (?, ?)",
            params![post.id.to_string(), tag_id],
        )?;
    }
    Ok(())
}

/// Get or create a tag, returning its ID
fn get_or_create_tag(conn: &Connection, name: &str) -> StoreResult<i64> {
    let existing: Option<i64> = conn
        .query_row("SELECT id FROM tags WHERE name = ?", params![name], |row| {
            row.get(0)
        })
        .optional()?;

    if let Some(id) = existing {
        return Ok(id);
    }

    conn.execute("INSERT INTO tags (name) VALUES (?)", params![name])?;
    Ok(conn.last_insert_rowid())
}

/// Drop tags no post references anymore
fn prune_orphan_tags(conn: &Connection) -> StoreResult<()> {
    conn.execute(
        "DELETE FROM tags WHERE id NOT IN (SELECT DISTINCT tag_id FROM post_tags)",
        [],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_store() -> (Store, Category, User) {
        let store = Store::open_in_memory().unwrap();
        let category = Category::new("Tech");
        store.add_category(&category).unwrap();
        let user = User::new("ada@example.com", "Ada");
        store.add_user(&user).unwrap();
        (store, category, user)
    }

    #[test]
    fn test_add_and_get_post() {
        let (mut store, category, user) = seeded_store();

        let mut post = Post::new("Hello", "First post.", category.id, user.id);
        post.add_tag("intro");
        post.add_tag("meta");
        store.add_post(&post).unwrap();

        let found = store.get_post(post.id).unwrap().unwrap();
        assert_eq!(found.title, "Hello");
        assert_eq!(found.content, "First post.");
        // Tags hydrate sorted by name
        assert_eq!(found.tags, vec!["intro", "meta"]);

        assert!(store.get_post(Uuid::new_v4()).unwrap().is_none());
    }

    #[test]
    fn test_post_title_length_is_bounded() {
        let (mut store, category, user) = seeded_store();

        let long_title = "x".repeat(MAX_TITLE_LEN + 1);
        let post = Post::new(&long_title, "Body", category.id, user.id);
        let err = store.add_post(&post).unwrap_err();
        assert!(matches!(err, StoreError::TitleTooLong { .. }));
        assert!(err.is_client_error());

        // Exactly at the limit is fine
        let mut post = Post::new("x".repeat(MAX_TITLE_LEN), "Body", category.id, user.id);
        store.add_post(&post).unwrap();

        // Updates are checked too
        post.set_title(long_title);
        let err = store.update_post(user.id, &post).unwrap_err();
        assert!(matches!(err, StoreError::TitleTooLong { .. }));
    }

    #[test]
    fn test_add_post_requires_existing_references() {
        let (mut store, category, user) = seeded_store();

        let post = Post::new("Orphan", "Body", Uuid::new_v4(), user.id);
        let err = store.add_post(&post).unwrap_err();
        assert!(matches!(
            err,
            StoreError::NotFound {
                kind: "Category",
                ..
            }
        ));

        let post = Post::new("Orphan", "Body", category.id, Uuid::new_v4());
        let err = store.add_post(&post).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { kind: "User", .. }));
    }

    #[test]
    fn test_get_post_details() {
        let (mut store, category, user) = seeded_store();

        let post = Post::new("Hello", "Body", category.id, user.id);
        store.add_post(&post).unwrap();

        let details = store.get_post_details(post.id).unwrap().unwrap();
        assert_eq!(details.category_name, "Tech");
        assert_eq!(details.author_name, "Ada");
        assert_eq!(details.author_email, "ada@example.com");
        assert_eq!(details.post.id, post.id);

        assert!(store.get_post_details(Uuid::new_v4()).unwrap().is_none());
    }

    #[test]
    fn test_update_post_is_owner_scoped() {
        let (mut store, category, user) = seeded_store();
        let other = User::new("grace@example.com", "Grace");
        store.add_user(&other).unwrap();

        let mut post = Post::new("Hello", "Body", category.id, user.id);
        store.add_post(&post).unwrap();

        post.set_title("Hello again");

        // A different caller sees not-found
        let err = store.update_post(other.id, &post).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { kind: "Post", .. }));
        assert_eq!(store.get_post(post.id).unwrap().unwrap().title, "Hello");

        // The owner succeeds
        store.update_post(user.id, &post).unwrap();
        assert_eq!(
            store.get_post(post.id).unwrap().unwrap().title,
            "Hello again"
        );
    }

    #[test]
    fn test_update_post_rewrites_tags() {
        let (mut store, category, user) = seeded_store();

        let mut post = Post::new("Hello", "Body", category.id, user.id);
        post.add_tag("old");
        store.add_post(&post).unwrap();

        post.set_tags(vec!["new".to_string()]);
        store.update_post(user.id, &post).unwrap();

        let found = store.get_post(post.id).unwrap().unwrap();
        assert_eq!(found.tags, vec!["new"]);
        // The orphaned tag is pruned from the tag listing
        assert_eq!(store.get_all_tags().unwrap(), vec!["new"]);
    }

    #[test]
    fn test_delete_post_is_owner_scoped() {
        let (mut store, category, user) = seeded_store();
        let other = User::new("grace@example.com", "Grace");
        store.add_user(&other).unwrap();

        let mut post = Post::new("Hello", "Body", category.id, user.id);
        post.add_tag("solo");
        store.add_post(&post).unwrap();

        let err = store.delete_post(other.id, post.id).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { kind: "Post", .. }));
        assert!(store.get_post(post.id).unwrap().is_some());

        store.delete_post(user.id, post.id).unwrap();
        assert!(store.get_post(post.id).unwrap().is_none());
        assert!(store.get_all_tags().unwrap().is_empty());
    }

    #[test]
    fn test_out_of_range_timestamp_reports_corrupt_row() {
        let store = Store::open_in_memory().unwrap();

        let id = Uuid::new_v4();
        store
            .connection()
            .execute(
                "INSERT INTO categories (id, name, created_at, updated_at) VALUES (?, ?, ?, ?)",
                params![id.to_string(), "Broken", i64::MAX, i64::MAX],
            )
            .unwrap();

        let err = store.get_category(id).unwrap_err();
        assert!(matches!(
            err,
            StoreError::CorruptRow {
                table: "categories",
                ..
            }
        ));
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_category_crud() {
        let store = Store::open_in_memory().unwrap();

        let tech = Category::new("Tech");
        let life = Category::new("Life");
        store.add_category(&tech).unwrap();
        store.add_category(&life).unwrap();

        let all = store.get_all_categories().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "Life"); // sorted by name

        let found = store.find_category_by_name("Tech").unwrap().unwrap();
        assert_eq!(found.id, tech.id);
        assert!(store.find_category_by_name("Nope").unwrap().is_none());

        store.delete_category(life.id).unwrap();
        assert_eq!(store.category_count().unwrap(), 1);

        let err = store.delete_category(life.id).unwrap_err();
        assert!(matches!(
            err,
            StoreError::NotFound {
                kind: "Category",
                ..
            }
        ));
    }

    #[test]
    fn test_delete_category_in_use() {
        let (mut store, category, user) = seeded_store();

        let post = Post::new("Hello", "Body", category.id, user.id);
        store.add_post(&post).unwrap();

        let err = store.delete_category(category.id).unwrap_err();
        assert!(matches!(err, StoreError::CategoryInUse { count: 1 }));
        assert!(err.is_client_error());
    }

    #[test]
    fn test_user_crud_and_duplicate_email() {
        let store = Store::open_in_memory().unwrap();

        let mut ada = User::new("ada@example.com", "Ada");
        ada.set_last_name(Some("Lovelace".to_string()));
        store.add_user(&ada).unwrap();

        let found = store.get_user(ada.id).unwrap().unwrap();
        assert_eq!(found.email, "ada@example.com");
        assert_eq!(found.last_name.as_deref(), Some("Lovelace"));

        let by_email = store.find_user_by_email("ada@example.com").unwrap();
        assert_eq!(by_email.unwrap().id, ada.id);

        let dup = User::new("ada@example.com", "Imposter");
        let err = store.add_user(&dup).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail(_)));
        assert!(err.is_client_error());
    }

    #[test]
    fn test_tags_with_counts() {
        let (mut store, category, user) = seeded_store();

        let mut post1 = Post::new("One", "Body", category.id, user.id);
        post1.add_tag("tech");
        post1.add_tag("rust");
        store.add_post(&post1).unwrap();

        let mut post2 = Post::new("Two", "Body", category.id, user.id);
        post2.add_tag("tech");
        store.add_post(&post2).unwrap();

        let counts = store.get_tags_with_counts().unwrap();
        assert_eq!(counts[0], ("tech".to_string(), 2));
        assert_eq!(counts[1], ("rust".to_string(), 1));
    }

    #[test]
    fn test_counts() {
        let (mut store, category, user) = seeded_store();
        assert_eq!(store.post_count().unwrap(), 0);
        assert_eq!(store.category_count().unwrap(), 1);
        assert_eq!(store.user_count().unwrap(), 1);

        let post = Post::new("Hello", "Body", category.id, user.id);
        store.add_post(&post).unwrap();
        assert_eq!(store.post_count().unwrap(), 1);
    }
}
