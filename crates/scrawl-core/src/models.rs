//! Data models for Scrawl
//!
//! Defines the core data structures: Post, Category, and User.
//! Posts carry a tag set (duplicates collapse on insert) and reference
//! their category and author by id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum post title length in characters.
///
/// Titles participate in continuation cursors when sorting by title, so
/// bounding them here keeps every minted token within the codec's
/// decode limit.
pub const MAX_TITLE_LEN: usize = 512;

/// A post with content and metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    /// Unique identifier
    pub id: Uuid,
    /// Post title
    pub title: String,
    /// Body content
    pub content: String,
    /// Tags for organization (no duplicates)
    pub tags: Vec<String>,
    /// Category this post belongs to
    pub category_id: Uuid,
    /// User who wrote this post
    pub author_id: Uuid,
    /// When this post was created
    pub created_at: DateTime<Utc>,
    /// When this post was last updated
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        category_id: Uuid,
        author_id: Uuid,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            content: content.into(),
            tags: Vec::new(),
            category_id,
            author_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Update the title
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.updated_at = Utc::now();
    }

    /// Update the content
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.updated_at = Utc::now();
    }

    /// Update the category
    pub fn set_category(&mut self, category_id: Uuid) {
        self.category_id = category_id;
        self.updated_at = Utc::now();
    }

    /// Add a tag (duplicates are collapsed)
    pub fn add_tag(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
            self.updated_at = Utc::now();
        }
    }

    /// Remove a tag
    pub fn remove_tag(&mut self, tag: &str) {
        if let Some(pos) = self.tags.iter().position(|t| t == tag) {
            self.tags.remove(pos);
            self.updated_at = Utc::now();
        }
    }

    /// Set all tags (replacing existing, collapsing duplicates)
    pub fn set_tags(&mut self, tags: Vec<String>) {
        self.tags.clear();
        for tag in tags {
            if !self.tags.contains(&tag) {
                self.tags.push(tag);
            }
        }
        self.updated_at = Utc::now();
    }
}

/// A post joined with its category and author names
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PostDetails {
    /// The post itself
    #[serde(flatten)]
    pub post: Post,
    /// Name of the post's category
    pub category_name: String,
    /// Display name of the post's author
    pub author_name: String,
    /// Email of the post's author
    pub author_email: String,
}

/// A category for grouping posts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    /// Unique identifier
    pub id: Uuid,
    /// Category name
    pub name: String,
    /// When this category was created
    pub created_at: DateTime<Utc>,
    /// When this category was last updated
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Create a new category
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Update the name
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.updated_at = Utc::now();
    }
}

/// A user who authors posts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    /// Unique identifier
    pub id: Uuid,
    /// Email address (unique)
    pub email: String,
    /// First name
    pub first_name: String,
    /// Last name (optional)
    pub last_name: Option<String>,
    /// When this user was created
    pub created_at: DateTime<Utc>,
    /// When this user was last updated
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user
    pub fn new(email: impl Into<String>, first_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            first_name: first_name.into(),
            last_name: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the last name
    pub fn set_last_name(&mut self, last_name: Option<String>) {
        self.last_name = last_name;
        self.updated_at = Utc::now();
    }

    /// Display name: "First Last" or just "First"
    pub fn display_name(&self) -> String {
        match &self.last_name {
            Some(last) => format!("{} {}", self.first_name, last),
            None => self.first_name.clone(),
        }
    }
}
