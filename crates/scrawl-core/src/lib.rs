//! Scrawl Core Library
//!
//! This crate provides the core functionality for Scrawl, a personal
//! publishing store for posts, categories, and users.
//!
//! # Architecture
//!
//! - **SQLite**: Single-file on-disk store, opened once per process
//! - **Keyset pagination**: Listings resume from opaque cursors rather
//!   than offsets, so pages stay stable while the collection changes
//!
//! # Quick Start
//!
//! ```text
//! let mut store = Store::open()?;
//!
//! // Add a post
//! let mut post = Post::new("Hello", "First post.", category_id, author_id);
//! post.add_tag("intro");
//! store.add_post(&post)?;
//!
//! // Paginated listing
//! let page = store.list_posts(None, &PostFilter::default(), &ListOptions::default())?;
//! ```
//!
//! # Modules
//!
//! - `store`: Unified storage interface (main entry point)
//! - `models`: Data structures for posts, categories, and users
//! - `query`: Filter compilation, cursor codec, and page fetching
//! - `storage`: SQLite schema and versioning
//! - `identity`: Active-user selection
//! - `config`: Application configuration

pub mod config;
pub mod error;
pub mod identity;
pub mod models;
pub mod query;
pub mod storage;
pub mod store;

pub use config::Config;
pub use error::{StoreError, StoreResult};
pub use identity::Identity;
pub use models::{Category, Post, PostDetails, User};
pub use query::{
    CursorError, ListOptions, Page, PostFilter, SortDirection, SortField, SortSpec,
};
pub use store::Store;
