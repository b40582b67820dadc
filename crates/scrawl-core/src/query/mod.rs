//! Paginated listing engine
//!
//! Three pieces that compose into every listing call:
//!
//! - [`filter`]: compiles declarative filter criteria into an explicit
//!   predicate tree that renders to parameterized SQL
//! - [`cursor`]: the opaque continuation-token codec carrying the sort
//!   key of the last row a client saw
//! - [`page`]: combines filter, sort, and cursor boundary into one
//!   bounded query and derives the page metadata

pub mod cursor;
pub mod filter;
pub mod page;

pub use cursor::{CursorError, SortDirection, SortField, SortSpec};
pub use filter::PostFilter;
pub use page::{ListOptions, Page, DEFAULT_LIMIT};
