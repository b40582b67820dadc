//! Post command handlers

use anyhow::{bail, Context, Result};
use uuid::Uuid;

use scrawl_core::query::cursor::{SortDirection, SortField, SortSpec};
use scrawl_core::query::filter::parse_sort_field;
use scrawl_core::{Identity, ListOptions, Post, PostFilter, Store};

use crate::output::Output;
use crate::prompt::{confirm, prompt_optional, prompt_required, prompt_with_default};

/// Flags collected from `scrawl post list`
pub struct ListRequest {
    pub term: Option<String>,
    pub category: Option<String>,
    pub author: Option<String>,
    pub mine: bool,
    pub tags: Vec<String>,
    pub sort: Option<String>,
    pub direction: Option<String>,
    pub cursor: Option<String>,
    pub limit: Option<u32>,
    pub no_total: bool,
}

/// Create a new post
pub fn create(
    store: &mut Store,
    identity: &Identity,
    title: String,
    content: Option<String>,
    category: String,
    tags: Vec<String>,
    output: &Output,
) -> Result<()> {
    let author_id = require_active_user(store, identity)?;
    let category_id = resolve_category(store, &category)?;

    let content = match content {
        Some(content) => content,
        None => prompt_required("Content")?,
    };

    let mut post = Post::new(&title, content, category_id, author_id);
    for tag in tags {
        post.add_tag(tag);
    }

    store.add_post(&post).context("Failed to create post")?;

    output.success(&format!("Created post: {}", post.id));
    if let Some(details) = store.get_post_details(post.id)? {
        output.print_post_details(&details);
    }

    Ok(())
}

/// List posts, one page at a time
pub fn list(
    store: &Store,
    identity: &Identity,
    request: ListRequest,
    output: &Output,
) -> Result<()> {
    let filter = PostFilter {
        term: request.term,
        category_id: request
            .category
            .as_deref()
            .map(|c| resolve_category(store, c))
            .transpose()?,
        author_id: request
            .author
            .as_deref()
            .map(|a| resolve_author(store, a))
            .transpose()?,
        mine: request.mine,
        tags: request.tags,
    };

    let sort = parse_sort(request.sort.as_deref(), request.direction.as_deref())?;
    let config = store.config();
    let options = ListOptions {
        sort,
        cursor: request.cursor,
        limit: request.limit.unwrap_or(config.default_limit),
        include_total: !request.no_total && config.show_totals,
    };

    // The active user is only needed when filtering on "mine"
    let caller = if request.mine {
        identity.current_user()?
    } else {
        None
    };

    let page = store.list_posts(caller, &filter, &options)?;
    output.print_post_page(&page);
    Ok(())
}

/// Show a single post
pub fn show(store: &Store, id: String, output: &Output) -> Result<()> {
    let uuid = resolve_post_id(store, &id)?;

    let details = store
        .get_post_details(uuid)?
        .ok_or_else(|| anyhow::anyhow!("Post not found: {}", id))?;

    output.print_post_details(&details);
    Ok(())
}

/// Edit a post
pub fn edit(store: &mut Store, identity: &Identity, id: String, output: &Output) -> Result<()> {
    let caller = require_active_user(store, identity)?;
    let uuid = resolve_post_id(store, &id)?;

    let mut post = store
        .get_post(uuid)?
        .ok_or_else(|| anyhow::anyhow!("Post not found: {}", id))?;

    // Interactive editing
    println!("Editing post: {}", post.id);
    println!("Press Enter to keep current value, or type new value.\n");

    if let Some(new_title) = prompt_with_default("Title", &post.title)? {
        post.set_title(new_title);
    }

    if let Some(new_content) = prompt_with_default("Content", &post.content)? {
        post.set_content(new_content);
    }

    if let Some(new_category) = prompt_optional("Category (name or ID)")? {
        post.set_category(resolve_category(store, &new_category)?);
    }

    let current_tags = post.tags.join(", ");
    println!(
        "Current tags: {}",
        if current_tags.is_empty() {
            "(none)"
        } else {
            &current_tags
        }
    );
    if let Some(new_tags) = prompt_optional("New tags (comma-separated)")? {
        let tags: Vec<String> = new_tags
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        post.set_tags(tags);
    }

    store
        .update_post(caller, &post)
        .context("Failed to update post")?;

    output.success("Post updated");
    if let Some(details) = store.get_post_details(post.id)? {
        output.print_post_details(&details);
    }

    Ok(())
}

/// Delete a post
pub fn delete(store: &mut Store, identity: &Identity, id: String, output: &Output) -> Result<()> {
    let caller = require_active_user(store, identity)?;
    let uuid = resolve_post_id(store, &id)?;

    let post = store
        .get_post(uuid)?
        .ok_or_else(|| anyhow::anyhow!("Post not found: {}", id))?;

    // Confirm deletion
    if output.should_prompt() {
        println!("Delete post: {} - {}", &post.id.to_string()[..8], post.title);
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    store
        .delete_post(caller, uuid)
        .context("Failed to delete post")?;

    output.success(&format!("Deleted post: {}", uuid));

    Ok(())
}

/// Build the sort specification from CLI flags
fn parse_sort(sort: Option<&str>, direction: Option<&str>) -> Result<SortSpec> {
    let field = match sort {
        Some(name) => parse_sort_field(name)?,
        None => SortField::default(),
    };
    let direction = match direction {
        Some(name) => SortDirection::parse(name)
            .ok_or_else(|| anyhow::anyhow!("Invalid direction: '{}'. Use 'asc' or 'desc'", name))?,
        None => SortDirection::default(),
    };
    Ok(SortSpec { field, direction })
}

/// Resolve the active user, with a helpful error when none is selected
pub(crate) fn require_active_user(store: &Store, identity: &Identity) -> Result<Uuid> {
    let id = identity
        .current_user()?
        .ok_or_else(|| anyhow::anyhow!("No active user. Run `scrawl user use <email>` first."))?;

    if store.get_user(id)?.is_none() {
        bail!("Active user {} no longer exists. Run `scrawl user use <email>`.", id);
    }
    Ok(id)
}

/// Resolve a category given by name or ID
pub(crate) fn resolve_category(store: &Store, category: &str) -> Result<Uuid> {
    if let Ok(uuid) = Uuid::parse_str(category) {
        return Ok(uuid);
    }

    store
        .find_category_by_name(category)?
        .map(|c| c.id)
        .ok_or_else(|| anyhow::anyhow!("Category not found: {}", category))
}

/// Resolve an author given by email or ID
fn resolve_author(store: &Store, author: &str) -> Result<Uuid> {
    if let Ok(uuid) = Uuid::parse_str(author) {
        return Ok(uuid);
    }

    store
        .find_user_by_email(author)?
        .map(|u| u.id)
        .ok_or_else(|| anyhow::anyhow!("User not found: {}", author))
}

/// Parse a post ID (supports full UUID or prefix)
fn resolve_post_id(store: &Store, id: &str) -> Result<Uuid> {
    // Try full UUID first
    if let Ok(uuid) = Uuid::parse_str(id) {
        return Ok(uuid);
    }

    let mut stmt = store
        .connection()
        .prepare("SELECT id, title FROM posts WHERE id LIKE ? || '%'")?;
    let matches: Vec<(String, String)> = stmt
        .query_map([id], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;

    match matches.len() {
        0 => bail!("No post found matching: {}", id),
        1 => Ok(Uuid::parse_str(&matches[0].0)?),
        _ => {
            eprintln!("Multiple posts match '{}':", id);
            for (post_id, title) in &matches {
                eprintln!("  {} - {}", post_id, title);
            }
            bail!("Ambiguous ID. Please provide more characters.");
        }
    }
}
