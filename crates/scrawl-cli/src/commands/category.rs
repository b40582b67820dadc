//! Category command handlers

use anyhow::{bail, Context, Result};

use scrawl_core::{Category, Store};

use crate::commands::post::resolve_category;
use crate::output::Output;
use crate::prompt::confirm;

/// Create a new category
pub fn create(store: &Store, name: String, output: &Output) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        bail!("Category name cannot be empty");
    }

    if store.find_category_by_name(name)?.is_some() {
        bail!("Category already exists: {}", name);
    }

    let category = Category::new(name);
    store
        .add_category(&category)
        .context("Failed to create category")?;

    output.success(&format!("Created category: {} ({})", name, category.id));
    Ok(())
}

/// List all categories
pub fn list(store: &Store, output: &Output) -> Result<()> {
    let categories = store.get_all_categories()?;
    output.print_categories(&categories);
    Ok(())
}

/// Delete a category
pub fn delete(store: &Store, category: String, output: &Output) -> Result<()> {
    let id = resolve_category(store, &category)?;

    let found = store
        .get_category(id)?
        .ok_or_else(|| anyhow::anyhow!("Category not found: {}", category))?;

    if output.should_prompt() {
        println!("Delete category: {}", found.name);
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    store
        .delete_category(id)
        .context("Failed to delete category")?;

    output.success(&format!("Deleted category: {}", found.name));
    Ok(())
}
