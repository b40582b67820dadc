//! User command handlers

use anyhow::{Context, Result};
use uuid::Uuid;

use scrawl_core::{Identity, Store, User};

use crate::output::Output;

/// Create a new user
pub fn create(
    store: &Store,
    email: String,
    first_name: String,
    last_name: Option<String>,
    output: &Output,
) -> Result<()> {
    let mut user = User::new(&email, &first_name);
    user.set_last_name(last_name);

    store.add_user(&user).context("Failed to create user")?;

    output.success(&format!("Created user: {} ({})", user.email, user.id));
    Ok(())
}

/// List all users
pub fn list(store: &Store, output: &Output) -> Result<()> {
    let users = store.get_all_users()?;
    output.print_users(&users);
    Ok(())
}

/// Select the active user
pub fn switch(store: &Store, identity: &Identity, user: String, output: &Output) -> Result<()> {
    let found = resolve_user(store, &user)?;

    identity.set_current_user(found.id)?;
    output.success(&format!(
        "Active user: {} <{}>",
        found.display_name(),
        found.email
    ));
    Ok(())
}

/// Show the active user
pub fn current(store: &Store, identity: &Identity, output: &Output) -> Result<()> {
    match identity.current_user()? {
        Some(id) => match store.get_user(id)? {
            Some(user) => {
                output.print_users(std::slice::from_ref(&user));
            }
            None => {
                output.message(&format!(
                    "Active user {} no longer exists. Run `scrawl user use <email>`.",
                    id
                ));
            }
        },
        None => {
            output.message("No active user. Run `scrawl user use <email>`.");
        }
    }
    Ok(())
}

/// Resolve a user given by email or ID
fn resolve_user(store: &Store, user: &str) -> Result<User> {
    if let Ok(uuid) = Uuid::parse_str(user) {
        if let Some(found) = store.get_user(uuid)? {
            return Ok(found);
        }
    }

    store
        .find_user_by_email(user)?
        .ok_or_else(|| anyhow::anyhow!("User not found: {}", user))
}
