//! Status command handler

use anyhow::Result;

use scrawl_core::{Identity, Store};

use crate::output::{Output, OutputFormat};

/// Show status information
pub fn show(store: &Store, identity: &Identity, output: &Output) -> Result<()> {
    let config = store.config();
    let active_user = identity.current_user()?;
    let active_email = match active_user {
        Some(id) => store.get_user(id)?.map(|u| u.email),
        None => None,
    };

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "database": config.sqlite_path(),
                    "active_user": active_user,
                    "active_user_email": active_email,
                    "counts": {
                        "posts": store.post_count().unwrap_or(0),
                        "categories": store.category_count().unwrap_or(0),
                        "users": store.user_count().unwrap_or(0)
                    }
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            println!("Scrawl Status");
            println!("=============");
            println!();
            println!("Storage:");
            println!("  Location: {}", config.data_dir.display());
            println!("  Database: {}", config.sqlite_path().display());
            println!();
            println!("Active user:");
            match (active_user, active_email) {
                (Some(id), Some(email)) => println!("  {} ({})", email, id),
                (Some(id), None) => println!("  {} (no longer exists)", id),
                _ => println!("  (none selected)"),
            }
            println!();
            println!("Contents:");
            println!("  Posts:      {}", store.post_count().unwrap_or(0));
            println!("  Categories: {}", store.category_count().unwrap_or(0));
            println!("  Users:      {}", store.user_count().unwrap_or(0));
        }
    }

    Ok(())
}
