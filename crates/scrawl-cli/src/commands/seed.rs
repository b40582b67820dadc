//! Seed command handler
//!
//! Fills an empty store with sample users, categories, and posts. A few
//! posts are stamped with the same creation time on purpose, so paging
//! through the seeded data exercises the id tie-breaker.

use anyhow::{bail, Result};
use chrono::{Duration, Utc};

use scrawl_core::{Category, Identity, Post, Store, User};

use crate::output::Output;

const SAMPLE_TAGS: &[&[&str]] = &[
    &["rust", "tooling"],
    &["writing"],
    &["rust"],
    &[],
    &["travel", "notes"],
    &["writing", "notes"],
];

/// Seed the store with sample data
pub fn run(store: &mut Store, identity: &Identity, output: &Output) -> Result<()> {
    if store.post_count()? > 0 {
        bail!("Store already contains posts. Seeding only works on an empty store.");
    }

    let mut ada = User::new("ada@example.com", "Ada");
    ada.set_last_name(Some("Lovelace".to_string()));
    let grace = User::new("grace@example.com", "Grace");
    store.add_user(&ada)?;
    store.add_user(&grace)?;

    let tech = Category::new("Tech");
    let life = Category::new("Life");
    store.add_category(&tech)?;
    store.add_category(&life)?;

    let base = Utc::now() - Duration::days(30);
    let mut created = 0;

    for (i, tags) in SAMPLE_TAGS.iter().enumerate() {
        let author = if i % 2 == 0 { &ada } else { &grace };
        let category = if i % 3 == 0 { &tech } else { &life };

        let mut post = Post::new(
            format!("Sample post {}", i + 1),
            format!("This is the body of sample post {}.", i + 1),
            category.id,
            author.id,
        );
        // Pairs of posts share a timestamp
        let at = base + Duration::days((i / 2) as i64);
        post.created_at = at;
        post.updated_at = at;

        for tag in tags.iter() {
            post.add_tag(*tag);
        }

        store.add_post(&post)?;
        created += 1;
    }

    // Default the active user when nothing is selected yet
    if identity.current_user()?.is_none() {
        identity.set_current_user(ada.id)?;
        output.message(&format!("Active user set to {}", ada.email));
    }

    output.success(&format!(
        "Seeded {} posts, 2 categories, 2 users",
        created
    ));
    Ok(())
}
