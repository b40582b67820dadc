//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use scrawl_core::{Category, Page, Post, PostDetails, User};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Print a post with its category and author
    pub fn print_post_details(&self, details: &PostDetails) {
        match self.format {
            OutputFormat::Human => {
                let post = &details.post;
                println!("ID:       {}", post.id);
                println!("Title:    {}", post.title);
                println!("Category: {}", details.category_name);
                println!(
                    "Author:   {} <{}>",
                    details.author_name, details.author_email
                );
                if !post.tags.is_empty() {
                    println!("Tags:     {}", post.tags.join(", "));
                }
                println!("Created:  {}", post.created_at.format("%Y-%m-%d %H:%M"));
                println!("Updated:  {}", post.updated_at.format("%Y-%m-%d %H:%M"));
                println!();
                println!("{}", post.content);
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(details).unwrap());
            }
            OutputFormat::Quiet => {
                println!("{}", details.post.id);
            }
        }
    }

    /// Print one page of posts with its pagination metadata
    pub fn print_post_page(&self, page: &Page<Post>) {
        match self.format {
            OutputFormat::Human => {
                if page.items.is_empty() {
                    println!("No posts found.");
                    return;
                }
                for post in &page.items {
                    let tags = if post.tags.is_empty() {
                        String::new()
                    } else {
                        format!(" [{}]", post.tags.join(", "))
                    };
                    println!(
                        "{} | {} | {}{}",
                        &post.id.to_string()[..8],
                        post.created_at.format("%Y-%m-%d"),
                        truncate(&post.title, 50),
                        tags
                    );
                }
                println!();
                match page.total {
                    Some(total) => println!("Showing {} of {} post(s)", page.items.len(), total),
                    None => println!("Showing {} post(s)", page.items.len()),
                }
                if let Some(ref cursor) = page.next_cursor {
                    println!("More available. Next page:");
                    println!("  scrawl post list --cursor {}", cursor);
                }
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(page).unwrap());
            }
            OutputFormat::Quiet => {
                for post in &page.items {
                    println!("{}", post.id);
                }
                if let Some(ref cursor) = page.next_cursor {
                    eprintln!("{}", cursor);
                }
            }
        }
    }

    /// Print a list of categories
    pub fn print_categories(&self, categories: &[Category]) {
        match self.format {
            OutputFormat::Human => {
                if categories.is_empty() {
                    println!("No categories found.");
                    return;
                }
                for category in categories {
                    println!("{} | {}", &category.id.to_string()[..8], category.name);
                }
                println!("\n{} categor(ies)", categories.len());
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(categories).unwrap());
            }
            OutputFormat::Quiet => {
                for category in categories {
                    println!("{}", category.id);
                }
            }
        }
    }

    /// Print a list of users
    pub fn print_users(&self, users: &[User]) {
        match self.format {
            OutputFormat::Human => {
                if users.is_empty() {
                    println!("No users found.");
                    return;
                }
                for user in users {
                    println!(
                        "{} | {} | {}",
                        &user.id.to_string()[..8],
                        user.email,
                        user.display_name()
                    );
                }
                println!("\n{} user(s)", users.len());
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(users).unwrap());
            }
            OutputFormat::Quiet => {
                for user in users {
                    println!("{}", user.id);
                }
            }
        }
    }

    /// Print a list of tags
    pub fn print_tags(&self, tags: &[(String, i64)]) {
        match self.format {
            OutputFormat::Human => {
                if tags.is_empty() {
                    println!("No tags found.");
                    return;
                }
                for (name, count) in tags {
                    println!("{} ({})", name, count);
                }
                println!("\n{} tag(s)", tags.len());
            }
            OutputFormat::Json => {
                let json_tags: Vec<_> = tags
                    .iter()
                    .map(|(name, count)| serde_json::json!({"name": name, "count": count}))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&json_tags).unwrap());
            }
            OutputFormat::Quiet => {
                for (name, _) in tags {
                    println!("{}", name);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

/// Truncate a string to max length, adding "..." if truncated
///
/// Cuts on a char boundary so multibyte text never splits mid-character.
fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let budget = max_len.saturating_sub(3);
    let end = s
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|&i| i <= budget)
        .last()
        .unwrap_or(0);
    format!("{}...", &s[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flags(false, true), OutputFormat::Quiet);
        // Quiet takes precedence
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a long string", 10), "this is...");
    }

    #[test]
    fn test_truncate_multibyte_titles() {
        // Cut point must land on a char boundary, never mid-character
        let title = "日".repeat(20);
        let cut = truncate(&title, 50);
        assert!(cut.ends_with("..."));
        assert!(cut.len() <= 50);
        assert!(cut.trim_end_matches("...").chars().all(|c| c == '日'));

        let mixed = format!("post {}", "é".repeat(30));
        let cut = truncate(&mixed, 10);
        assert!(cut.ends_with("..."));
        assert!(cut.len() <= 10);
    }
}
