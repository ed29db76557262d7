//! Static pages: the login prompt shown for protected routes, and not-found.

use owo_colors::OwoColorize;

pub fn login_required() -> String {
    [
        format!("🔒 {}", "You must be logged in to see this page".bold()),
        format!("Run {} to log in.", "wedo login".cyan()),
    ]
    .join("\n")
}

pub fn not_found(path: &str) -> String {
    [
        "404: Not Found".bold().to_string(),
        format!("Nothing lives at {path}").dimmed().to_string(),
    ]
    .join("\n")
}
