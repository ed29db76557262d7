//! Client-side routes.
//!
//! Static segments match case-insensitively and a trailing slash is ignored, so
//! `/invites/A1/VIEW/` resolves the same as `/Invites/A1/view`.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`, the public response form
    Home,
    /// `/Invites`
    Invites,
    /// `/Invites/:id/edit`
    EditInvite(String),
    /// `/Invites/:id/view`
    ViewInvite(String),
    /// `/Invites/:id/upload`
    UploadAttachment(String),
    NotFound(String),
}

impl Route {
    pub fn parse(path: &str) -> Route {
        let trimmed = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default();
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::Home,
            [invites] if invites.eq_ignore_ascii_case("invites") => Route::Invites,
            [invites, id, action] if invites.eq_ignore_ascii_case("invites") => {
                let id = id.to_string();
                match action.to_ascii_lowercase().as_str() {
                    "edit" => Route::EditInvite(id),
                    "view" => Route::ViewInvite(id),
                    "upload" => Route::UploadAttachment(id),
                    _ => Route::NotFound(path.to_string()),
                }
            }
            _ => Route::NotFound(path.to_string()),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Invites => "/Invites".to_string(),
            Route::EditInvite(id) => format!("/Invites/{id}/edit"),
            Route::ViewInvite(id) => format!("/Invites/{id}/view"),
            Route::UploadAttachment(id) => format!("/Invites/{id}/upload"),
            Route::NotFound(path) => path.clone(),
        }
    }

    /// Everything except the public response form needs a logged-in organizer,
    /// unknown paths included.
    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Home)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
