//! Views: one state-holding unit per route.
//!
//! Each view owns its copy of fetched data, exposes `render(&self) -> String`
//! over that state, and turns user events into API calls through update
//! methods that return [`Effect`]s for the shell to carry out.

pub mod edit_invite;
pub mod invites;
pub mod pages;
pub mod respond;
pub mod upload;
pub mod view_invite;

use wedo_core::api::ApiClient;
use wedo_core::route::Route;
use wedo_core::session::Session;

/// Explicit handle on what a view may use: the API and the current session.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    pub api: &'a ApiClient,
    pub session: &'a Session,
}

/// Something a view asks the shell to do after an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Informational message for the user.
    Alert(String),
    /// A failed operation, shown to the user.
    Error(String),
    Navigate(Route),
    GoBack,
}

/// Identifies the mount a load was started under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Tracks mounts so responses that arrive after unmount or remount are dropped.
#[derive(Debug, Default)]
pub struct Lifecycle {
    generation: u64,
    mounted: bool,
}

impl Lifecycle {
    pub fn mount(&mut self) -> Ticket {
        self.generation += 1;
        self.mounted = true;
        Ticket(self.generation)
    }

    pub fn unmount(&mut self) {
        self.generation += 1;
        self.mounted = false;
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.mounted && ticket.0 == self.generation
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use chrono::{Duration, Utc};
    use serde_json::json;
    use wedo_core::api::ApiClient;
    use wedo_core::config::ApiConfig;
    use wedo_core::session::{Credentials, Session, SessionState};
    use wiremock::MockServer;

    pub const TOKEN: &str = "test-token";

    pub fn api(server: &MockServer) -> ApiClient {
        ApiClient::new(&ApiConfig {
            endpoint: server.uri(),
            key: "test-key".into(),
        })
        .unwrap()
    }

    pub fn logged_in() -> Session {
        Session::in_memory(SessionState::Authenticated(Credentials {
            sub: "auth0|organizer".into(),
            id_token: TOKEN.into(),
            expires_at: Utc::now() + Duration::hours(1),
        }))
    }

    pub fn invite_json(id: &str, family_name: &str, responded: bool, attending: bool) -> serde_json::Value {
        json!({
            "inviteId": id,
            "familyName": family_name,
            "createTs": "2021-06-01T12:00:00.000Z",
            "type": "guest",
            "responded": responded,
            "attending": attending
        })
    }
}
