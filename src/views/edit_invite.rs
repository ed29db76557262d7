//! Edit form seeded from the stored invite.

use owo_colors::OwoColorize;
use wedo_core::error::WeDoResult;
use wedo_core::{Invite, InviteType, UpdateInviteRequest};

use super::{Context, Effect, Lifecycle, Ticket};
use crate::render::{heading, loading};

/// The four editable fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditForm {
    pub family_name: String,
    pub invite_type: InviteType,
    pub responded: bool,
    pub attending: bool,
}

impl From<&Invite> for EditForm {
    fn from(invite: &Invite) -> Self {
        EditForm {
            family_name: invite.family_name.clone(),
            invite_type: invite.invite_type,
            responded: invite.responded,
            attending: invite.attending,
        }
    }
}

#[derive(Debug)]
pub struct EditInviteView {
    invite_id: String,
    invite: Option<Invite>,
    form: EditForm,
    lifecycle: Lifecycle,
}

impl EditInviteView {
    pub fn new(invite_id: impl Into<String>) -> Self {
        EditInviteView {
            invite_id: invite_id.into(),
            invite: None,
            form: EditForm::default(),
            lifecycle: Lifecycle::default(),
        }
    }

    pub fn form(&self) -> &EditForm {
        &self.form
    }

    pub fn is_loading(&self) -> bool {
        self.invite.is_none()
    }

    pub fn begin_load(&mut self) -> Ticket {
        self.lifecycle.mount()
    }

    pub fn finish_load(&mut self, ticket: Ticket, result: WeDoResult<Invite>) -> Vec<Effect> {
        if !self.lifecycle.is_current(ticket) {
            log::debug!("Discarding invite {} response for a stale mount", self.invite_id);
            return Vec::new();
        }

        match result {
            Ok(invite) => {
                self.form = EditForm::from(&invite);
                self.invite = Some(invite);
                Vec::new()
            }
            Err(e) => vec![Effect::Error(format!("Failed to fetch Invite: {e}"))],
        }
    }

    pub async fn mount(&mut self, ctx: Context<'_>) -> Vec<Effect> {
        let ticket = self.begin_load();
        let result = match ctx.session.id_token() {
            Ok(token) => ctx.api.get_invite(token, &self.invite_id).await,
            Err(e) => Err(e),
        };
        self.finish_load(ticket, result)
    }

    pub fn unmount(&mut self) {
        self.lifecycle.unmount();
    }

    pub fn set_family_name(&mut self, family_name: impl Into<String>) {
        self.form.family_name = family_name.into();
    }

    pub fn set_type(&mut self, invite_type: InviteType) {
        self.form.invite_type = invite_type;
    }

    pub fn set_responded(&mut self, responded: bool) {
        self.form.responded = responded;
    }

    pub fn set_attending(&mut self, attending: bool) {
        self.form.attending = attending;
    }

    /// Patch all four fields whether or not they changed, then go back.
    pub async fn submit(&mut self, ctx: Context<'_>) -> Vec<Effect> {
        if self.is_loading() {
            return vec![Effect::Error("Invite is still loading".into())];
        }
        if self.form.family_name.trim().is_empty() {
            return vec![Effect::Error("Family name is required".into())];
        }

        let patch = UpdateInviteRequest::full(
            &self.form.family_name,
            self.form.invite_type,
            self.form.responded,
            self.form.attending,
        );

        let result = match ctx.session.id_token() {
            Ok(token) => ctx.api.patch_invite(token, &self.invite_id, &patch).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => vec![Effect::Alert("Invite was edited!".into()), Effect::GoBack],
            Err(e) => vec![Effect::Error(format!("Could not edit invite: {e}"))],
        }
    }

    pub fn render(&self) -> String {
        if self.is_loading() {
            return loading("Loading Form");
        }

        let yes_no = |b: bool| if b { "Yes" } else { "No" };

        [
            heading("Edit invite"),
            self.invite_id.dimmed().to_string(),
            String::new(),
            format!("{:<12} {}", "Family Name", self.form.family_name),
            format!("{:<12} {}", "Type", self.form.invite_type),
            format!("{:<12} {}", "Responded", yes_no(self.form.responded)),
            format!("{:<12} {}", "Attending", yes_no(self.form.attending)),
        ]
        .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::testing::{api, invite_json, logged_in};
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mounted(server: &MockServer, ctx: Context<'_>) -> EditInviteView {
        Mock::given(method("GET"))
            .and(path("/invites/A1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "item": invite_json("A1", "Lee", false, false) })),
            )
            .mount(server)
            .await;

        let mut view = EditInviteView::new("A1");
        assert!(view.mount(ctx).await.is_empty());
        view
    }

    #[tokio::test]
    async fn mount_seeds_form_from_invite() {
        let server = MockServer::start().await;
        let api = api(&server);
        let session = logged_in();

        let view = mounted(&server, Context { api: &api, session: &session }).await;

        assert_eq!(
            view.form(),
            &EditForm {
                family_name: "Lee".into(),
                invite_type: InviteType::Guest,
                responded: false,
                attending: false,
            }
        );
        assert!(view.render().contains("Lee"));
    }

    #[tokio::test]
    async fn submit_sends_all_four_fields_and_goes_back() {
        let server = MockServer::start().await;
        let api = api(&server);
        let session = logged_in();
        let ctx = Context { api: &api, session: &session };
        let mut view = mounted(&server, ctx).await;

        Mock::given(method("PATCH"))
            .and(path("/invites/A1"))
            .and(body_json(json!({
                "familyName": "Lee",
                "type": "guest",
                "responded": true,
                "attending": false
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        view.set_responded(true);
        let effects = view.submit(ctx).await;

        assert_eq!(effects, vec![Effect::Alert("Invite was edited!".into()), Effect::GoBack]);
    }

    #[tokio::test]
    async fn submit_failure_stays_on_form() {
        let server = MockServer::start().await;
        let api = api(&server);
        let session = logged_in();
        let ctx = Context { api: &api, session: &session };
        let mut view = mounted(&server, ctx).await;

        Mock::given(method("PATCH"))
            .and(path("/invites/A1"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        view.set_family_name("Leigh");
        let effects = view.submit(ctx).await;

        assert_eq!(
            effects,
            vec![Effect::Error("Could not edit invite: Request failed with status code 500".into())]
        );
        assert!(!effects.contains(&Effect::GoBack));
        assert_eq!(view.form().family_name, "Leigh");
    }

    #[tokio::test]
    async fn empty_family_name_is_refused_locally() {
        let server = MockServer::start().await;
        let api = api(&server);
        let session = logged_in();
        let ctx = Context { api: &api, session: &session };
        let mut view = mounted(&server, ctx).await;

        view.set_family_name("  ");
        let effects = view.submit(ctx).await;

        assert_eq!(effects, vec![Effect::Error("Family name is required".into())]);
        let patches = server
            .received_requests()
            .await
            .unwrap()
            .into_iter()
            .filter(|r| r.method.as_str() == "PATCH")
            .count();
        assert_eq!(patches, 0);
    }

    #[tokio::test]
    async fn failed_load_alerts_and_stays_loading() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/invites/A1"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let api = api(&server);
        let session = logged_in();
        let mut view = EditInviteView::new("A1");
        let effects = view.mount(Context { api: &api, session: &session }).await;

        assert_eq!(
            effects,
            vec![Effect::Error("Failed to fetch Invite: Request failed with status code 404".into())]
        );
        assert!(view.is_loading());
    }
}
