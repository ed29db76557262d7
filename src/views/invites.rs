//! Invites list: quick-create, per-card toggles, delete and navigation.

use wedo_core::error::WeDoResult;
use wedo_core::route::Route;
use wedo_core::{CreateInviteRequest, Invite, InviteType, UpdateInviteRequest};

use super::{Context, Effect, Lifecycle, Ticket};
use crate::render::{heading, loading, Render};

#[derive(Debug, Clone, Copy)]
enum Flag {
    Responded,
    Attending,
}

#[derive(Debug)]
pub struct InvitesView {
    invites: Vec<Invite>,
    new_family_name: String,
    new_type: InviteType,
    loading: bool,
    lifecycle: Lifecycle,
}

impl Default for InvitesView {
    fn default() -> Self {
        InvitesView {
            invites: Vec::new(),
            new_family_name: String::new(),
            new_type: InviteType::default(),
            loading: true,
            lifecycle: Lifecycle::default(),
        }
    }
}

impl InvitesView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invites(&self) -> &[Invite] {
        &self.invites
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn position(&self, invite_id: &str) -> Option<usize> {
        self.invites.iter().position(|i| i.invite_id == invite_id)
    }

    pub fn begin_load(&mut self) -> Ticket {
        self.lifecycle.mount()
    }

    /// Apply the result of the initial fetch. A failure leaves the view loading.
    pub fn finish_load(&mut self, ticket: Ticket, result: WeDoResult<Vec<Invite>>) -> Vec<Effect> {
        if !self.lifecycle.is_current(ticket) {
            log::debug!("Discarding invites response for a stale mount");
            return Vec::new();
        }

        match result {
            Ok(invites) => {
                self.invites = invites;
                self.loading = false;
                Vec::new()
            }
            Err(e) => vec![Effect::Error(format!("Failed to fetch Invites: {e}"))],
        }
    }

    pub async fn mount(&mut self, ctx: Context<'_>) -> Vec<Effect> {
        let ticket = self.begin_load();
        let result = match ctx.session.id_token() {
            Ok(token) => ctx.api.get_invites(token).await,
            Err(e) => Err(e),
        };
        self.finish_load(ticket, result)
    }

    pub fn unmount(&mut self) {
        self.lifecycle.unmount();
    }

    pub fn set_new_family_name(&mut self, family_name: impl Into<String>) {
        self.new_family_name = family_name.into();
    }

    pub fn set_new_type(&mut self, invite_type: InviteType) {
        self.new_type = invite_type;
    }

    /// Quick add: the created invite goes to the front without refetching.
    pub async fn create(&mut self, ctx: Context<'_>) -> Vec<Effect> {
        let req = CreateInviteRequest {
            family_name: self.new_family_name.clone(),
            invite_type: self.new_type,
        };

        let result = match ctx.session.id_token() {
            Ok(token) => ctx.api.create_invite(token, &req).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(invite) => {
                self.invites.insert(0, invite);
                self.new_family_name.clear();
                self.new_type = InviteType::default();
                Vec::new()
            }
            Err(e) => {
                log::debug!("Invite creation failed: {e}");
                vec![Effect::Error("Invite creation failed".into())]
            }
        }
    }

    pub async fn toggle_responded(&mut self, ctx: Context<'_>, pos: usize) -> Vec<Effect> {
        self.toggle(ctx, pos, Flag::Responded).await
    }

    pub async fn toggle_attending(&mut self, ctx: Context<'_>, pos: usize) -> Vec<Effect> {
        self.toggle(ctx, pos, Flag::Attending).await
    }

    // Sends every editable field back with one flag flipped. Last write wins.
    async fn toggle(&mut self, ctx: Context<'_>, pos: usize, flag: Flag) -> Vec<Effect> {
        let failure = match flag {
            Flag::Responded => "Invite could not be marked responded",
            Flag::Attending => "Invite could not be marked attending",
        };

        let Some(invite) = self.invites.get(pos) else {
            return vec![Effect::Error(failure.into())];
        };

        let invite_id = invite.invite_id.clone();
        let patch: UpdateInviteRequest = match flag {
            Flag::Responded => invite.toggled_responded(),
            Flag::Attending => invite.toggled_attending(),
        };

        let result = match ctx.session.id_token() {
            Ok(token) => ctx.api.patch_invite(token, &invite_id, &patch).await,
            Err(e) => Err(e),
        };

        if let Err(e) = result {
            log::debug!("Toggle on {invite_id} failed: {e}");
            return vec![Effect::Error(failure.into())];
        }

        self.flip(pos, &invite_id, flag);
        Vec::new()
    }

    // The list may have changed while the request was in flight; only flip
    // when `pos` still holds the invite that was patched.
    fn flip(&mut self, pos: usize, invite_id: &str, flag: Flag) {
        let Some(invite) = self.invites.get_mut(pos).filter(|i| i.invite_id == invite_id) else {
            log::debug!("Invite {invite_id} moved before its toggle landed");
            return;
        };

        match flag {
            Flag::Responded => invite.responded = !invite.responded,
            Flag::Attending => invite.attending = !invite.attending,
        }
    }

    /// Removes the invite locally only once the API confirms.
    pub async fn delete(&mut self, ctx: Context<'_>, invite_id: &str) -> Vec<Effect> {
        let result = match ctx.session.id_token() {
            Ok(token) => ctx.api.delete_invite(token, invite_id).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                self.invites.retain(|i| i.invite_id != invite_id);
                Vec::new()
            }
            Err(e) => {
                log::debug!("Deleting {invite_id} failed: {e}");
                vec![Effect::Error("Invite deletion failed".into())]
            }
        }
    }

    pub fn edit(&self, invite_id: &str) -> Vec<Effect> {
        vec![Effect::Navigate(Route::EditInvite(invite_id.to_string()))]
    }

    pub fn upload(&self, invite_id: &str) -> Vec<Effect> {
        vec![Effect::Navigate(Route::UploadAttachment(invite_id.to_string()))]
    }

    pub fn view(&self, invite_id: &str) -> Vec<Effect> {
        vec![Effect::Navigate(Route::ViewInvite(invite_id.to_string()))]
    }

    pub fn render(&self) -> String {
        let mut lines = vec![heading("Invites"), String::new()];

        if self.loading {
            lines.push(loading("Loading Invites"));
            return lines.join("\n");
        }

        if self.invites.is_empty() {
            lines.push("No invites yet. Add one with `wedo invites create <family name>`.".into());
            return lines.join("\n");
        }

        for invite in &self.invites {
            lines.push(invite.render());
            lines.push(String::new());
        }
        lines.pop();

        lines.join("\n")
    }
}
