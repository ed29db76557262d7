//! Read-only invite detail with guests, attachments and an operations menu.

use owo_colors::OwoColorize;
use wedo_core::error::WeDoResult;
use wedo_core::route::Route;
use wedo_core::{Guest, Invite};

use super::{Context, Effect, Lifecycle, Ticket};
use crate::render::{checkbox, heading, loading, pluralize, Render};

#[derive(Debug)]
pub struct ViewInviteView {
    invite_id: String,
    invite: Option<Invite>,
    guests: Vec<Guest>,
    lifecycle: Lifecycle,
}

impl ViewInviteView {
    pub fn new(invite_id: impl Into<String>) -> Self {
        ViewInviteView {
            invite_id: invite_id.into(),
            invite: None,
            guests: Vec::new(),
            lifecycle: Lifecycle::default(),
        }
    }

    pub fn invite(&self) -> Option<&Invite> {
        self.invite.as_ref()
    }

    pub fn guests(&self) -> &[Guest] {
        &self.guests
    }

    pub fn is_loading(&self) -> bool {
        self.invite.is_none()
    }

    pub fn begin_load(&mut self) -> Ticket {
        self.lifecycle.mount()
    }

    /// Invite and guests arrive together or not at all.
    pub fn finish_load(
        &mut self,
        ticket: Ticket,
        result: WeDoResult<(Invite, Vec<Guest>)>,
    ) -> Vec<Effect> {
        if !self.lifecycle.is_current(ticket) {
            log::debug!("Discarding invite {} response for a stale mount", self.invite_id);
            return Vec::new();
        }

        match result {
            Ok((invite, guests)) => {
                self.invite = Some(invite);
                self.guests = guests;
                Vec::new()
            }
            Err(e) => vec![Effect::Error(format!("Failed to fetch Invite: {e}"))],
        }
    }

    pub async fn mount(&mut self, ctx: Context<'_>) -> Vec<Effect> {
        let ticket = self.begin_load();
        let result = fetch(ctx, &self.invite_id).await;
        self.finish_load(ticket, result)
    }

    pub fn unmount(&mut self) {
        self.lifecycle.unmount();
    }

    pub fn edit(&self) -> Vec<Effect> {
        vec![Effect::Navigate(Route::EditInvite(self.invite_id.clone()))]
    }

    pub fn upload(&self) -> Vec<Effect> {
        vec![Effect::Navigate(Route::UploadAttachment(self.invite_id.clone()))]
    }

    pub async fn delete(&mut self, ctx: Context<'_>) -> Vec<Effect> {
        let result = match ctx.session.id_token() {
            Ok(token) => ctx.api.delete_invite(token, &self.invite_id).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => vec![
                Effect::Alert("Invite deleted".into()),
                Effect::Navigate(Route::Invites),
            ],
            Err(e) => {
                log::debug!("Deleting {} failed: {e}", self.invite_id);
                vec![Effect::Error("Invite deletion failed".into())]
            }
        }
    }

    pub fn render(&self) -> String {
        let Some(invite) = &self.invite else {
            return loading("Loading Invite");
        };

        let mut lines = vec![heading("View Invite"), String::new()];

        // Summary
        lines.push(format!(
            "{} {}",
            invite.card_color().render(),
            invite.family_name.bold()
        ));
        lines.push(format!("   {}", invite.invite_id.dimmed()));
        if let Some(qr) = &invite.qr_code_url {
            lines.push(format!("   {} {}", "QR:".dimmed(), qr));
        }
        lines.push(format!("   {}", checkbox("Responded", invite.responded)));
        lines.push(format!("   {}", checkbox("Attending", invite.attending)));
        lines.push(String::new());

        // Guests
        lines.push(format!(
            "Guest Information ({} {})",
            self.guests.len(),
            pluralize("guest", self.guests.len())
        ));
        for guest in &self.guests {
            lines.push(format!("   {}", guest.render()));
        }
        lines.push(String::new());

        // Attachments
        lines.push(format!("Attachments ({})", invite.attachment_count()));
        for attachment in invite.attachments() {
            lines.push(format!("   📎 {attachment}"));
        }
        lines.push(String::new());

        // Operations
        lines.push(
            format!(
                "Edit: wedo edit {id}  ·  Attach: wedo upload {id} <file>  ·  Delete: wedo view {id} --delete",
                id = invite.invite_id
            )
            .dimmed()
            .to_string(),
        );

        lines.join("\n")
    }
}

/// Two sequential requests; either failing aborts the whole load.
async fn fetch(ctx: Context<'_>, invite_id: &str) -> WeDoResult<(Invite, Vec<Guest>)> {
    let token = ctx.session.id_token()?;
    let invite = ctx.api.get_invite(token, invite_id).await?;
    let guests = ctx.api.get_guests(token, invite_id).await?;
    Ok((invite, guests))
}
