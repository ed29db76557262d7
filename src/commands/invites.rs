use anyhow::{Context as _, Result};
use wedo_core::route::Route;
use wedo_core::InviteType;

use super::{open_page, report, App};
use crate::shell::{Page, Shell};
use crate::views::invites::InvitesView;
use crate::views::Context;

pub enum Action {
    List,
    Create {
        family_name: String,
        invite_type: InviteType,
    },
    ToggleResponded(String),
    ToggleAttending(String),
    Delete(String),
}

pub async fn run(app: &App, action: Action) -> Result<()> {
    app.require_login(&Route::Invites)?;

    let api = app.api()?;
    let ctx = Context {
        api: &api,
        session: &app.session,
    };
    let mut shell = Shell::new(ctx);

    let Page::Invites(mut view) = open_page(&mut shell, Route::Invites).await? else {
        anyhow::bail!("Invites page unavailable");
    };

    let effects = match action {
        Action::List => Vec::new(),
        Action::Create {
            family_name,
            invite_type,
        } => {
            view.set_new_family_name(family_name);
            view.set_new_type(invite_type);
            view.create(ctx).await
        }
        Action::ToggleResponded(id) => {
            let pos = position(&view, &id)?;
            view.toggle_responded(ctx, pos).await
        }
        Action::ToggleAttending(id) => {
            let pos = position(&view, &id)?;
            view.toggle_attending(ctx, pos).await
        }
        Action::Delete(id) => {
            position(&view, &id)?;
            view.delete(ctx, &id).await
        }
    };

    report(&effects)?;
    println!("{}", view.render());

    Ok(())
}

fn position(view: &InvitesView, invite_id: &str) -> Result<usize> {
    view.position(invite_id)
        .with_context(|| format!("Invite '{invite_id}' not found"))
}
