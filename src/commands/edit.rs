use anyhow::Result;
use wedo_core::route::Route;
use wedo_core::InviteType;

use super::{follow, open_page, App};
use crate::shell::{Page, Shell};
use crate::views::Context;

/// Field values given on the command line; unset ones keep the stored value.
pub struct EditArgs {
    pub family_name: Option<String>,
    pub invite_type: Option<InviteType>,
    pub responded: Option<bool>,
    pub attending: Option<bool>,
}

impl EditArgs {
    fn is_empty(&self) -> bool {
        self.family_name.is_none()
            && self.invite_type.is_none()
            && self.responded.is_none()
            && self.attending.is_none()
    }
}

pub async fn run(app: &App, invite_id: String, args: EditArgs) -> Result<()> {
    let route = Route::EditInvite(invite_id);
    app.require_login(&route)?;

    let api = app.api()?;
    let ctx = Context {
        api: &api,
        session: &app.session,
    };
    let mut shell = Shell::new(ctx);

    let mut page = open_page(&mut shell, route).await?;
    let Page::EditInvite(view) = &mut page else {
        anyhow::bail!("Edit page unavailable");
    };

    if args.is_empty() {
        println!("{}", view.render());
        return Ok(());
    }

    if let Some(family_name) = args.family_name {
        view.set_family_name(family_name);
    }
    if let Some(invite_type) = args.invite_type {
        view.set_type(invite_type);
    }
    if let Some(responded) = args.responded {
        view.set_responded(responded);
    }
    if let Some(attending) = args.attending {
        view.set_attending(attending);
    }

    let effects = view.submit(ctx).await;
    println!("{}\n", view.render());
    follow(&mut shell, &mut page, effects).await
}
