use anyhow::Result;
use wedo_core::route::Route;

use super::{follow, open_page, App};
use crate::shell::{Page, Shell};
use crate::views::Context;

pub async fn run(app: &App, invite_id: String, delete: bool) -> Result<()> {
    let route = Route::ViewInvite(invite_id);
    app.require_login(&route)?;

    let api = app.api()?;
    let ctx = Context {
        api: &api,
        session: &app.session,
    };
    let mut shell = Shell::new(ctx);

    let mut page = open_page(&mut shell, route).await?;
    let Page::ViewInvite(view) = &mut page else {
        anyhow::bail!("Invite page unavailable");
    };

    if delete {
        let effects = view.delete(ctx).await;
        return follow(&mut shell, &mut page, effects).await;
    }

    println!("{}", view.render());

    Ok(())
}
