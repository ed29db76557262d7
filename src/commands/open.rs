use anyhow::Result;
use wedo_core::route::Route;

use super::{open_page, App};
use crate::shell::{render_menu, resolve, Shell};
use crate::views::Context;

/// Render any client-side route, e.g. `/Invites/A1/view`.
pub async fn run(app: &App, path: &str) -> Result<()> {
    let route = Route::parse(path);

    println!("{}\n", render_menu(&app.session));

    // Pages that fetch nothing render without an API configured
    let page = resolve(&route, &app.session);
    if page.loading_label().is_none() {
        println!("{}", page.render());
        return Ok(());
    }

    let api = app.api()?;
    let mut shell = Shell::new(Context {
        api: &api,
        session: &app.session,
    });
    let page = open_page(&mut shell, route).await?;
    println!("{}", page.render());

    Ok(())
}
