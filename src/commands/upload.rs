use std::path::Path;

use anyhow::{Context as _, Result};
use wedo_core::route::Route;

use super::{open_page, report, App};
use crate::shell::{Page, Shell};
use crate::utils::tui::create_spinner;
use crate::views::Context;

pub async fn run(app: &App, invite_id: String, file: &Path) -> Result<()> {
    let route = Route::UploadAttachment(invite_id);
    app.require_login(&route)?;

    let api = app.api()?;
    let ctx = Context {
        api: &api,
        session: &app.session,
    };
    let mut shell = Shell::new(ctx);

    let Page::Upload(mut view) = open_page(&mut shell, route).await? else {
        anyhow::bail!("Upload page unavailable");
    };

    let name = file
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Invalid file name {}", file.display()))?;
    let bytes =
        std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;

    view.select_file(name, bytes);
    println!("{}", view.render());

    let spinner = create_spinner("Uploading file");
    let effects = view.submit(ctx).await;
    spinner.finish_and_clear();

    report(&effects)
}
