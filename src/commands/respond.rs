use anyhow::{Context as _, Result};
use wedo_core::api::ApiClient;
use wedo_core::config::Config;

use crate::views::respond::{AttendingChoice, RespondView};

pub struct RespondArgs {
    pub org_id: String,
    pub family_name: String,
    pub invite_id: String,
    pub attending: bool,
}

/// Public: needs only the API settings, never the session.
pub async fn run(args: RespondArgs) -> Result<()> {
    let config = Config::load().context("Failed to load config")?;
    let api = ApiClient::new(&config.api)?;

    let mut view = RespondView::new();
    view.set_org_id(args.org_id);
    view.set_family_name(args.family_name);
    view.set_invite_id(args.invite_id);
    view.set_choice(if args.attending {
        AttendingChoice::Attending
    } else {
        AttendingChoice::NotAttending
    });

    view.submit(&api).await;

    println!("{}", view.render());

    if view.form_submit_failed() {
        anyhow::bail!("Response was not recorded");
    }

    Ok(())
}
