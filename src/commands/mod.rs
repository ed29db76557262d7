pub mod auth;
pub mod edit;
pub mod invites;
pub mod open;
pub mod respond;
pub mod upload;
pub mod view;

use anyhow::{Context as _, Result};
use owo_colors::OwoColorize;
use wedo_core::api::ApiClient;
use wedo_core::config::Config;
use wedo_core::route::Route;
use wedo_core::session::Session;

use crate::shell::{Page, Shell};
use crate::utils::tui::create_spinner;
use crate::views::{pages, Effect};

/// Config and session, loaded once per invocation.
pub struct App {
    pub config: Config,
    pub session: Session,
}

impl App {
    pub fn load() -> Result<Self> {
        let config = Config::load().context("Failed to load config")?;
        let session = Session::load().context("Failed to load session")?;
        Ok(App { config, session })
    }

    pub fn api(&self) -> Result<ApiClient> {
        Ok(ApiClient::new(&self.config.api)?)
    }

    /// Refuse protected routes up front, showing the login prompt.
    pub fn require_login(&self, route: &Route) -> Result<()> {
        if route.is_protected() && !self.session.is_authenticated() {
            println!("{}", pages::login_required());
            anyhow::bail!("Not logged in");
        }
        Ok(())
    }
}

/// Print alerts; any failed operation turns into the command's error.
pub fn report(effects: &[Effect]) -> Result<()> {
    let mut errors = Vec::new();

    for effect in effects {
        match effect {
            Effect::Alert(message) => println!("{}", message.green()),
            Effect::Error(message) => errors.push(message.as_str()),
            Effect::Navigate(route) => log::debug!("Navigating to {route}"),
            Effect::GoBack => log::debug!("Navigating back"),
        }
    }

    if !errors.is_empty() {
        anyhow::bail!("{}", errors.join("\n"));
    }

    Ok(())
}

/// Open a route through the shell with a spinner while it loads.
pub async fn open_page(shell: &mut Shell<'_>, route: Route) -> Result<Page> {
    let label = crate::shell::resolve(&route, shell.ctx().session).loading_label();
    let spinner = label.map(create_spinner);

    let (page, effects) = shell.open(route).await;

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    report(&effects)?;
    Ok(page)
}

/// Report effects, then leave `page` and render wherever they navigate to.
pub async fn follow(shell: &mut Shell<'_>, page: &mut Page, effects: Vec<Effect>) -> Result<()> {
    report(&effects)?;

    if let Some(route) = shell.next_route(&effects) {
        page.unmount();
        println!();
        let page = open_page(shell, route).await?;
        println!("{}", page.render());
    }

    Ok(())
}
