//! Top-level shell: menu, route-to-view mapping and the login gate.

use owo_colors::OwoColorize;
use wedo_core::route::Route;
use wedo_core::session::Session;

use crate::views::edit_invite::EditInviteView;
use crate::views::invites::InvitesView;
use crate::views::respond::RespondView;
use crate::views::upload::UploadView;
use crate::views::view_invite::ViewInviteView;
use crate::views::{pages, Context, Effect};

/// The view a route resolved to.
#[derive(Debug)]
pub enum Page {
    Home(RespondView),
    Invites(InvitesView),
    ViewInvite(ViewInviteView),
    EditInvite(EditInviteView),
    Upload(UploadView),
    LogIn,
    NotFound(String),
}

/// Map a route to its page, substituting the login prompt for protected
/// routes when nobody is logged in.
pub fn resolve(route: &Route, session: &Session) -> Page {
    if route.is_protected() && !session.is_authenticated() {
        return Page::LogIn;
    }

    match route {
        Route::Home => Page::Home(RespondView::new()),
        Route::Invites => Page::Invites(InvitesView::new()),
        Route::ViewInvite(id) => Page::ViewInvite(ViewInviteView::new(id.as_str())),
        Route::EditInvite(id) => Page::EditInvite(EditInviteView::new(id.as_str())),
        Route::UploadAttachment(id) => Page::Upload(UploadView::new(id.as_str())),
        Route::NotFound(path) => Page::NotFound(path.clone()),
    }
}

impl Page {
    /// Fetch whatever the page shows. Static pages have nothing to load.
    pub async fn mount(&mut self, ctx: Context<'_>) -> Vec<Effect> {
        match self {
            Page::Invites(view) => view.mount(ctx).await,
            Page::ViewInvite(view) => view.mount(ctx).await,
            Page::EditInvite(view) => view.mount(ctx).await,
            Page::Home(_) | Page::Upload(_) | Page::LogIn | Page::NotFound(_) => Vec::new(),
        }
    }

    /// Leave the page; loads still in flight for it are dropped when they land.
    pub fn unmount(&mut self) {
        match self {
            Page::Invites(view) => view.unmount(),
            Page::ViewInvite(view) => view.unmount(),
            Page::EditInvite(view) => view.unmount(),
            Page::Home(_) | Page::Upload(_) | Page::LogIn | Page::NotFound(_) => {}
        }
    }

    /// Spinner text while mounting, for pages that fetch.
    pub fn loading_label(&self) -> Option<&'static str> {
        match self {
            Page::Invites(_) => Some("Loading Invites"),
            Page::ViewInvite(_) => Some("Loading Invite"),
            Page::EditInvite(_) => Some("Loading Form"),
            Page::Home(_) | Page::Upload(_) | Page::LogIn | Page::NotFound(_) => None,
        }
    }

    pub fn render(&self) -> String {
        match self {
            Page::Home(view) => view.render(),
            Page::Invites(view) => view.render(),
            Page::ViewInvite(view) => view.render(),
            Page::EditInvite(view) => view.render(),
            Page::Upload(view) => view.render(),
            Page::LogIn => pages::login_required(),
            Page::NotFound(path) => pages::not_found(path),
        }
    }
}

pub fn render_menu(session: &Session) -> String {
    let mut left = vec!["WeDo".bold().to_string()];
    let mut right = Vec::new();

    if session.is_authenticated() {
        left.push("Invites".to_string());
        if let Some(sub) = session.sub() {
            right.push(sub.dimmed().to_string());
        }
        right.push("Log Out".to_string());
    } else {
        right.push("Log In".to_string());
    }

    format!("{}   |   {}", left.join("  "), right.join("  "))
}

/// Navigation history for following the views' navigation effects.
pub struct Shell<'a> {
    ctx: Context<'a>,
    history: Vec<Route>,
}

impl<'a> Shell<'a> {
    pub fn new(ctx: Context<'a>) -> Self {
        Shell {
            ctx,
            history: Vec::new(),
        }
    }

    pub fn ctx(&self) -> Context<'a> {
        self.ctx
    }

    /// Resolve and mount the page for `route`, making it current.
    pub async fn open(&mut self, route: Route) -> (Page, Vec<Effect>) {
        log::debug!("Opening {route}");

        let mut page = resolve(&route, self.ctx.session);
        self.history.push(route);

        let effects = page.mount(self.ctx).await;
        (page, effects)
    }

    /// Where the effects ask to go next, if anywhere.
    pub fn next_route(&mut self, effects: &[Effect]) -> Option<Route> {
        for effect in effects {
            match effect {
                Effect::Navigate(route) => return Some(route.clone()),
                Effect::GoBack => {
                    self.history.pop();
                    return self.history.pop();
                }
                Effect::Alert(_) | Effect::Error(_) => {}
            }
        }
        None
    }
}
