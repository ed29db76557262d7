use anyhow::Result;
use owo_colors::OwoColorize;

use super::App;

pub async fn login(app: &mut App) -> Result<()> {
    if app.session.is_authenticated() {
        if let Some(sub) = app.session.sub() {
            println!("Already logged in as {sub}. Run `wedo logout` first to switch accounts.");
            return Ok(());
        }
    }

    println!("Logging in via {}...", app.config.auth.domain);

    // Opens the browser and waits for the provider's callback
    app.session.login(&app.config.auth).await?;

    if let Some(sub) = app.session.sub() {
        println!("Logged in as: {}\n", sub.bold());
        println!("Invitees respond with this organizer id.");
    }

    println!("Run `wedo invites list` to see your invites.");

    Ok(())
}

pub fn logout(app: &mut App) -> Result<()> {
    let was_logged_in = app.session.sub().map(str::to_string);
    app.session.logout()?;

    match was_logged_in {
        Some(sub) => println!("Logged out {sub}"),
        None => println!("Not logged in"),
    }

    Ok(())
}

pub fn whoami(app: &App) -> Result<()> {
    match (app.session.sub(), app.session.expires_at()) {
        (Some(sub), Some(expires_at)) if app.session.is_authenticated() => {
            println!("{}", sub.bold());
            println!(
                "{}",
                format!("Session expires {}", expires_at.format("%Y-%m-%d %H:%M UTC")).dimmed()
            );
        }
        (Some(sub), _) => {
            println!("Session for {sub} has expired. Run `wedo login` again.");
        }
        _ => println!("Not logged in"),
    }

    Ok(())
}
