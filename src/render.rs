//! Terminal rendering for WeDo types.
//!
//! Extension traits that add colored terminal rendering to wedo-core types
//! using owo_colors.

use owo_colors::OwoColorize;
use wedo_core::{CardColor, Guest, Invite};

/// Extension trait for terminal rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for CardColor {
    fn render(&self) -> String {
        match self {
            CardColor::Green => "■".green().to_string(),
            CardColor::Pink => "■".magenta().to_string(),
            CardColor::Grey => "■".dimmed().to_string(),
        }
    }
}

/// Colorize text according to the card color
fn colorize_card(color: CardColor, text: &str) -> String {
    match color {
        CardColor::Green => text.green().to_string(),
        CardColor::Pink => text.magenta().to_string(),
        CardColor::Grey => text.to_string(),
    }
}

/// One card in the invites list.
impl Render for Invite {
    fn render(&self) -> String {
        let color = self.card_color();
        let mut lines = vec![format!(
            "{} {} {}",
            color.render(),
            colorize_card(color, &self.family_name).bold(),
            format!("({})", self.invite_id).dimmed()
        )];

        lines.push(format!("   Type: {} · {}", self.invite_type, created(self)));
        lines.push(format!(
            "   {}  {}",
            checkbox("Responded", self.responded),
            checkbox("Attending", self.attending)
        ));

        if let Some(qr) = &self.qr_code_url {
            lines.push(format!("   {} {}", "QR:".dimmed(), qr));
        }

        lines.join("\n")
    }
}

impl Render for Guest {
    fn render(&self) -> String {
        format!("{} {}", self.full_name.bold(), self.contact_or_default().dimmed())
    }
}

pub fn checkbox(label: &str, checked: bool) -> String {
    if checked {
        format!("{} {}", "[x]".green(), label)
    } else {
        format!("{} {}", "[ ]".dimmed(), label)
    }
}

/// `Created Tue Jun 01 2021`, or the raw timestamp when it does not parse.
pub fn created(invite: &Invite) -> String {
    match invite.created_at() {
        Some(at) => format!("Created {}", at.format("%a %b %d %Y")),
        None => format!("Created {}", invite.create_ts),
    }
}

pub fn heading(text: &str) -> String {
    text.bold().underline().to_string()
}

pub fn loading(text: &str) -> String {
    format!("{text}...").dimmed().to_string()
}

/// Simple pluralization helper
pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}
