mod commands;
mod render;
mod shell;
mod utils;
mod views;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::edit::EditArgs;
use commands::invites::Action;
use commands::respond::RespondArgs;
use commands::App;
use wedo_core::InviteType;

#[derive(Parser)]
#[command(name = "wedo")]
#[command(about = "Manage wedding invites and collect RSVPs")]
struct Cli {
    /// Log requests and navigation (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in through the identity provider
    Login,
    Logout,
    /// Show who is logged in and until when
    Whoami,
    /// Render a page by its path, e.g. /Invites/A1/view
    Open { path: String },
    /// Answer an invite (no login needed)
    Respond {
        /// The organizer's principal id
        #[arg(long)]
        org_id: String,

        #[arg(long)]
        family_name: String,

        /// The invite code
        #[arg(long)]
        invite_id: String,

        #[arg(long)]
        not_attending: bool,
    },
    /// List and manage your invites
    Invites {
        #[command(subcommand)]
        command: InviteCommands,
    },
    /// Show one invite with its guests and attachments
    View {
        invite_id: String,

        /// Delete the invite and return to the list
        #[arg(long)]
        delete: bool,
    },
    /// Edit an invite; without flags, show the current values
    Edit {
        invite_id: String,

        #[arg(long)]
        family_name: Option<String>,

        /// zoom or guest
        #[arg(long = "type")]
        invite_type: Option<InviteType>,

        #[arg(long)]
        responded: Option<bool>,

        #[arg(long)]
        attending: Option<bool>,
    },
    /// Attach a file to an invite
    Upload { invite_id: String, file: PathBuf },
}

#[derive(Subcommand)]
enum InviteCommands {
    List,
    Create {
        family_name: String,

        /// zoom or guest
        #[arg(long = "type", default_value = "zoom")]
        invite_type: InviteType,
    },
    ToggleResponded { invite_id: String },
    ToggleAttending { invite_id: String },
    Delete { invite_id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        // Public; runs without touching the session
        Commands::Respond {
            org_id,
            family_name,
            invite_id,
            not_attending,
        } => {
            let args = RespondArgs {
                org_id,
                family_name,
                invite_id,
                attending: !not_attending,
            };
            commands::respond::run(args).await
        }
        Commands::Login => commands::auth::login(&mut App::load()?).await,
        Commands::Logout => commands::auth::logout(&mut App::load()?),
        Commands::Whoami => commands::auth::whoami(&App::load()?),
        Commands::Open { path } => commands::open::run(&App::load()?, &path).await,
        Commands::Invites { command } => {
            let action = match command {
                InviteCommands::List => Action::List,
                InviteCommands::Create {
                    family_name,
                    invite_type,
                } => Action::Create {
                    family_name,
                    invite_type,
                },
                InviteCommands::ToggleResponded { invite_id } => Action::ToggleResponded(invite_id),
                InviteCommands::ToggleAttending { invite_id } => Action::ToggleAttending(invite_id),
                InviteCommands::Delete { invite_id } => Action::Delete(invite_id),
            };
            commands::invites::run(&App::load()?, action).await
        }
        Commands::View { invite_id, delete } => commands::view::run(&App::load()?, invite_id, delete).await,
        Commands::Edit {
            invite_id,
            family_name,
            invite_type,
            responded,
            attending,
        } => {
            let args = EditArgs {
                family_name,
                invite_type,
                responded,
                attending,
            };
            commands::edit::run(&App::load()?, invite_id, args).await
        }
        Commands::Upload { invite_id, file } => commands::upload::run(&App::load()?, invite_id, &file).await,
    }
}
