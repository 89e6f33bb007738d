//! App command - parameters, info, metadata and message feedback.

use anyhow::Result;
use clap::{Args, Subcommand, ValueEnum};
use console::Style;
use dify_client::{FeedbackRequest, Rating};

use super::Context;
use super::output::print_body;

/// Arguments for the app command.
#[derive(Args, Debug)]
pub struct AppArgs {
    #[command(subcommand)]
    pub command: AppCommand,
}

#[derive(Subcommand, Debug)]
pub enum AppCommand {
    /// Show the app's input form and feature settings
    Parameters,

    /// Show the app's name, description and tags
    Info,

    /// Show tool icon metadata
    Meta,

    /// Rate a message
    Feedback {
        /// Message id
        message_id: String,

        /// Rating to give, or `none` to revoke
        #[arg(short, long, value_enum)]
        rating: RatingArg,
    },
}

/// Command-line rating value.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum RatingArg {
    Like,
    Dislike,
    None,
}

impl From<RatingArg> for Option<Rating> {
    fn from(arg: RatingArg) -> Self {
        match arg {
            RatingArg::Like => Some(Rating::Like),
            RatingArg::Dislike => Some(Rating::Dislike),
            RatingArg::None => None,
        }
    }
}

/// Run the app command.
pub async fn run(args: AppArgs, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    let user = ctx.user()?;

    let response = match args.command {
        AppCommand::Parameters => client.app().parameters(&user).await?,
        AppCommand::Info => client.app().info(&user).await?,
        AppCommand::Meta => client.app().meta(&user).await?,
        AppCommand::Feedback { message_id, rating } => {
            let response = client
                .app()
                .message_feedback(&message_id, FeedbackRequest::new(rating.into(), user))
                .await?;
            if !ctx.json_output {
                let green = Style::new().green();
                println!("{} Feedback recorded for {}", green.apply_to("✓"), message_id);
                return Ok(());
            }
            response
        }
    };

    print_body(&response)
}
