//! Conversations command - list, inspect, rename and delete conversations.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::Style;
use dify_client::{ConversationsQuery, MessagesQuery, RenameConversationRequest};

use super::Context;
use super::output::print_body;

/// Arguments for the conversations command.
#[derive(Args, Debug)]
pub struct ConversationsArgs {
    #[command(subcommand)]
    pub command: ConversationsCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConversationsCommand {
    /// List conversations for the current user
    List {
        /// Id of the last conversation on the previous page
        #[arg(long)]
        first_id: Option<String>,

        /// Maximum number of conversations to return
        #[arg(short, long)]
        limit: Option<u32>,

        /// Only show pinned conversations
        #[arg(long)]
        pinned: bool,
    },

    /// Show message history
    Messages {
        /// Conversation to read
        #[arg(short, long)]
        conversation: Option<String>,

        /// Id of the first message on the current page
        #[arg(long)]
        first_id: Option<String>,

        /// Maximum number of messages to return
        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// Rename a conversation
    Rename {
        /// Conversation id
        id: String,

        /// New name
        #[arg(long, conflicts_with = "auto_generate", required_unless_present = "auto_generate")]
        name: Option<String>,

        /// Let the server generate a name
        #[arg(long)]
        auto_generate: bool,
    },

    /// Delete a conversation
    Delete {
        /// Conversation id
        id: String,
    },
}

/// Run the conversations command.
pub async fn run(args: ConversationsArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConversationsCommand::List {
            first_id,
            limit,
            pinned,
        } => cmd_list(ctx, first_id, limit, pinned).await,
        ConversationsCommand::Messages {
            conversation,
            first_id,
            limit,
        } => cmd_messages(ctx, conversation, first_id, limit).await,
        ConversationsCommand::Rename {
            id,
            name,
            auto_generate,
        } => cmd_rename(ctx, &id, name, auto_generate).await,
        ConversationsCommand::Delete { id } => cmd_delete(ctx, &id).await,
    }
}

async fn cmd_list(
    ctx: &Context,
    first_id: Option<String>,
    limit: Option<u32>,
    pinned: bool,
) -> Result<()> {
    let client = ctx.client()?;

    let mut query = ConversationsQuery::new(ctx.user()?).pinned(pinned);
    if let Some(id) = first_id {
        query = query.first_id(id);
    }
    if let Some(limit) = limit {
        query = query.limit(limit);
    }

    let response = client.chat().conversations(query).await?;

    if ctx.json_output {
        return print_body(&response);
    }

    let conversations = response.body()["data"].as_array().cloned().unwrap_or_default();
    if conversations.is_empty() {
        println!("No conversations found.");
        return Ok(());
    }

    let dim = Style::new().dim();
    println!("{:<38} NAME", "ID");
    for conversation in &conversations {
        println!(
            "{:<38} {}",
            conversation["id"].as_str().unwrap_or("-"),
            conversation["name"].as_str().unwrap_or("")
        );
    }
    if response.body()["has_more"].as_bool() == Some(true) {
        println!();
        println!("{}", dim.apply_to("More available; pass --first-id with the last id."));
    }

    Ok(())
}

async fn cmd_messages(
    ctx: &Context,
    conversation: Option<String>,
    first_id: Option<String>,
    limit: Option<u32>,
) -> Result<()> {
    let client = ctx.client()?;

    let mut query = MessagesQuery::new(ctx.user()?);
    if let Some(id) = conversation {
        query = query.conversation_id(id);
    }
    if let Some(id) = first_id {
        query = query.first_id(id);
    }
    if let Some(limit) = limit {
        query = query.limit(limit);
    }

    let response = client.chat().messages(query).await?;

    if ctx.json_output {
        return print_body(&response);
    }

    let messages = response.body()["data"].as_array().cloned().unwrap_or_default();
    if messages.is_empty() {
        println!("No messages.");
        return Ok(());
    }

    let bold = Style::new().bold();
    let dim = Style::new().dim();
    for message in &messages {
        println!(
            "{} {}",
            dim.apply_to(message["id"].as_str().unwrap_or("-")),
            bold.apply_to(message["query"].as_str().unwrap_or(""))
        );
        println!("{}", message["answer"].as_str().unwrap_or(""));
        println!();
    }

    Ok(())
}

async fn cmd_rename(
    ctx: &Context,
    id: &str,
    name: Option<String>,
    auto_generate: bool,
) -> Result<()> {
    let client = ctx.client()?;
    let user = ctx.user()?;

    let request = match name {
        Some(name) if !auto_generate => RenameConversationRequest::named(name, user),
        _ => RenameConversationRequest::auto_generate(user),
    };

    let response = client.chat().rename_conversation(id, request).await?;

    if ctx.json_output {
        return print_body(&response);
    }

    let green = Style::new().green();
    let new_name = response.body()["name"].as_str().unwrap_or(id);
    println!("{} Renamed to \"{}\"", green.apply_to("✓"), new_name);
    Ok(())
}

async fn cmd_delete(ctx: &Context, id: &str) -> Result<()> {
    let client = ctx.client()?;
    let response = client.chat().delete_conversation(id, &ctx.user()?).await?;

    if ctx.json_output {
        return print_body(&response);
    }

    let green = Style::new().green();
    println!("{} Deleted conversation {}", green.apply_to("✓"), id);
    Ok(())
}
