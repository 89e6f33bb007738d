//! Chat command - send messages to a chat app.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::Style;
use dify_client::{ChatMessageRequest, DifyResponse, FileInput};

use super::output::{print_body, print_events};
use super::{Context, parse_input};

/// Arguments for the chat command.
#[derive(Args, Debug)]
pub struct ChatArgs {
    #[command(subcommand)]
    pub command: ChatCommand,
}

#[derive(Subcommand, Debug)]
pub enum ChatCommand {
    /// Send a message and print the answer
    Send {
        /// The message to send
        #[arg(required = true)]
        query: String,

        /// Continue an existing conversation
        #[arg(short, long)]
        conversation: Option<String>,

        /// App input variable (key=value, repeatable)
        #[arg(short, long = "input", value_parser = parse_input)]
        inputs: Vec<(String, serde_json::Value)>,

        /// Attach a remote image by URL (repeatable)
        #[arg(long = "image-url")]
        image_urls: Vec<String>,

        /// Attach a previously uploaded image by file id (repeatable)
        #[arg(long = "image-file")]
        image_files: Vec<String>,

        /// Stream the answer as it is generated
        #[arg(short, long)]
        stream: bool,
    },

    /// Stop a streaming answer
    Stop {
        /// Task id from the stream's events
        task_id: String,
    },

    /// Show suggested follow-up questions for a message
    Suggested {
        /// Message id
        message_id: String,
    },
}

/// Run the chat command.
pub async fn run(args: ChatArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ChatCommand::Send {
            query,
            conversation,
            inputs,
            image_urls,
            image_files,
            stream,
        } => {
            let files: Vec<FileInput> = image_urls
                .into_iter()
                .map(FileInput::remote_image)
                .chain(image_files.into_iter().map(FileInput::uploaded_image))
                .collect();
            cmd_send(ctx, query, conversation, inputs, files, stream).await
        }
        ChatCommand::Stop { task_id } => cmd_stop(ctx, &task_id).await,
        ChatCommand::Suggested { message_id } => cmd_suggested(ctx, &message_id).await,
    }
}

async fn cmd_send(
    ctx: &Context,
    query: String,
    conversation: Option<String>,
    inputs: Vec<(String, serde_json::Value)>,
    files: Vec<FileInput>,
    stream: bool,
) -> Result<()> {
    let client = ctx.client()?;
    let dim = Style::new().dim();

    if ctx.verbose {
        println!("{}", dim.apply_to(format!("Sending to: {}", client.base_url())));
        if let Some(ref id) = conversation {
            println!("{}", dim.apply_to(format!("Conversation: {}", id)));
        }
        println!();
    }

    let mut request = ChatMessageRequest::new(query, ctx.user()?).streaming(stream);
    if let Some(id) = conversation {
        request = request.conversation_id(id);
    }
    for (key, value) in inputs {
        request = request.input(key, value);
    }
    if !files.is_empty() {
        request = request.files(files);
    }

    match client.chat().create_message(request).await? {
        DifyResponse::Streaming(stream) => print_events(stream, "answer", ctx.json_output).await,
        DifyResponse::Buffered(response) => {
            if ctx.json_output {
                return print_body(&response);
            }
            let body = response.body();
            println!("{}", body["answer"].as_str().unwrap_or_default());
            if let Some(id) = body["conversation_id"].as_str() {
                println!("{}", dim.apply_to(format!("[conversation: {}]", id)));
            }
            Ok(())
        }
    }
}

async fn cmd_stop(ctx: &Context, task_id: &str) -> Result<()> {
    let client = ctx.client()?;
    let response = client.chat().stop(task_id, &ctx.user()?).await?;

    if ctx.json_output {
        return print_body(&response);
    }

    let green = Style::new().green();
    println!("{} Stopped task {}", green.apply_to("✓"), task_id);
    Ok(())
}

async fn cmd_suggested(ctx: &Context, message_id: &str) -> Result<()> {
    let client = ctx.client()?;
    let response = client.chat().suggested(message_id, &ctx.user()?).await?;

    if ctx.json_output {
        return print_body(&response);
    }

    let suggestions = response.body()["data"].as_array().cloned().unwrap_or_default();
    if suggestions.is_empty() {
        println!("No suggestions.");
        return Ok(());
    }
    for suggestion in suggestions {
        if let Some(text) = suggestion.as_str() {
            println!("  {}", text);
        }
    }
    Ok(())
}
