//! Audio command - speech-to-text and text-to-speech.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use console::Style;
use dify_client::{AudioToTextForm, TextToAudioForm};
use futures::StreamExt;
use tokio::io::AsyncWriteExt;

use super::Context;
use super::files::{guess_mime, read_file};
use super::output::print_body;

/// Arguments for the audio command.
#[derive(Args, Debug)]
pub struct AudioArgs {
    #[command(subcommand)]
    pub command: AudioCommand,
}

#[derive(Subcommand, Debug)]
pub enum AudioCommand {
    /// Transcribe an audio file
    Transcribe {
        /// Audio file (mp3, m4a, wav, webm, amr)
        path: PathBuf,

        /// MIME type (guessed from the extension when omitted)
        #[arg(long)]
        mime: Option<String>,
    },

    /// Synthesize speech and write it to a file
    Speak {
        /// Text to speak
        #[arg(short, long, conflicts_with = "message_id", required_unless_present = "message_id")]
        text: Option<String>,

        /// Speak the answer of an existing message
        #[arg(short, long)]
        message_id: Option<String>,

        /// Where to write the audio
        #[arg(short, long)]
        output: PathBuf,
    },
}

/// Run the audio command.
pub async fn run(args: AudioArgs, ctx: &Context) -> Result<()> {
    match args.command {
        AudioCommand::Transcribe { path, mime } => cmd_transcribe(ctx, &path, mime).await,
        AudioCommand::Speak {
            text,
            message_id,
            output,
        } => cmd_speak(ctx, text, message_id, &output).await,
    }
}

async fn cmd_transcribe(ctx: &Context, path: &Path, mime: Option<String>) -> Result<()> {
    let (bytes, file_name) = read_file(path)?;
    let mime = mime.unwrap_or_else(|| guess_mime(path).to_string());

    let client = ctx.client()?;
    let form = AudioToTextForm::new(bytes, file_name, mime, ctx.user()?).into_form()?;
    let response = client.audio().audio_to_text(form).await?;

    if ctx.json_output {
        return print_body(&response);
    }

    println!("{}", response.body()["text"].as_str().unwrap_or_default());
    Ok(())
}

async fn cmd_speak(
    ctx: &Context,
    text: Option<String>,
    message_id: Option<String>,
    output: &Path,
) -> Result<()> {
    let client = ctx.client()?;
    let user = ctx.user()?;

    let form = match (text, message_id) {
        (Some(text), _) => TextToAudioForm::text(text, user),
        (None, Some(id)) => TextToAudioForm::message(id, user),
        (None, None) => anyhow::bail!("either --text or --message-id is required"),
    };

    let stream = client.audio().text_to_audio_stream(form.into_form()).await?;

    let mut file = tokio::fs::File::create(output)
        .await
        .with_context(|| format!("Failed to create {}", output.display()))?;
    let chunks = stream.bytes();
    futures::pin_mut!(chunks);

    let mut written = 0usize;
    while let Some(chunk) = chunks.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        written += chunk.len();
    }
    file.flush().await?;

    tracing::debug!(bytes = written, path = %output.display(), "Wrote synthesized audio");

    if !ctx.json_output {
        let green = Style::new().green();
        println!(
            "{} Wrote {} bytes to {}",
            green.apply_to("✓"),
            written,
            output.display()
        );
    }
    Ok(())
}
