//! Files command - upload files for use in chat messages.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use console::Style;
use dify_client::FileUploadForm;

use super::Context;
use super::output::print_body;

/// Arguments for the files command.
#[derive(Args, Debug)]
pub struct FilesArgs {
    #[command(subcommand)]
    pub command: FilesCommand,
}

#[derive(Subcommand, Debug)]
pub enum FilesCommand {
    /// Upload an image
    Upload {
        /// File to upload
        path: PathBuf,

        /// MIME type (guessed from the extension when omitted)
        #[arg(long)]
        mime: Option<String>,
    },
}

/// Run the files command.
pub async fn run(args: FilesArgs, ctx: &Context) -> Result<()> {
    match args.command {
        FilesCommand::Upload { path, mime } => cmd_upload(ctx, &path, mime).await,
    }
}

async fn cmd_upload(ctx: &Context, path: &Path, mime: Option<String>) -> Result<()> {
    let (bytes, file_name) = read_file(path)?;
    let mime = mime.unwrap_or_else(|| guess_mime(path).to_string());

    let client = ctx.client()?;
    let form = FileUploadForm::new(bytes, file_name, mime, ctx.user()?).into_form()?;
    let response = client.files().upload(form).await?;

    if ctx.json_output {
        return print_body(&response);
    }

    let green = Style::new().green();
    println!(
        "{} Uploaded {} ({})",
        green.apply_to("✓"),
        path.display(),
        response.body()["id"].as_str().unwrap_or("-")
    );
    Ok(())
}

/// Read a local file along with the name to upload it under.
pub(crate) fn read_file(path: &Path) -> Result<(Vec<u8>, String)> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    Ok((bytes, file_name))
}

/// MIME type for the file types the API accepts, by extension.
pub(crate) fn guess_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "mp3" | "mpga" => "audio/mpeg",
        "m4a" => "audio/mp4",
        "wav" => "audio/wav",
        "webm" => "audio/webm",
        "amr" => "audio/amr",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_mime() {
        assert_eq!(guess_mime(Path::new("cat.PNG")), "image/png");
        assert_eq!(guess_mime(Path::new("a/b/photo.jpeg")), "image/jpeg");
        assert_eq!(guess_mime(Path::new("voice.mp3")), "audio/mpeg");
        assert_eq!(guess_mime(Path::new("README")), "application/octet-stream");
    }

    #[test]
    fn test_read_file_uses_base_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.txt");
        std::fs::write(&path, b"hi").unwrap();

        let (bytes, name) = read_file(&path).unwrap();
        assert_eq!(bytes, b"hi");
        assert_eq!(name, "note.txt");
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_file(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
