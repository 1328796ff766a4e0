//! notewrap - convert notes between JSON and MIME messages.

mod command;
mod settings;

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use notewrap::{Note, NoteCodec};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use command::{Command, USAGE};

fn main() -> Result<()> {
    // Logs go to stderr so they never mix with converted output.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "notewrap=info,notewrap_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let command = Command::parse(std::env::args().skip(1))?;
    if command == Command::Help {
        println!("{USAGE}");
        return Ok(());
    }

    let codec = NoteCodec::new(settings::load_settings()?);
    run(&codec, command)
}

fn run(codec: &NoteCodec, command: Command) -> Result<()> {
    match command {
        Command::Encode { input, output } => {
            let json = std::fs::read_to_string(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let note: Note = serde_json::from_str(&json)
                .with_context(|| format!("{} is not a valid note", input.display()))?;
            let raw = codec
                .serialize_to_bytes(&note)
                .context("Failed to serialize note")?;
            write_output(output.as_deref(), &raw)?;
            info!(title = %note.title, "Encoded note");
        }
        Command::Decode { input, output } => {
            let note = read_note(codec, &input)?;
            let json = serde_json::to_string_pretty(&note)?;
            write_output(output.as_deref(), json.as_bytes())?;
            info!(uid = %note.uid, "Decoded note");
        }
        Command::Text { input } => {
            let note = read_note(codec, &input)?;
            write_output(None, note.to_plain_text().as_bytes())?;
        }
        Command::Help => println!("{USAGE}"),
    }
    Ok(())
}

fn read_note(codec: &NoteCodec, path: &Path) -> Result<Note> {
    let raw = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    codec
        .parse_bytes(raw)
        .with_context(|| format!("Failed to parse note from {}", path.display()))
}

fn write_output(path: Option<&Path>, contents: &[u8]) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, contents)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(contents)?;
            if !contents.ends_with(b"\n") {
                stdout.write_all(b"\n")?;
            }
            Ok(())
        }
    }
}
