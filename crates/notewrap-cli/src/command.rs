//! Command-line parsing.

use std::path::PathBuf;

use anyhow::{Result, bail};

pub const USAGE: &str = "\
Usage:
  notewrap encode <note.json> [out.eml]   Wrap a JSON note in a MIME message
  notewrap decode <in.eml> [note.json]    Recover a JSON note from a message
  notewrap text <in.eml>                  Print the note text as plain text";

/// A parsed invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// JSON note to MIME message.
    Encode {
        input: PathBuf,
        output: Option<PathBuf>,
    },
    /// MIME message to JSON note.
    Decode {
        input: PathBuf,
        output: Option<PathBuf>,
    },
    /// MIME message to plain text.
    Text { input: PathBuf },
    Help,
}

impl Command {
    /// Parses arguments, excluding the program name.
    pub fn parse<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let Some(name) = args.next() else {
            return Ok(Self::Help);
        };

        let rest: Vec<String> = args.collect();
        let (input, output) = match rest.as_slice() {
            [input] => (PathBuf::from(input), None),
            [input, output] => (PathBuf::from(input), Some(PathBuf::from(output))),
            _ if matches!(name.as_str(), "help" | "-h" | "--help") => return Ok(Self::Help),
            _ => bail!("wrong number of arguments for '{name}'\n\n{USAGE}"),
        };

        match name.as_str() {
            "encode" => Ok(Self::Encode { input, output }),
            "decode" => Ok(Self::Decode { input, output }),
            "text" if output.is_none() => Ok(Self::Text { input }),
            "text" => bail!("'text' takes a single file\n\n{USAGE}"),
            _ => bail!("unknown command '{name}'\n\n{USAGE}"),
        }
    }
}
