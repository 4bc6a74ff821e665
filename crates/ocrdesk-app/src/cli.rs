// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line surface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "ocrdesk", author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Extract text from an image and print it
    Extract {
        /// Image file (PNG, JPEG, BMP, GIF, TIFF, WebP)
        file: PathBuf,
        /// Recognition language code, e.g. `eng`, `deu`, `chi_sim`
        #[arg(short, long)]
        lang: Option<String>,
        /// Copy the text to the clipboard
        #[arg(short, long)]
        copy: bool,
        /// Save the text as a .txt file
        #[arg(long)]
        txt: bool,
        /// Save the full result as a .json file
        #[arg(long)]
        json: bool,
        /// Directory for saved files
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    },
    /// List the languages offered for recognition
    Languages,
    /// Show the settings file, or reset it to defaults
    Config {
        /// Overwrite the settings with defaults
        #[arg(long)]
        reset: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_flags_parse() {
        let cli = Cli::try_parse_from([
            "ocrdesk", "extract", "scan.png", "-l", "deu", "--copy", "--json", "-o", "/tmp",
        ])
        .unwrap();
        match cli.command {
            Command::Extract {
                file,
                lang,
                copy,
                txt,
                json,
                out_dir,
            } => {
                assert_eq!(file, PathBuf::from("scan.png"));
                assert_eq!(lang.as_deref(), Some("deu"));
                assert!(copy && json && !txt);
                assert_eq!(out_dir, Some(PathBuf::from("/tmp")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn extract_requires_a_file() {
        assert!(Cli::try_parse_from(["ocrdesk", "extract"]).is_err());
    }
}
