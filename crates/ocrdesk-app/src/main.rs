// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// OCR desk: extract text from images.
//
// Entry point. Initialises logging and settings, then dispatches the
// requested command.

mod cli;
mod commands;
mod services;

use std::process::ExitCode;

use clap::Parser;
use ocrdesk_core::human_errors::humanize_error;

use cli::{Cli, Command};
use commands::ExtractOptions;
use services::app_services::AppServices;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!(command = ?cli.command, "OCR desk starting");

    let mut svc = AppServices::init();
    let outcome = match cli.command {
        Command::Extract {
            file,
            lang,
            copy,
            txt,
            json,
            out_dir,
        } => {
            let opts = ExtractOptions {
                file,
                lang,
                copy,
                txt,
                json,
                out_dir,
            };
            commands::extract(&svc, opts).await
        }
        Command::Languages => commands::languages(&svc).await,
        Command::Config { reset } => commands::config(&mut svc, reset),
    };

    match outcome {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            commands::report(&humanize_error(&err));
            ExitCode::FAILURE
        }
    }
}
