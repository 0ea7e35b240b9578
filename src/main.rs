// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mindweave CLI entrypoint.
//!
//! Replays an action script against a headless document and prints the resulting
//! snapshot as JSON. Logs go to stderr, filtered by `MINDWEAVE_LOG` (default `info`).

use std::error::Error;
use std::path::PathBuf;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const LOG_ENV: &str = "MINDWEAVE_LOG";

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [--config <file>] <script.json>\n\n--config loads engine settings from a JSON file; missing keys keep their defaults.\n`file://` asset urls in the script resolve relative to the script's directory.\n\nSet {LOG_ENV} (e.g. `debug`, `mindweave=trace`) to adjust logging."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    config: Option<PathBuf>,
    script: Option<PathBuf>,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                if options.config.is_some() {
                    return Err(());
                }
                let path = args.next().ok_or(())?;
                options.config = Some(PathBuf::from(path));
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.script.is_some() {
                    return Err(());
                }
                options.script = Some(PathBuf::from(arg));
            }
        }
    }

    if options.script.is_none() {
        return Err(());
    }
    Ok(options)
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr).without_time())
        .init();
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "mindweave".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };
        init_tracing();

        let config = match &options.config {
            Some(path) => mindweave::config::EngineConfig::load(path)?,
            None => mindweave::config::EngineConfig::default(),
        };
        let script_path = options.script.unwrap_or_default();
        let script = mindweave::script::Script::load(&script_path)?;
        let asset_dir = script_path.parent().map(PathBuf::from);

        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
        let summary = runtime.block_on(mindweave::script::replay(&script, config, asset_dir))?;

        println!("{}", serde_json::to_string_pretty(&summary)?);
        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("mindweave: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{parse_options, CliOptions};

    #[test]
    fn parses_script_path() {
        let options = parse_options(["run.json".to_owned()].into_iter()).expect("parse options");
        assert_eq!(options, CliOptions { config: None, script: Some(PathBuf::from("run.json")) });
    }

    #[test]
    fn parses_config_in_any_position() {
        let options = parse_options(
            ["run.json".to_owned(), "--config".to_owned(), "engine.json".to_owned()].into_iter(),
        )
        .expect("parse options");
        assert_eq!(options.config.as_deref(), Some(std::path::Path::new("engine.json")));
        assert_eq!(options.script.as_deref(), Some(std::path::Path::new("run.json")));
    }

    #[test]
    fn requires_a_script() {
        parse_options(std::iter::empty()).unwrap_err();
        parse_options(["--config".to_owned(), "engine.json".to_owned()].into_iter()).unwrap_err();
    }

    #[test]
    fn rejects_unknown_and_duplicate_args() {
        parse_options(["--nope".to_owned(), "run.json".to_owned()].into_iter()).unwrap_err();
        parse_options(["a.json".to_owned(), "b.json".to_owned()].into_iter()).unwrap_err();
        parse_options(
            ["--config".to_owned(), "x".to_owned(), "--config".to_owned(), "y".to_owned(), "s".to_owned()]
                .into_iter(),
        )
        .unwrap_err();
    }

    #[test]
    fn rejects_missing_config_value() {
        parse_options(["run.json".to_owned(), "--config".to_owned()].into_iter()).unwrap_err();
    }
}
