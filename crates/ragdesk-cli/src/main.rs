// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod runtime;

use anyhow::{Context, Result, anyhow};
use config::Config;
use ragdesk_app::{Action, GroqKeyBackend, SelectionStore};
use runtime::{ApiRuntime, Session};
use std::env;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() {
    init_logging();
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

// RAGDESK_LOG takes an EnvFilter directive (for example `debug` or
// `ragdesk_app=debug`); logs go to stderr so script output stays clean.
fn init_logging() {
    let filter = EnvFilter::try_from_env("RAGDESK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `ragdesk --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;

    let client = ragdesk_api::Client::new(config.api_base_url(), config.api_timeout()?)
        .with_context(|| {
            format!(
                "invalid [api] config in {}; fix base_url/timeout values",
                options.config_path.display()
            )
        })?;
    tracing::info!(base_url = client.base_url(), "backend client ready");
    if options.check_only {
        return Ok(());
    }

    if options.list_collections {
        for name in client.list_collections()? {
            println!("{name}");
        }
        return Ok(());
    }

    let store = SelectionStore::with_defaults(config.selection_defaults());
    let mut session = Session::new(store, ApiRuntime::new(&client));

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match &options.script_path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("open action script {}", path.display()))?;
            run_script(&mut session, BufReader::new(file), &mut out)?;
        }
        None => run_script(&mut session, io::stdin().lock(), &mut out)?,
    }
    Ok(())
}

/// Applies one action per line, echoing each report line, then prints the
/// final state as pretty JSON.
fn run_script<B, R, W>(session: &mut Session<B>, input: R, out: &mut W) -> Result<()>
where
    B: GroqKeyBackend,
    R: BufRead,
    W: Write,
{
    for (index, line) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = line.with_context(|| format!("read action script line {line_no}"))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let action =
            Action::parse_line(trimmed).with_context(|| format!("action script line {line_no}"))?;
        let name = trimmed.split_whitespace().next().unwrap_or_default();
        tracing::debug!(line = line_no, action = name, "applying action");
        for report in session.apply(action)? {
            writeln!(out, "{report}").context("write report")?;
        }
    }

    let snapshot =
        serde_json::to_string_pretty(&session.store.snapshot()).context("encode final state")?;
    writeln!(out, "{snapshot}").context("write final state")?;
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    script_path: Option<PathBuf>,
    print_config_path: bool,
    print_example: bool,
    list_collections: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        script_path: None,
        print_config_path: false,
        print_example: false,
        list_collections: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--script" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--script requires a file path"))?;
                options.script_path = Some(PathBuf::from(value.as_ref()));
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--list-collections" => {
                options.list_collections = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("ragdesk");
    println!("  --config <path>          Use a specific config path");
    println!("  --script <path>          Read actions from a file instead of stdin");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a config template");
    println!("  --list-collections       Print the collections the backend knows");
    println!("  --check                  Validate config and backend client settings");
    println!("  --help                   Show this help");
    println!();
    println!("Actions are read one per line as `<name> [json payload]`, for example:");
    println!("  updateSelectedCollections [\"manuals\", \"faq\"]");
    println!("  updateModelSelection {{\"source\": \"Ollama\", \"model\": \"llama3.2:3b\"}}");
    println!("  setGroqApiKey \"gsk-...\"");
}

#[cfg(test)]
mod tests {
    use super::{CliOptions, parse_cli_args, run_script};
    use crate::runtime::Session;
    use anyhow::Result;
    use ragdesk_app::SelectionStore;
    use ragdesk_testkit::ScriptedBackend;
    use std::path::PathBuf;

    fn default_options_path() -> PathBuf {
        PathBuf::from("/tmp/ragdesk-config.toml")
    }

    #[test]
    fn parse_cli_args_defaults_to_provided_config_path() -> Result<()> {
        let options = parse_cli_args(Vec::<String>::new(), default_options_path())?;
        assert_eq!(
            options,
            CliOptions {
                config_path: default_options_path(),
                script_path: None,
                print_config_path: false,
                print_example: false,
                list_collections: false,
                check_only: false,
                show_help: false,
            }
        );
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_config_and_script_paths() -> Result<()> {
        let options = parse_cli_args(
            vec!["--config", "/custom/config.toml", "--script", "actions.txt"],
            default_options_path(),
        )?;
        assert_eq!(options.config_path, PathBuf::from("/custom/config.toml"));
        assert_eq!(options.script_path, Some(PathBuf::from("actions.txt")));
        Ok(())
    }

    #[test]
    fn parse_cli_args_errors_for_missing_values() {
        let error = parse_cli_args(vec!["--config"], default_options_path())
            .expect_err("missing config value should fail");
        assert!(error.to_string().contains("--config requires a file path"));

        let error = parse_cli_args(vec!["--script"], default_options_path())
            .expect_err("missing script value should fail");
        assert!(error.to_string().contains("--script requires a file path"));
    }

    #[test]
    fn parse_cli_args_errors_for_unknown_argument() {
        let error = parse_cli_args(vec!["--wat"], default_options_path())
            .expect_err("unknown arg should fail");
        let message = error.to_string();
        assert!(message.contains("unknown argument"));
        assert!(message.contains("--help"));
    }

    #[test]
    fn parse_cli_args_sets_flags() -> Result<()> {
        let options = parse_cli_args(
            vec![
                "--print-config-path",
                "--print-example-config",
                "--list-collections",
                "--check",
                "-h",
            ],
            default_options_path(),
        )?;
        assert!(options.print_config_path);
        assert!(options.print_example);
        assert!(options.list_collections);
        assert!(options.check_only);
        assert!(options.show_help);
        Ok(())
    }

    #[test]
    fn run_script_applies_actions_and_prints_final_state() -> Result<()> {
        let backend = ScriptedBackend::accepting();
        let mut session = Session::new(SelectionStore::default(), &backend);
        let script = concat!(
            "# pick a model\n",
            "updateModelSelection {\"source\":\"Groq\",\"model\":\"X\"}\n",
            "\n",
            "updateSelectedCollections [\"a\",\"b\"]\n",
            "setGroqApiKey \"gsk-1\"\n",
        );

        let mut out = Vec::new();
        run_script(&mut session, script.as_bytes(), &mut out)?;
        let printed = String::from_utf8(out)?;

        assert!(printed.starts_with("llm source: Groq\nllm model: X\n"));
        assert!(printed.contains("current collection: a\n"));
        assert!(printed.contains("groq api key: ok (Groq API key set successfully)\n"));
        assert!(printed.contains("\"has_groq_api_key\": true"));
        assert_eq!(session.store.groq_api_key(), Some("gsk-1"));
        Ok(())
    }

    #[test]
    fn run_script_reports_failing_line_number() {
        let mut session = Session::new(SelectionStore::default(), ScriptedBackend::default());
        let script = "updateSelectedMode \"RAG\"\nupdateSelectedCollections [1]\n";

        let mut out = Vec::new();
        let error = run_script(&mut session, script.as_bytes(), &mut out)
            .expect_err("numeric collection should fail");
        assert!(error.to_string().contains("action script line 2"));
        assert_eq!(session.store.selected_mode().as_str(), "RAG");
    }
}
