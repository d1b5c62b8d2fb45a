//! `thicket`: render and check widget templates from the command line

mod cli;

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use thicket::widget::{widget_registry, WidgetRenderer};
use thicket::{cache, EvalContext, Value};

use cli::{Cli, Command};

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.default_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    cache::global().set_capacity(cli.cache_capacity);
    let context = EvalContext::with_max_depth(cli.max_depth).traced(cli.trace);

    match cli.command {
        Command::Render {
            template,
            data,
            strict,
            pretty,
        } => {
            let source = read_template(&template)?;
            let data = match data {
                Some(path) => read_data(&path)?,
                None => Value::object(Default::default()),
            };
            let widget = WidgetRenderer::new().with_context(context);

            let tree = if strict {
                widget.try_render(&source, &data)?
            } else {
                widget.render(&source, &data)
            };

            let output = if pretty {
                serde_json::to_string_pretty(&tree)?
            } else {
                serde_json::to_string(&tree)?
            };
            println!("{}", output);
            Ok(ExitCode::SUCCESS)
        }

        Command::Check { template } => {
            let source = read_template(&template)?;
            match thicket::parse(source.trim()) {
                Ok(_) => {
                    info!(path = %template.display(), "template parsed");
                    println!("{}: ok", template.display());
                    Ok(ExitCode::SUCCESS)
                }
                Err(err) => {
                    println!("{}: {}", template.display(), err);
                    Ok(ExitCode::FAILURE)
                }
            }
        }

        Command::Components => {
            let registry = widget_registry();
            for tag in registry.tags() {
                if registry.is_leaf(tag) {
                    println!("{} (leaf)", tag);
                } else {
                    println!("{}", tag);
                }
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn read_template(path: &Path) -> Result<String> {
    debug!(path = %path.display(), "reading template");
    fs::read_to_string(path).with_context(|| format!("reading template {}", path.display()))
}

fn read_data(path: &Path) -> Result<Value> {
    debug!(path = %path.display(), "reading data");
    let text =
        fs::read_to_string(path).with_context(|| format!("reading data {}", path.display()))?;
    let json: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("parsing data {} as JSON", path.display()))?;
    Ok(Value::from(json))
}
