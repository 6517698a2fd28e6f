// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod runtime;

use anyhow::{Context, Result, bail};
use config::Config;
use lista_app::CatalogBrowser;
use runtime::{DemoCatalog, HttpCatalog};
use std::env;
use std::path::PathBuf;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
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
            "load config {}; run `lista --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;

    let mut browser = CatalogBrowser::new(config.stale_policy());

    if options.demo {
        if options.check_only {
            return Ok(());
        }
        let mut source = DemoCatalog;
        return lista_tui::run_app(&mut browser, &mut source);
    }

    let endpoint = resolve_endpoint(options.url_override.as_deref(), &config, &options.config_path)?;
    let client = lista_fetch::Client::new(&endpoint, config.source_timeout()?).with_context(|| {
        format!(
            "invalid [source] config in {}; fix url/timeout values",
            options.config_path.display()
        )
    })?;
    if options.check_only {
        return Ok(());
    }

    let mut source = HttpCatalog::new(client);
    lista_tui::run_app(&mut browser, &mut source)
}

fn resolve_endpoint(
    url_override: Option<&str>,
    config: &Config,
    config_path: &std::path::Path,
) -> Result<String> {
    if let Some(url) = url_override {
        return Ok(url.to_owned());
    }
    if let Some(url) = config.source_url() {
        return Ok(url.to_owned());
    }
    bail!(
        "no catalog endpoint configured; set [source].url in {} or pass --url <endpoint>",
        config_path.display()
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    url_override: Option<String>,
    demo: bool,
    print_config_path: bool,
    print_example: bool,
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
        url_override: None,
        demo: false,
        print_config_path: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--url" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--url requires an endpoint"))?;
                options.url_override = Some(value.as_ref().to_owned());
            }
            "--demo" => {
                options.demo = true;
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow::anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("lista");
    println!("  --config <path>          Use a specific config path");
    println!("  --url <endpoint>         Fetch the catalog from this endpoint");
    println!("  --demo                   Browse a built-in offline catalog");
    println!("  --check                  Validate config and endpoint, then exit");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a config template");
    println!("  --help                   Show this help");
}
