use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::ArgMatches;
use serde_json::json;

use cpm_format::ContentConfig;
use cpm_migrations::{MigrationRegistry, PackValidator, PackValidatorConfig};

/// `cpm check`: 0 when the pack is valid, 1 when a migration rejects it
pub(crate) fn check(args: &ArgMatches) -> Result<ExitCode> {
    let file = args
        .get_one::<String>("file")
        .context("missing FILE argument")?;
    let config = match args.get_one::<String>("config") {
        Some(path) => load_config(Path::new(path))?,
        None => PackValidatorConfig::default(),
    };

    let document = ContentConfig::from_path(Path::new(file))
        .with_context(|| format!("failed to load {file}"))?;
    let chain = MigrationRegistry::standard().chain()?;
    let validator = PackValidator::new(chain, config);

    tracing::debug!("Checking {} (format {})", file, document.format);

    let result = validator.validate(&document);
    let code = if result.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    };

    if args.get_flag("json") {
        let output = match &result {
            Ok(report) => json!({ "file": file, "ok": true, "report": report }),
            Err(err) => json!({ "file": file, "ok": false, "error": err.to_string() }),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(code);
    }

    match result {
        Ok(report) => {
            let applied: Vec<String> = report
                .migrations_applied
                .iter()
                .map(ToString::to_string)
                .collect();
            println!("{file}: OK");
            println!("  Format: {}", report.format);
            println!("  Patches: {}", report.patches);
            println!("  Tokens checked: {}", report.tokens_checked);
            if applied.is_empty() {
                println!("  Migrations applied: none");
            } else {
                println!("  Migrations applied: {}", applied.join(", "));
            }
        }
        Err(err) => {
            println!("{file}: FAILED");
            println!("  {err}");
        }
    }

    Ok(code)
}

/// `cpm versions`
pub(crate) fn versions() -> Result<ExitCode> {
    let chain = MigrationRegistry::standard().chain()?;

    println!("Latest format: {}", chain.max_version());
    for migration in chain.iter() {
        println!("  {}  {}", migration.version(), migration.introduces());
    }

    Ok(ExitCode::SUCCESS)
}

fn load_config(path: &Path) -> Result<PackValidatorConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("invalid config {}", path.display()))
}
