//! `cpm` - check content packs against the format migrations

use std::process::ExitCode;

use clap::{Arg, ArgAction, ArgMatches, Command};
use tracing_subscriber::EnvFilter;

mod commands;

fn cli() -> Command {
    Command::new("cpm")
        .version(cpm_migrations::VERSION)
        .about("Content pack format validator")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .global(true)
                .help("Log filter (overrides RUST_LOG), e.g. debug or cpm_migrations=trace"),
        )
        .subcommand(
            Command::new("check")
                .about("Validate a content pack against its declared format")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_name("FILE")
                        .help("content.json or content.yaml to check"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_name("TOML")
                        .help("Validator settings file"),
                ),
        )
        .subcommand(
            Command::new("versions").about("List known format versions and what they introduce"),
        )
}

fn init_tracing(matches: &ArgMatches) {
    // Global values are visible from the subcommand wherever they were given
    let level = matches
        .subcommand()
        .map_or(matches, |(_, args)| args)
        .get_one::<String>("log-level");

    let filter = level
        .and_then(|level| EnvFilter::try_new(level).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let matches = cli().get_matches();
    init_tracing(&matches);

    let result = match matches.subcommand() {
        Some(("check", args)) => commands::check(args),
        Some(("versions", _)) => commands::versions(),
        _ => Ok(ExitCode::SUCCESS),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        cli().debug_assert();
    }

    #[test]
    fn parses_check_arguments() {
        let matches = cli()
            .try_get_matches_from(["cpm", "--log-level", "debug", "check", "content.json", "--json"])
            .unwrap();
        assert_eq!(
            matches.get_one::<String>("log-level").map(String::as_str),
            Some("debug")
        );

        let (name, args) = matches.subcommand().unwrap();
        assert_eq!(name, "check");
        assert_eq!(
            args.get_one::<String>("file").map(String::as_str),
            Some("content.json")
        );
        assert!(args.get_flag("json"));
        assert!(args.get_one::<String>("config").is_none());
    }

    #[test]
    fn check_requires_file() {
        assert!(cli().try_get_matches_from(["cpm", "check"]).is_err());
    }
}
