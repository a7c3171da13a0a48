use anyhow::Context;
use clap::{Arg, ArgAction, ArgMatches, Command};
use grafana_builder::decoder::{self, Document};
use ringlog::*;
use serde_json::json;
use std::path::{Path, PathBuf};

mod config;

pub use config::Config;

/// Options shared by every subcommand.
pub struct Options {
    pub input: PathBuf,
    pub config: Option<PathBuf>,
    pub verbose: u8,
}

impl TryFrom<&ArgMatches> for Options {
    type Error = String;

    fn try_from(args: &ArgMatches) -> Result<Self, String> {
        Ok(Options {
            input: args
                .get_one::<PathBuf>("INPUT")
                .cloned()
                .ok_or("missing input file")?,
            config: args.get_one::<PathBuf>("CONFIG").cloned(),
            verbose: args.get_count("VERBOSE"),
        })
    }
}

fn input_arg() -> Arg {
    Arg::new("INPUT")
        .long("input")
        .short('i')
        .help("YAML document describing the dashboard")
        .value_parser(clap::value_parser!(PathBuf))
        .required(true)
}

pub fn command() -> Command {
    Command::new(env!("CARGO_BIN_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .subcommand_required(true)
        .arg(
            Arg::new("CONFIG")
                .long("config")
                .short('c')
                .help("TOML configuration file")
                .value_parser(clap::value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            Arg::new("VERBOSE")
                .long("verbose")
                .short('v')
                .help("Increase verbosity")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(
            Command::new("render")
                .about("Decode a YAML document and print the Grafana JSON")
                .arg(input_arg()),
        )
        .subcommand(
            Command::new("validate")
                .about("Decode a YAML document and report the first error")
                .arg(input_arg()),
        )
}

/// Runs the selected subcommand. Output goes to stdout, logs to stderr.
pub fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    let (name, args) = matches
        .subcommand()
        .ok_or_else(|| anyhow::anyhow!("missing subcommand"))?;
    let options = Options::try_from(args).map_err(|e| anyhow::anyhow!(e))?;

    let config = match &options.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let mut log = init_logging(&config, options.verbose)?;

    let result = match name {
        "render" => render(&options.input, &config).map(|output| println!("{}", output)),
        "validate" => validate(&options.input, &config).map(|_| println!("ok")),
        other => Err(anyhow::anyhow!("unknown subcommand '{}'", other)),
    };

    if let Err(e) = log.flush() {
        eprintln!("failed to flush log: {}", e);
    }
    result
}

fn init_logging(config: &Config, verbose: u8) -> anyhow::Result<Box<dyn Drain>> {
    let mut level = config.log().level()?;
    for _ in 0..verbose {
        level = match level {
            Level::Error => Level::Warn,
            Level::Warn => Level::Info,
            Level::Info => Level::Debug,
            _ => Level::Trace,
        };
    }

    let debug_output: Box<dyn Output> = Box::new(Stderr::new());
    let debug_log = LogBuilder::new()
        .output(debug_output)
        .build()
        .map_err(|e| anyhow::anyhow!("failed to initialize debug log: {:?}", e))?;

    Ok(MultiLogBuilder::new()
        .level_filter(level.to_level_filter())
        .default(debug_log)
        .build()
        .start())
}

fn load(input: &Path, config: &Config) -> anyhow::Result<Document> {
    let source = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let document = decoder::decode_with(&source, &config.decoder_options())
        .with_context(|| format!("failed to decode {}", input.display()))?;
    info!("decoded {}", input.display());
    Ok(document)
}

/// The dashboard JSON, wrapped with the alertmanager configuration when the
/// document has one.
pub fn render(input: &Path, config: &Config) -> anyhow::Result<String> {
    let document = load(input, config)?;

    let value = match &document.alertmanager {
        Some(alertmanager) => json!({
            "dashboard": document.dashboard.board(),
            "alertmanager": alertmanager.config(),
        }),
        None => serde_json::to_value(document.dashboard.board())?,
    };

    let output = if config.render().pretty() {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    Ok(output)
}

pub fn validate(input: &Path, config: &Config) -> anyhow::Result<()> {
    load(input, config).map(|_| ())
}
