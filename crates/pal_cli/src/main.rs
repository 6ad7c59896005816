use std::env;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser};
use pal_core::core_api::{DEFAULT_NAME_TABLE_PATH, Engine, Guild, NameTable};
use pal_core::save::SaveDocument;
use pal_render::{JsonStyle, TextStyle, render_console, unlisted_pal_count, write_json_report};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about, disable_version_flag = true)]
struct Cli {
    /// Save export in JSON form, optionally gzip-compressed.
    #[arg(value_name = "LEVEL.SAV.JSON")]
    filename: PathBuf,
    /// Report the guild with this exact name instead of the first guild.
    #[arg(short, long, conflicts_with = "all_guilds")]
    guild: Option<String>,
    /// Report every guild in the save.
    #[arg(long = "all-guilds")]
    all_guilds: bool,
    /// Also write the full report as JSON to this path.
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
    /// Suppress console output.
    #[arg(short, long)]
    quiet: bool,
    /// Creature code to display name dataset.
    #[arg(
        long,
        value_name = "PATH",
        env = "PAL_OWNERSHIP_NAMES",
        default_value = DEFAULT_NAME_TABLE_PATH
    )]
    names: PathBuf,
    /// Disable ANSI colors.
    #[arg(long = "no-color")]
    no_color: bool,
    /// Print version
    #[arg(
        short = 'v',
        long = "version",
        action = ArgAction::Version,
        value_parser = clap::value_parser!(bool)
    )]
    version: (),
}

impl Cli {
    fn text_style(&self) -> TextStyle {
        let colored =
            !self.no_color && env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal();
        if colored {
            TextStyle::Colored
        } else {
            TextStyle::Plain
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    if !cli.names.exists() {
        eprintln!("{} not found", cli.names.display());
        process::exit(1);
    }
    if !cli.filename.exists() {
        eprintln!("{} does not exist", cli.filename.display());
        process::exit(1);
    }

    let names = NameTable::load(&cli.names).unwrap_or_else(|e| {
        eprintln!("Error loading creature names: {}", cli.names.display());
        eprintln!("  {e}");
        process::exit(1);
    });
    let doc = SaveDocument::load(&cli.filename).unwrap_or_else(|e| {
        eprintln!("Error reading save export: {}", cli.filename.display());
        eprintln!("  {e}");
        process::exit(1);
    });
    info!(
        groups = doc.group_count(),
        bases = doc.base_count(),
        slots = doc.slot_count(),
        characters = doc.character_count(),
        "loaded save export"
    );

    let engine = Engine::new(names);
    let guilds: Vec<Guild> = if cli.all_guilds {
        engine.resolve_all_guilds(&doc)
    } else {
        engine
            .resolve_guild(&doc, cli.guild.as_deref())
            .map(|guild| vec![guild])
    }
    .unwrap_or_else(|e| {
        eprintln!("Error resolving guild ownership: {e}");
        process::exit(1);
    });

    if let Some(output) = &cli.output {
        write_json_report(&guilds, output, JsonStyle::Pretty).unwrap_or_else(|e| {
            eprintln!("Error writing report: {e}");
            process::exit(1);
        });
        info!(path = %output.display(), guilds = guilds.len(), "wrote JSON report");
    }

    if cli.quiet {
        return;
    }
    let style = cli.text_style();
    for guild in &guilds {
        print!("{}", render_console(guild, style));
        let unlisted = unlisted_pal_count(guild);
        if unlisted > 0 {
            warn!(
                guild = %guild.name,
                unlisted,
                total = guild.pal_count(),
                "pals owned by players outside the guild are not listed"
            );
        }
    }
}
