//! CLI entry point for `ingo2zimbra`.

use std::io::Write;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};

use ingo2zimbra::config::Config;
use ingo2zimbra::convert::{self, ConvertOptions};
use ingo2zimbra::script::ScriptOptions;
use ingo2zimbra::source::{BlobSource, PreferenceSource, SqliteSource};

/// Read Horde / Ingo rules from the preferences database and write a script
/// which can be piped to Zimbra's zmprov command.
#[derive(Parser)]
#[command(name = "ingo2zimbra", version, args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Mailbox address whose rules are converted
    #[arg(value_name = "MAILBOX")]
    mailbox: Option<String>,

    #[command(flatten)]
    input: InputArgs,

    /// Suppress writing of exit statements
    #[arg(short = 'n', long)]
    no_exit: bool,

    /// Write warnings when skipping invalid or unwanted rules
    #[arg(short = 'D', long)]
    debug: bool,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

/// Where the stored rules come from.
#[derive(clap::Args, Clone)]
struct InputArgs {
    /// Read the serialized rules preference from a file ("-" for stdin)
    #[arg(long, value_name = "FILE", conflicts_with = "database")]
    blob: Option<PathBuf>,

    /// SQLite Horde preferences database
    #[arg(short = 'd', long, value_name = "PATH")]
    database: Option<PathBuf>,

    /// Preferences table name (default horde_prefs)
    #[arg(long, value_name = "NAME")]
    table: Option<String>,

    /// Look up preferences by the full address instead of its local part
    #[arg(long)]
    keep_domain: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the decoded rules of a mailbox as JSON
    Dump {
        mailbox: String,
        #[command(flatten)]
        input: InputArgs,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate a man page
    Manpage,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = ingo2zimbra::config::load_config();

    let log_level = match cli.verbose {
        0 => config.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    setup_logging(log_level, &config);

    match cli.command {
        Some(Commands::Dump { mailbox, input }) => cmd_dump(&mailbox, &input, &config),
        Some(Commands::Completions { shell }) => cmd_completions(shell),
        Some(Commands::Manpage) => cmd_manpage(),
        None => match cli.mailbox.as_deref() {
            Some(mailbox) => {
                let write_exit = config.output.write_exit && !cli.no_exit;
                let debug = config.output.debug || cli.debug;
                cmd_convert(mailbox, &cli.input, write_exit, debug, &config)
            }
            None => {
                Cli::command().print_help()?;
                anyhow::bail!("A mailbox is required");
            }
        },
    }
}

/// Set up tracing with stderr output and optional file logging.
fn setup_logging(level: &str, config: &Config) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let log_dir = ingo2zimbra::config::cache_dir(config);
    if std::fs::create_dir_all(&log_dir).is_ok() {
        let file_appender = tracing_appender::rolling::never(&log_dir, "ingo2zimbra.log");
        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(file_appender);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .with(file_layer)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
    }
}

/// Pick the preference source from flags, then config.
fn open_source(input: &InputArgs, config: &Config) -> anyhow::Result<Box<dyn PreferenceSource>> {
    if let Some(path) = &input.blob {
        return Ok(Box::new(BlobSource::new(path)));
    }

    let database = input
        .database
        .clone()
        .or_else(|| config.database.path.clone());
    let Some(database) = database else {
        anyhow::bail!("Either --database or --blob is required");
    };

    let table = input.table.as_deref().unwrap_or(&config.database.table);
    Ok(Box::new(SqliteSource::open(&database, table)?))
}

/// Convert one mailbox and write the script to stdout.
fn cmd_convert(
    mailbox: &str,
    input: &InputArgs,
    write_exit: bool,
    debug: bool,
    config: &Config,
) -> anyhow::Result<()> {
    let source = open_source(input, config)?;
    let options = ConvertOptions {
        script: ScriptOptions { write_exit },
        strip_domain: config.database.strip_domain && !input.keep_domain,
    };

    let conversion = convert::convert_mailbox(source.as_ref(), mailbox, &options)?;

    if debug {
        let mut stderr = std::io::stderr().lock();
        stderr.write_all(conversion.diagnostics.to_text().as_bytes())?;
    }

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(conversion.script.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

/// Print the decoded rule records as JSON.
fn cmd_dump(mailbox: &str, input: &InputArgs, config: &Config) -> anyhow::Result<()> {
    let source = open_source(input, config)?;
    let strip_domain = config.database.strip_domain && !input.keep_domain;
    let uid = convert::mailbox_uid(mailbox, strip_domain);

    let rules = match source.fetch_rules(uid)? {
        Some(stored) => convert::decode_rules(&stored)?,
        None => Vec::new(),
    };

    let output = serde_json::json!({
        "mailbox": mailbox,
        "uid": uid,
        "rule_count": rules.len(),
        "rules": rules,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Generate shell completions and print to stdout.
fn cmd_completions(shell: clap_complete::Shell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "ingo2zimbra", &mut std::io::stdout());
    Ok(())
}

/// Generate a man page and print to stdout.
fn cmd_manpage() -> anyhow::Result<()> {
    let cmd = Cli::command();
    let man = clap_mangen::Man::new(cmd);
    let mut buf = Vec::new();
    man.render(&mut buf)?;
    std::io::stdout().write_all(&buf)?;
    Ok(())
}
