//! slotdb CLI
//!
//! Command-line interface for a single database file.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use slotdb::config::{DEFAULT_MAX_DATA, DEFAULT_MAX_ROWS};
use slotdb::{Command, Config, FieldPolicy, Reply, RowId, Session, SlotDbError};
use thiserror::Error;
use tracing_subscriber::{fmt, EnvFilter};

/// Errors reported by the CLI
#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Db(#[from] SlotDbError),

    #[error("Row {0} is not set")]
    NotSet(RowId),
}

/// slotdb CLI
#[derive(Parser, Debug)]
#[command(name = "slotdb")]
#[command(about = "Fixed-capacity record store in a single file")]
#[command(version)]
struct Args {
    /// Database file
    db: PathBuf,

    /// Truncate oversized name/email fields instead of rejecting them
    #[arg(long)]
    truncate: bool,

    /// Skip fsync after each save
    #[arg(long)]
    no_sync: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create (or truncate) the database file
    #[command(alias = "c")]
    Create {
        /// Maximum bytes per field, terminator included (default 512)
        #[arg(requires = "max_rows", allow_hyphen_values = true)]
        max_data: Option<i32>,

        /// Number of slots (default 100)
        #[arg(allow_hyphen_values = true)]
        max_rows: Option<i32>,
    },

    /// Print one record
    #[command(alias = "g")]
    Get {
        #[arg(allow_hyphen_values = true)]
        id: RowId,
    },

    /// Store a record in an empty slot
    #[command(alias = "s")]
    Set {
        #[arg(allow_hyphen_values = true)]
        id: RowId,
        name: String,
        email: String,
    },

    /// Empty a slot
    #[command(aliases = ["d", "del"])]
    Delete {
        #[arg(allow_hyphen_values = true)]
        id: RowId,
    },

    /// Print every record
    #[command(alias = "l")]
    List,
}

fn main() {
    // Logs go to stderr so listings on stdout stay clean
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("ERROR: {}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let policy = if args.truncate {
        FieldPolicy::Truncate
    } else {
        FieldPolicy::Reject
    };

    let builder = Config::builder()
        .field_policy(policy)
        .sync_on_save(!args.no_sync);

    let command = match args.command {
        Commands::Create { max_data, max_rows } => {
            let config = builder
                .max_data(max_data.unwrap_or(DEFAULT_MAX_DATA))
                .max_rows(max_rows.unwrap_or(DEFAULT_MAX_ROWS))
                .build();
            return Ok(Session::create(&args.db, config)?.close()?);
        }
        Commands::Get { id } => Command::Get { id },
        Commands::Set { id, name, email } => Command::Set { id, name, email },
        Commands::Delete { id } => Command::Delete { id },
        Commands::List => Command::List,
    };

    let mut session = Session::open(&args.db, builder.build())?;

    let id = match command {
        Command::Get { id } => Some(id),
        _ => None,
    };

    match session.execute(command)? {
        Reply::Done => {}
        Reply::Record(Some(record)) => println!("{}", record),
        Reply::Record(None) => {
            session.close()?;
            return Err(CliError::NotSet(id.unwrap_or_default()));
        }
        Reply::Records(records) => {
            for record in records {
                println!("{}", record);
            }
        }
    }

    Ok(session.close()?)
}
