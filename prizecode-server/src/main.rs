use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::time::timeout;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use prizecode_common::models::CodeStatus;
use prizecode_common::Error;
use prizecode_core::repositories::PostgresCodeRepository;
use prizecode_core::services::{CodeLedger, OutcomeSelector, default_prize_table};
use prizecode_core::Database;

#[derive(Parser, Debug, Clone)]
#[command(name = "prizecode")]
#[command(author, version, about = "Prizecode - single-use redemption codes with weighted prize draws")]
struct Args {
    /// Postgres connection URL. Falls back to DATABASE_URL.
    #[arg(long)]
    db_url: Option<String>,

    /// Per-operation timeout in seconds. An elapsed timeout commits nothing,
    /// so the same operation can simply be retried.
    #[arg(long, default_value = "30")]
    op_timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Create new unused codes (clamped to the batch maximum).
    Issue {
        #[arg(default_value = "1")]
        count: usize,
    },
    /// Check a code's status without claiming it (advisory only).
    Verify { value: String },
    /// Claim a code and draw its prize.
    Redeem { value: String },
    /// List codes, optionally filtered by status ("unused" or "used").
    List {
        #[arg(long)]
        status: Option<String>,
    },
}

fn init_tracing() {
    let filter = EnvFilter::from_default_env()
        .add_directive("prizecode=info".parse().unwrap_or_default());
    let sub = fmt().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(sub)
        .expect("Failed to set global subscriber");
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    init_tracing();

    let args = Args::parse();
    if let Err(e) = run(args).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Error> {
    let db_url = args
        .db_url
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .unwrap_or_else(|| "postgres://prizecode@localhost:5432/prizecode".to_string());

    let db = Database::new(&db_url).await?;
    db.migrate().await?;

    let repo = Arc::new(PostgresCodeRepository::new(db.pool().clone()));
    let selector = Arc::new(OutcomeSelector::new(default_prize_table())?);
    let ledger = CodeLedger::new(repo, selector);
    let op_timeout = Duration::from_secs(args.op_timeout_secs);

    match args.command {
        Command::Issue { count } => {
            let codes = timeout(op_timeout, ledger.issue(count)).await??;
            info!("issued {} code(s)", codes.len());
            println!("{}", serde_json::to_string_pretty(&codes)?);
        }
        Command::Verify { value } => {
            let code = timeout(op_timeout, ledger.verify(&value)).await??;
            println!("{}", serde_json::to_string_pretty(&code)?);
        }
        Command::Redeem { value } => {
            let outcome = timeout(op_timeout, ledger.redeem(&value)).await??;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        Command::List { status } => {
            let status = status
                .map(|s| s.parse::<CodeStatus>())
                .transpose()
                .map_err(Error::Parse)?;
            let codes = timeout(op_timeout, ledger.list_codes(status)).await??;
            println!("{}", serde_json::to_string_pretty(&codes)?);
        }
    }

    Ok(())
}
