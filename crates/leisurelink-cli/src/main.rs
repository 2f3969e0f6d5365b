//! `leisurelink-seed`: fill a database with synthetic LeisureLink fixtures.
//!
//! Reads `seed.toml` (or the path given with `--config`), then
//! `LEISURELINK_*` environment variables, then command-line flags, each
//! overriding the last.
//!
//! ```
//! leisurelink-seed --database fixtures.db --users 50 --events 200 --seed 7
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;
use leisurelink_seed::{
  GenContext, Orchestrator, RunReport, SeedConfig, hash::Argon2Hasher,
};
use leisurelink_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

const DEFAULT_DATABASE: &str = "leisurelink.db";

// ─── CLI args ────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(author, version, about = "LeisureLink fixture generator")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "seed.toml")]
  config: PathBuf,

  /// SQLite database to write to. Created if missing.
  #[arg(short, long)]
  database: Option<PathBuf>,

  /// RNG seed for a reproducible dataset.
  #[arg(long)]
  seed: Option<u64>,

  #[arg(long)]
  users: Option<usize>,

  #[arg(long)]
  events: Option<usize>,

  #[arg(long)]
  comments: Option<usize>,

  /// Skip generating and linking comments.
  #[arg(long)]
  no_comments: bool,

  /// Print the run report as JSON instead of a summary.
  #[arg(long)]
  json: bool,
}

impl Cli {
  /// `--database`, else the `database` setting, else `leisurelink.db`.
  fn database_path(&self, settings: &config::Config) -> PathBuf {
    let path = match &self.database {
      Some(path) => path.clone(),
      None => settings
        .get::<PathBuf>("database")
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATABASE)),
    };
    expand_tilde(&path)
  }

  fn apply(&self, cfg: &mut SeedConfig) {
    if let Some(seed) = self.seed {
      cfg.seed = Some(seed);
    }
    if let Some(users) = self.users {
      cfg.users = users;
    }
    if let Some(events) = self.events {
      cfg.events = events;
    }
    if let Some(comments) = self.comments {
      cfg.comments = comments;
    }
    if self.no_comments {
      cfg.generate_comments = false;
      cfg.link_comments = false;
    }
  }
}

// ─── Entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config.clone()).required(false))
    .add_source(config::Environment::with_prefix("LEISURELINK").try_parsing(true))
    .build()
    .context("failed to read config file")?;

  let database = cli.database_path(&settings);

  let mut seed_cfg: SeedConfig = settings
    .try_deserialize()
    .context("failed to deserialise SeedConfig")?;
  cli.apply(&mut seed_cfg);
  seed_cfg.event_image_dir = seed_cfg.event_image_dir.as_deref().map(expand_tilde);
  seed_cfg.user_photo_dir = seed_cfg.user_photo_dir.as_deref().map(expand_tilde);

  let store = SqliteStore::open(&database)
    .await
    .with_context(|| format!("failed to open store at {database:?}"))?;

  let hasher = Argon2Hasher::new(seed_cfg.hash_memory_kib, seed_cfg.hash_cost)
    .context("invalid password hashing parameters")?;
  let ctx = GenContext::from_seed(seed_cfg.seed);

  tracing::info!(database = %database.display(), "seeding");
  let orchestrator = Orchestrator::new(&store, hasher, ctx, seed_cfg)
    .context("invalid seed configuration")?;

  match orchestrator.run().await {
    Ok(report) => print_report(&report, cli.json),
    Err(failure) => {
      tracing::error!(phase = %failure.phase, "run aborted; earlier phases were kept");
      print_report(&failure.report, cli.json)?;
      Err(failure).context("generation run failed")
    }
  }
}

fn print_report(report: &RunReport, json: bool) -> anyhow::Result<()> {
  if json {
    println!("{}", serde_json::to_string_pretty(report)?);
    return Ok(());
  }

  for p in &report.phases {
    match &p.skipped {
      Some(reason) => println!("{:<22} skipped ({reason})", p.phase),
      None => println!(
        "{:<22} {:>6}/{:<6} rows {}",
        p.phase, p.tally.succeeded, p.tally.attempted, p.tally.rows
      ),
    }
  }
  let totals = report.totals();
  println!(
    "{:<22} {:>6}/{:<6} rows {}",
    "TOTAL", totals.succeeded, totals.attempted, totals.rows
  );
  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
