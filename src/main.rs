//! pharos-profiler - run a few statements through the profiled database layers
//! and watch the `SqlLogger` output.

use clap::Parser;
use sqlx::Row;
use std::path::PathBuf;

use pharos_profiler::db::postgres;
use pharos_profiler::{
    init_logging, Command, ProfiledConnection, ProfilerSettings, Result, TraceDbProfiler,
};

#[derive(Parser)]
#[command(name = "pharos-profiler")]
#[command(about = "Log SQL statements and their parameters as they execute")]
struct Cli {
    /// Path to a JSON settings file
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// SQLite database file (defaults to an in-memory database)
    #[arg(long)]
    sqlite: Option<PathBuf>,

    /// Also run the statements against this PostgreSQL URL
    #[arg(long)]
    postgres: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = match &cli.settings {
        Some(path) => ProfilerSettings::load(path)?,
        None => ProfilerSettings::default(),
    };
    init_logging(&settings)?;

    run_sqlite(&cli, &settings)?;

    if let Some(url) = &cli.postgres {
        if let Err(e) = run_postgres(url, &settings).await {
            log::warn!("PostgreSQL run failed: {}", e);
        }
    }

    Ok(())
}

fn run_sqlite(cli: &Cli, settings: &ProfilerSettings) -> Result<()> {
    let profiler = TraceDbProfiler::new(settings);
    let mut conn = match &cli.sqlite {
        Some(path) => ProfiledConnection::open(path, profiler)?,
        None => ProfiledConnection::open_in_memory(profiler)?,
    };

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS users (id INTEGER PRIMARY KEY, name TEXT NOT NULL, email TEXT)",
    )?;

    for (id, name, email) in [(1, "alice", Some("alice@example.com")), (2, "bob", None)] {
        conn.execute(
            &Command::new("INSERT OR REPLACE INTO users (id, name, email) VALUES (:id, :name, :email)")
                .bind("id", id)
                .bind("name", name)
                .bind("email", email),
        )?;
    }

    let count: i64 = conn.query_scalar(&Command::new("SELECT COUNT(*) FROM users"))?;
    let names: Vec<String> = conn.query_map(
        &Command::new("SELECT name FROM users WHERE id >= :min ORDER BY id").bind("min", 1),
        |row| row.get(0),
    )?;
    log::info!("{} users: {}", count, names.join(", "));

    // Failures are logged by the profiler and still returned to the caller
    if conn.execute(&Command::new("DELETE FROM missing_table")).is_err() {
        log::info!("Failing statement was reported on the {} channel", settings.channel);
    }

    if let Some(elapsed) = conn.profiler().last_elapsed() {
        log::info!("Last completed statement took {:?}", elapsed);
    }

    Ok(())
}

async fn run_postgres(url: &str, settings: &ProfilerSettings) -> Result<()> {
    let pool = sqlx::PgPool::connect(url).await?;
    let mut profiler = TraceDbProfiler::new(settings);

    let now: chrono::DateTime<chrono::Utc> =
        postgres::fetch_scalar(&pool, &mut profiler, &Command::new("SELECT now()")).await?;
    let rows = postgres::fetch_rows(
        &pool,
        &mut profiler,
        &Command::new("SELECT generate_series(1, $1::INT)").bind("n", 3),
        |row| row.try_get::<i32, _>(0),
    )
    .await?;
    log::info!("Server time {}, fetched {} rows", now, rows.len());

    pool.close().await;
    Ok(())
}
