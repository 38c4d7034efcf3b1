//! Winechain ledger command-line entry point.
//!
//! Usage: `winechain <function> [args...]`
//!
//! Runs one operation against a fresh in-memory ledger (seeded with the
//! sample products unless `WINECHAIN__SEED_ON_START=false`) and prints the
//! resulting bytes to stdout.

use std::io::Write;
use std::process::ExitCode;

use anyhow::Context;

use winechain_infra::{
    Dispatcher, InMemoryRecordStore, LedgerConfig, LifecycleService, MonotonicKeyGenerator,
    SystemClock,
};

fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let config = LedgerConfig::load().context("loading ledger configuration")?;
    winechain_observability::init_with_filter(&config.log_filter);

    let mut argv = std::env::args().skip(1);
    let Some(function) = argv.next() else {
        eprintln!("usage: winechain <function> [args...]");
        return Ok(ExitCode::from(2));
    };
    let args: Vec<String> = argv.collect();

    tracing::info!(environment = %config.environment, "starting winechain");

    let dispatcher = Dispatcher::new(LifecycleService::new(
        InMemoryRecordStore::new(),
        MonotonicKeyGenerator::starting_at(config.first_generated_key),
        SystemClock,
    ));
    if config.seed_on_start {
        dispatcher
            .invoke("initLedger", &[])
            .context("seeding sample products")?;
    }

    match dispatcher.invoke(&function, &args) {
        Ok(bytes) => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&bytes)?;
            if !bytes.is_empty() {
                stdout.write_all(b"\n")?;
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            eprintln!("{}: {err}", err.kind());
            Ok(ExitCode::FAILURE)
        }
    }
}
