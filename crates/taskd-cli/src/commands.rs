use std::sync::Arc;

use colored::Colorize;

use taskd_server::{ServerConfig, TaskServer};
use taskd_store::InMemoryTaskStore;

use crate::cli::*;
use crate::stress::{self, MixedLoad, StorageLoad, StressReport};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args),
        Command::Stress(StressArgs { mode }) => match mode {
            StressMode::Storage(args) => cmd_stress_storage(args),
            StressMode::Mixed(args) => cmd_stress_mixed(args),
        },
    }
}

/// Load the config file (if any) and layer the command-line flags on top.
fn resolve_config(args: &ServeArgs) -> anyhow::Result<ServerConfig> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(origin) = &args.allow_origin {
        config.allowed_origin = Some(origin.clone());
    }
    config.validate()?;
    Ok(config)
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = resolve_config(&args)?;
    println!("{} taskd serving on {}", "✓".green().bold(), config.bind_addr.to_string().bold());
    if let Some(origin) = &config.allowed_origin {
        println!("  CORS origin: {}", origin.cyan());
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move {
        TaskServer::new(config)
            .serve_with_shutdown(async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::error!(error = %e, "failed to listen for Ctrl-C");
                }
                tracing::info!("shutdown requested");
            })
            .await
    })?;
    println!("{} taskd stopped", "✓".green());
    Ok(())
}

fn cmd_stress_storage(args: StorageArgs) -> anyhow::Result<()> {
    let load = StorageLoad {
        ops: args.ops,
        workers: args.workers,
        seed_tasks: args.seed_tasks,
        ..Default::default()
    };
    println!(
        "Storage stress: {} ops across {} workers ({} seeded tasks)",
        load.ops.to_string().bold(),
        load.workers.to_string().bold(),
        load.seed_tasks
    );
    let store = Arc::new(InMemoryTaskStore::new());
    let report = stress::run_storage(store.clone(), &load)?;
    print_report(&report);
    println!("  Final task count: {}", store.len());
    check_integrity(&store)
}

fn cmd_stress_mixed(args: MixedArgs) -> anyhow::Result<()> {
    let load = MixedLoad {
        readers: args.readers,
        writers: args.writers,
        listers: args.listers,
        ..Default::default()
    };
    let expected = load.readers * load.reader_ops
        + load.writers * load.writer_ops
        + load.listers * load.lister_ops;
    println!(
        "Mixed stress: {} readers, {} writers, {} listers ({} ops)",
        load.readers.to_string().bold(),
        load.writers.to_string().bold(),
        load.listers.to_string().bold(),
        expected
    );
    let store = Arc::new(InMemoryTaskStore::new());
    let report = stress::run_mixed(store.clone(), &load, move |done| {
        println!("  {} {done}/{expected} operations", "progress:".dimmed());
    })?;
    print_report(&report);
    check_integrity(&store)
}

fn print_report(report: &StressReport) {
    let failed = if report.failed == 0 {
        report.failed.to_string().green()
    } else {
        report.failed.to_string().red()
    };
    println!("{} Completed in {:.2?}", "✓".green().bold(), report.elapsed);
    println!("  Total:      {}", report.total());
    println!("  Succeeded:  {}", report.succeeded.to_string().green());
    println!("  Failed:     {failed}");
    println!("  Success:    {:.2}%", report.success_rate());
    println!(
        "  Latency:    mean {:.2?}, min {:.2?}, max {:.2?}",
        report.latency.mean(),
        report.latency.min(),
        report.latency.max()
    );
    println!("  Throughput: {:.0} ops/s", report.throughput());
}

fn check_integrity(store: &InMemoryTaskStore) -> anyhow::Result<()> {
    store.check_integrity()?;
    println!("  Index:      {}", "consistent".green());
    Ok(())
}
