use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "taskd", about = "In-memory task service", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server until Ctrl-C
    Serve(ServeArgs),
    /// Hammer an in-memory store from many threads
    Stress(StressArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// Address to listen on (overrides the config file)
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    /// TOML config file
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Origin allowed to make cross-origin requests
    #[arg(long)]
    pub allow_origin: Option<String>,
}

#[derive(Args)]
pub struct StressArgs {
    #[command(subcommand)]
    pub mode: StressMode,
}

#[derive(Subcommand)]
pub enum StressMode {
    /// Random get/create/list operations across a worker pool
    Storage(StorageArgs),
    /// Long-lived reader, writer and lister threads
    Mixed(MixedArgs),
}

#[derive(Args)]
pub struct StorageArgs {
    /// Total operations to run
    #[arg(long, default_value_t = 10_000)]
    pub ops: usize,
    /// Worker threads
    #[arg(long, default_value_t = 50)]
    pub workers: usize,
    /// Tasks created before the run starts
    #[arg(long, default_value_t = 1_000)]
    pub seed_tasks: usize,
}

#[derive(Args)]
pub struct MixedArgs {
    #[arg(long, default_value_t = 70)]
    pub readers: usize,
    #[arg(long, default_value_t = 20)]
    pub writers: usize,
    #[arg(long, default_value_t = 10)]
    pub listers: usize,
}
