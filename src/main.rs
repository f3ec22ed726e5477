use clap::Parser;

mod app;
mod cli;
mod config;
mod error;
mod keys;
mod logging;
mod mpris;
mod player;
mod runtime;
mod service;
mod session;
mod tidal;
mod ui;

#[cfg(test)]
mod testing;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    runtime::run(cli)
}
