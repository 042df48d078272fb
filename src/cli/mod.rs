//! CLI module for Workflow Builder
//!
//! Subcommands:
//! - `serve`: HTTP API server
//! - `status`: one-shot dependency status report
//! - `run`: execute an ad-hoc workflow against input text

pub mod run;
pub mod serve;
pub mod status;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::config::AppConfig;

/// Workflow Builder - chain LLM text transformations into short workflows
#[derive(Parser)]
#[command(name = "workflow-builder")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Report orchestrator, store and LLM connectivity
    Status,

    /// Run an ad-hoc workflow without storing it
    Run(run::RunArgs),
}

/// Load `.env` and the layered configuration
pub(crate) fn load_config() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();
    AppConfig::load().context("Failed to load configuration")
}
