//! Migration CLI tool.
//!
//! Reads `DATABASE_URL` and accepts the usual `up`, `down`, `fresh` and
//! `status` subcommands.

use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter("info,sea_orm_migration=info")
        .init();

    tracing::info!("Running blog schema migrations");
    cli::run_cli(migration::Migrator).await;
}
