use clap::Parser;

use stellwerk::cli::{Cli, run};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();
    log::debug!("stellwerk {} starting", stellwerk::cli::VERSION);
    run(cli).await
}
