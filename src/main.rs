use wsbar::commands::Cli;
use wsbar::libs::logging::init_logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_logging();
    Cli::menu().await
}
