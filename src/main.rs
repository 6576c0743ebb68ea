use clap::Parser;
use epoch_solver::{init_tracing, run, Cli};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    run(cli).await?;

    Ok(())
}
