use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = multicaster::cli::Cli::parse();
    if let Err(e) = multicaster::cmd::dispatch(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
