use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = pagefront::cli::Cli::parse();
    if let Err(e) = pagefront::cmd::dispatch(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
