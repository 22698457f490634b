use clap::Parser;
use lert::cli::Cli;
use lert::error::AlreadyReported;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Load .env if present so LERT_HOST_URL and friends can live there
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(e) = lert::cli::run(cli).await {
        if e.downcast_ref::<AlreadyReported>().is_some() {
            std::process::exit(1);
        }
        match std::env::var("LERT_VERBOSE").as_deref() {
            Ok("true") | Ok("1") => eprintln!("Error: {e:?}"),
            _ => eprintln!("Error: {e}"),
        }
        std::process::exit(1);
    }
}
