#[tokio::main]
async fn main() {
    if let Err(e) = ecash_digest::cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
