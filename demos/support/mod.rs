//! Shared setup for the lab demos.

use tracing_subscriber::EnvFilter;

/// Load `.env` (if present) and install a compact tracing subscriber.
///
/// Library logs are quiet by default; run with `RUST_LOG=llm_labs=debug`
/// to watch each request.
pub fn init() {
    dotenv::dotenv().ok();

    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "warn,llm_labs=info".into());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .compact()
        .init();
}

pub fn banner(title: &str) {
    println!("\n{title}");
    println!("{}", "=".repeat(50));
}
