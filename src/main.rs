//! Devbox Gate Server
//!
//! An authenticated gate that stops devbox workloads through the cluster
//! orchestrator's API.

use clap::Parser;
use devbox_gate::server::GateServerBuilder;
use devbox_gate::init_logging;

/// Devbox gate - authenticated shutdown endpoint for devbox workloads
#[derive(Parser)]
#[command(name = "devbox-gate")]
#[command(about = "Authenticated shutdown gate for devbox workloads")]
#[command(version)]
struct Args {
    /// Server host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Server port to listen on
    #[arg(short, long, default_value = "8082")]
    port: u16,

    /// Enable development mode (in-memory store, token mint endpoint)
    #[arg(long)]
    dev: bool,

    /// Orchestrator API base URL
    #[arg(long)]
    orchestrator_url: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // Set up logging first
    std::env::set_var(
        "RUST_LOG",
        format!("devbox_gate={},tower_http=debug", args.log_level),
    );
    init_logging();

    // Load environment variables
    dotenvy::dotenv().ok();

    println!("🚀 Starting Devbox Gate");
    println!("📍 Server: http://{}:{}", args.host, args.port);
    println!("🔧 Development mode: {}", args.dev);

    // Environment config first, command line overrides on top
    let mut builder = GateServerBuilder::new()
        .host(args.host)
        .port(args.port)
        .dev_mode(args.dev);

    if let Some(url) = args.orchestrator_url {
        builder = builder.orchestrator_url(url);
    }

    let server = match builder.build() {
        Ok(server) => server,
        Err(e) => {
            eprintln!("❌ Failed to build server: {}", e);
            std::process::exit(1);
        }
    };

    if server.config().orchestrator_url.is_none() && server.config().dev_mode {
        println!("⚠️  No orchestrator URL configured; devboxes live in memory only.");
    }

    // Start the server (this will block until shutdown)
    if let Err(e) = server.start().await {
        eprintln!("❌ Server failed to start: {}", e);
        std::process::exit(1);
    }
}
