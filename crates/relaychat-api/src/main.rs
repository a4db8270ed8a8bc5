//! relaychat entry point.
//!
//! Binary name: `relaychat`
//!
//! Loads `.env`, parses CLI arguments, initializes tracing, then either runs
//! the relay server or one of the client commands.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;
use console::style;

use relaychat_infra::config::{load_client_config, resolve_config_dir};
use relaychat_observe::tracing_setup::{init_tracing, shutdown_tracing, verbosity_filter};

use cli::{Cli, ClientArgs, Commands, ServeArgs};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is normal; real environment variables still apply.
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    init_tracing(verbosity_filter(cli.verbose, cli.quiet), cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;
    if let Ok(path) = dotenv {
        tracing::debug!(path = %path.display(), "loaded .env");
    }

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            generate(shell, &mut cmd, "relaychat", &mut std::io::stdout());
            Ok(())
        }
        Commands::Serve(args) => serve(args, cli.quiet).await,
        Commands::Chat(args) => {
            let config = client_config(&args).await;
            cli::chat::loop_runner::run_chat_loop(config).await
        }
        Commands::Send { text, client } => {
            let config = client_config(&client).await;
            cli::send::send_message(&config, &text, cli.json).await
        }
    }
}

/// `~/.relaychat/config.toml` with command-line flags applied on top.
async fn client_config(args: &ClientArgs) -> relaychat_types::config::ClientConfig {
    let loaded = load_client_config(&resolve_config_dir()).await;
    args.apply(loaded)
}

async fn serve(args: ServeArgs, quiet: bool) -> anyhow::Result<()> {
    let state = AppState::from_serve_args(&args)?;
    let health = state.relay.health();

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, provider = %health.ai_provider, status = ?health.status, "relay listening");

    if !quiet {
        println!(
            "  {} relaychat relay listening on {}",
            style("⚡").bold(),
            style(format!("http://{addr}")).cyan()
        );
        if !state.relay.is_available() {
            println!(
                "  {} No API key set; /chat will answer 503 until one is configured.",
                style("!").yellow().bold()
            );
        }
        println!("  {}", style("Press Ctrl+C to stop").dim());
    }

    let router = http::router::build_router(state);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if !quiet {
        println!("\n  Server stopped.");
    }
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
