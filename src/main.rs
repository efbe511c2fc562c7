// Main entry point - Dependency injection and server setup
use std::{net::SocketAddr, sync::Arc};

use clap::{Parser, Subcommand};
use ga_dashboard::application::dashboard_controller::{Click, DashboardController};
use ga_dashboard::application::report_service::ReportService;
use ga_dashboard::infrastructure::config::load_gateway_config;
use ga_dashboard::infrastructure::ga4_repository::Ga4Repository;
use ga_dashboard::infrastructure::http_source::{DEFAULT_GATEWAY_URL, HttpEnvelopeSource};
use ga_dashboard::infrastructure::terminal::{TerminalSurface, TerminalView};
use ga_dashboard::{AppState, router};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ga-dashboard")]
#[command(version)]
#[command(about = "Google Analytics 4 dashboard gateway and terminal renderer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the report gateway (default)
    Serve,
    /// Show the dashboard in the terminal
    Show {
        /// Base URL of a running gateway
        #[arg(long, default_value = DEFAULT_GATEWAY_URL)]
        url: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so `show` output stays readable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve().await,
        Command::Show { url } => show(&url).await,
    }
}

async fn serve() -> anyhow::Result<()> {
    // Load configuration; missing credentials are fatal
    let config = load_gateway_config().inspect_err(|e| tracing::error!("{}", e))?;

    // Create repository (infrastructure layer)
    let repository = Ga4Repository::new(&config).inspect_err(|e| tracing::error!("{}", e))?;
    tracing::info!("Google Analytics client initialized successfully");

    // Create services (application layer)
    let report_service = ReportService::new(Arc::new(repository));
    let state = Arc::new(AppState::new(report_service, config.presence));

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server running on {}", addr);
    tracing::info!("Environment: {}", config.environment);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router(state)).await?;

    Ok(())
}

async fn show(url: &str) -> anyhow::Result<()> {
    let mut controller = DashboardController::new(
        HttpEnvelopeSource::new(url),
        TerminalView::new(std::io::stdout()),
        TerminalSurface::new(std::io::stdout()),
    );

    // Every stdin line is a refresh click; `q` quits
    let (tx, clicks) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let click = if line.trim().eq_ignore_ascii_case("q") {
                Click::Quit
            } else {
                Click::Refresh
            };
            if tx.send(click).is_err() {
                break;
            }
        }
    });

    let session = controller.run(clicks).await;
    tracing::debug!(
        "Dashboard closed after {} loads, {} ignored clicks",
        session.loads,
        session.ignored_clicks
    );

    Ok(())
}
