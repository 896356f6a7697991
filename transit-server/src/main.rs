use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use transit_server::estimator::{EstimatorError, SpeedModelEstimator};
use transit_server::network::{
    ArtifactError, BuilderConfig, DataDir, TransitNetwork, build_network, load_stops,
};
use transit_server::planner::{PlannerConfig, RouteEngine};
use transit_server::web::{AppState, create_router};

const DEFAULT_LOG_FILTER: &str = "transit_server=info,tower_http=info";

#[derive(Parser)]
#[command(name = "transit-server", version, about = "Multimodal transit route planner")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the route planning API
    Serve {
        /// Directory holding network.json
        #[arg(long, env = "TRANSIT_DATA_DIR", default_value = "data")]
        data_dir: PathBuf,

        /// Address to listen on
        #[arg(long, env = "TRANSIT_BIND", default_value = "127.0.0.1:8000")]
        bind: SocketAddr,

        /// JSON file with speed model parameters (defaults if omitted)
        #[arg(long, env = "TRANSIT_ESTIMATOR")]
        estimator: Option<PathBuf>,

        /// Maximum routes per query
        #[arg(long, default_value_t = 5)]
        max_routes: usize,
    },

    /// Build network.json from bus_stops.json and metro_stations.json
    BuildNetwork {
        /// Directory holding the stop lists; network.json is written here
        #[arg(long, env = "TRANSIT_DATA_DIR", default_value = "data")]
        data_dir: PathBuf,

        /// Link stops closer than this many metres
        #[arg(long, default_value_t = 400.0)]
        walk_radius_m: f64,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error(transparent)]
    Estimator(#[from] EstimatorError),

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Serve {
            data_dir,
            bind,
            estimator,
            max_routes,
        } => serve(DataDir::new(data_dir), bind, estimator, max_routes).await,
        Command::BuildNetwork {
            data_dir,
            walk_radius_m,
        } => build(DataDir::new(data_dir), walk_radius_m),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn serve(
    data: DataDir,
    bind: SocketAddr,
    estimator: Option<PathBuf>,
    max_routes: usize,
) -> Result<(), CliError> {
    // Fail fast: a server without a network can only answer 503
    let network = TransitNetwork::load(&data)?;

    let estimator = match estimator {
        Some(path) => {
            info!(path = %path.display(), "loading estimator parameters");
            SpeedModelEstimator::from_json_file(&path)?
        }
        None => SpeedModelEstimator::default(),
    };

    let config = PlannerConfig {
        max_routes,
        ..PlannerConfig::default()
    };
    let engine = RouteEngine::new(Arc::new(network), Arc::new(estimator), config);
    let app = create_router(AppState::new(engine));

    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!(%bind, "transit planner listening");
    info!("  GET  /api/v1/health         - Health check");
    info!("  GET  /api/v1/network/stops  - Stops for the map");
    info!("  POST /api/v1/routes/search  - Plan routes");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

fn build(data: DataDir, walk_radius_m: f64) -> Result<(), CliError> {
    let bus_stops = load_stops(&data.bus_stops())?;
    let metro_stations = load_stops(&data.metro_stations())?;
    info!(
        bus_stops = bus_stops.len(),
        metro_stations = metro_stations.len(),
        "loaded stop lists"
    );

    let artifact = build_network(bus_stops, metro_stations, &BuilderConfig::new(walk_radius_m));
    let path = data.network();
    artifact.save(&path)?;
    info!(path = %path.display(), "wrote network");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
