use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use carpool_server::cache::{CacheConfig, CachedOracle};
use carpool_server::oracle::GoogleMapsClient;
use carpool_server::settings::AppSettings;
use carpool_server::web::{AppState, create_router};

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "carpool_server=info,tower_http=info";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = match AppSettings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let match_config = settings.match_config();
    if let Err(e) = match_config.validate() {
        error!(error = %e, "invalid configuration");
        return ExitCode::FAILURE;
    }

    // Create Google Maps client
    let client = match GoogleMapsClient::new(settings.maps_config()) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "failed to create Google Maps client");
            return ExitCode::FAILURE;
        }
    };
    let oracle = CachedOracle::new(client, &CacheConfig::default());

    let state = AppState::new(oracle, match_config.clone(), settings.logo_url.as_str());
    let app = create_router(state);

    let listener = match tokio::net::TcpListener::bind(settings.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(addr = %settings.bind_addr, error = %e, "failed to bind");
            return ExitCode::FAILURE;
        }
    };

    info!(
        addr = %settings.bind_addr,
        max_passengers = match_config.max_passengers,
        detour_factor = match_config.detour_factor,
        strict_mode = match_config.strict_mode,
        "carpool planner listening"
    );
    info!("endpoints: GET /health, POST /plan, POST /report, POST /report/from-result, GET /diag/oracle");

    if let Err(e) = axum::serve(listener, app).await {
        error!(error = %e, "server error");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
