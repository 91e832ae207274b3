//! Console front end for TrueNavi.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use truenavi::navigation::Coordinates;
use truenavi::permissions::{PermissionGate, StaticPermissionGate, missing_summary};
use truenavi::services::{
    ApiClient, FixedLocation, HttpGraphService, HttpPreferencesService, OpenMeteoWeather,
    PlacesService,
};
use truenavi::speech::{ConsoleSpeaker, StdinListener};
use truenavi::{FlowRuntime, FlowServices, Locale, NaviConfig, RouteCompiler, RouteOutcome};

/// Voice-guided pedestrian navigation, driven from the terminal.
#[derive(Parser)]
#[command(name = "truenavi", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the backend base URL.
    #[arg(long)]
    api: Option<String>,

    /// Walker position as `LAT,LNG` (defaults to the configured location).
    #[arg(long, value_parser = parse_coordinates, allow_hyphen_values = true)]
    at: Option<Coordinates>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Hold the spoken conversation: prompts on stdout, answers on stdin.
    Run,

    /// Compile and print the instructions to a destination.
    Route {
        destination: String,

        /// Include temperature and rain instructions.
        #[arg(long)]
        weather: bool,

        /// Narrate in Spanish.
        #[arg(long)]
        spanish: bool,
    },

    /// List the named waypoints known to the backend.
    Places,

    /// Print the effective configuration.
    Config,

    /// Restore every preference to its first-run value.
    Reset,
}

fn parse_coordinates(value: &str) -> Result<Coordinates, String> {
    let (lat, lng) = value
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LNG, got {value:?}"))?;
    let lat: f64 = lat.trim().parse().map_err(|e| format!("latitude: {e}"))?;
    let lng: f64 = lng.trim().parse().map_err(|e| format!("longitude: {e}"))?;
    Ok(Coordinates::new(lat, lng))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries the spoken text.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("truenavi=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let path = cli.config.clone().unwrap_or_else(NaviConfig::default_config_path);
    let mut config = if path.exists() {
        NaviConfig::from_file(&path).with_context(|| format!("loading {}", path.display()))?
    } else {
        NaviConfig::default()
    };
    if config.ensure_device_id() {
        info!(path = %path.display(), "generated device id");
        if let Err(e) = config.save_to_file(&path) {
            warn!(error = %e, "could not persist device id");
        }
    }
    if let Some(api) = cli.api {
        config.api.base_url = api;
    }
    let origin = cli.at.unwrap_or_else(|| config.location.coordinates());

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => run(config, origin).await,
        Command::Route {
            destination,
            weather,
            spanish,
        } => route(config, origin, &destination, weather, Locale::from_spanish(spanish)).await,
        Command::Places => places(config).await,
        Command::Config => {
            println!("# {}", path.display());
            print!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
        Command::Reset => {
            let api = ApiClient::new(&config.api)?;
            let prefs = HttpPreferencesService::new(api).reset().await?;
            println!("{prefs:?}");
            Ok(())
        }
    }
}

async fn run(config: NaviConfig, origin: Coordinates) -> anyhow::Result<()> {
    println!("TrueNavi v{}", env!("CARGO_PKG_VERSION"));

    let gate = StaticPermissionGate::new(&config.permissions);
    if !gate.all_granted() {
        warn!(missing = %missing_summary(&gate), "permissions not granted, waiting");
    }

    let api = ApiClient::new(&config.api)?;
    let shutdown = tokio_util::sync::CancellationToken::new();
    let services = FlowServices {
        places: Arc::new(HttpGraphService::new(api.clone())),
        preferences: Arc::new(HttpPreferencesService::new(api)),
        weather: Arc::new(OpenMeteoWeather::new(&config.weather)?),
        locator: Arc::new(FixedLocation(origin)),
        permissions: Arc::new(gate),
        speaker: Arc::new(ConsoleSpeaker::new(&config.speech)),
        listener: Arc::new(StdinListener::new().cancel_on_eof(shutdown.clone())),
    };

    let (runtime, handle) = FlowRuntime::new(&config, services);

    let ctrl_c = handle.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupted");
            ctrl_c.shutdown();
        }
    });
    let eof = handle.clone();
    tokio::spawn(async move {
        shutdown.cancelled().await;
        eof.shutdown();
    });

    let state = runtime.run().await;
    info!(phase = %state.app_phase, "bye");
    Ok(())
}

async fn route(
    config: NaviConfig,
    origin: Coordinates,
    destination: &str,
    include_weather: bool,
    locale: Locale,
) -> anyhow::Result<()> {
    let api = ApiClient::new(&config.api)?;
    let compiler = RouteCompiler::new(
        Arc::new(HttpGraphService::new(api)),
        Arc::new(OpenMeteoWeather::new(&config.weather)?),
    );

    match compiler.compile(origin, destination, include_weather).await {
        RouteOutcome::Ready(route) => {
            for (i, step) in route.steps.iter().enumerate() {
                println!("{:>2}. [{}] {}", i + 1, step.direction.icon(), step.narration(locale));
            }
            println!("{} nodes, {:.0} meters", route.path.len(), route.distance());
            Ok(())
        }
        RouteOutcome::SameDestination => anyhow::bail!("already at {destination}"),
        RouteOutcome::Unreachable => anyhow::bail!("no route to {destination}"),
    }
}

async fn places(config: NaviConfig) -> anyhow::Result<()> {
    let graph = HttpGraphService::new(ApiClient::new(&config.api)?);
    let mut names = graph.list_place_names().await?;
    names.sort();
    for name in names {
        println!("{name}");
    }
    Ok(())
}
