//! Command-line shell around the route planner.
//!
//! Run with:
//!   GOOGLE_MAPS_API_KEY=... cargo run -- --strategy mst "123 Main St" "456 Oak Ave"

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use route_planner::config::PlannerConfig;
use route_planner::directions::GoogleDirections;
use route_planner::geocode::GoogleGeocoder;
use route_planner::haversine::StraightLineDirections;
use route_planner::map::MapCanvas;
use route_planner::osrm::{OsrmConfig, OsrmDirections};
use route_planner::planner::{MarkerPolicy, PlannerOptions, RoutePlanner};
use route_planner::route::Strategy;
use route_planner::solver::HttpRouteSolver;
use route_planner::traits::{DirectionsProvider, MapView};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Backend {
    Google,
    Osrm,
    Straight,
}

#[derive(Debug, Parser)]
#[command(name = "route-planner", about = "Order and draw a driving route through a few addresses")]
struct Args {
    /// Addresses to visit, in entry order
    #[arg(required = true)]
    addresses: Vec<String>,

    /// Ordering heuristic: greedy or mst
    #[arg(long, default_value = "greedy")]
    strategy: Strategy,

    /// Geocode the addresses and list the markers before routing
    #[arg(long)]
    mark: bool,

    /// Backend used to draw the ordered route
    #[arg(long, value_enum, default_value_t = Backend::Google)]
    directions: Backend,

    /// Fixed start address prepended to every request
    #[arg(long)]
    origin: Option<String>,

    #[arg(long, default_value = "http://localhost:5000")]
    osrm_url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let mut config = PlannerConfig::from_env().context("loading configuration")?;
    if args.origin.is_some() {
        config.fixed_origin = args.origin.clone();
    }

    let geocoder = Arc::new(GoogleGeocoder::new(config.google.clone())?);

    match args.directions {
        Backend::Google => {
            let directions = GoogleDirections::new(config.google.clone())?;
            run(&args, &config, geocoder, directions).await
        }
        Backend::Osrm => {
            let osrm_config = OsrmConfig {
                base_url: args.osrm_url.clone(),
                ..OsrmConfig::default()
            };
            let directions = OsrmDirections::new(osrm_config, Arc::clone(&geocoder))?;
            run(&args, &config, geocoder, directions).await
        }
        Backend::Straight => {
            let directions = StraightLineDirections::new(Arc::clone(&geocoder));
            run(&args, &config, geocoder, directions).await
        }
    }
}

async fn run<D: DirectionsProvider>(
    args: &Args,
    config: &PlannerConfig,
    geocoder: Arc<GoogleGeocoder>,
    directions: D,
) -> Result<()> {
    let solver = Arc::new(HttpRouteSolver::new(config.solver.clone())?);
    let options = PlannerOptions {
        fixed_origin: config.fixed_origin.clone(),
        marker_policy: MarkerPolicy::ClearBeforePlace,
    };

    let mut planner = RoutePlanner::new(solver, geocoder, MapCanvas::new(directions), options);
    planner.mount(&MapView::default());

    for (index, address) in args.addresses.iter().enumerate() {
        if index >= planner.addresses().len() {
            planner.add_address();
        }
        planner.set_address(index, address.as_str())?;
    }

    if let Some(origin) = planner.fixed_origin() {
        println!("You will start from: {}", origin);
    }

    if args.mark && planner.mark_addresses().await.is_ok() {
        for marker in planner.map().surface().markers() {
            println!(
                "Marker: {} ({:.6}, {:.6})",
                marker.label, marker.position.lat, marker.position.lng
            );
        }
    }
    for notice in planner.take_notices() {
        eprintln!("{}", notice.message);
    }

    let outcome = planner.compute_route(args.strategy).await;
    for notice in planner.take_notices() {
        eprintln!("{}", notice.message);
    }

    if outcome.is_ok() {
        let view = planner.view();
        println!("{}", view.title());
        for line in view.step_lines() {
            println!("  {}", line);
        }
        println!("Total Distance: {}", view.distance_label());
        println!("Total Duration: {}", view.duration_label());
    }

    planner.unmount();
    outcome?;
    Ok(())
}
