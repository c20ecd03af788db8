//! SwiftTrack CLI
//!
//! Command-line client for the SwiftTrack order service.
//!
//! Usage:
//!   swifttrack login CLIENT001
//!   swifttrack submit --random
//!   swifttrack track ORD123 --poll
//!   swifttrack dashboard --watch

use anyhow::{bail, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use swifttrack::bin_common::{build_client, load_tracker_config, ConfigType, RunConfig};
use swifttrack::swifttrack_client::RestClient;
use swifttrack::tracking::application::{DashboardLoader, LookupOutcome, OrderForm, TrackingController};
use swifttrack::tracking::domain::{vehicle_status_class, DriverManifest};
use swifttrack::tracking::infrastructure::{init_tracing, BackendMonitor, SessionStore, TrackerConfig, QUICK_LOGIN_IDS};
use swifttrack::tracking::ShutdownManager;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "swifttrack", about = "SwiftTrack logistics client")]
struct Cli {
    /// Config file (defaults to $SWIFTTRACK_CONFIG_PATH or config/tracker.yaml)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check that the backend is reachable
    Health,
    /// Store a client id for this machine
    Login {
        /// Client id; omit to list the demo accounts
        client_id: Option<String>,
    },
    /// Forget the stored client id
    Logout,
    /// Submit a new order
    Submit {
        #[arg(long)]
        order_id: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        latitude: Option<String>,
        #[arg(long)]
        longitude: Option<String>,
        /// Comma-separated package ids
        #[arg(long)]
        items: Option<String>,
        /// Fill unspecified fields with sample data
        #[arg(long)]
        random: bool,
    },
    /// Look up an order's status
    Track {
        order_id: String,
        /// Keep refreshing until Ctrl+C
        #[arg(long)]
        poll: bool,
    },
    /// Show operations metrics and the fleet
    Dashboard {
        /// Keep refreshing until Ctrl+C
        #[arg(long)]
        watch: bool,
    },
    /// Show today's driver manifest
    Manifest,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let config_type = match cli.config {
        Some(path) => ConfigType::Custom(path),
        None => ConfigType::Tracker,
    };
    let config = load_tracker_config(config_type)?;

    init_tracing(&config.log_level);
    config.log();

    let client = build_client(&config)?;
    let session = SessionStore::new(&config.session.path);

    match cli.command {
        Command::Health => health(&config, client).await,
        Command::Login { client_id } => login(&session, client_id),
        Command::Logout => {
            session.logout()?;
            Ok(())
        }
        Command::Submit {
            order_id,
            address,
            latitude,
            longitude,
            items,
            random,
        } => {
            RunConfig::new("submit").with_session().begin(&config)?;

            let mut form = if random { OrderForm::random() } else { OrderForm::default() };
            if let Some(v) = order_id {
                form.order_id = v;
            }
            if let Some(v) = address {
                form.address = v;
            }
            if let Some(v) = latitude {
                form.latitude = v;
            }
            if let Some(v) = longitude {
                form.longitude = v;
            }
            if let Some(v) = items {
                form.items = v;
            }

            submit(&client, form).await
        }
        Command::Track { order_id, poll } => {
            RunConfig::new("track").with_session().begin(&config)?;
            track(&config, client, &order_id, poll).await
        }
        Command::Dashboard { watch } => {
            RunConfig::new("dashboard").begin(&config)?;
            dashboard(&config, client, watch).await
        }
        Command::Manifest => {
            let client_id = RunConfig::new("manifest")
                .with_session()
                .begin(&config)?
                .unwrap_or_default();
            manifest(&client_id);
            Ok(())
        }
    }
}

async fn health(config: &TrackerConfig, client: RestClient) -> Result<()> {
    let monitor = BackendMonitor::new(client);
    let Some(health) = monitor.check().await else {
        bail!("Health check already running");
    };

    info!("{} {} ({})", health.icon(), health.message, config.api.base_url);
    if let Some(service) = &health.service {
        info!("Service: {}", service);
    }
    if let Some(error) = &health.error {
        bail!("Backend unreachable: {}", error);
    }
    Ok(())
}

fn login(session: &SessionStore, client_id: Option<String>) -> Result<()> {
    let Some(client_id) = client_id else {
        info!("Demo accounts: {}", QUICK_LOGIN_IDS.join(", "));
        bail!("No client id given");
    };

    let client_id = session.login(&client_id)?;
    info!("Session stored for {}", client_id);
    Ok(())
}

async fn submit(client: &RestClient, mut form: OrderForm) -> Result<()> {
    info!(
        "Submitting {} to {} ({}, {}) with items [{}]",
        form.order_id, form.address, form.latitude, form.longitude, form.items
    );

    let receipt = form.submit(client).await?;

    info!("✅ Order submitted");
    info!("  Order ID: {}", receipt.order_id);
    info!("  Status:   {}", receipt.status);
    info!("  Track:    {}", receipt.track);
    if let Some(timestamp) = &receipt.timestamp {
        info!("  At:       {}", timestamp);
    }
    Ok(())
}

async fn track(config: &TrackerConfig, client: RestClient, order_id: &str, poll: bool) -> Result<()> {
    let controller = TrackingController::with_settings(client, &config.tracking);

    if !poll {
        match controller.lookup(order_id).await {
            LookupOutcome::Updated(_) => print_view(&controller),
            LookupOutcome::Failed(message) => bail!(message),
            LookupOutcome::Skipped => bail!("Order id must not be empty"),
            LookupOutcome::Busy | LookupOutcome::Stale => {}
        }
        return Ok(());
    }

    let order_id = order_id.trim();
    if order_id.is_empty() {
        bail!("Order id must not be empty");
    }

    let shutdown = ShutdownManager::new();
    shutdown.spawn_signal_handler();

    let mut views = controller.subscribe();
    controller.set_polling(true, order_id);
    info!("Auto-refresh on, press Ctrl+C to stop");

    let mut last_seen = None;
    loop {
        tokio::select! {
            _ = shutdown.wait() => break,
            changed = views.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = views.borrow_and_update().clone();
                if view.poll.in_flight {
                    continue;
                }
                if let Some(error) = &view.error {
                    error!("❌ {}", error);
                    continue;
                }
                let updated = view.snapshot.as_ref().map(|s| s.last_updated);
                if updated != last_seen {
                    last_seen = updated;
                    print_view(&controller);
                }
            }
        }
    }

    controller.set_polling(false, "");
    Ok(())
}

fn print_view(controller: &TrackingController<RestClient>) {
    let view = controller.view();
    let (Some(snapshot), Some(status_display), Some(timeline)) = (&view.snapshot, &view.display, &view.timeline) else {
        return;
    };

    info!("{} {} - {} ({})", status_display.glyph, snapshot.order_id, snapshot.status, status_display.stage_label);
    info!("  Received:     {}", snapshot.received_at);
    info!("  Last updated: {}", snapshot.last_updated);
    if let Some(error) = &snapshot.error {
        info!("  Error:        {}", error);
    }
    for stage in &timeline.stages {
        info!("  {}. {:<32} [{}]", stage.number, stage.title, stage.badge());
    }
}

async fn dashboard(config: &TrackerConfig, client: RestClient, watch: bool) -> Result<()> {
    let loader = Arc::new(DashboardLoader::new(client));

    if !watch {
        let state = loader.refresh().await;
        if let Some(error) = &state.error {
            bail!("Failed to load dashboard: {}", error);
        }
        print_dashboard(&loader);
        return Ok(());
    }

    let shutdown = ShutdownManager::new();
    shutdown.spawn_signal_handler();

    let mut states = loader.subscribe();
    let interval = Duration::from_secs(config.dashboard.refresh_interval_secs);
    let task = Arc::clone(&loader).spawn(interval, shutdown.flag());

    loop {
        tokio::select! {
            _ = shutdown.wait() => break,
            changed = states.changed() => {
                if changed.is_err() {
                    break;
                }
                let loading = states.borrow_and_update().loading;
                if !loading {
                    print_dashboard(&loader);
                }
            }
        }
    }

    task.abort();
    Ok(())
}

fn print_dashboard(loader: &DashboardLoader) {
    let state = loader.state();
    if let Some(error) = &state.error {
        error!("❌ {}", error);
    }
    let Some(data) = &state.data else {
        return;
    };

    let summary = &data.summary;
    info!("Operations ({})", data.fetched_at.format("%H:%M:%S"));
    info!("  Total orders:         {}", summary.metric(&["overview", "totalOrders"]));
    info!("  Active routes:        {}", summary.metric(&["overview", "activeRoutes"]));
    info!("  System uptime:        {}", summary.metric(&["overview", "systemUptime"]));
    info!("  Orders processed:     {}", summary.metric(&["daily", "ordersProcessed"]));
    info!("  Deliveries completed: {}", summary.metric(&["daily", "deliveriesCompleted"]));
    info!("  Active drivers:       {}", summary.metric(&["daily", "activeDrivers"]));
    info!("  Success rate:         {}", summary.metric(&["performance", "successRate"]));
    info!("  Avg processing time:  {}", summary.metric(&["performance", "avgProcessingTime"]));
    info!("  Route efficiency:     {}", summary.metric(&["routeOptimization", "efficiency"]));

    for (system, status, uptime) in summary.system_health() {
        info!("  {:<6} {} (uptime {})", system, status, uptime);
    }

    let fleet = &data.fleet.summary;
    info!(
        "Fleet: {} total, {} available, {} busy, {} with WMS assignments",
        fleet.total, fleet.available, fleet.busy, fleet.with_wms_assignments
    );
    for vehicle in &data.fleet.vehicles {
        let capacity = vehicle
            .capacity
            .map(|c| c.to_string())
            .unwrap_or_else(|| "N/A".to_string());
        info!(
            "  {:<8} {:<12} capacity {} [{}]",
            vehicle.vehicle_id,
            vehicle.status,
            capacity,
            vehicle_status_class(&vehicle.status)
        );
    }
}

fn manifest(client_id: &str) {
    let manifest = DriverManifest::generate(client_id, Utc::now().date_naive());

    info!("Driver {} | Vehicle {} | {}", manifest.driver_id, manifest.vehicle_id, manifest.date);
    info!("Completed: {} | Remaining: {}", manifest.completed(), manifest.remaining());
    for delivery in &manifest.deliveries {
        info!(
            "  {} {:<24} {:<10} {}",
            delivery.order_id,
            delivery.address,
            delivery.status.to_string(),
            delivery.priority
        );
    }
}
