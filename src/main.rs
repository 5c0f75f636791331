use std::time::Duration;

use tokio::time::{Instant, interval_at};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clinic_core::{AuthIntent, ClinicConfig, ClinicStores, DashboardLoad, Outcome};

/// Main entry point for the clinic client
///
/// Builds every store against the HTTP API, restores the persisted session (logging in from the
/// environment if there is none), loads all dashboards concurrently and prints their state.
/// With `--watch` (or `CLINIC_WATCH=1`) it keeps running, reprinting the summary whenever a
/// store changes and reloading stale dashboards once per cache window, until Ctrl-C.
///
/// # Environment Variables
/// - `CLINIC_API_URL`: API base URL (default: "http://localhost:5000/api")
/// - `CLINIC_SESSION_DIR`: Directory holding the persisted session (default: ".clinic")
/// - `CLINIC_CACHE_TTL_SECS`: Freshness window for dashboard loads (default: 120)
/// - `CLINIC_HTTP_TIMEOUT_SECS`: Per-request timeout (default: 30)
/// - `CLINIC_EMAIL` / `CLINIC_PASSWORD`: Credentials used when no session is stored
/// - `CLINIC_WATCH`: Keep running and watch for changes
///
/// # Returns
/// * `Ok(())` - If the dashboards were loaded (individual load failures are reported, not fatal)
/// * `Err(anyhow::Error)` - If configuration or client construction fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("clinic=info".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let watch = std::env::args().skip(1).any(|arg| arg == "--watch")
        || std::env::var("CLINIC_WATCH").is_ok_and(|v| matches!(v.trim(), "1" | "true" | "yes"));

    let cfg = ClinicConfig::from_env_values(
        std::env::var("CLINIC_API_URL").ok(),
        std::env::var("CLINIC_SESSION_DIR").ok(),
        std::env::var("CLINIC_CACHE_TTL_SECS").ok(),
        std::env::var("CLINIC_HTTP_TIMEOUT_SECS").ok(),
    )?;

    tracing::info!("++ Starting clinic client against {}", cfg.api_base_url());
    let stores = api_client::connect(&cfg)?;

    sign_in(&stores).await;

    let load = stores.load_dashboards(false).await;
    report_load(&load);
    print_summary(&stores);

    if watch {
        watch_dashboards(&stores, cfg.cache_ttl()).await?;
    }

    Ok(())
}

async fn sign_in(stores: &ClinicStores) {
    if stores.auth.is_authenticated() {
        tracing::info!(
            "Restored session for {}",
            stores.auth.user_email().unwrap_or_default()
        );
        return;
    }

    let (Ok(email), Ok(password)) = (
        std::env::var("CLINIC_EMAIL"),
        std::env::var("CLINIC_PASSWORD"),
    ) else {
        tracing::warn!("No stored session and no CLINIC_EMAIL/CLINIC_PASSWORD; continuing anonymously");
        return;
    };

    match stores
        .auth
        .dispatch(AuthIntent::Login {
            email: email.clone(),
            password,
        })
        .await
    {
        Outcome::Failed(message) => tracing::warn!("Login as {} failed: {}", email, message),
        _ => tracing::info!("Signed in as {}", email),
    }
}

fn report_load(load: &DashboardLoad) {
    for (label, outcome) in load.entries() {
        match outcome {
            Outcome::Failed(message) => tracing::warn!("{} failed to load: {}", label, message),
            Outcome::CacheHit => tracing::debug!("{} served from cache", label),
            _ => tracing::debug!("{} loaded", label),
        }
    }
    if load.failures() > 0 {
        tracing::warn!("{} of 5 dashboards failed to load", load.failures());
    }
}

fn print_summary(stores: &ClinicStores) {
    let line = |label: &str, count: usize, loading: bool, error: Option<String>| {
        let mut text = format!("{label:<10} {count:>5}");
        if loading {
            text.push_str("  (loading)");
        }
        if let Some(error) = error {
            text.push_str(&format!("  error: {error}"));
        }
        println!("{text}");
    };

    line(
        "doctors",
        stores.doctors.count(),
        stores.doctors.is_loading(),
        stores.doctors.last_error(),
    );
    line(
        "patients",
        stores.patients.count(),
        stores.patients.is_loading(),
        stores.patients.last_error(),
    );
    line(
        "visits",
        stores.visits.count(),
        stores.visits.is_loading(),
        stores.visits.last_error(),
    );
    line(
        "fees",
        stores.fees.count(),
        stores.fees.is_loading(),
        stores.fees.last_error(),
    );
    line(
        "activity",
        stores.activity.count(),
        stores.activity.is_loading(),
        stores.activity.last_error(),
    );
}

/// Reprints the summary on every store change and reloads once per cache window.
async fn watch_dashboards(stores: &ClinicStores, period: Duration) -> anyhow::Result<()> {
    let mut doctors = stores.doctors.subscribe();
    let mut patients = stores.patients.subscribe();
    let mut visits = stores.visits.subscribe();
    let mut fees = stores.fees.subscribe();
    let mut activity = stores.activity.subscribe();
    let mut auth = stores.auth.subscribe();

    let refresher = stores.clone();
    let refresh = tokio::spawn(async move {
        let mut ticks = interval_at(Instant::now() + period, period);
        loop {
            ticks.tick().await;
            let load = refresher.load_dashboards(false).await;
            report_load(&load);
        }
    });

    tracing::info!("Watching dashboards; press Ctrl-C to stop");
    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                signal?;
                break;
            }
            Some(_) = doctors.changed() => print_summary(stores),
            Some(_) = patients.changed() => print_summary(stores),
            Some(_) = visits.changed() => print_summary(stores),
            Some(_) = fees.changed() => print_summary(stores),
            Some(_) = activity.changed() => print_summary(stores),
            Some(session) = auth.changed() => {
                tracing::info!("Session changed (authenticated: {})", session.is_authenticated);
            }
        }
    }

    refresh.abort();
    tracing::info!("Stopped watching");
    Ok(())
}
