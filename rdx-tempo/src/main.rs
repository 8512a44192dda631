use anyhow::Result;
use std::path::PathBuf;
use std::time::Duration;
use tempo::prelude::*;
use tempo::{ENGINE_NAME, VERSION};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const HEARTBEAT: TimerId = TimerId::named("HEARTBEAT");
const COUNTDOWN: TimerId = TimerId::named("test");

/// How often the loop polls the registry. This is the firing granularity.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_target(false)
        .init();

    // 2. Load configuration: optional TOML path as the first argument.
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = TempoConfig::load(config_path.as_deref())?;
    info!(
        "{} v{} starting with {} slots, rendering as {}.",
        ENGINE_NAME,
        VERSION,
        config.capacity,
        config.default_format.name()
    );

    // 3. Create the registry on the process clock.
    let mut tempo = TempoRegistry::from_config(MonotonicClock::new(), &config);

    // 4. Poll until Ctrl+C.
    let mut reported = None;
    let mut ticker = tokio::time::interval(POLL_INTERVAL);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            biased;
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    error!("Failed to listen for shutdown signal: {}", e);
                }
                break;
            }
            _ = ticker.tick() => poll(&mut tempo, config.default_format, &mut reported),
        }
    }

    info!("{} has shut down.", ENGINE_NAME);
    Ok(())
}

/// One pass of the application loop.
///
/// `reported` remembers the last error logged so a latched error is not
/// repeated on every pass.
fn poll<C: Clock>(tempo: &mut TempoRegistry<C>, style: Format, reported: &mut Option<TempoError>) {
    let mut countdown = tempo.one_shot(COUNTDOWN);
    if !countdown.is_running() {
        countdown.start_hms("00:02:10");
    }
    if tempo.last_error() != *reported {
        *reported = tempo.last_error();
        if let Some(err) = reported {
            warn!("Timer engine reports {}: {}", err.code(), err);
        }
    }

    if tempo.periodic(HEARTBEAT).tick(1_000) {
        let remaining_ms = tempo.remaining_ms(COUNTDOWN);
        info!(
            "[HEARTBEAT] countdown: {} | {} ms | {} | {} | {}",
            render(remaining_ms, style),
            remaining_ms,
            render(remaining_ms, Format::HmsMs),
            render(remaining_ms, Format::Hms),
            render_remaining(&*tempo, COUNTDOWN, Format::AutoShort),
        );
    }
}
