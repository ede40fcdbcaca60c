//! m4p-client entry point.
//!
//! Wires together the configuration, the injector backend, the UDP transport
//! and the supervisor, then runs until Ctrl+C or SIGTERM.
//!
//! # Usage
//!
//! ```text
//! m4p-client [HOST] [PORT] [OPTIONS]
//!
//! Options:
//!   --config <PATH>        Config file [default: platform config dir]
//!   --scale-x <F>          Horizontal calibration factor
//!   --scale-y <F>          Vertical calibration factor
//!   --retry-delay <SECS>   Pause between session attempts
//!   --backend <log|uinput> Injector backend
//!   --sleep-listener       Enable the UDP sleep listener
//! ```
//!
//! Every option can also be set through an `M4P_*` environment variable.
//! Command-line values override the config file, which overrides defaults.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load_config() + Cli overrides
//!  └─ Supervisor::run()             -- fixed-delay reconnect loop
//!       └─ SessionLoop::run()       -- dial, receive, map, inject
//!            ├─ UdpTransport        -- JSON datagrams over UDP
//!            ├─ ActionMapper        -- events -> semantic actions
//!            └─ Injector            -- LogInjector / UinputInjector
//!  └─ SleepListener::run()          -- optional, same cancellation token
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use m4p_client::application::inject_actions::{InjectActionsUseCase, Injector};
use m4p_client::application::session::SessionLoop;
use m4p_client::application::supervisor::Supervisor;
use m4p_client::infrastructure::input_injection::log::LogInjector;
use m4p_client::infrastructure::network::UdpTransport;
use m4p_client::infrastructure::sleep_listener::{SleepListener, SystemSuspender};
use m4p_client::infrastructure::storage::config::{
    load_config, ClientConfig, InjectorBackend, InjectorConfig,
};
use m4p_core::ActionMapper;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Replays a TV magic remote as local keyboard and mouse input.
#[derive(Debug, Parser)]
#[command(name = "m4p-client", version)]
struct Cli {
    /// Hostname or IP address of the TV.
    #[arg(env = "M4P_HOST")]
    host: Option<String>,

    /// UDP port of the TV app.
    #[arg(env = "M4P_PORT")]
    port: Option<u16>,

    /// Path to a TOML config file.  Must exist when given.
    #[arg(long, env = "M4P_CONFIG")]
    config: Option<PathBuf>,

    /// Horizontal calibration factor.
    #[arg(long, env = "M4P_SCALE_X")]
    scale_x: Option<f64>,

    /// Vertical calibration factor.
    #[arg(long, env = "M4P_SCALE_Y")]
    scale_y: Option<f64>,

    /// Seconds to wait between session attempts.
    #[arg(long, env = "M4P_RETRY_DELAY")]
    retry_delay: Option<u64>,

    /// Injector backend.
    #[arg(long, value_enum, env = "M4P_BACKEND")]
    backend: Option<InjectorBackend>,

    /// Listen for `sleep` datagrams and suspend the machine.
    #[arg(long, env = "M4P_SLEEP_LISTENER")]
    sleep_listener: bool,
}

impl Cli {
    /// Applies command-line overrides on top of `config`.
    fn apply(self, mut config: ClientConfig) -> ClientConfig {
        if let Some(host) = self.host {
            config.device.host = host;
        }
        if let Some(port) = self.port {
            config.device.port = port;
        }
        if let Some(scale_x) = self.scale_x {
            config.calibration.scale_x = scale_x;
        }
        if let Some(scale_y) = self.scale_y {
            config.calibration.scale_y = scale_y;
        }
        if let Some(secs) = self.retry_delay {
            config.session.retry_delay_secs = secs;
        }
        if let Some(backend) = self.backend {
            config.injector.backend = backend;
        }
        if self.sleep_listener {
            config.sleep_listener.enabled = true;
        }
        config
    }
}

// ── Wiring helpers ────────────────────────────────────────────────────────────

fn build_injector(cfg: &InjectorConfig) -> anyhow::Result<Arc<dyn Injector>> {
    match cfg.backend {
        InjectorBackend::Log => Ok(Arc::new(LogInjector::new())),
        #[cfg(target_os = "linux")]
        InjectorBackend::Uinput => {
            use m4p_client::infrastructure::input_injection::linux::UinputInjector;
            let injector = UinputInjector::new(cfg.screen_width, cfg.screen_height)
                .context("failed to create uinput device")?;
            Ok(Arc::new(injector))
        }
        #[cfg(not(target_os = "linux"))]
        InjectorBackend::Uinput => anyhow::bail!("the uinput backend is only available on Linux"),
    }
}

/// Resolves once Ctrl+C (or SIGTERM on Unix) is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("cannot listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = ctrl_c => {}
                    _ = term.recv() => {}
                }
            }
            Err(e) => {
                warn!("cannot listen for SIGTERM: {e}");
                ctrl_c.await;
            }
        }
    }

    #[cfg(not(unix))]
    ctrl_c.await;
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.clone();
    let file_config = load_config(config_path.as_deref()).with_context(|| match &config_path {
        Some(path) => format!("failed to load config from {}", path.display()),
        None => "failed to load config".to_string(),
    })?;
    let config = cli.apply(file_config);

    // RUST_LOG wins over the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .init();

    info!("m4p-client starting");

    let calibration = config
        .calibration_profile()
        .context("invalid calibration")?;
    let transport_config = config
        .transport_config()
        .context("invalid session settings")?;
    let injector = build_injector(&config.injector)?;
    let endpoint = config.endpoint();
    info!(
        "device {endpoint}, calibration {} x {}, backend {:?}",
        calibration.scale_x(),
        calibration.scale_y(),
        config.injector.backend
    );

    let cancel = CancellationToken::new();

    // ── Shutdown handler ──────────────────────────────────────────────────────
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("shutdown signal received");
        shutdown.cancel();
    });

    // ── Sleep listener ────────────────────────────────────────────────────────
    let mut listener_task = None;
    if config.sleep_listener.enabled {
        match config.sleep_listener_addr() {
            Ok(addr) => match SleepListener::bind(addr, Arc::new(SystemSuspender)).await {
                Ok(listener) => listener_task = Some(tokio::spawn(listener.run(cancel.clone()))),
                Err(e) => warn!("sleep listener disabled: {e}"),
            },
            Err(e) => warn!("sleep listener disabled: {e}"),
        }
    }

    // ── Supervisor ────────────────────────────────────────────────────────────
    let session = SessionLoop::new(
        Arc::new(UdpTransport::new(transport_config)),
        ActionMapper::new(calibration),
        InjectActionsUseCase::new(injector),
    );
    let supervisor = Supervisor::new(session, endpoint, config.retry_delay());
    let attempts = supervisor.run(cancel.clone()).await;

    if let Some(task) = listener_task {
        if let Err(e) = task.await {
            warn!("sleep listener task failed: {e}");
        }
    }

    info!("m4p-client stopped after {attempts} session attempt(s)");
    Ok(())
}
