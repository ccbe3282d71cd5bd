use std::sync::Arc;

use clap::Parser;
use tokio::signal;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use floorwatch::application::scheduler::PollingScheduler;
use floorwatch::application::{AppContext, Notifier};
use floorwatch::infrastructure::{
    console_notifier::ConsoleNotifier, discord_notifier::DiscordNotifier,
    json_store::JsonFileWatchStore, multi_notifier::MultiNotifier,
    opensea_provider::OpenSeaPriceProvider,
};
use floorwatch::interfaces::commands::CommandRouter;
use floorwatch::interfaces::config::Config;
use floorwatch::interfaces::http_api::{build_router, ApiState};

#[derive(Parser, Debug)]
#[command(name = "floorwatch")]
struct Args {
    /// Path to config.yaml
    #[arg(long, default_value = "config.yaml")]
    config: String,

    /// Run one poll cycle and exit
    #[arg(long)]
    once: bool,

    /// Do not send direct messages (console only)
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("floorwatch=info".parse().expect("static directive")),
        )
        .init();
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    // 1) load config
    let cfg = match Config::load_from_file(&args.config) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Failed to load config {}: {:#}", args.config, e);
            std::process::exit(1);
        }
    };
    let (schedule, theme) = match (cfg.schedule(), cfg.theme()) {
        (Ok(s), Ok(t)) => (s, t),
        (Err(e), _) | (_, Err(e)) => {
            tracing::error!("Invalid config: {e:#}");
            std::process::exit(1);
        }
    };

    // 2) build infra; a store that cannot be read stops startup
    let store = match JsonFileWatchStore::load(&cfg.store_path).await {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(path = %cfg.store_path, "Failed to load watch store: {e}");
            std::process::exit(1);
        }
    };
    let provider = OpenSeaPriceProvider::new(cfg.opensea.base_url.clone(), cfg.opensea_api_key());
    if cfg.opensea_api_key().is_none() {
        tracing::warn!("opensea.api_key not set, requests may be rate limited");
    }

    let mut notifiers: Vec<Box<dyn Notifier>> = vec![Box::new(ConsoleNotifier::new())];
    if !args.dry_run {
        if let Some(token) = cfg.discord_token() {
            notifiers.push(Box::new(DiscordNotifier::new(token)));
        } else {
            tracing::warn!("discord.bot_token not set, DiscordNotifier disabled");
        }
    } else {
        tracing::warn!("--dry-run enabled: only console output");
    }
    let notifier = MultiNotifier::new(notifiers);
    tracing::info!(notifiers = notifier.len(), "notifiers initialized");

    // 3) application context
    let ctx = Arc::new(AppContext {
        store: Arc::new(store),
        provider: Arc::new(provider),
        notifier: Arc::new(notifier),
        policy: cfg.policy(),
        theme,
        schedule,
    });
    let scheduler = PollingScheduler::new(Arc::clone(&ctx));

    // 4) run
    if args.once {
        let (_tx, mut rx) = watch::channel(false);
        match scheduler.run_cycle(&mut rx).await {
            Ok(report) => tracing::info!(?report, "run once completed"),
            Err(e) => {
                tracing::error!("Poll cycle failed: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    if let Some(http) = &cfg.http {
        let state = ApiState {
            ctx: Arc::clone(&ctx),
            commands: Arc::new(CommandRouter::new(Arc::clone(&ctx), cfg.command_prefix.clone())),
            api_token: cfg.http_api_token(),
        };
        let listener = match tokio::net::TcpListener::bind(http.bind.as_str()).await {
            Ok(l) => l,
            Err(e) => {
                tracing::error!(bind = %http.bind, "Failed to bind http gateway: {e}");
                std::process::exit(1);
            }
        };
        tracing::info!(bind = %http.bind, "http gateway listening");
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, build_router(state)).await {
                tracing::error!("http gateway stopped: {e}");
            }
        });
    } else {
        tracing::warn!("http gateway disabled, no new watches can be registered");
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut handle = tokio::spawn(async move { scheduler.run(shutdown_rx).await });

    tokio::select! {
        _ = &mut handle => {}
        _ = signal::ctrl_c() => {
            tracing::info!("Shutdown signal received, finishing current watch");
            let _ = shutdown_tx.send(true);
            let _ = handle.await;
        }
    }

    tracing::info!("floorwatch stopped");
}
