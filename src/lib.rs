pub mod api;
pub mod commands;
pub mod config;
pub mod content;
pub mod conversation;
pub mod error;
pub mod handlers;
pub mod rules;
pub mod server;
pub mod trace;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

use commands::Command;
use config::AppConfig;
use handlers::get_update_handler;
use server::AppState;
use std::net::SocketAddr;
use teloxide::{dispatching::Dispatcher, prelude::*, utils::command::BotCommands};
use tokio::signal;
use trace::init_tracing;
use tracing::{error, info, warn};

pub async fn run() -> Result<(), BoxError> {
    init_tracing();

    let cfg = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {}", e);
            return Err(Box::new(e) as BoxError);
        }
    };

    info!("Starting bot (hosting = {})", cfg.hosting);

    let state = AppState::new(cfg)?;

    if !state.config.hosting {
        return run_polling(state).await;
    }

    match state.bot() {
        Ok(bot) => register_webhook(&bot, &state.config).await,
        Err(e) => warn!("{e}; updates will be refused until a token is configured"),
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], state.config.port));
    let app = server::build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Bot shutdown complete.");
    Ok(())
}

/// Local development: long polling through the same handler tree.
async fn run_polling(state: AppState) -> Result<(), BoxError> {
    let bot = match state.bot() {
        Ok(bot) => bot,
        Err(e) => {
            error!("Polling mode needs a bot token: {}", e);
            return Err(Box::new(e) as BoxError);
        }
    };

    if let Err(e) = bot.delete_webhook().await {
        warn!("Could not delete webhook before polling: {e}");
    }

    info!("Running in polling mode (local development).");
    Dispatcher::builder(bot, get_update_handler())
        .dependencies(dptree::deps![
            state.config.clone(),
            state.api.clone(),
            state.rules.clone(),
            state.conversations.clone()
        ])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Dispatcher exited (polling mode).");
    Ok(())
}

/// Point Telegram at our URL and publish the command list. Failures are only
/// logged: the endpoint can still serve an already registered webhook.
async fn register_webhook(bot: &Bot, cfg: &AppConfig) {
    if let Some(url) = cfg.webhook_url.clone() {
        info!("Configuring webhook for URL: {}", url);
        let mut req = bot.set_webhook(url);
        if let Some(secret) = cfg.webhook_secret.clone() {
            req = req.secret_token(secret);
        }
        match req.await {
            Ok(_) => info!("Webhook configured"),
            Err(e) => error!("Failed to configure webhook: {}", e),
        }
    }

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        warn!("Failed to publish bot commands: {}", e);
    }
}

async fn shutdown_signal() {
    let ctrl = async {
        if let Err(err) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    {
        let mut term_stream =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(err) => {
                    error!("Failed to register SIGTERM handler: {}", err);
                    ctrl.await;
                    return;
                }
            };

        tokio::select! {
            _ = ctrl => {},
            _ = term_stream.recv() => {},
        }
    }
    #[cfg(not(unix))]
    {
        ctrl.await;
    }

    info!("Shutdown signal received (SIGINT/SIGTERM). Stopping server.");
}

