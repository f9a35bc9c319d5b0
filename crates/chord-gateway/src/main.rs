//! Chord bot entry point
//!
//! Run with:
//! ```bash
//! DISCORD_TOKEN=... cargo run -p chord-gateway --bin chord-bot
//! ```
//!
//! Configuration is loaded from environment variables (and `.env` if present).

use chord_common::{
    try_init_tracing, try_init_tracing_with_config, AppConfig, AppError, TracingConfig,
};
use chord_gateway::bot::{run_event_loop, PingBot};
use chord_gateway::rest::RestClient;
use chord_gateway::{GatewaySession, SessionOptions};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            let _ = try_init_tracing();
            let e = AppError::from(e);
            error!(error = %e, code = e.error_code(), "Failed to load configuration");
            std::process::exit(e.exit_code());
        }
    };

    if let Err(e) = try_init_tracing_with_config(&TracingConfig::for_app(&config.app)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    if let Err(e) = run(config).await {
        error!(error = %e, code = e.error_code(), "Bot stopped");
        std::process::exit(e.exit_code());
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    info!(
        app = %config.app.name,
        env = ?config.app.env,
        intents = %config.discord.intents,
        "Starting bot"
    );

    let options = SessionOptions::from_config(&config.discord);
    let mut session = GatewaySession::connect_with(&options)
        .await
        .map_err(AppError::gateway)?;

    info!(
        bot = %session.self_user().display_name(),
        "Bot is now running, press Ctrl+C to exit"
    );

    let bot = PingBot::new(config.bot.command_prefix.clone(), session.self_user().id);
    let rest = RestClient::from_config(&config.discord);

    let outcome = tokio::select! {
        result = run_event_loop(&mut session, &bot, &rest) => Some(result),
        () = shutdown_signal() => None,
    };

    let result = match outcome {
        None => Ok(()),
        Some(Ok(exit)) => Err(AppError::gateway(format!(
            "gateway ended the session ({exit:?})"
        ))),
        Some(Err(e)) => Err(AppError::gateway(e)),
    };

    let closed = session.shutdown().await;
    result?;
    closed.map_err(AppError::gateway)?;

    info!("Bot shutdown gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("Signal received, shutting down");
}
