use std::{net::SocketAddr, sync::Arc};

use axum::{routing::get, Router};
use teloxide::{
    dispatching::Dispatcher,
    dptree,
    prelude::*,
    update_listeners::{webhooks, UpdateListener},
};

use ocb_core::{config::Config, review::ReviewService};

use crate::handlers;

#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub review: Arc<ReviewService>,
}

/// Start the bot: webhook mode when a public base URL is configured, long
/// polling otherwise. Runs until the dispatcher stops.
pub async fn run(cfg: Arc<Config>, review: Arc<ReviewService>) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.telegram_bot_token.clone());

    // Basic startup info.
    if let Ok(me) = bot.get_me().await {
        tracing::info!("originality bot started: @{}", me.username());
    }
    tracing::info!(
        remote_scanner = cfg.copyleaks.is_some(),
        database = %cfg.database_path.display(),
        "configuration loaded"
    );

    let state = Arc::new(AppState {
        cfg: cfg.clone(),
        review,
    });

    let handler = dptree::entry().branch(Update::filter_message().endpoint(handlers::handle_message));

    let mut dispatcher = Dispatcher::builder(bot.clone(), handler)
        .dependencies(dptree::deps![state])
        .build();

    match cfg.webhook_url() {
        Some(url) => {
            let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));
            let url = url.parse()?;

            let (mut listener, stop_flag, bot_router) =
                webhooks::axum_to_router(bot, webhooks::Options::new(addr, url)).await?;

            // Plain health check on the root path, next to the webhook route.
            let app = Router::new().route("/", get(health)).merge(bot_router);

            let stop_token = listener.stop_token();
            tokio::spawn(async move {
                axum::Server::bind(&addr)
                    .serve(app.into_make_service())
                    .with_graceful_shutdown(stop_flag)
                    .await
                    .map_err(|err| {
                        stop_token.stop();
                        err
                    })
                    .expect("axum server error");
            });

            tracing::info!(port = cfg.port, "webhook listener started");
            dispatcher
                .dispatch_with_listener(
                    listener,
                    LoggingErrorHandler::with_custom_text("An error from the update listener"),
                )
                .await;
        }
        None => {
            tracing::info!("no WEBHOOK_BASE_URL configured, using long polling");
            dispatcher.dispatch().await;
        }
    }

    Ok(())
}

async fn health() -> &'static str {
    "Originality bot is running"
}
