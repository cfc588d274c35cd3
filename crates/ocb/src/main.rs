use std::sync::Arc;

use ocb_copyleaks::CopyleaksClient;
use ocb_core::{
    config::Config, ports::RemoteScanner, review::ReviewService, store::SubmissionStore,
};

#[tokio::main]
async fn main() -> Result<(), ocb_core::Error> {
    ocb_core::logging::init("ocb")?;

    let cfg = Arc::new(Config::load()?);

    let store = SubmissionStore::open(&cfg.database_path).await?;

    let scanner: Option<Arc<dyn RemoteScanner>> = cfg.copyleaks.as_ref().map(|creds| {
        Arc::new(CopyleaksClient::new(
            creds.email.clone(),
            creds.api_key.clone(),
            cfg.scan_poll_interval,
        )) as Arc<dyn RemoteScanner>
    });
    if scanner.is_none() {
        tracing::info!("no Copyleaks credentials configured, running local-only checks");
    }

    let review = Arc::new(ReviewService::new(store, scanner));

    ocb_telegram::router::run(cfg, review)
        .await
        .map_err(|e| ocb_core::Error::External(format!("telegram bot failed: {e}")))?;

    Ok(())
}
