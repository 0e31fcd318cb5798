//! The watch-and-sync loop

use std::sync::Arc;

use mirror_core::{SyncConfig, SyncEngine, SyncMode, SyncSession};
use mirror_transport::LftpTransport;
use tracing::{debug, info, warn};

use crate::cli::Cli;
use crate::error::Result;
use crate::interactive::InteractiveDecider;
use crate::{startup, watch};

/// Load configuration, run the startup checks, then sync until Ctrl+C.
pub async fn run(cli: Cli) -> Result<()> {
    let config = SyncConfig::load(&cli.config)?;
    info!("Loaded ignore patterns: {:?}", config.ignore);

    let transport = Arc::new(LftpTransport::new(
        config.endpoint(),
        config.transfer_settings(),
    ));
    startup::verify(&transport, &config).await?;

    let mode = SyncMode::from_flag(cli.check_conflicts);
    let session = SyncSession::from_config(&config);
    let (_watcher, mut events) = watch::start(session.local_root())?;

    for line in startup::banner(mode, &config) {
        println!("{}", line);
    }

    let engine = SyncEngine::new(session, mode, transport, Arc::new(InteractiveDecider));

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = &mut shutdown => {
                if let Err(e) = result {
                    warn!("Could not listen for Ctrl+C: {}", e);
                }
                break;
            }
            event = events.recv() => {
                let Some(event) = event else {
                    warn!("File watcher stopped");
                    break;
                };
                tokio::select! {
                    outcome = engine.handle(event) => {
                        debug!(%outcome, "Event handled");
                    }
                    _ = &mut shutdown => break,
                }
            }
        }
    }

    println!("Stopping sync...");
    Ok(())
}
