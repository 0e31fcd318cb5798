//! Checks run before watching starts

use colored::Colorize;
use mirror_core::{SyncConfig, SyncMode};
use mirror_transport::{LftpTransport, RemoteTransport};
use tracing::info;

use crate::error::{CliError, Result};

/// Make sure the transfer client runs and the remote root can be listed.
pub async fn verify(transport: &LftpTransport, config: &SyncConfig) -> Result<()> {
    transport.probe_binary().await?;

    let remote_root = config.remote_root();
    let endpoint = transport.endpoint().to_string();
    info!("Testing connection to {}", endpoint);
    transport
        .check_connection(remote_root.as_str())
        .await
        .map_err(|source| CliError::Connection {
            endpoint: endpoint.clone(),
            source,
        })?;

    println!(
        "{} Connection to {} OK. Remote dir: {}",
        "✓".green(),
        endpoint,
        remote_root
    );
    Ok(())
}

/// Lines announcing that the sync loop is running.
pub fn banner(mode: SyncMode, config: &SyncConfig) -> Vec<String> {
    let mut lines = vec![format!(
        "Sync started ({} mode). Press Ctrl+C to stop.",
        mode
    )];
    lines.push(match mode {
        SyncMode::CheckConflicts => {
            "   When conflicts are detected, you'll be prompted to resolve them.".to_string()
        }
        SyncMode::Direct => "   Use --check-conflicts to enable conflict resolution.".to_string(),
    });
    lines.push(format!(
        "   Watching {} -> {}{}",
        config.directories.local.display(),
        config.endpoint(),
        config.remote_root()
    ));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SyncConfig {
        let temp = tempfile::TempDir::new().unwrap();
        let site = temp.path().join("site");
        std::fs::create_dir(&site).unwrap();
        let path = temp.path().join("sync_config.json");
        let json = format!(
            r#"{{"ftp": {{"host": "ftp.example.com", "user": "u"}},
                "directories": {{"remote": "/www", "local": "{}"}}}}"#,
            site.to_string_lossy().replace('\\', "/")
        );
        std::fs::write(&path, json).unwrap();
        SyncConfig::load(&path).unwrap()
    }

    #[test]
    fn banner_names_the_mode() {
        let config = config();

        let direct = banner(SyncMode::Direct, &config);
        assert!(direct[0].contains("standard mode"));
        assert!(direct[1].contains("--check-conflicts"));

        let checking = banner(SyncMode::CheckConflicts, &config);
        assert!(checking[0].contains("conflict resolution mode"));
        assert!(checking[2].contains("ftp.example.com:21/www"));
    }
}
