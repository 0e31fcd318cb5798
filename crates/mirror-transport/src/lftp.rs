//! `lftp` subprocess transport
//!
//! Each operation is a short lftp script passed with `-e`. The client is
//! started with credentials, port and host on the command line, its output
//! is captured, and the whole call runs under a timeout.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::endpoint::{Endpoint, TransferSettings};
use crate::error::{Result, TransportError};
use crate::listing::parse_listing;
use crate::RemoteTransport;

/// Extra time granted to the subprocess beyond lftp's own network timeout
const CHECK_GRACE: Duration = Duration::from_secs(5);
/// Limit for `lftp --version`
const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Captured output of a successful client run
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// [`RemoteTransport`] backed by the `lftp` command-line client
#[derive(Debug, Clone)]
pub struct LftpTransport {
    endpoint: Endpoint,
    settings: TransferSettings,
}

impl LftpTransport {
    pub fn new(endpoint: Endpoint, settings: TransferSettings) -> Self {
        Self { endpoint, settings }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn settings(&self) -> &TransferSettings {
        &self.settings
    }

    /// Check that the client binary can be started at all.
    pub async fn probe_binary(&self) -> Result<()> {
        let mut cmd = Command::new(&self.settings.binary);
        cmd.arg("--version")
            .stdin(Stdio::null())
            .kill_on_drop(true);
        self.finish(cmd, PROBE_TIMEOUT).await.map(|_| ())
    }

    /// Run `commands` as one lftp session, bounded by `limit`.
    pub async fn run_script(&self, commands: &[String], limit: Duration) -> Result<CommandOutput> {
        let script = self.script(commands);
        debug!(
            target: "mirror_transport::lftp",
            endpoint = %self.endpoint,
            script = %script,
            "Running lftp"
        );

        let mut cmd = Command::new(&self.settings.binary);
        cmd.arg("-u")
            .arg(format!("{},{}", self.endpoint.user, self.endpoint.password))
            .arg("-p")
            .arg(self.endpoint.port.to_string())
            .arg(&self.endpoint.host)
            .arg("-e")
            .arg(script)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        self.finish(cmd, limit).await
    }

    /// Prefix `commands` with the session settings and terminate the session.
    /// A failing command aborts the run with a non-zero exit.
    fn script(&self, commands: &[String]) -> String {
        let mut lines = vec![
            "set cmd:fail-exit yes".to_string(),
            "set net:max-retries 2".to_string(),
            format!("set net:timeout {}", self.settings.connect_timeout.as_secs().max(1)),
        ];
        lines.extend(commands.iter().cloned());
        lines.push("bye".to_string());
        lines.join("; ")
    }

    async fn finish(&self, mut cmd: Command, limit: Duration) -> Result<CommandOutput> {
        let output = match tokio::time::timeout(limit, cmd.output()).await {
            Err(_) => {
                return Err(TransportError::Timeout {
                    seconds: limit.as_secs(),
                });
            }
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(TransportError::BinaryNotFound {
                    binary: self.settings.binary.clone(),
                });
            }
            Ok(Err(e)) => return Err(TransportError::Io(e)),
            Ok(Ok(output)) => output,
        };

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if output.status.success() {
            Ok(CommandOutput { stdout, stderr })
        } else {
            Err(TransportError::CommandFailed {
                code: output.status.code().unwrap_or(-1),
                stdout,
                stderr,
            })
        }
    }
}

#[async_trait]
impl RemoteTransport for LftpTransport {
    async fn list(&self, remote_dir: &str) -> Result<Vec<String>> {
        let output = self
            .run_script(&list_commands(remote_dir), self.settings.timeout)
            .await?;
        Ok(parse_listing(&output.stdout))
    }

    async fn download(&self, remote_dir: &str, filename: &str, dest: &Path) -> Result<()> {
        self.run_script(
            &download_commands(remote_dir, filename, dest),
            self.settings.timeout,
        )
        .await?;
        if dest.exists() {
            Ok(())
        } else {
            Err(TransportError::MissingOutput {
                path: dest.to_path_buf(),
            })
        }
    }

    async fn upload(&self, local: &Path, remote_dir: &str, create_dir: bool) -> Result<()> {
        self.run_script(
            &upload_commands(local, remote_dir, create_dir),
            self.settings.timeout,
        )
        .await
        .map(|_| ())
    }

    async fn check_connection(&self, remote_root: &str) -> Result<()> {
        let commands = vec![format!("ls {}", quote(remote_root))];
        self.run_script(&commands, self.settings.connect_timeout + CHECK_GRACE)
            .await
            .map(|_| ())
    }
}

/// Quote an argument for the lftp command parser.
pub fn quote(arg: &str) -> String {
    let escaped = arg.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{}\"", escaped)
}

fn list_commands(remote_dir: &str) -> Vec<String> {
    vec![format!("cd {}", quote(remote_dir)), "ls".to_string()]
}

fn download_commands(remote_dir: &str, filename: &str, dest: &Path) -> Vec<String> {
    vec![
        "set xfer:clobber on".to_string(),
        format!("cd {}", quote(remote_dir)),
        format!(
            "get {} -o {}",
            quote(filename),
            quote(&dest.to_string_lossy())
        ),
    ]
}

fn upload_commands(local: &Path, remote_dir: &str, create_dir: bool) -> Vec<String> {
    let mut commands = Vec::with_capacity(3);
    if create_dir {
        commands.push(format!("mkdir -p {}", quote(remote_dir)));
    }
    commands.push(format!("cd {}", quote(remote_dir)));
    commands.push(format!("put {}", quote(&local.to_string_lossy())));
    commands
}
