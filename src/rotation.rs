//! Egress identity rotation.
//!
//! When the market throttles us, a new egress IP (e.g. a different VPN
//! endpoint) usually gets a fresh budget. Rotation is an external side
//! effect, so it sits behind a trait and the default implementation just
//! shells out to a VPN CLI.

use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::config::RotationConfig;

/// Pause between tearing the old identity down and bringing a new one up.
const DEFAULT_SETTLE: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RotationError {
    #[error("No rotation command configured")]
    NotConfigured,

    #[error("Failed to start {program}: {reason}")]
    Spawn { program: String, reason: String },

    #[error("{program} timed out after {secs}s")]
    TimedOut { program: String, secs: u64 },

    #[error("{program} rejected the request: {stderr}")]
    Rejected { program: String, stderr: String },
}

/// Something that can swap the network identity used for remote calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityRotator: Send + Sync {
    async fn rotate(&self) -> Result<(), RotationError>;

    fn name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Command rotator
// ---------------------------------------------------------------------------

/// Rotates by running a disconnect command, pausing, then a connect command.
pub struct CommandRotator {
    connect: Vec<String>,
    disconnect: Vec<String>,
    timeout: Duration,
    settle: Duration,
}

impl CommandRotator {
    pub fn from_config(cfg: &RotationConfig) -> Result<Self, RotationError> {
        if cfg.connect.is_empty() {
            return Err(RotationError::NotConfigured);
        }
        Ok(Self {
            connect: cfg.connect.clone(),
            disconnect: cfg.disconnect.clone(),
            timeout: Duration::from_secs(cfg.timeout_secs),
            settle: DEFAULT_SETTLE,
        })
    }

    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    async fn run(&self, argv: &[String]) -> Result<std::process::Output, RotationError> {
        let (program, args) = argv.split_first().ok_or(RotationError::NotConfigured)?;

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| RotationError::Spawn {
                program: program.clone(),
                reason: e.to_string(),
            })?;

        match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(e)) => Err(RotationError::Spawn {
                program: program.clone(),
                reason: e.to_string(),
            }),
            Err(_) => Err(RotationError::TimedOut {
                program: program.clone(),
                secs: self.timeout.as_secs(),
            }),
        }
    }
}

#[async_trait]
impl IdentityRotator for CommandRotator {
    async fn rotate(&self) -> Result<(), RotationError> {
        info!(rotator = %self.name(), "Switching egress identity");

        if !self.disconnect.is_empty() {
            // A failed disconnect is not fatal; the connect may still succeed.
            if let Err(e) = self.run(&self.disconnect).await {
                warn!(error = %e, "Disconnect command failed");
            }
            tokio::time::sleep(self.settle).await;
        }

        let output = self.run(&self.connect).await?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        debug!(status = ?output.status.code(), stdout = %stdout.trim(), "Connect command finished");

        if output.status.success() || stdout.contains("Connected") {
            info!("Connected to new egress endpoint");
            Ok(())
        } else {
            Err(RotationError::Rejected {
                program: self.name().to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }

    fn name(&self) -> &str {
        self.connect.first().map(String::as_str).unwrap_or("command")
    }
}
