use std::{
    path::PathBuf,
    process::Stdio,
    time::Duration,
};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::{
    core::stage::PipelineStage,
    error::{PipelineError, Result},
};

/// The deterministic first stage: trip constraints in, candidate JSON text out.
#[async_trait]
pub trait ComputationStage: Send + Sync {
    /// Run once with the serialized trip request and return raw stdout.
    async fn run(&self, serialized_request: &str) -> Result<String>;
}

/// Runs `<interpreter> <program> <request>` as a child process.
#[derive(Debug, Clone)]
pub struct ProcessInvoker {
    interpreter: PathBuf,
    program: PathBuf,
    timeout: Option<Duration>,
}

impl ProcessInvoker {
    pub fn new(interpreter: impl Into<PathBuf>, program: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: interpreter.into(),
            program: program.into(),
            timeout: None,
        }
    }

    /// Kill the process and fail if it has not exited within `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl ComputationStage for ProcessInvoker {
    async fn run(&self, serialized_request: &str) -> Result<String> {
        let mut command = Command::new(&self.interpreter);
        command
            .arg(&self.program)
            .arg(serialized_request)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = command.spawn().map_err(|err| {
            PipelineError::ComputationLaunch(format!("{}: {}", self.interpreter.display(), err))
        })?;

        debug!(
            target: "itinerary::compute",
            pid = child.id(),
            interpreter = %self.interpreter.display(),
            program = %self.program.display(),
            "computation process started"
        );

        // Resolves only after exit and EOF on both pipes.
        let collected = child.wait_with_output();
        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, collected).await.map_err(|_| {
                warn!(
                    target: "itinerary::compute",
                    timeout_ms = limit.as_millis() as u64,
                    "computation process killed after timeout"
                );
                PipelineError::Timeout {
                    stage: PipelineStage::Computing,
                    after: limit,
                }
            })?,
            None => collected.await,
        }
        .map_err(|err| PipelineError::ComputationProcess {
            status: "output collection failed".to_string(),
            stderr: err.to_string(),
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        debug!(
            target: "itinerary::compute",
            status = %output.status,
            stdout_bytes = stdout.len(),
            stderr_bytes = stderr.len(),
            "computation process exited"
        );

        if !output.status.success() {
            return Err(PipelineError::ComputationProcess {
                status: output.status.to_string(),
                stderr: stderr.trim_end().to_string(),
            });
        }

        Ok(stdout)
    }
}
