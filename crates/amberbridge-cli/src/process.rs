//! A live force-field engine running as a child process.
//!
//! Requests and replies are single-line JSON objects exchanged over the child's stdin and
//! stdout. Every request carries a `request` tag; every reply carries a `status` tag of
//! either `ok` or `error`.

use amberbridge::core::energy::components::{EnergyBreakdown, TopologyCounts};
use amberbridge::engine::backend::EvaluatorError;
use amberbridge::engine::backend::live::LiveEngine;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use thiserror::Error;
use tracing::{debug, info, trace, warn};

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("The backend command is empty")]
    EmptyCommand,

    #[error("Failed to launch force-field process '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to communicate with the force-field process: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed message from the force-field process: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Force-field process closed its output before replying to '{0}'")]
    Closed(&'static str),

    #[error("Force-field process rejected '{request}': {message}")]
    Remote {
        request: &'static str,
        message: String,
    },

    #[error("Reply to '{request}' is missing the '{field}' field")]
    MissingField {
        request: &'static str,
        field: &'static str,
    },

    #[error("The force-field process has already been shut down")]
    ShutDown,
}

#[derive(Debug, Serialize)]
#[serde(tag = "request", rename_all = "snake_case")]
enum Request<'a> {
    Setup {
        topology: &'a Path,
        #[serde(skip_serializing_if = "Option::is_none")]
        coordinates: Option<&'a Path>,
    },
    Topology,
    SetPositions {
        positions: &'a [f64],
    },
    EnergyForces,
    Shutdown,
}

impl Request<'_> {
    fn name(&self) -> &'static str {
        match self {
            Request::Setup { .. } => "setup",
            Request::Topology => "topology",
            Request::SetPositions { .. } => "set_positions",
            Request::EnergyForces => "energy_forces",
            Request::Shutdown => "shutdown",
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct Payload {
    #[serde(default)]
    energy: Option<EnergyBreakdown>,
    #[serde(default)]
    forces: Option<Vec<f64>>,
    #[serde(default)]
    topology: Option<TopologyCounts>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum Reply {
    Ok(Payload),
    Error { message: String },
}

/// Topology and restart files handed to the process on startup.
#[derive(Debug, Clone)]
pub struct SetupFiles {
    pub topology: PathBuf,
    pub coordinates: Option<PathBuf>,
}

struct Channel {
    child: Child,
    stdin: BufWriter<ChildStdin>,
    stdout: BufReader<ChildStdout>,
}

pub struct ProcessEngine {
    channel: Option<Channel>,
    topology: TopologyCounts,
}

impl ProcessEngine {
    /// Launches `command`, loads the topology into it and reads back its term counts.
    pub fn spawn(command: &[String], files: &SetupFiles) -> Result<Self, ProcessError> {
        let (program, args) = command.split_first().ok_or(ProcessError::EmptyCommand)?;
        info!("Launching force-field process: {}", command.join(" "));

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| ProcessError::Spawn {
                program: program.clone(),
                source,
            })?;

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(ProcessError::Closed("setup"));
        };

        let mut engine = Self {
            channel: Some(Channel {
                child,
                stdin: BufWriter::new(stdin),
                stdout: BufReader::new(stdout),
            }),
            topology: TopologyCounts::default(),
        };

        engine.call(&Request::Setup {
            topology: &files.topology,
            coordinates: files.coordinates.as_deref(),
        })?;
        let payload = engine.call(&Request::Topology)?;
        engine.topology = payload.topology.ok_or(ProcessError::MissingField {
            request: "topology",
            field: "topology",
        })?;
        Ok(engine)
    }

    fn call(&mut self, request: &Request<'_>) -> Result<Payload, ProcessError> {
        let channel = self.channel.as_mut().ok_or(ProcessError::ShutDown)?;
        let name = request.name();

        let line = serde_json::to_string(request)?;
        trace!(request = name, "Sending request to force-field process.");
        channel.stdin.write_all(line.as_bytes())?;
        channel.stdin.write_all(b"\n")?;
        channel.stdin.flush()?;

        let mut reply = String::new();
        if channel.stdout.read_line(&mut reply)? == 0 {
            return Err(ProcessError::Closed(name));
        }
        match serde_json::from_str(reply.trim_end())? {
            Reply::Ok(payload) => Ok(payload),
            Reply::Error { message } => Err(ProcessError::Remote {
                request: name,
                message,
            }),
        }
    }

    fn shutdown(&mut self) -> Result<(), ProcessError> {
        if self.channel.is_none() {
            return Ok(());
        }
        let result = self.call(&Request::Shutdown).map(|_| ());
        if let Some(mut channel) = self.channel.take() {
            drop(channel.stdin);
            let status = channel.child.wait()?;
            debug!(%status, "Force-field process exited.");
        }
        result
    }
}

impl LiveEngine for ProcessEngine {
    fn set_positions(&mut self, coordinates: &[f64]) -> Result<(), EvaluatorError> {
        self.call(&Request::SetPositions {
            positions: coordinates,
        })?;
        Ok(())
    }

    fn energy_forces(&mut self) -> Result<(EnergyBreakdown, Vec<f64>), EvaluatorError> {
        let payload = self.call(&Request::EnergyForces)?;
        let energy = payload.energy.ok_or(ProcessError::MissingField {
            request: "energy_forces",
            field: "energy",
        })?;
        let forces = payload.forces.ok_or(ProcessError::MissingField {
            request: "energy_forces",
            field: "forces",
        })?;
        Ok((energy, forces))
    }

    fn topology_counts(&self) -> TopologyCounts {
        self.topology
    }

    fn release(&mut self) -> Result<(), EvaluatorError> {
        Ok(self.shutdown()?)
    }
}

impl Drop for ProcessEngine {
    fn drop(&mut self) {
        if let Some(mut channel) = self.channel.take() {
            warn!("Force-field process was not shut down; killing it.");
            let _ = channel.child.kill();
            let _ = channel.child.wait();
        }
    }
}
