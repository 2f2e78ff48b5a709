use std::io::{BufReader, BufWriter, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Instant;

use log::{debug, warn};
use uci::{Encoder, UciCommand};

use crate::lines::EngineLines;
use crate::{EngineConfig, EngineError};

/// What the engine produced before a read deadline.
#[derive(Debug)]
pub enum EngineLine {
    Line(String),
    TimedOut,
    Closed,
}

/// A running engine process.
///
/// Owned by exactly one analysis. Dropping it closes stdin, kills the
/// child and reaps it, whichever way the analysis ended.
pub struct EngineProcess {
    child: Child,
    stdin: Option<BufWriter<ChildStdin>>,
    lines: Receiver<String>,
    encoder: Encoder,
}

impl EngineProcess {
    pub fn spawn(config: &EngineConfig) -> Result<Self, EngineError> {
        let mut child = Command::new(&config.path)
            .args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| EngineError::Spawn {
                path: config.path.clone(),
                source,
            })?;

        debug!("Spawned engine {} (pid {})", config.path.display(), child.id());

        // Construct the guard before anything else can fail so the child is reaped.
        let stdin = child.stdin.take();
        let stdout = child.stdout.take();
        let (tx, rx) = mpsc::channel();
        let process = Self {
            child,
            stdin: stdin.map(BufWriter::new),
            lines: rx,
            encoder: Encoder {},
        };

        let stdout = stdout.ok_or_else(|| EngineError::Protocol("no stdout pipe".to_string()))?;
        if process.stdin.is_none() {
            return Err(EngineError::Protocol("no stdin pipe".to_string()));
        }

        // Ends by itself once the child's stdout closes.
        thread::Builder::new()
            .name(format!("engine-{}-stdout", process.id()))
            .spawn(move || {
                for line in EngineLines::new(BufReader::new(stdout)) {
                    match line {
                        Ok(line) => {
                            if tx.send(line).is_err() {
                                break;
                            }
                        }
                        Err(_) => break,
                    }
                }
            })?;

        Ok(process)
    }

    pub fn id(&self) -> u32 {
        self.child.id()
    }

    pub fn send(&mut self, command: &UciCommand) -> Result<(), EngineError> {
        let line = self.encoder.encode(command);
        debug!("Engine <- {}", line);

        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| EngineError::Protocol("engine stdin already closed".to_string()))?;

        stdin.write_all(line.as_bytes())?;
        stdin.write_all(b"\n")?;
        stdin.flush()?;
        Ok(())
    }

    pub fn send_all(&mut self, commands: &[UciCommand]) -> Result<(), EngineError> {
        for command in commands {
            self.send(command)?;
        }
        Ok(())
    }

    /// Waits for the next output line until `deadline`.
    pub fn next_line(&self, deadline: Instant) -> EngineLine {
        let timeout = deadline.saturating_duration_since(Instant::now());

        match self.lines.recv_timeout(timeout) {
            Ok(line) => {
                debug!("Engine -> {}", line);
                EngineLine::Line(line)
            }
            Err(RecvTimeoutError::Timeout) => EngineLine::TimedOut,
            Err(RecvTimeoutError::Disconnected) => EngineLine::Closed,
        }
    }
}

impl Drop for EngineProcess {
    fn drop(&mut self) {
        let pid = self.child.id();

        // Closing stdin is the polite shutdown signal for engines that are still reading.
        drop(self.stdin.take());

        if let Err(e) = self.child.kill() {
            debug!("Kill of engine {} failed: {}", pid, e);
        }

        match self.child.wait() {
            Ok(status) => debug!("Engine {} exited with {}", pid, status),
            Err(e) => warn!("Failed to reap engine {}: {}", pid, e),
        }
    }
}
