//! The reference `Bot` transport (`spec.md` §6): a child process's
//! stdin/stdout as a bidirectional byte stream.
//!
//! Framing reuses the same self-describing binary container as the `Step`
//! log (`photon_schema::codec::{encode_request, decode_control}`), with a
//! 4-byte big-endian length prefix so a reader can locate one container's
//! end inside the raw pipe bytes without scanning for an Avro sync marker.
//! The bot's stdout carries only response frames; stray writes from a
//! misbehaving bot are a protocol violation the reader will fail to decode
//! as a frame -- the bot's own logging must go via stderr, which this
//! transport leaves connected to the engine's own stderr untouched.
//!
//! Per `spec.md` §5, each bot gets its own OS thread for the blocking
//! read/write pair; [`SubprocessBot::call`] enforces the per-call timeout
//! with [`mpsc::Receiver::recv_timeout`] rather than an OS-level alarm.

use anyhow::Context;
use std::io::{Read, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use photon_schema::codec::{decode_control, encode_request};
use photon_schema::{ControllerState, Request};

use crate::bot::Bot;
use crate::error::BotError;

fn write_frame(writer: &mut impl Write, bytes: &[u8]) -> std::io::Result<()> {
    let len = u32::try_from(bytes.len()).unwrap_or(u32::MAX);
    writer.write_all(&len.to_be_bytes())?;
    writer.write_all(bytes)?;
    writer.flush()
}

fn read_frame(reader: &mut impl Read) -> std::io::Result<Vec<u8>> {
    let mut len_bytes = [0u8; 4];
    reader.read_exact(&mut len_bytes)?;
    let len = u32::from_be_bytes(len_bytes) as usize;
    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf)?;
    Ok(buf)
}

enum WorkerMsg {
    Call(Request),
    Shutdown,
}

type CallResult = Result<Option<ControllerState>, BotError>;

/// A `Bot` backed by a spawned child process speaking the framed binary
/// protocol over its stdin/stdout.
pub struct SubprocessBot {
    child: Child,
    to_worker: Sender<WorkerMsg>,
    from_worker: mpsc::Receiver<CallResult>,
    worker: Option<JoinHandle<()>>,
    timeout: Duration,
    poisoned: bool,
}

impl SubprocessBot {
    /// Spawn `command` with piped stdin/stdout and inherited stderr, and
    /// start its dedicated I/O worker thread. `timeout` bounds every
    /// subsequent [`Bot::call`].
    pub fn spawn(mut command: Command, timeout: Duration) -> Result<Self, BotError> {
        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .context("failed to spawn bot subprocess")
            .map_err(|e| BotError::Process(format!("{e:#}")))?;
        let stdin = child
            .stdin
            .take()
            .context("child stdin was not piped")
            .map_err(|e| BotError::Process(format!("{e:#}")))?;
        let stdout = child
            .stdout
            .take()
            .context("child stdout was not piped")
            .map_err(|e| BotError::Process(format!("{e:#}")))?;

        let (to_worker, worker_rx) = mpsc::channel::<WorkerMsg>();
        let (worker_tx, from_worker) = mpsc::channel::<CallResult>();
        let worker = std::thread::spawn(move || worker_loop(stdin, stdout, worker_rx, worker_tx));

        Ok(Self {
            child,
            to_worker,
            from_worker,
            worker: Some(worker),
            timeout,
            poisoned: false,
        })
    }
}

fn worker_loop(
    mut stdin: ChildStdin,
    mut stdout: ChildStdout,
    inbox: mpsc::Receiver<WorkerMsg>,
    outbox: Sender<CallResult>,
) {
    for msg in inbox {
        match msg {
            WorkerMsg::Call(request) => {
                let result = (|| -> Result<Option<ControllerState>, BotError> {
                    let bytes = encode_request(&request)?;
                    write_frame(&mut stdin, &bytes)?;
                    let response = read_frame(&mut stdout)?;
                    Ok(decode_control(&response)?)
                })();
                // The caller may already have given up on `recv_timeout`;
                // a disconnected outbox just means this reply is discarded.
                let _ = outbox.send(result);
            }
            WorkerMsg::Shutdown => {
                drop(stdin);
                return;
            }
        }
    }
}

impl Bot for SubprocessBot {
    fn call(&mut self, request: &Request) -> Result<Option<ControllerState>, BotError> {
        if self.poisoned {
            return Err(BotError::Closed);
        }
        if self.to_worker.send(WorkerMsg::Call(request.clone())).is_err() {
            self.poisoned = true;
            return Err(BotError::Closed);
        }
        match self.from_worker.recv_timeout(self.timeout) {
            Ok(result) => {
                if result.is_err() {
                    self.poisoned = true;
                }
                result
            }
            Err(RecvTimeoutError::Timeout) => {
                // The worker thread may still be blocked on I/O; abandon it
                // rather than waiting further. `close` will kill the
                // process, which unblocks and ends the worker.
                self.poisoned = true;
                Err(BotError::Timeout(self.timeout))
            }
            Err(RecvTimeoutError::Disconnected) => {
                self.poisoned = true;
                Err(BotError::Closed)
            }
        }
    }

    fn close(&mut self) -> Result<(), BotError> {
        let _ = self.to_worker.send(WorkerMsg::Shutdown);
        if let Some(handle) = self.worker.take() {
            let deadline = Instant::now() + Duration::from_millis(200);
            while Instant::now() < deadline {
                if handle.is_finished() {
                    let _ = handle.join();
                    break;
                }
                std::thread::sleep(Duration::from_millis(5));
            }
        }
        match self.child.try_wait() {
            Ok(Some(_)) => {}
            _ => {
                let _ = self.child.kill();
                let _ = self.child.wait();
            }
        }
        Ok(())
    }
}

impl Drop for SubprocessBot {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_roundtrips_through_an_in_memory_pipe() {
        let payload = b"hello photonai".to_vec();
        let mut buf = Vec::new();
        write_frame(&mut buf, &payload).unwrap();
        let mut cursor = std::io::Cursor::new(buf);
        let back = read_frame(&mut cursor).unwrap();
        assert_eq!(back, payload);
    }

    // A real subprocess round-trip (spawning `cat`-like echo bots) belongs
    // to an integration test with a purpose-built fixture binary; exercised
    // in `tests/subprocess_echo.rs`.
}
