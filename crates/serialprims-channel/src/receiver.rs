use std::io::{ErrorKind, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;

use tracing::{debug, trace, warn};

use crate::buffer::BoundedByteBuffer;
use crate::error::ReceiveError;

/// Maximum number of bytes requested from the transport per read.
pub const RECEIVE_CHUNK_SIZE: usize = 128;

/// State shared between the receiver thread and callers.
///
/// The buffer and the error slot sit behind one lock; every critical section
/// touches one or the other and never calls back into a locking method.
#[derive(Debug, Default)]
pub(crate) struct Shared {
    pub(crate) buffer: BoundedByteBuffer,
    pub(crate) error: Option<ReceiveError>,
}

/// Lock shared state.
///
/// No critical section can leave the buffer half-updated, so a poisoned lock
/// is still consistent and is taken as-is.
pub(crate) fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// How a single read completed.
#[derive(Debug, PartialEq, Eq)]
enum Completion {
    /// `n` bytes arrived.
    Data(usize),
    /// Nothing yet; the read is reissued.
    Pending,
    /// Terminal failure.
    Failed(ReceiveError),
}

fn classify(result: std::io::Result<usize>) -> Completion {
    match result {
        Ok(0) => Completion::Failed(ReceiveError::Closed),
        Ok(n) => Completion::Data(n),
        Err(err)
            if matches!(
                err.kind(),
                ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted
            ) =>
        {
            Completion::Pending
        }
        Err(err) => Completion::Failed(err.into()),
    }
}

/// Handle to a channel's dedicated receive thread.
#[derive(Debug)]
pub(crate) struct Receiver {
    handle: Option<JoinHandle<()>>,
    stop: Arc<AtomicBool>,
    running: Arc<AtomicBool>,
}

impl Receiver {
    /// Start the receive loop on a new thread.
    ///
    /// The first read is issued as soon as the thread runs.
    pub(crate) fn spawn<R>(
        name: &str,
        reader: R,
        shared: Arc<Mutex<Shared>>,
    ) -> std::io::Result<Self>
    where
        R: Read + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let running = Arc::new(AtomicBool::new(true));

        let handle = {
            let stop = Arc::clone(&stop);
            let running = Arc::clone(&running);
            std::thread::Builder::new()
                .name(thread_name(name))
                .spawn(move || {
                    let _running = RunningGuard(running);
                    receive_loop(reader, &shared, &stop);
                })?
        };

        Ok(Self {
            handle: Some(handle),
            stop,
            running,
        })
    }

    /// Whether the loop is still reading.
    pub(crate) fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Ask the loop to stop after its current read.
    pub(crate) fn request_stop(&self) {
        self.stop.store(true, Ordering::Release);
    }

    /// Wait for the thread to exit.
    pub(crate) fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("receiver thread panicked");
            }
        }
    }
}

/// Thread names cannot carry NUL bytes; they are stripped.
fn thread_name(name: &str) -> String {
    let name: String = name.chars().filter(|&c| c != '\0').collect();
    format!("serialprims-rx:{name}")
}

struct RunningGuard(Arc<AtomicBool>);

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

fn receive_loop<R: Read>(mut reader: R, shared: &Mutex<Shared>, stop: &AtomicBool) {
    let mut chunk = [0u8; RECEIVE_CHUNK_SIZE];

    loop {
        if stop.load(Ordering::Acquire) {
            debug!("receiver stopping");
            return;
        }

        let result = reader.read(&mut chunk);

        // A read that lands after shutdown was requested is abandoned.
        if stop.load(Ordering::Acquire) {
            match result {
                Ok(n) if n > 0 => debug!(bytes = n, "discarding read completed during shutdown"),
                _ => {}
            }
            return;
        }

        match classify(result) {
            Completion::Data(n) => {
                let dropped = lock(shared).buffer.append(&chunk[..n]);
                if dropped > 0 {
                    trace!(received = n, dropped, "receive buffer full, dropped incoming bytes");
                }
            }
            Completion::Pending => continue,
            Completion::Failed(err) => {
                warn!(error = %err, "receiver stopped on transport error");
                lock(shared).error = Some(err);
                return;
            }
        }
    }
}
