//! Background conversion runs
//!
//! [`ConversionTask`] runs [`convert_files`] on a worker thread so an
//! interactive caller can keep polling for [`Progress`] instead of blocking.

use std::any::Any;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread::{self, JoinHandle};

use crate::models::Conversion;
use crate::pipeline::{
    convert_files, CancelToken, ConvertError, ErrorKind, ProcessOptions, Progress, SourcePaths,
};

/// A conversion running on its own thread.
///
/// Dropping the task cancels it; the worker discards whatever it built so far.
pub struct ConversionTask {
    receiver: Receiver<Progress>,
    cancel: CancelToken,
    handle: Option<JoinHandle<Option<ConvertError>>>,
}

impl ConversionTask {
    /// Start converting the sources at `paths`.
    pub fn spawn(paths: SourcePaths, options: ProcessOptions) -> Self {
        let (sender, receiver) = mpsc::channel();
        let cancel = CancelToken::new();
        let worker_cancel = cancel.clone();

        let handle = thread::spawn(move || {
            // Send failures mean the caller is gone; the run is abandoned anyway
            let _ = sender.send(Progress::Loading);
            let result = convert_files(&paths, &options, &worker_cancel, &mut |fraction| {
                let _ = sender.send(Progress::InProgress(fraction));
            });
            match result {
                Ok(conversion) => {
                    let _ = sender.send(Progress::Ready(Box::new(conversion)));
                    None
                }
                Err(e) => {
                    log::warn!("conversion failed: {}", e);
                    let _ = sender.send(Progress::Failed(e.kind()));
                    Some(e)
                }
            }
        });

        Self { receiver, cancel, handle: Some(handle) }
    }

    /// Next pending update, if any. Never blocks.
    pub fn poll(&self) -> Option<Progress> {
        match self.receiver.try_recv() {
            Ok(progress) => Some(progress),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Ask the worker to stop at its next checkpoint.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Token shared with the worker, for cancelling follow-up work such as export.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Block until the run finishes, calling `on_progress` for each fraction.
    pub fn wait_with(mut self, on_progress: &mut dyn FnMut(f32)) -> Result<Conversion, ConvertError> {
        let mut finished = None;
        for progress in self.receiver.iter() {
            match progress {
                Progress::Loading => {}
                Progress::InProgress(fraction) => on_progress(fraction),
                Progress::Ready(conversion) => {
                    finished = Some(Ok(*conversion));
                    break;
                }
                Progress::Failed(kind) => {
                    finished = Some(Err(kind));
                    break;
                }
            }
        }

        match self.handle.take() {
            Some(handle) => settle(finished, handle.join()),
            None => settle(finished, Ok(None)),
        }
    }

    /// Block until the run finishes.
    pub fn wait(self) -> Result<Conversion, ConvertError> {
        self.wait_with(&mut |_| {})
    }
}

type Finished = Option<Result<Conversion, ErrorKind>>;

/// Combine the last message seen on the channel with the worker's exit.
fn settle(
    finished: Finished,
    joined: thread::Result<Option<ConvertError>>,
) -> Result<Conversion, ConvertError> {
    let worker_error = match joined {
        Ok(error) => error,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            log::error!("conversion worker panicked: {}", message);
            return Err(ConvertError::WorkerPanicked(message));
        }
    };

    match (finished, worker_error) {
        (Some(Ok(conversion)), _) => Ok(conversion),
        (_, Some(error)) => Err(error),
        (Some(Err(ErrorKind::Cancelled)), None) | (None, None) => Err(ConvertError::Cancelled),
        (Some(Err(kind)), None) => {
            log::warn!("worker reported {} without an error value", kind);
            Err(ConvertError::WorkerPanicked(kind.to_string()))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl Drop for ConversionTask {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.cancel.cancel();
        }
    }
}
