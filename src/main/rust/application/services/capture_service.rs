use std::thread::JoinHandle;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use crate::domain::entities::Frame;
use crate::domain::errors::{DomainError, Result};
use crate::domain::ports::{CameraDevice, FrameSource};
use crate::domain::value_objects::BackoffPolicy;

const COMMAND_QUEUE_DEPTH: usize = 16;

enum CaptureCommand {
    Read(oneshot::Sender<Result<Option<Frame>>>),
    Release,
}

/// Owns the streaming camera on a dedicated thread.
///
/// Every read goes through the thread's command queue, so reads are
/// serialized without any lock being held between a viewer's retries. The
/// device is released by the thread when it exits, which happens once: on
/// `release()`, or when the service and every handle have been dropped.
pub struct CaptureService {
    handle: CaptureHandle,
    worker: Option<JoinHandle<()>>,
}

impl CaptureService {
    /// Run `open` on the capture thread and wait until the device is ready.
    pub async fn start<F, D>(open: F, backoff: BackoffPolicy) -> Result<Self>
    where
        F: FnOnce() -> Result<D> + Send + 'static,
        D: CameraDevice + 'static,
    {
        let (commands, receiver) = mpsc::channel(COMMAND_QUEUE_DEPTH);
        let (ready_tx, ready_rx) = oneshot::channel();

        let worker = std::thread::Builder::new()
            .name("capture".to_string())
            .spawn(move || {
                let device = match open() {
                    Ok(device) => device,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                let _ = ready_tx.send(Ok(()));
                run_capture_loop(device, receiver);
            })
            .map_err(|e| DomainError::CaptureThreadFailed(e.to_string()))?;

        let opened = ready_rx.await.map_err(|_| {
            DomainError::CaptureThreadFailed("exited before opening the device".to_string())
        });
        if let Err(e) = opened.and_then(|result| result) {
            let _ = tokio::task::spawn_blocking(move || worker.join()).await;
            return Err(e);
        }

        tracing::info!("Capture device opened");

        Ok(Self {
            handle: CaptureHandle { commands, backoff },
            worker: Some(worker),
        })
    }

    pub fn handle(&self) -> CaptureHandle {
        self.handle.clone()
    }

    /// Stop the capture thread and wait for it to release the device.
    pub async fn release(mut self) -> Result<()> {
        let _ = self.handle.commands.send(CaptureCommand::Release).await;

        let Some(worker) = self.worker.take() else {
            return Ok(());
        };
        match tokio::task::spawn_blocking(move || worker.join()).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(_)) => Err(DomainError::CaptureThreadFailed(
                "capture thread panicked".to_string(),
            )),
            Err(e) => Err(DomainError::CaptureThreadFailed(e.to_string())),
        }
    }
}

impl Drop for CaptureService {
    fn drop(&mut self) {
        if self.worker.is_some() {
            let _ = self.handle.commands.try_send(CaptureCommand::Release);
        }
    }
}

fn run_capture_loop<D: CameraDevice>(mut device: D, mut commands: mpsc::Receiver<CaptureCommand>) {
    while let Some(command) = commands.blocking_recv() {
        match command {
            CaptureCommand::Read(reply) => {
                let _ = reply.send(device.read_frame());
            }
            CaptureCommand::Release => break,
        }
    }

    commands.close();
    device.release();
    tracing::info!("Capture device released");
}

/// Cloneable reader for the shared capture device
#[derive(Clone)]
pub struct CaptureHandle {
    commands: mpsc::Sender<CaptureCommand>,
    backoff: BackoffPolicy,
}

impl CaptureHandle {
    /// A single read; `Ok(None)` when the device had nothing ready.
    pub async fn poll(&self) -> Result<Option<Frame>> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(CaptureCommand::Read(reply))
            .await
            .map_err(|_| DomainError::CaptureReleased)?;
        response.await.map_err(|_| DomainError::CaptureReleased)?
    }
}

#[async_trait]
impl FrameSource for CaptureHandle {
    async fn next_frame(&self) -> Result<Frame> {
        let mut delay = self.backoff.initial_delay();
        loop {
            if let Some(frame) = self.poll().await? {
                return Ok(frame);
            }
            tokio::time::sleep(delay).await;
            delay = self.backoff.next_delay(delay);
        }
    }
}
