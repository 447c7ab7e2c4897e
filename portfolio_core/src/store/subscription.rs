use std::future::Future;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::{Snapshot, StoreError};

const SUBSCRIPTION_BUFFER: usize = 16;

pub type SnapshotSender = mpsc::Sender<Result<Snapshot, StoreError>>;

/// A live store listener. Owns the task forwarding upstream changes; the
/// task is aborted, and the upstream listener released, when this value is
/// dropped.
#[derive(Debug)]
pub struct Subscription {
    receiver: mpsc::Receiver<Result<Snapshot, StoreError>>,
    task: JoinHandle<()>,
}

impl Subscription {
    pub fn spawn<F, Fut>(forward: F) -> Self
    where
        F: FnOnce(SnapshotSender) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (tx, receiver) = mpsc::channel(SUBSCRIPTION_BUFFER);
        let task = tokio::spawn(forward(tx));
        Self { receiver, task }
    }

    /// Next snapshot, or `None` once the forwarding task has finished.
    pub async fn next(&mut self) -> Option<Result<Snapshot, StoreError>> {
        self.receiver.recv().await
    }

    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}
