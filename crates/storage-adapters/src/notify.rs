//! Notification adapter that records push events in the log.
//!
//! The real push gateway sits outside this backend; deployments swap this
//! adapter for one that forwards to it.

use async_trait::async_trait;
use domains::{DispatchError, Notification, Notifier};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, recipient: Uuid, notification: Notification) -> Result<(), DispatchError> {
        let payload =
            serde_json::to_string(&notification).map_err(|e| DispatchError(e.to_string()))?;
        info!(%recipient, %payload, "push notification");
        Ok(())
    }
}
