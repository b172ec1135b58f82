use domains::{Notification, Notifier};
use tracing::warn;
use uuid::Uuid;

/// Sends `notification` to `recipient`, logging instead of failing when the
/// gateway refuses. The lifecycle change has already been committed.
pub(crate) async fn dispatch(notifier: &dyn Notifier, recipient: Uuid, notification: Notification) {
    if let Err(err) = notifier.notify(recipient, notification).await {
        warn!(%recipient, error = %err, "notification not delivered");
    }
}
