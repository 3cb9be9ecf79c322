//! Connection health check.

use crate::store::Store;

/// Returns true when the store answers a ping.
pub async fn check_connection<S: Store + ?Sized>(store: &S) -> bool {
    store.ping().await.is_ok()
}
