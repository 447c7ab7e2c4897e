use tracing::{info, warn};

use super::context::AdminContext;
use crate::auth::SessionState;
use crate::store::StoreError;

enum FeedExit {
    SignedOut,
    Failed(StoreError),
}

/// Keeps the session's feed subscription alive while the session is signed
/// in. The subscription is dropped as soon as the session signs out; after
/// a failure the driver waits for an explicit retry.
pub async fn run_feed(context: AdminContext) {
    let session_id = context.session_id();
    let mut session = context.sessions().watch(session_id).await;

    loop {
        if !session.borrow_and_update().is_signed_in() {
            break;
        }

        let exit = match context.store().subscribe().await {
            Ok(mut subscription) => {
                info!("Feed subscription acquired for session {}", session_id);
                loop {
                    tokio::select! {
                        next = subscription.next() => match next {
                            Some(Ok(snapshot)) => context.apply_snapshot(snapshot).await,
                            Some(Err(e)) => break FeedExit::Failed(e),
                            None => break FeedExit::Failed(StoreError::Closed),
                        },
                        changed = session.changed() => {
                            if changed.is_err() || !session.borrow().is_signed_in() {
                                break FeedExit::SignedOut;
                            }
                        }
                    }
                }
            }
            Err(e) => FeedExit::Failed(e),
        };

        let err = match exit {
            FeedExit::SignedOut => break,
            FeedExit::Failed(err) => err,
        };

        warn!("Feed subscription for session {} failed: {}", session_id, err);
        context.fail_feed(&err).await;

        if err == StoreError::AuthRevoked {
            context.sessions().sign_out(session_id).await;
            break;
        }

        if !wait_for_retry(&context, &mut session).await {
            break;
        }
        info!("Retrying feed subscription for session {}", session_id);
    }

    info!("Feed subscription released for session {}", session_id);
    context.signed_out().await;
}

/// `true` when a retry was requested, `false` once the session signs out.
async fn wait_for_retry(
    context: &AdminContext,
    session: &mut tokio::sync::watch::Receiver<SessionState>,
) -> bool {
    loop {
        tokio::select! {
            _ = context.retry_requested() => return true,
            changed = session.changed() => {
                if changed.is_err() || !session.borrow().is_signed_in() {
                    return false;
                }
            }
        }
    }
}
