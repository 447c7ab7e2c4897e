//! Public contact-form submissions.

use chrono::{DateTime, SecondsFormat, Utc};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use validator::Validate;

use crate::models::{ContactSubmission, MessageId, NewMessage};
use crate::store::{MessageStore, StoreError};

#[derive(Debug, Error)]
pub enum ContactError {
    #[error("invalid submission: {0}")]
    Invalid(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Clone)]
pub struct ContactService {
    store: Arc<dyn MessageStore>,
}

impl ContactService {
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self { store }
    }

    pub async fn submit(&self, submission: &ContactSubmission) -> Result<MessageId, ContactError> {
        self.submit_at(submission, Utc::now()).await
    }

    /// Pushes one unread record stamped with `now`. Blank fields (after
    /// trimming) are rejected before anything reaches the store.
    pub async fn submit_at(
        &self,
        submission: &ContactSubmission,
        now: DateTime<Utc>,
    ) -> Result<MessageId, ContactError> {
        let submission = submission.trimmed();
        submission.validate().map_err(|errors| {
            let mut fields: Vec<String> = errors
                .field_errors()
                .into_values()
                .flatten()
                .filter_map(|error| error.message.as_ref().map(|m| m.to_string()))
                .collect();
            fields.sort();
            ContactError::Invalid(fields.join(", "))
        })?;

        let message = NewMessage {
            name: submission.name,
            email: submission.email,
            message: submission.message,
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            read: false,
        };

        match self.store.push(message).await {
            Ok(id) => {
                info!("Contact message {} received", id);
                Ok(id)
            }
            Err(e) => {
                warn!("Contact submission failed: {}", e);
                Err(e.into())
            }
        }
    }
}
