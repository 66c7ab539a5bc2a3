//! Archives every standard message.

use std::sync::Arc;

use tracing::debug;

use sirbot_core::ArchivedMessage;
use sirbot_framework::{Condition, HandlerContext, HandlerResult, Pattern, Registration};

/// Runs detached so that archival never delays replies.
pub fn registration() -> Registration {
    Registration::new("archive", Condition::new(Pattern::any()), archive).detached()
}

pub async fn archive(ctx: Arc<HandlerContext>) -> HandlerResult {
    let Some(store) = ctx.persistence() else {
        return Ok(());
    };
    // Some messages arrive without a timestamp.
    let Some(message) = ArchivedMessage::from_event(ctx.event())? else {
        debug!("Message has no id, not archiving");
        return Ok(());
    };

    debug!(id = %message.id, "Archiving message");
    match store.insert_message(&message).await {
        Err(e) if e.is_duplicate_key() => {
            debug!(id = %message.id, "Message already archived");
            Ok(())
        }
        result => Ok(result?),
    }
}
