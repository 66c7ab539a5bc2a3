//! Reacts to every message mentioning the bot.

use std::sync::Arc;

use tracing::debug;

use sirbot_framework::{Condition, HandlerContext, HandlerResult, Pattern, Registration};

pub fn registration(reaction: &str) -> Registration {
    let reaction: Arc<str> = Arc::from(reaction);
    Registration::new(
        "acknowledge",
        Condition::new(Pattern::any()).mention(),
        move |ctx: Arc<HandlerContext>| acknowledge(ctx, Arc::clone(&reaction)),
    )
}

/// Adds `reaction` to the message unless the bot wrote it.
///
/// A duplicate reaction is not an error.
pub async fn acknowledge(ctx: Arc<HandlerContext>, reaction: Arc<str>) -> HandlerResult {
    let event = ctx.event();
    if event.is_from(ctx.identity().bot_user_id()) {
        return Ok(());
    }
    let Some(message_id) = event.id() else {
        debug!("Message has no id, not reacting");
        return Ok(());
    };

    match ctx
        .messaging()
        .add_reaction(event.channel_id(), message_id, &reaction)
        .await
    {
        Err(e) if e.is_already_reacted() => {
            debug!(message_id, "Already reacted");
            Ok(())
        }
        result => Ok(result?),
    }
}
