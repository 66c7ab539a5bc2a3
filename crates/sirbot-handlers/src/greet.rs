//! `@sirbot hello`

use std::sync::Arc;

use sirbot_core::mention_token;
use sirbot_framework::{
    Condition, HandlerContext, HandlerError, HandlerResult, Pattern, Registration, RegistryResult,
};

pub fn registration() -> RegistryResult<Registration> {
    Ok(Registration::new(
        "greet",
        Condition::new(Pattern::insensitive("hello")?).mention(),
        greet,
    ))
}

/// Replies `Hello <@sender>` in the source channel.
pub async fn greet(ctx: Arc<HandlerContext>) -> HandlerResult {
    let event = ctx.event();
    let sender = event.sender_id().ok_or(HandlerError::MissingField("user"))?;

    let reply = event
        .response()
        .text(format!("Hello {}", mention_token(sender)));
    ctx.messaging().send(&reply).await?;
    Ok(())
}
