//! `g#owner/repo`: links a repository if it exists.

use std::sync::Arc;

use tracing::debug;

use sirbot_framework::{
    Condition, HandlerContext, HandlerResult, Pattern, Registration, RegistryResult,
};

use crate::CommandSettings;

const MARKER: &str = "g#";

pub fn registration(settings: &CommandSettings) -> RegistryResult<Registration> {
    let settings = Arc::new(settings.clone());
    Ok(Registration::new(
        "repo_link",
        Condition::new(Pattern::sensitive(MARKER)?),
        move |ctx: Arc<HandlerContext>| repo_link(ctx, Arc::clone(&settings)),
    ))
}

/// Returns the repository reference following the first `g#`.
pub fn reference(text: &str) -> Option<&str> {
    let start = text.find(MARKER)?;
    text[start + MARKER.len()..].split_whitespace().next()
}

pub async fn repo_link(ctx: Arc<HandlerContext>, settings: Arc<CommandSettings>) -> HandlerResult {
    let Some(repo) = reference(ctx.text()) else {
        return Ok(());
    };
    let url = settings.repo_url(repo);

    let status = ctx.links().status(&url).await?;
    if status != 200 {
        debug!(%url, status, "Repository not found");
        return Ok(());
    }

    let reply = ctx.event().response().text(url);
    ctx.messaging().send(&reply).await?;
    Ok(())
}
