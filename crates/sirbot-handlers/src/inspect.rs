//! `@sirbot inspect @user`: dumps a user profile in the admin channel.

use std::sync::Arc;

use regex::Regex;

use sirbot_framework::{
    Condition, HandlerContext, HandlerResult, Pattern, Registration, RegistryResult,
};

use crate::compile_exact;

const NO_TARGET: &str = "Sorry I couldn't figure out which user to inspect";
const TARGET: &str = r"<@(?P<id>[A-Z0-9]+)(?:\|[^>]*)?>";

/// Admin only, and only in `admin_channel`.
pub fn registration(admin_channel: &str) -> RegistryResult<Registration> {
    let target = compile_exact(TARGET)?;
    Ok(Registration::new(
        "inspect",
        Condition::new(Pattern::insensitive("^inspect")?)
            .mention()
            .admin()
            .channel(admin_channel),
        move |ctx: Arc<HandlerContext>| inspect(ctx, target.clone()),
    ))
}

/// Prefers the stored profile, which carries the join date, and falls back to
/// the live platform profile.
pub async fn inspect(ctx: Arc<HandlerContext>, target: Regex) -> HandlerResult {
    let reply = ctx.event().response();

    let Some(user_id) = target
        .captures(ctx.text())
        .and_then(|c| c.name("id"))
        .map(|id| id.as_str().to_string())
    else {
        ctx.messaging().send(&reply.text(NO_TARGET)).await?;
        return Ok(());
    };

    let cached = match ctx.persistence() {
        Some(store) => store.fetch_user(&user_id).await?,
        None => None,
    };
    let profile = match cached {
        Some(user) => user.into_profile(),
        None => ctx.messaging().lookup_user(&user_id).await?,
    };

    let text = format!(
        "<@{user_id}> profile information \n```{}```",
        profile.pretty()
    );
    ctx.messaging().send(&reply.text(text)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_ok;
    use crate::mock::{MockLinks, MockMessaging, MockStore, context, identity, message};
    use chrono::DateTime;
    use serde_json::json;
    use sirbot_core::{StoredUser, UserProfile};

    fn target() -> Regex {
        compile_exact(TARGET).unwrap()
    }

    async fn run(text: &str, store: Option<&Arc<MockStore>>) -> Arc<MockMessaging> {
        let messaging = Arc::new(MockMessaging::default());
        let ctx = context(
            message("UADMIN", "GADMIN", text),
            &messaging,
            &Arc::new(MockLinks::default()),
            store,
        );
        assert_ok!(inspect(ctx, target()).await);
        messaging
    }

    #[tokio::test]
    async fn uses_cached_profile_with_join_date() {
        let store = Arc::new(MockStore::default().with_user(
            "U2",
            StoredUser {
                profile: UserProfile(json!({ "id": "U2", "name": "ferris" })),
                join_date: DateTime::from_timestamp(1_500_000_000, 0).unwrap(),
            },
        ));
        let messaging = run("<@UBOT> inspect <@U2>", Some(&store)).await;

        let text = &messaging.texts()[0];
        assert!(text.starts_with("<@U2> profile information \n```"));
        assert!(text.contains("ferris"));
        assert!(text.contains("2017-07-14T02:40:00+00:00"));
        assert!(messaging.lookups().is_empty());
    }

    #[tokio::test]
    async fn falls_back_to_live_lookup() {
        let store = Arc::new(MockStore::default());
        let messaging = run("<@UBOT> inspect <@U3|bob>", Some(&store)).await;

        assert_eq!(messaging.lookups(), ["U3"]);
        assert!(messaging.texts()[0].contains("live"));
    }

    #[tokio::test]
    async fn live_lookup_without_store() {
        let messaging = run("<@UBOT> inspect <@U3>", None).await;
        assert_eq!(messaging.lookups(), ["U3"]);
    }

    #[tokio::test]
    async fn bot_itself_can_be_inspected() {
        let messaging = run("<@UBOT> inspect <@UBOT>", None).await;
        assert_eq!(messaging.lookups(), ["UBOT"]);
        assert!(messaging.texts()[0].starts_with("<@UBOT> profile information"));
    }

    #[tokio::test]
    async fn explains_missing_target() {
        let messaging = run("<@UBOT> inspect someone", None).await;
        assert_eq!(messaging.texts(), [NO_TARGET]);
        assert_eq!(messaging.sent()[0].channel, "GADMIN");
    }

    #[test]
    fn restricted_to_admin_channel() {
        let reg = registration("GADMIN").unwrap();
        let cond = reg.condition();
        let id = identity();
        assert!(cond.matches(&message("UADMIN", "GADMIN", "<@UBOT> inspect <@U2>"), &id));
        assert!(!cond.matches(&message("UADMIN", "C1", "<@UBOT> inspect <@U2>"), &id));
        assert!(!cond.matches(&message("U1", "GADMIN", "<@UBOT> inspect <@U2>"), &id));
    }
}
