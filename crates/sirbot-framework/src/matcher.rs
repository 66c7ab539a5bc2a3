//! Condition matching for handler registrations.
//!
//! A [`Condition`] is the declarative predicate attached to every
//! registration. An event matches when all of the following hold:
//!
//! 1. **Subtype**: the event subtype equals the condition's subtype filter.
//!    A condition without a filter only accepts events *without* a subtype,
//!    so catch-all handlers never see topic-change notices.
//! 2. **Channel**: if the condition is pinned to a channel, the event was
//!    posted there.
//! 3. **Admin**: if required, the sender is in the admin set.
//! 4. **Mention**: if required, the text contains the bot's mention token.
//! 5. **Pattern**: the pattern is found somewhere in the text, after a
//!    leading bot mention has been removed. A missing text is matched as `""`.
//!
//! # Example
//!
//! ```rust,ignore
//! use sirbot_framework::{Condition, Pattern};
//!
//! // `@sirbot tell <#C123> hi`, admins only
//! let tell = Condition::new(Pattern::insensitive("^tell")?)
//!     .mention()
//!     .admin();
//!
//! // Topic-change notices only
//! let topic = Condition::new(Pattern::any()).subtype("channel_topic");
//! ```

use std::fmt;

use regex::{Regex, RegexBuilder};

use crate::error::{RegistryError, RegistryResult};
use sirbot_core::{Addressed, BotIdentity, InboundEvent};

/// A text pattern searched for in the event text.
#[derive(Clone)]
pub enum Pattern {
    /// Matches every text, including a missing one.
    Any,
    /// A regular expression searched anywhere in the text.
    Regex(Regex),
}

impl Pattern {
    /// A pattern matching everything.
    pub fn any() -> Self {
        Self::Any
    }

    /// Compiles a case-sensitive pattern.
    pub fn sensitive(expr: &str) -> RegistryResult<Self> {
        Self::compile(expr, false)
    }

    /// Compiles a case-insensitive pattern.
    pub fn insensitive(expr: &str) -> RegistryResult<Self> {
        Self::compile(expr, true)
    }

    fn compile(expr: &str, case_insensitive: bool) -> RegistryResult<Self> {
        if expr.is_empty() {
            return Ok(Self::Any);
        }

        RegexBuilder::new(expr)
            .case_insensitive(case_insensitive)
            .build()
            .map(Self::Regex)
            .map_err(|source| RegistryError::InvalidPattern {
                pattern: expr.to_string(),
                source,
            })
    }

    /// Returns `true` if the pattern is found in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Regex(re) => re.is_match(text),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Any => "",
            Self::Regex(re) => re.as_str(),
        }
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("Any"),
            Self::Regex(re) => f.debug_tuple("Regex").field(&re.as_str()).finish(),
        }
    }
}

/// The predicate deciding whether a registration fires for an event.
#[derive(Debug, Clone)]
pub struct Condition {
    pattern: Pattern,
    require_mention: bool,
    require_admin: bool,
    subtype: Option<String>,
    channel: Option<String>,
}

impl Condition {
    /// Creates a condition on `pattern` with every other check disabled.
    pub fn new(pattern: Pattern) -> Self {
        Self {
            pattern,
            require_mention: false,
            require_admin: false,
            subtype: None,
            channel: None,
        }
    }

    /// Requires the bot to be mentioned in the text.
    pub fn mention(mut self) -> Self {
        self.require_mention = true;
        self
    }

    /// Requires the sender to be an admin.
    pub fn admin(mut self) -> Self {
        self.require_admin = true;
        self
    }

    /// Only accepts events of the given subtype.
    pub fn subtype(mut self, subtype: impl Into<String>) -> Self {
        self.subtype = Some(subtype.into());
        self
    }

    /// Only accepts events posted in `channel`.
    pub fn channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn requires_mention(&self) -> bool {
        self.require_mention
    }

    pub fn requires_admin(&self) -> bool {
        self.require_admin
    }

    pub fn subtype_filter(&self) -> Option<&str> {
        self.subtype.as_deref()
    }

    pub fn channel_filter(&self) -> Option<&str> {
        self.channel.as_deref()
    }

    /// Evaluates the condition against `event`.
    ///
    /// Pure: the result only depends on the arguments.
    pub fn matches(&self, event: &InboundEvent, identity: &BotIdentity) -> bool {
        let addressed = event.addressed(identity.bot_user_id());
        self.matches_addressed(event, identity, &addressed)
    }

    /// Like [`matches`](Self::matches), reusing the addressing already
    /// resolved for `event`.
    pub fn matches_addressed(
        &self,
        event: &InboundEvent,
        identity: &BotIdentity,
        addressed: &Addressed,
    ) -> bool {
        if event.subtype() != self.subtype.as_deref() {
            return false;
        }

        if let Some(channel) = &self.channel
            && event.channel_id() != channel
        {
            return false;
        }

        if self.require_admin && !event.sender_id().is_some_and(|id| identity.is_admin(id)) {
            return false;
        }

        if self.require_mention && !addressed.is_mentioned() {
            return false;
        }

        self.pattern.is_match(addressed.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sirbot_core::AdminSet;

    fn identity() -> BotIdentity {
        BotIdentity::new("UBOT", AdminSet::new(["UADMIN"]), "GADMIN")
    }

    fn message(user: &str, channel: &str, text: Option<&str>) -> InboundEvent {
        let mut raw = json!({
            "type": "message",
            "ts": "1530000000.000100",
            "user": user,
            "channel": channel,
        });
        if let Some(text) = text {
            raw["text"] = json!(text);
        }
        InboundEvent::from_raw(raw).unwrap()
    }

    fn topic_change() -> InboundEvent {
        InboundEvent::from_raw(json!({
            "type": "message",
            "subtype": "channel_topic",
            "ts": "1530000000.000200",
            "user": "U1",
            "channel": "C1",
            "text": "<@U1> set the channel topic: hi",
            "topic": "hi",
        }))
        .unwrap()
    }

    #[test]
    fn pattern_is_a_search_not_a_full_match() {
        let cond = Condition::new(Pattern::sensitive("g#").unwrap());
        assert!(cond.matches(&message("U1", "C1", Some("look at g#requests")), &identity()));
        assert!(!cond.matches(&message("U1", "C1", Some("nothing here")), &identity()));
    }

    #[test]
    fn case_sensitivity_follows_the_pattern() {
        let ci = Condition::new(Pattern::insensitive("^help").unwrap());
        let cs = Condition::new(Pattern::sensitive("^help").unwrap());
        let ev = message("U1", "C1", Some("HELP me"));
        assert!(ci.matches(&ev, &identity()));
        assert!(!cs.matches(&ev, &identity()));
    }

    #[test]
    fn mention_and_pattern_are_both_required() {
        let cond = Condition::new(Pattern::insensitive("hello").unwrap()).mention();
        assert!(cond.matches(&message("U1", "C1", Some("<@UBOT> hello")), &identity()));
        assert!(!cond.matches(&message("U1", "C1", Some("hello")), &identity()));
        assert!(!cond.matches(&message("U1", "C1", Some("<@UBOT> bye")), &identity()));
    }

    #[test]
    fn anchored_pattern_sees_text_without_mention() {
        let cond = Condition::new(Pattern::insensitive("^tell").unwrap()).mention();
        let ev = message("U1", "C1", Some("<@UBOT> tell <@U2> hi"));
        assert!(cond.matches(&ev, &identity()));
    }

    #[test]
    fn trailing_mention_satisfies_mention_flag() {
        let cond = Condition::new(Pattern::insensitive("^hello").unwrap()).mention();
        assert!(cond.matches(&message("U1", "C1", Some("hello <@UBOT>")), &identity()));
        assert!(!cond.matches(&message("U1", "C1", Some("hello <@U2>")), &identity()));
    }

    #[test]
    fn precomputed_addressing_is_used() {
        let cond = Condition::new(Pattern::sensitive("^tell").unwrap()).mention();
        let ev = message("UADMIN", "C1", Some("<@UBOT> tell <@U2> hi"));

        let addressed = ev.addressed("UBOT");
        assert!(cond.matches_addressed(&ev, &identity(), &addressed));

        // Addressing resolved for another bot id does not see the mention.
        let foreign = ev.addressed("UOTHER");
        assert!(!cond.matches_addressed(&ev, &identity(), &foreign));
    }

    #[test]
    fn admin_is_required_when_flagged() {
        let cond = Condition::new(Pattern::any()).admin();
        assert!(cond.matches(&message("UADMIN", "C1", Some("x")), &identity()));
        assert!(!cond.matches(&message("U1", "C1", Some("x")), &identity()));
    }

    #[test]
    fn channel_filter_restricts_matches() {
        let cond = Condition::new(Pattern::any()).channel("GADMIN");
        assert!(cond.matches(&message("U1", "GADMIN", None), &identity()));
        assert!(!cond.matches(&message("U1", "C1", None), &identity()));
    }

    #[test]
    fn missing_text_only_fails_text_patterns() {
        let ev = message("U1", "C1", None);
        assert!(Condition::new(Pattern::any()).matches(&ev, &identity()));
        assert!(!Condition::new(Pattern::sensitive("hello").unwrap()).matches(&ev, &identity()));
        assert!(!Condition::new(Pattern::any()).mention().matches(&ev, &identity()));
    }

    #[test]
    fn catch_all_without_subtype_skips_subtype_events() {
        let ev = topic_change();
        assert!(!Condition::new(Pattern::any()).matches(&ev, &identity()));
        assert!(!Condition::new(Pattern::sensitive(".*").unwrap()).matches(&ev, &identity()));
        assert!(!Condition::new(Pattern::insensitive("topic").unwrap()).matches(&ev, &identity()));
    }

    #[test]
    fn subtype_filter_requires_exact_subtype() {
        let cond = Condition::new(Pattern::any()).subtype("channel_topic");
        assert!(cond.matches(&topic_change(), &identity()));
        assert!(!cond.matches(&message("U1", "C1", Some("hi")), &identity()));

        let other = Condition::new(Pattern::any()).subtype("channel_purpose");
        assert!(!other.matches(&topic_change(), &identity()));
    }

    #[test]
    fn matching_is_deterministic() {
        let cond = Condition::new(Pattern::insensitive("hello").unwrap()).mention();
        let ev = message("U1", "C1", Some("<@UBOT> Hello"));
        let first = cond.matches(&ev, &identity());
        for _ in 0..10 {
            assert_eq!(cond.matches(&ev, &identity()), first);
        }
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let err = Pattern::sensitive("(unclosed").unwrap_err();
        assert!(matches!(err, RegistryError::InvalidPattern { .. }));
    }

    #[test]
    fn empty_expression_matches_everything() {
        assert!(matches!(Pattern::sensitive("").unwrap(), Pattern::Any));
    }
}
