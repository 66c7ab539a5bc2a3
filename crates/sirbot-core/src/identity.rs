//! Bot identity and privileges.
//!
//! Built once from configuration and shared by the dispatcher and handlers.

use std::collections::HashSet;

/// Set of user ids allowed to run admin-only commands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminSet(HashSet<String>);

impl AdminSet {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(ids.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, user_id: &str) -> bool {
        self.0.contains(user_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for AdminSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Who the bot is, who administers it, and where admin notices go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotIdentity {
    bot_user_id: String,
    admins: AdminSet,
    admin_channel: String,
}

impl BotIdentity {
    pub fn new(
        bot_user_id: impl Into<String>,
        admins: AdminSet,
        admin_channel: impl Into<String>,
    ) -> Self {
        Self {
            bot_user_id: bot_user_id.into(),
            admins,
            admin_channel: admin_channel.into(),
        }
    }

    /// The bot's own user id.
    pub fn bot_user_id(&self) -> &str {
        &self.bot_user_id
    }

    pub fn admins(&self) -> &AdminSet {
        &self.admins
    }

    /// Channel receiving topic-change audits; also the only channel where
    /// `inspect` is accepted.
    pub fn admin_channel(&self) -> &str {
        &self.admin_channel
    }

    pub fn is_admin(&self, user_id: &str) -> bool {
        self.admins.contains(user_id)
    }

    pub fn is_bot(&self, user_id: &str) -> bool {
        self.bot_user_id == user_id
    }
}
