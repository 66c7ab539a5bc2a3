//! `@sirbot tell <#channel|@user> message`: relays a message as the bot.
//!
//! Admin only. Parse errors are answered in the source channel rather than
//! reported as failures.

use std::sync::Arc;

use regex::Regex;
use tracing::debug;

use sirbot_core::OutboundEvent;
use sirbot_framework::{
    Condition, HandlerContext, HandlerResult, Pattern, Registration, RegistryResult,
};

use crate::{compile, compile_exact};

const UNKNOWN_COMMAND: &str = "Sorry I can not understand";
const UNKNOWN_DESTINATION: &str = "Sorry I can not understand the destination.";

/// Splits `tell <target> <message>` and resolves the target mention token.
#[derive(Debug, Clone)]
pub struct TellParser {
    command: Regex,
    target: Regex,
}

/// What a `tell` command resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Relay<'a> {
    /// Send `message` to `destination` (a channel or user id).
    Deliver {
        destination: &'a str,
        message: &'a str,
    },
    /// The target is not a channel or user mention.
    BadDestination,
    /// The text is not a `tell` command at all.
    Unparsable,
}

impl TellParser {
    pub fn new() -> RegistryResult<Self> {
        Ok(Self {
            command: compile(r"^tell\s+(?P<target>\S+)\s+(?P<message>(?s:.+))$")?,
            target: compile_exact(r"^<[#@](?P<id>[A-Z0-9]+)(?:\|[^>]*)?>$")?,
        })
    }

    pub fn parse<'a>(&self, text: &'a str) -> Relay<'a> {
        let Some(command) = self.command.captures(text) else {
            return Relay::Unparsable;
        };
        let (Some(target), Some(message)) = (command.name("target"), command.name("message"))
        else {
            return Relay::Unparsable;
        };

        let destination = self
            .target
            .captures(target.as_str())
            .and_then(|c| c.name("id"))
            .map(|id| id.as_str())
            .filter(|id| id.starts_with(['C', 'U']));

        match destination {
            Some(destination) => Relay::Deliver {
                destination,
                message: message.as_str(),
            },
            None => Relay::BadDestination,
        }
    }
}

pub fn registration() -> RegistryResult<Registration> {
    let parser = TellParser::new()?;
    Ok(Registration::new(
        "tell",
        Condition::new(Pattern::insensitive("^tell")?)
            .mention()
            .admin(),
        move |ctx: Arc<HandlerContext>| tell(ctx, parser.clone()),
    ))
}

pub async fn tell(ctx: Arc<HandlerContext>, parser: TellParser) -> HandlerResult {
    let reply = relay(&parser, ctx.text(), ctx.event().response());
    debug!(channel = %reply.channel, "Relaying message");
    ctx.messaging().send(&reply).await?;
    Ok(())
}

/// Builds the outbound message for `text`, starting from the default reply.
pub fn relay(parser: &TellParser, text: &str, reply: OutboundEvent) -> OutboundEvent {
    match parser.parse(text) {
        Relay::Deliver {
            destination,
            message,
        } => reply.channel(destination).text(message),
        Relay::BadDestination => reply.text(UNKNOWN_DESTINATION),
        Relay::Unparsable => reply.text(UNKNOWN_COMMAND),
    }
}
