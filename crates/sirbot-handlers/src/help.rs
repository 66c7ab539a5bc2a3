//! `help`: the command reference.

use std::sync::Arc;

use sirbot_core::{Attachment, Field, OutboundEvent};
use sirbot_framework::{
    Condition, HandlerContext, HandlerResult, Pattern, Registration, RegistryResult,
};

const TITLE: &str = "Sir Bot-a-lot help";

/// `(command, description, short)` rows of the reference table.
const COMMANDS: &[(&str, &str, bool)] = &[
    ("@sir_botalot hello", "Say hello to sir_botalot.", true),
    ("/report", "Report an offending user to the admin team.", true),
    ("/gif search terms", "Search for a gif on giphy.com .", true),
    ("/pypi search terms", "Search for packages on pypi.org .", true),
    ("/sponsors", "Referal links from our sponsors.", true),
    ("/snippet", "Instruction on creating a slack code snippet.", true),
    (
        "g#user/repo",
        "Share the link to that github repo. User default to `pyslackers`.",
        false,
    ),
];

pub fn registration() -> RegistryResult<Registration> {
    Ok(Registration::new(
        "help",
        Condition::new(Pattern::insensitive("^help")?),
        help,
    ))
}

pub async fn help(ctx: Arc<HandlerContext>) -> HandlerResult {
    let reply = reference(ctx.event().response());
    ctx.messaging().send(&reply).await?;
    Ok(())
}

/// Fills `message` with the command reference.
pub fn reference(message: OutboundEvent) -> OutboundEvent {
    let fields = COMMANDS
        .iter()
        .map(|&(title, value, short)| {
            let field = Field::new(title, value);
            if short { field.short() } else { field }
        })
        .collect();

    message.text(TITLE).attachment(Attachment {
        color: Some("good".to_string()),
        fields,
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_ok;
    use crate::mock::{MockLinks, MockMessaging, context, identity, message};

    #[tokio::test]
    async fn replies_with_reference_in_source_channel() {
        let messaging = Arc::new(MockMessaging::default());
        let ctx = context(
            message("U1", "C7", "help"),
            &messaging,
            &Arc::new(MockLinks::default()),
            None,
        );

        assert_ok!(help(ctx).await);

        let sent = messaging.sent();
        assert_eq!(sent[0].channel, "C7");
        assert_eq!(sent[0].text.as_deref(), Some(TITLE));

        let attachment = &sent[0].attachments[0];
        assert_eq!(attachment.color.as_deref(), Some("good"));
        assert_eq!(attachment.fields.len(), 7);
        assert!(attachment.fields[..6].iter().all(|f| f.short));
        assert_eq!(attachment.fields[6].title, "g#user/repo");
        assert!(!attachment.fields[6].short);
    }

    #[test]
    fn only_matches_at_start() {
        let reg = registration().unwrap();
        assert!(reg.condition().matches(&message("U1", "C1", "HELP please"), &identity()));
        assert!(!reg.condition().matches(&message("U1", "C1", "I need help"), &identity()));
    }
}
