use std::sync::Arc;

use tracing::{debug, error};

use crate::handlers::{EchoHandler, Handler, HelpHandler, StartHandler};
use crate::platform::Messenger;
use crate::update::Update;

/// When a registration applies to an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matcher {
    /// Message text equals the command exactly, marker included (`/start`).
    Command(&'static str),
    /// Any message with non-empty text.
    Text,
}

impl Matcher {
    fn matches(&self, update: &Update) -> bool {
        let Some(text) = update.text() else {
            return false;
        };
        match self {
            Matcher::Command(command) => text == *command,
            Matcher::Text => !text.trim().is_empty(),
        }
    }
}

pub struct Registration {
    pub matcher: Matcher,
    pub handler: Arc<dyn Handler>,
}

/// Ordered, immutable set of registrations. The first matching registration
/// handles the update; an update nothing matches is dropped.
pub struct CommandRouter {
    registrations: Vec<Registration>,
}

impl CommandRouter {
    pub fn new(registrations: Vec<Registration>) -> Self {
        Self { registrations }
    }

    /// `/start`, `/help`, then echo for any other text.
    pub fn with_default_handlers() -> Self {
        Self::new(vec![
            Registration {
                matcher: Matcher::Command("/start"),
                handler: Arc::new(StartHandler),
            },
            Registration {
                matcher: Matcher::Command("/help"),
                handler: Arc::new(HelpHandler),
            },
            Registration {
                matcher: Matcher::Text,
                handler: Arc::new(EchoHandler),
            },
        ])
    }

    /// Run the first matching handler, returning its name. Handler failures
    /// are logged here and do not reach the caller.
    pub async fn dispatch(
        &self,
        update: &Update,
        messenger: &dyn Messenger,
    ) -> Option<&'static str> {
        let matched = self
            .registrations
            .iter()
            .find(|r| r.matcher.matches(update));
        let Some(registration) = matched else {
            debug!("No handler for update {}", update.id);
            return None;
        };

        let name = registration.handler.name();
        if let Err(e) = registration.handler.handle(update, messenger).await {
            error!("Handler '{}' failed on update {}: {:#}", name, update.id, e);
        }
        Some(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::{HELP_TEXT, START_TEXT};
    use crate::platform::testing::RecordingMessenger;
    use serde_json::json;
    use std::sync::atomic::Ordering;

    fn text_update(text: &str) -> Update {
        Update::from_json(json!({
            "update_id": 1,
            "message": {"chat": {"id": 42}, "from": {"id": 7}, "text": text}
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_start_runs_only_start() {
        let router = CommandRouter::with_default_handlers();
        let messenger = RecordingMessenger::new();

        let handled = router.dispatch(&text_update("/start"), &messenger).await;

        assert_eq!(handled, Some("start"));
        assert_eq!(messenger.replies(), vec![(42, START_TEXT.to_string())]);
    }

    #[tokio::test]
    async fn test_help_command() {
        let router = CommandRouter::with_default_handlers();
        let messenger = RecordingMessenger::new();

        let handled = router.dispatch(&text_update("/help"), &messenger).await;

        assert_eq!(handled, Some("help"));
        assert_eq!(messenger.replies(), vec![(42, HELP_TEXT.to_string())]);
    }

    #[tokio::test]
    async fn test_commands_are_exact_and_case_sensitive() {
        let router = CommandRouter::with_default_handlers();

        for text in ["/START", "/start now", " /start", "/helpme", "/unknown"] {
            let messenger = RecordingMessenger::new();
            let handled = router.dispatch(&text_update(text), &messenger).await;
            assert_eq!(handled, Some("echo"), "text {:?}", text);
            assert_eq!(messenger.replies().len(), 1);
        }
    }

    #[tokio::test]
    async fn test_plain_text_is_echoed_once() {
        let router = CommandRouter::with_default_handlers();
        let messenger = RecordingMessenger::new();

        let handled = router.dispatch(&text_update("  roses "), &messenger).await;

        assert_eq!(handled, Some("echo"));
        let replies = messenger.replies();
        assert_eq!(replies.len(), 1);
        assert!(replies[0].1.contains("«roses»"));
    }

    #[tokio::test]
    async fn test_unmatched_updates_are_ignored() {
        let router = CommandRouter::with_default_handlers();
        let messenger = RecordingMessenger::new();

        let updates = [
            json!({"update_id": 1}),
            json!({"update_id": 2, "message": {"chat": {"id": 1}}}),
            json!({"update_id": 3, "message": {"chat": {"id": 1}, "text": "   "}}),
            json!({"update_id": 4, "callback_query": {"from": {"id": 1}, "data": "/start"}}),
        ];
        for value in updates {
            let update = Update::from_json(value).unwrap();
            assert_eq!(router.dispatch(&update, &messenger).await, None);
        }
        assert!(messenger.calls().is_empty());
    }

    #[tokio::test]
    async fn test_first_registration_wins() {
        let router = CommandRouter::new(vec![
            Registration {
                matcher: Matcher::Text,
                handler: Arc::new(EchoHandler),
            },
            Registration {
                matcher: Matcher::Command("/start"),
                handler: Arc::new(StartHandler),
            },
        ]);
        let messenger = RecordingMessenger::new();

        assert_eq!(router.dispatch(&text_update("/start"), &messenger).await, Some("echo"));
        assert_eq!(messenger.replies().len(), 1);
    }

    #[tokio::test]
    async fn test_send_failure_is_swallowed() {
        let router = CommandRouter::with_default_handlers();
        let messenger = RecordingMessenger::new();
        messenger.fail_sends.store(true, Ordering::SeqCst);

        let handled = router.dispatch(&text_update("/start"), &messenger).await;

        assert_eq!(handled, Some("start"));
        assert!(messenger.replies().is_empty());
    }
}
