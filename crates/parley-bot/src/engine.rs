// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The assistant orchestrator.
//!
//! One call to [`BotEngine::respond`] handles one inbound visitor message:
//! capture an email if present, gatekeep until one is known, welcome new
//! customers, relay live rooms to operators, or run one completion call and
//! interpret its control tokens.

use std::sync::Arc;

use parley_core::types::{
    BotReply, ChatRole, ChatTurn, CompletionRequest, CustomerRecord, DomainProfile, RoomEvent,
};
use parley_core::{
    CompletionProvider, Notifier, ParleyError, RealtimePublisher, StorageAdapter,
};
use tracing::{debug, info, warn};

use crate::conversation::ConversationLog;
use crate::session::ChatSession;
use crate::{extract, prompt};

/// Reply text used whenever the completion emitted a link.
const LINK_REPLY: &str = "Great! you can follow the link to proceed";

/// Tunables the engine reads from configuration.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Completion model identifier.
    pub model: String,
    /// Max tokens per completion call.
    pub max_tokens: u32,
    /// Portal base URL for booking/payment links, no trailing slash.
    pub portal_base_url: String,
}

/// The per-message decision engine.
///
/// At most one completion call per invocation; none on the new-customer,
/// live-room, or missing-domain paths.
pub struct BotEngine {
    storage: Arc<dyn StorageAdapter>,
    provider: Arc<dyn CompletionProvider>,
    notifier: Arc<dyn Notifier>,
    realtime: Arc<dyn RealtimePublisher>,
    conversation: ConversationLog,
    settings: EngineSettings,
}

impl BotEngine {
    pub fn new(
        storage: Arc<dyn StorageAdapter>,
        provider: Arc<dyn CompletionProvider>,
        notifier: Arc<dyn Notifier>,
        realtime: Arc<dyn RealtimePublisher>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            conversation: ConversationLog::new(storage.clone()),
            storage,
            provider,
            notifier,
            realtime,
            settings,
        }
    }

    /// The conversation store, shared with the gateway for transcripts.
    pub fn conversation(&self) -> &ConversationLog {
        &self.conversation
    }

    /// Decides and performs the response to one inbound message.
    pub async fn respond(
        &self,
        domain_id: &str,
        session: &mut ChatSession,
        history: &[ChatTurn],
        message: &str,
    ) -> Result<BotReply, ParleyError> {
        let profile = self
            .storage
            .domain_profile(domain_id)
            .await?
            .ok_or_else(|| ParleyError::NotFound {
                entity: "domain",
                id: domain_id.to_string(),
            })?;

        if let Some(email) = extract::first_email(message) {
            session.set_customer_email(email);
        }

        let Some(email) = session.customer_email().map(str::to_owned) else {
            return self.gatekeep(&profile, history, message).await;
        };

        match self.storage.find_customer(domain_id, &email).await? {
            None => self.welcome(domain_id, &profile, &email).await,
            Some(record) if record.chat_room.live => {
                self.relay_live(domain_id, &record, &email, message).await
            }
            Some(record) => {
                self.conversation
                    .record(&record.chat_room.id, message, ChatRole::User)
                    .await?;
                self.qualify(domain_id, &profile, &record, history, message)
                    .await
            }
        }
    }

    /// New customer: create the record and greet by the email local part.
    async fn welcome(
        &self,
        domain_id: &str,
        profile: &DomainProfile,
        email: &str,
    ) -> Result<BotReply, ParleyError> {
        self.storage
            .create_customer(domain_id, email, &profile.unanswered_questions)
            .await?;
        let local = email.split('@').next().unwrap_or(email);
        info!(domain_id, customer = local, "new customer created");
        Ok(BotReply::Welcome {
            content: format!(
                "Welcome aboard {local}! I'm glad to connect with you. \
                 Is there anything you need help with?"
            ),
        })
    }

    /// Live room: persist and fan out to operators; notify the owner at most
    /// once per room. The notification is best-effort.
    async fn relay_live(
        &self,
        domain_id: &str,
        record: &CustomerRecord,
        email: &str,
        message: &str,
    ) -> Result<BotReply, ParleyError> {
        let chat_room_id = &record.chat_room.id;
        self.conversation
            .record(chat_room_id, message, ChatRole::User)
            .await?;

        if let Err(e) = self
            .realtime
            .publish(RoomEvent {
                chat_room_id: chat_room_id.clone(),
                content: message.to_string(),
                role: ChatRole::User,
                author: email.to_string(),
            })
            .await
        {
            warn!(chat_room_id, error = %e, "realtime publish failed");
        }

        if self.storage.claim_notification(chat_room_id).await? {
            match self.storage.domain_owner_email(domain_id).await? {
                Some(owner) => {
                    if let Err(e) = self.notifier.escalation_notice(&owner).await {
                        warn!(chat_room_id, error = %e, "escalation notice failed");
                    }
                }
                None => warn!(domain_id, "no owner email for escalation notice"),
            }
        }

        Ok(BotReply::LiveHandoff {
            chat_room_id: chat_room_id.clone(),
            content: None,
        })
    }

    /// Scenario 1: known customer, room not live. One completion call, then
    /// interpret control tokens and links.
    async fn qualify(
        &self,
        domain_id: &str,
        profile: &DomainProfile,
        record: &CustomerRecord,
        history: &[ChatTurn],
        message: &str,
    ) -> Result<BotReply, ParleyError> {
        let chat_room_id = &record.chat_room.id;
        let customer_id = &record.customer.id;

        let system = prompt::qualification_prompt(
            &profile.name,
            &profile.knowledge_base,
            &profile.unanswered_questions,
            &prompt::appointment_link(&self.settings.portal_base_url, domain_id, customer_id),
            &prompt::payment_link(&self.settings.portal_base_url, domain_id, customer_id),
        );

        let mut messages = history.to_vec();
        messages.push(ChatTurn::user(message));
        let reply = self
            .provider
            .complete(CompletionRequest {
                model: self.settings.model.clone(),
                system: Some(system),
                messages,
                max_tokens: self.settings.max_tokens,
            })
            .await?;
        debug!(chat_room_id, tokens = reply.usage.completion_tokens, "completion received");

        if extract::has_realtime_token(&reply.content) {
            self.storage.set_room_live(chat_room_id).await?;
            let cleaned = extract::strip_realtime_token(&reply.content);
            self.conversation
                .record(chat_room_id, &cleaned, ChatRole::Assistant)
                .await?;
            info!(chat_room_id, "room escalated to realtime");
            return Ok(BotReply::LiveHandoff {
                chat_room_id: chat_room_id.clone(),
                content: Some(cleaned),
            });
        }

        // The previous assistant turn asked a question; the inbound message
        // answers it.
        if history
            .last()
            .is_some_and(|turn| extract::has_complete_token(&turn.content))
            && let Some(slot) = self.storage.first_unanswered_response(customer_id).await?
        {
            self.storage.record_answer(&slot.id, message).await?;
            debug!(customer_id, question = %slot.question, "answer recorded");
        }

        if let Some(link) = extract::first_url(&reply.content) {
            let link = extract::sanitize_link(link).to_string();
            self.conversation
                .record(
                    chat_room_id,
                    &format!("{LINK_REPLY} {link}"),
                    ChatRole::Assistant,
                )
                .await?;
            return Ok(BotReply::Link {
                content: LINK_REPLY.to_string(),
                link,
            });
        }

        self.conversation
            .record(chat_room_id, &reply.content, ChatRole::Assistant)
            .await?;
        Ok(BotReply::Plain {
            content: reply.content,
        })
    }

    /// Scenario 2: no email yet. One completion call, nothing persisted.
    async fn gatekeep(
        &self,
        profile: &DomainProfile,
        history: &[ChatTurn],
        message: &str,
    ) -> Result<BotReply, ParleyError> {
        let mut messages = history.to_vec();
        messages.push(ChatTurn::user(message));
        let reply = self
            .provider
            .complete(CompletionRequest {
                model: self.settings.model.clone(),
                system: Some(prompt::gatekeeping_prompt(&profile.name)),
                messages,
                max_tokens: self.settings.max_tokens,
            })
            .await?;
        Ok(BotReply::Plain {
            content: reply.content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_realtime::RealtimeHub;
    use parley_test_utils::{MockNotifier, MockProvider, StorageFixture};
    use std::sync::Arc;

    struct TestBot {
        fixture: StorageFixture,
        provider: Arc<MockProvider>,
        notifier: Arc<MockNotifier>,
        engine: BotEngine,
    }

    /// An engine over a seeded tempfile database and mock adapters.
    async fn test_bot(responses: Vec<&str>) -> TestBot {
        let fixture = StorageFixture::new().await.unwrap();
        let provider = Arc::new(MockProvider::with_responses(
            responses.into_iter().map(String::from).collect(),
        ));
        let notifier = Arc::new(MockNotifier::new());
        let realtime = Arc::new(RealtimeHub::new());
        let engine = BotEngine::new(
            fixture.storage.clone(),
            provider.clone(),
            notifier.clone(),
            realtime,
            EngineSettings {
                model: "mock".into(),
                max_tokens: 256,
                portal_base_url: "http://localhost:3000".into(),
            },
        );
        TestBot {
            fixture,
            provider,
            notifier,
            engine,
        }
    }

    #[tokio::test]
    async fn unknown_domain_is_not_found() {
        let bot = test_bot(vec![]).await;
        let mut session = ChatSession::new();
        let err = bot
            .engine
            .respond("no-such-domain", &mut session, &[], "hi")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn no_email_routes_to_gatekeeping_without_persistence() {
        let bot = test_bot(vec!["Could you share your email to get started?"]).await;
        let mut session = ChatSession::new();
        let reply = bot
            .engine
            .respond(&bot.fixture.domain_id, &mut session, &[], "what is the price?")
            .await
            .unwrap();
        assert_eq!(
            reply,
            BotReply::Plain {
                content: "Could you share your email to get started?".into()
            }
        );
        assert!(session.customer_email().is_none());
        // Gatekeeping uses the sales-representative prompt.
        let requests = bot.provider.requests().await;
        assert!(requests[0]
            .system
            .as_deref()
            .unwrap()
            .contains("sales representative for Acme"));
    }

    #[tokio::test]
    async fn first_email_creates_customer_and_welcomes_without_completion() {
        let bot = test_bot(vec![]).await;
        bot.fixture.add_question("Budget?").await.unwrap();
        let mut session = ChatSession::new();

        let reply = bot
            .engine
            .respond(
                &bot.fixture.domain_id,
                &mut session,
                &[],
                "hi, I'm bob@x.com",
            )
            .await
            .unwrap();

        assert_eq!(
            reply,
            BotReply::Welcome {
                content: "Welcome aboard bob! I'm glad to connect with you. \
                          Is there anything you need help with?"
                    .into()
            }
        );
        assert_eq!(bot.provider.call_count().await, 0);
        assert_eq!(session.customer_email(), Some("bob@x.com"));

        // Customer exists with a question slot and an empty, non-live room.
        let record = bot
            .fixture
            .storage
            .find_customer(&bot.fixture.domain_id, "bob@x.com")
            .await
            .unwrap()
            .unwrap();
        assert!(!record.chat_room.live);
        let slot = bot
            .fixture
            .storage
            .first_unanswered_response(&record.customer.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(slot.question, "Budget?");
    }

    #[tokio::test]
    async fn known_customer_runs_qualification_and_persists_turns() {
        let bot = test_bot(vec!["What is your budget? (complete)"]).await;
        bot.fixture.add_question("What is your budget?").await.unwrap();
        let mut session = ChatSession::new();
        session.set_customer_email("bob@x.com");
        bot.fixture
            .storage
            .create_customer(&bot.fixture.domain_id, "bob@x.com", &[])
            .await
            .unwrap();

        let reply = bot
            .engine
            .respond(&bot.fixture.domain_id, &mut session, &[], "I need a website")
            .await
            .unwrap();

        assert_eq!(
            reply,
            BotReply::Plain {
                content: "What is your budget? (complete)".into()
            }
        );
        let record = bot
            .fixture
            .storage
            .find_customer(&bot.fixture.domain_id, "bob@x.com")
            .await
            .unwrap()
            .unwrap();
        let transcript = bot.engine.conversation().history(&record.chat_room.id).await.unwrap();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[0].content, "I need a website");
        assert_eq!(transcript[1].content, "What is your budget? (complete)");

        // Qualification prompt carries the portal links for this customer.
        let requests = bot.provider.requests().await;
        let system = requests[0].system.as_deref().unwrap();
        assert!(system.contains(&format!(
            "http://localhost:3000/portal/{}/appointment/{}",
            bot.fixture.domain_id, record.customer.id
        )));
    }

    #[tokio::test]
    async fn realtime_token_flips_room_live_and_strips_keyword() {
        let bot = test_bot(vec!["Sure, connecting you now (realtime)"]).await;
        let mut session = ChatSession::new();
        session.set_customer_email("bob@x.com");
        let record = bot
            .fixture
            .storage
            .create_customer(&bot.fixture.domain_id, "bob@x.com", &[])
            .await
            .unwrap();

        let reply = bot
            .engine
            .respond(&bot.fixture.domain_id, &mut session, &[], "get me a human")
            .await
            .unwrap();

        assert_eq!(
            reply,
            BotReply::LiveHandoff {
                chat_room_id: record.chat_room.id.clone(),
                content: Some("Sure, connecting you now ".into())
            }
        );
        let reread = bot
            .fixture
            .storage
            .find_customer(&bot.fixture.domain_id, "bob@x.com")
            .await
            .unwrap()
            .unwrap();
        assert!(reread.chat_room.live);
        // The persisted assistant turn is the cleaned text.
        let transcript = bot.engine.conversation().history(&record.chat_room.id).await.unwrap();
        assert_eq!(transcript.last().unwrap().content, "Sure, connecting you now ");
    }

    #[tokio::test]
    async fn live_room_relays_without_completion_and_mails_owner_once() {
        let bot = test_bot(vec![]).await;
        let mut session = ChatSession::new();
        session.set_customer_email("bob@x.com");
        let record = bot
            .fixture
            .storage
            .create_customer(&bot.fixture.domain_id, "bob@x.com", &[])
            .await
            .unwrap();
        bot.fixture
            .storage
            .set_room_live(&record.chat_room.id)
            .await
            .unwrap();

        for message in ["anyone there?", "hello??"] {
            let reply = bot
                .engine
                .respond(&bot.fixture.domain_id, &mut session, &[], message)
                .await
                .unwrap();
            assert_eq!(
                reply,
                BotReply::LiveHandoff {
                    chat_room_id: record.chat_room.id.clone(),
                    content: None
                }
            );
        }

        assert_eq!(bot.provider.call_count().await, 0);
        // Exactly one escalation notice despite two live messages.
        assert_eq!(
            bot.notifier.escalation_recipients().await,
            vec!["owner@example.test".to_string()]
        );
    }

    #[tokio::test]
    async fn link_in_reply_is_sanitized_and_replaces_content() {
        let bot =
            test_bot(vec!["You can book here: https://x.test/y)."]).await;
        let mut session = ChatSession::new();
        session.set_customer_email("bob@x.com");
        let record = bot
            .fixture
            .storage
            .create_customer(&bot.fixture.domain_id, "bob@x.com", &[])
            .await
            .unwrap();

        let reply = bot
            .engine
            .respond(&bot.fixture.domain_id, &mut session, &[], "yes let's book")
            .await
            .unwrap();

        assert_eq!(
            reply,
            BotReply::Link {
                content: "Great! you can follow the link to proceed".into(),
                link: "https://x.test/y".into()
            }
        );
        let transcript = bot.engine.conversation().history(&record.chat_room.id).await.unwrap();
        assert_eq!(
            transcript.last().unwrap().content,
            "Great! you can follow the link to proceed https://x.test/y"
        );
    }

    #[tokio::test]
    async fn complete_token_in_last_history_turn_records_answer() {
        let bot = test_bot(vec!["When do you want to start? (complete)"]).await;
        let mut session = ChatSession::new();
        session.set_customer_email("bob@x.com");
        let questions = vec![
            "What is your budget?".to_string(),
            "When do you want to start?".to_string(),
        ];
        let record = bot
            .fixture
            .storage
            .create_customer(&bot.fixture.domain_id, "bob@x.com", &questions)
            .await
            .unwrap();

        let history = vec![
            ChatTurn::user("I need a website"),
            ChatTurn::assistant("What is your budget? (complete)"),
        ];
        bot.engine
            .respond(&bot.fixture.domain_id, &mut session, &history, "around 10k")
            .await
            .unwrap();

        // The raw inbound message lands in the first slot by question order.
        let next = bot
            .fixture
            .storage
            .first_unanswered_response(&record.customer.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(next.question, "When do you want to start?");
    }

    #[tokio::test]
    async fn answer_not_recorded_without_complete_token() {
        let bot = test_bot(vec!["Noted!"]).await;
        let mut session = ChatSession::new();
        session.set_customer_email("bob@x.com");
        let questions = vec!["What is your budget?".to_string()];
        let record = bot
            .fixture
            .storage
            .create_customer(&bot.fixture.domain_id, "bob@x.com", &questions)
            .await
            .unwrap();

        let history = vec![ChatTurn::assistant("Tell me more about your project")];
        bot.engine
            .respond(&bot.fixture.domain_id, &mut session, &history, "around 10k")
            .await
            .unwrap();

        let slot = bot
            .fixture
            .storage
            .first_unanswered_response(&record.customer.id)
            .await
            .unwrap()
            .unwrap();
        assert!(slot.answered.is_none());
    }

    #[tokio::test]
    async fn email_in_later_message_upgrades_the_session() {
        let bot = test_bot(vec!["Please share your email"]).await;
        let mut session = ChatSession::new();

        bot.engine
            .respond(&bot.fixture.domain_id, &mut session, &[], "hello")
            .await
            .unwrap();
        assert!(session.customer_email().is_none());

        let reply = bot
            .engine
            .respond(&bot.fixture.domain_id, &mut session, &[], "it's Bob@X.com thanks")
            .await
            .unwrap();
        assert!(matches!(reply, BotReply::Welcome { .. }));
        assert_eq!(session.customer_email(), Some("bob@x.com"));
    }
}
