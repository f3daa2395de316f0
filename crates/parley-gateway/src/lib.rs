// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP/WebSocket gateway for the Parley chatbot platform.
//!
//! Exposes the visitor chat endpoint, operator room endpoints behind bearer
//! auth, a live-room WebSocket, and a public health probe.

pub mod auth;
pub mod handlers;
pub mod server;
pub mod sessions;
pub mod ws;

pub use auth::AuthConfig;
pub use server::{GatewayState, ServerConfig, router, start_server};
pub use sessions::SessionStore;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use parley_bot::{BotEngine, EngineSettings};
    use parley_core::StorageAdapter;
    use parley_realtime::RealtimeHub;
    use parley_test_utils::{MockNotifier, MockProvider, StorageFixture};
    use tower::ServiceExt;

    use super::*;

    struct TestGateway {
        fixture: StorageFixture,
        notifier: Arc<MockNotifier>,
        app: axum::Router,
    }

    async fn test_gateway(responses: Vec<&str>, bearer_token: Option<&str>) -> TestGateway {
        let fixture = StorageFixture::new().await.unwrap();
        let hub = Arc::new(RealtimeHub::new());
        let notifier = Arc::new(MockNotifier::new());
        let engine = BotEngine::new(
            fixture.storage.clone(),
            Arc::new(MockProvider::with_responses(
                responses.into_iter().map(String::from).collect(),
            )),
            notifier.clone(),
            hub.clone(),
            EngineSettings {
                model: "mock".into(),
                max_tokens: 256,
                portal_base_url: "http://localhost:3000".into(),
            },
        );
        let state = GatewayState {
            engine: Arc::new(engine),
            storage: fixture.storage.clone(),
            hub,
            notifier: notifier.clone(),
            sessions: Arc::new(SessionStore::new()),
            auth: AuthConfig {
                bearer_token: bearer_token.map(String::from),
            },
        };
        TestGateway {
            fixture,
            notifier,
            app: router(state),
        }
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn chat_request(domain_id: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(format!("/portal/{domain_id}/chat"))
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_is_public() {
        let gw = test_gateway(vec![], None).await;
        let response = gw
            .app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn chat_with_new_email_returns_welcome_and_conversation_id() {
        let gw = test_gateway(vec![], None).await;
        let response = gw
            .app
            .oneshot(chat_request(
                &gw.fixture.domain_id,
                serde_json::json!({"message": "hi, I'm bob@x.com"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["reply"]["type"], "welcome");
        assert!(json["conversation_id"].is_string());
    }

    #[tokio::test]
    async fn session_email_persists_across_requests() {
        let gw = test_gateway(vec!["What is your budget? (complete)"], None).await;
        let domain_id = gw.fixture.domain_id.clone();

        let first = gw
            .app
            .clone()
            .oneshot(chat_request(
                &domain_id,
                serde_json::json!({"message": "hello, bob@x.com here"}),
            ))
            .await
            .unwrap();
        let conversation_id = body_json(first).await["conversation_id"]
            .as_str()
            .unwrap()
            .to_string();

        // Second message carries no email; the stored session supplies it.
        let second = gw
            .app
            .oneshot(chat_request(
                &domain_id,
                serde_json::json!({
                    "message": "I need a website",
                    "conversation_id": conversation_id,
                }),
            ))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::OK);
        let json = body_json(second).await;
        assert_eq!(json["reply"]["type"], "plain");
        assert_eq!(json["reply"]["content"], "What is your budget? (complete)");
    }

    #[tokio::test]
    async fn unknown_domain_maps_to_404() {
        let gw = test_gateway(vec![], None).await;
        let response = gw
            .app
            .oneshot(chat_request(
                "no-such-domain",
                serde_json::json!({"message": "hi bob@x.com"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["error"], "not found");
    }

    #[tokio::test]
    async fn operator_routes_require_bearer_token() {
        let gw = test_gateway(vec![], Some("secret")).await;

        let denied = gw
            .app
            .clone()
            .oneshot(
                Request::get("/rooms/any/messages")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);

        let allowed = gw
            .app
            .oneshot(
                Request::get("/rooms/any/messages")
                    .header("authorization", "Bearer secret")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(allowed.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn operator_routes_fail_closed_without_configured_token() {
        let gw = test_gateway(vec![], None).await;
        let response = gw
            .app
            .oneshot(
                Request::get("/rooms/any/messages")
                    .header("authorization", "Bearer anything")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn operator_message_lands_in_transcript() {
        let gw = test_gateway(vec![], Some("secret")).await;
        let record = gw
            .fixture
            .storage
            .create_customer(&gw.fixture.domain_id, "bob@x.com", &[])
            .await
            .unwrap();
        let room = record.chat_room.id;

        let posted = gw
            .app
            .clone()
            .oneshot(
                Request::post(format!("/rooms/{room}/messages"))
                    .header("authorization", "Bearer secret")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        serde_json::json!({"content": "hi, how can I help?"}).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(posted.status(), StatusCode::NO_CONTENT);

        let listed = gw
            .app
            .oneshot(
                Request::get(format!("/rooms/{room}/messages"))
                    .header("authorization", "Bearer secret")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let json = body_json(listed).await;
        assert_eq!(json["messages"][0]["content"], "hi, how can I help?");
        assert_eq!(json["messages"][0]["role"], "assistant");
    }

    fn operator_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("authorization", "Bearer secret")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn campaign_flow_blasts_template_to_attached_customers() {
        let gw = test_gateway(vec![], Some("secret")).await;
        let amy = gw
            .fixture
            .storage
            .create_customer(&gw.fixture.domain_id, "amy@x.com", &[])
            .await
            .unwrap();

        let created = gw
            .app
            .clone()
            .oneshot(operator_request(
                "POST",
                "/campaigns",
                serde_json::json!({"user_id": gw.fixture.user_id, "name": "Launch"}),
            ))
            .await
            .unwrap();
        assert_eq!(created.status(), StatusCode::CREATED);
        let campaign_id = body_json(created).await["id"].as_str().unwrap().to_string();

        let templated = gw
            .app
            .clone()
            .oneshot(operator_request(
                "PUT",
                &format!("/campaigns/{campaign_id}/template"),
                serde_json::json!({"template": "Our spring plans are live."}),
            ))
            .await
            .unwrap();
        assert_eq!(templated.status(), StatusCode::NO_CONTENT);

        let attached = gw
            .app
            .clone()
            .oneshot(operator_request(
                "POST",
                &format!("/campaigns/{campaign_id}/customers"),
                serde_json::json!({"customer_ids": [amy.customer.id]}),
            ))
            .await
            .unwrap();
        assert_eq!(attached.status(), StatusCode::NO_CONTENT);

        let sent = gw
            .app
            .oneshot(operator_request(
                "POST",
                &format!("/campaigns/{campaign_id}/send"),
                serde_json::json!({"subject": "Spring launch"}),
            ))
            .await
            .unwrap();
        assert_eq!(sent.status(), StatusCode::OK);
        assert_eq!(body_json(sent).await["delivered"], 1);

        let mail = gw.notifier.sent().await;
        assert_eq!(mail.len(), 1);
        assert_eq!(mail[0].to, "amy@x.com");
        assert_eq!(mail[0].subject, "Spring launch");
    }

    #[tokio::test]
    async fn campaign_send_without_template_is_rejected() {
        let gw = test_gateway(vec![], Some("secret")).await;

        let created = gw
            .app
            .clone()
            .oneshot(operator_request(
                "POST",
                "/campaigns",
                serde_json::json!({"user_id": gw.fixture.user_id, "name": "Launch"}),
            ))
            .await
            .unwrap();
        let campaign_id = body_json(created).await["id"].as_str().unwrap().to_string();

        let sent = gw
            .app
            .oneshot(operator_request(
                "POST",
                &format!("/campaigns/{campaign_id}/send"),
                serde_json::json!({"subject": "Spring launch"}),
            ))
            .await
            .unwrap();
        assert_eq!(sent.status(), StatusCode::CONFLICT);
        assert!(gw.notifier.sent().await.is_empty());
    }

    #[tokio::test]
    async fn campaign_routes_require_bearer_token() {
        let gw = test_gateway(vec![], Some("secret")).await;
        let denied = gw
            .app
            .oneshot(
                Request::post("/campaigns")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        serde_json::json!({"user_id": "u", "name": "Launch"}).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn domain_customers_are_listed_for_operators() {
        let gw = test_gateway(vec![], Some("secret")).await;
        for email in ["amy@x.com", "zed@x.com"] {
            gw.fixture
                .storage
                .create_customer(&gw.fixture.domain_id, email, &[])
                .await
                .unwrap();
        }

        let listed = gw
            .app
            .oneshot(
                Request::get(format!("/domains/{}/customers", gw.fixture.domain_id))
                    .header("authorization", "Bearer secret")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(listed.status(), StatusCode::OK);
        let json = body_json(listed).await;
        let emails: Vec<&str> = json["customers"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["email"].as_str().unwrap())
            .collect();
        assert_eq!(emails, vec!["amy@x.com", "zed@x.com"]);
    }
}
