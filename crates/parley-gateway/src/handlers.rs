// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway REST API.
//!
//! Handles POST /portal/{domain_id}/chat, GET /health, and the operator
//! room and campaign endpoints.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use parley_core::types::{BotReply, ChatRole, ChatTurn, RoomEvent};
use parley_core::{Notifier, ParleyError, RealtimePublisher, StorageAdapter};
use serde::{Deserialize, Serialize};

use crate::server::GatewayState;

/// Request body for POST /portal/{domain_id}/chat.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// The visitor's message.
    pub message: String,
    /// Conversation to continue; omitted on the first message.
    #[serde(default)]
    pub conversation_id: Option<String>,
    /// The widget's view of the transcript so far.
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

/// Response body for POST /portal/{domain_id}/chat.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// Conversation id to send with the next message.
    pub conversation_id: String,
    /// The orchestrator's reply, tagged by kind.
    pub reply: BotReply,
}

/// Request body for POST /rooms/{chat_room_id}/messages.
#[derive(Debug, Deserialize)]
pub struct OperatorMessage {
    pub content: String,
}

/// Request body for POST /campaigns.
#[derive(Debug, Deserialize)]
pub struct CreateCampaignRequest {
    pub user_id: String,
    pub name: String,
}

/// Request body for PUT /campaigns/{campaign_id}/template.
#[derive(Debug, Deserialize)]
pub struct CampaignTemplateRequest {
    pub template: String,
}

/// Request body for POST /campaigns/{campaign_id}/customers.
#[derive(Debug, Deserialize)]
pub struct CampaignCustomersRequest {
    pub customer_ids: Vec<String>,
}

/// Request body for POST /campaigns/{campaign_id}/send.
#[derive(Debug, Deserialize)]
pub struct CampaignSendRequest {
    pub subject: String,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Maps orchestrator errors to HTTP statuses with a generic body. Details
/// stay in the logs.
fn error_response(err: &ParleyError) -> Response {
    let (status, body) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "not found")
    } else if err.is_transient() {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            "assistant temporarily unavailable",
        )
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, "internal error")
    };
    tracing::error!(error = %err, status = %status, "request failed");
    (
        status,
        Json(ErrorResponse {
            error: body.to_string(),
        }),
    )
        .into_response()
}

/// POST /portal/{domain_id}/chat
///
/// Routes one visitor message through the orchestrator. The per-conversation
/// session (captured email) lives server-side, keyed by conversation id.
pub async fn post_chat(
    State(state): State<GatewayState>,
    Path(domain_id): Path<String>,
    Json(body): Json<ChatRequest>,
) -> Response {
    let conversation_id = body
        .conversation_id
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let mut session = state.sessions.get(&conversation_id).unwrap_or_default();

    let result = state
        .engine
        .respond(&domain_id, &mut session, &body.history, &body.message)
        .await;

    match result {
        Ok(reply) => {
            state.sessions.insert(conversation_id.clone(), session);
            Json(ChatResponse {
                conversation_id,
                reply,
            })
            .into_response()
        }
        Err(err) => error_response(&err),
    }
}

/// GET /health
pub async fn get_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /rooms/{chat_room_id}/messages
///
/// The room's transcript in creation order, for the operator console.
pub async fn get_room_messages(
    State(state): State<GatewayState>,
    Path(chat_room_id): Path<String>,
) -> Response {
    match state.storage.messages_for_room(&chat_room_id).await {
        Ok(messages) => {
            let turns: Vec<serde_json::Value> = messages
                .iter()
                .map(|m| {
                    serde_json::json!({
                        "id": m.id,
                        "role": m.role,
                        "content": m.content,
                        "created_at": m.created_at,
                    })
                })
                .collect();
            Json(serde_json::json!({ "messages": turns })).into_response()
        }
        Err(err) => error_response(&err),
    }
}

/// POST /rooms/{chat_room_id}/messages
///
/// An operator reply into a live room: persisted as an assistant turn and
/// fanned out to the room's subscribers.
pub async fn post_operator_message(
    State(state): State<GatewayState>,
    Path(chat_room_id): Path<String>,
    Json(body): Json<OperatorMessage>,
) -> Response {
    if let Err(err) = state
        .engine
        .conversation()
        .record(&chat_room_id, &body.content, ChatRole::Assistant)
        .await
    {
        return error_response(&err);
    }

    if let Err(err) = state
        .hub
        .publish(RoomEvent {
            chat_room_id: chat_room_id.clone(),
            content: body.content,
            role: ChatRole::Assistant,
            author: "operator".to_string(),
        })
        .await
    {
        return error_response(&err);
    }

    StatusCode::NO_CONTENT.into_response()
}

/// GET /domains/{domain_id}/customers
///
/// Every customer under a domain, for picking campaign recipients.
pub async fn get_domain_customers(
    State(state): State<GatewayState>,
    Path(domain_id): Path<String>,
) -> Response {
    match state.storage.domain_customers(&domain_id).await {
        Ok(customers) => {
            let rows: Vec<serde_json::Value> = customers
                .iter()
                .map(|c| serde_json::json!({ "id": c.id, "email": c.email }))
                .collect();
            Json(serde_json::json!({ "customers": rows })).into_response()
        }
        Err(err) => error_response(&err),
    }
}

/// POST /campaigns
pub async fn post_create_campaign(
    State(state): State<GatewayState>,
    Json(body): Json<CreateCampaignRequest>,
) -> Response {
    match state
        .storage
        .create_campaign(&body.user_id, &body.name)
        .await
    {
        Ok(campaign) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "id": campaign.id,
                "user_id": campaign.user_id,
                "name": campaign.name,
                "created_at": campaign.created_at,
            })),
        )
            .into_response(),
        Err(err) => error_response(&err),
    }
}

/// PUT /campaigns/{campaign_id}/template
pub async fn put_campaign_template(
    State(state): State<GatewayState>,
    Path(campaign_id): Path<String>,
    Json(body): Json<CampaignTemplateRequest>,
) -> Response {
    match state
        .storage
        .save_campaign_template(&campaign_id, &body.template)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(&err),
    }
}

/// POST /campaigns/{campaign_id}/customers
pub async fn post_campaign_customers(
    State(state): State<GatewayState>,
    Path(campaign_id): Path<String>,
    Json(body): Json<CampaignCustomersRequest>,
) -> Response {
    match state
        .storage
        .add_campaign_customers(&campaign_id, &body.customer_ids)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(&err),
    }
}

/// POST /campaigns/{campaign_id}/send
///
/// Sends the campaign's saved template to every attached customer. Rejected
/// with 409 while no template has been saved.
pub async fn post_campaign_send(
    State(state): State<GatewayState>,
    Path(campaign_id): Path<String>,
    Json(body): Json<CampaignSendRequest>,
) -> Response {
    let campaign = match state.storage.get_campaign(&campaign_id).await {
        Ok(Some(campaign)) => campaign,
        Ok(None) => {
            return error_response(&ParleyError::NotFound {
                entity: "campaign",
                id: campaign_id,
            });
        }
        Err(err) => return error_response(&err),
    };
    let Some(template) = campaign.template else {
        return (
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: "campaign has no template".to_string(),
            }),
        )
            .into_response();
    };

    let recipients = match state.storage.campaign_recipients(&campaign_id).await {
        Ok(recipients) => recipients,
        Err(err) => return error_response(&err),
    };

    match state
        .notifier
        .campaign_blast(&recipients, &body.subject, &template)
        .await
    {
        Ok(delivered) => {
            tracing::info!(campaign_id = %campaign_id, delivered, "campaign sent");
            Json(serde_json::json!({ "delivered": delivered })).into_response()
        }
        Err(err) => error_response(&err),
    }
}
