//! HttpSessionStore - REST client for the remote session store.
//!
//! Talks to the three endpoints of the store:
//! `GET /chats`, `GET /chat/{session_id}` and `POST /analyze` (multipart).

use analyst_core::error::{AnalystError, Result};
use analyst_core::session::{
    AnalyzeReply, AnalyzeRequest, ChatSummary, Message, SessionId, SessionStore,
};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use url::Url;

use crate::dto::{AnalyzeResponseDto, ChatHistoryDto, ChatListDto, ChatSummaryDto};

/// Longest error body excerpt kept in an error message.
const ERROR_BODY_LIMIT: usize = 512;

/// [`SessionStore`] implementation that talks to the store over HTTP.
#[derive(Clone, Debug)]
pub struct HttpSessionStore {
    client: Client,
    base_url: Url,
}

impl HttpSessionStore {
    /// Creates a store client for `base_url` (e.g. `http://127.0.0.1:8000`).
    ///
    /// A path prefix in the base URL is kept, so `http://host/api` resolves
    /// `GET /chats` to `http://host/api/chats`.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if `base_url` is not an absolute http(s) URL.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_client(Client::new(), base_url)
    }

    /// Same as [`HttpSessionStore::new`] with a preconfigured client.
    pub fn with_client(client: Client, base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url.trim())?;
        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            return Err(AnalystError::config(format!(
                "session store URL must be http(s): {base_url}"
            )));
        }
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds an endpoint URL; each segment is percent-encoded on its own.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|_| AnalystError::config(format!("invalid base URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        tracing::debug!("[SessionStore] GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| AnalystError::http(None, format!("request failed: {err}")))?;
        decode_response(response).await
    }
}

async fn decode_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|err| AnalystError::http(Some(status.as_u16()), format!("failed to read body: {err}")))?;

    if !status.is_success() {
        return Err(AnalystError::http(
            Some(status.as_u16()),
            excerpt(&body, ERROR_BODY_LIMIT),
        ));
    }

    serde_json::from_str(&body).map_err(|err| {
        AnalystError::decode_json(format!("{err} in body '{}'", excerpt(&body, 120)))
    })
}

fn excerpt(body: &str, limit: usize) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(limit) {
        Some((idx, _)) => format!("{}…", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}

#[async_trait]
impl SessionStore for HttpSessionStore {
    async fn list_chats(&self) -> Result<Vec<ChatSummary>> {
        let url = self.endpoint(&["chats"])?;
        let body: ChatListDto = self.get_json(url).await?;

        let total = body.chats.len();
        let chats: Vec<ChatSummary> = body
            .chats
            .into_iter()
            .filter_map(ChatSummaryDto::into_domain)
            .collect();
        if chats.len() != total {
            tracing::warn!(
                "[SessionStore] Dropped {} chat entries without a session id",
                total - chats.len()
            );
        }
        Ok(chats)
    }

    async fn fetch_chat(&self, session_id: &SessionId) -> Result<Vec<Message>> {
        let url = self.endpoint(&["chat", session_id.as_str()])?;
        let body: ChatHistoryDto = self.get_json(url).await?;

        if let Some(echoed) = body.session_id.as_deref()
            && echoed != session_id.as_str()
        {
            tracing::warn!(
                "[SessionStore] Asked for session {} but store answered for {}",
                session_id,
                echoed
            );
        }

        Ok(body.messages.into_iter().map(Message::from).collect())
    }

    async fn analyze(&self, request: AnalyzeRequest) -> Result<AnalyzeReply> {
        let url = self.endpoint(&["analyze"])?;

        let mut form = Form::new().text("text", request.text);
        if let Some(attachment) = &request.attachment {
            let bytes = tokio::fs::read(attachment.path()).await?;
            let part = Part::bytes(bytes)
                .file_name(attachment.name().to_string())
                .mime_str(attachment.mime_type())
                .map_err(|err| AnalystError::http(None, format!("invalid file part: {err}")))?;
            form = form.part("file", part);
        }
        form = form.text("session_id", request.session_id.to_string());

        tracing::debug!(
            "[SessionStore] POST {} (session {}, file: {})",
            url,
            request.session_id,
            request
                .attachment
                .as_ref()
                .map(|a| a.name())
                .unwrap_or("none")
        );

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|err| AnalystError::http(None, format!("request failed: {err}")))?;

        let body: AnalyzeResponseDto = decode_response(response).await?;
        let reply = AnalyzeReply::from(body);

        if let Some(echoed) = &reply.session_id
            && echoed != &request.session_id
        {
            tracing::warn!(
                "[SessionStore] Sent message for session {} but store answered for {}",
                request.session_id,
                echoed
            );
        }

        Ok(reply)
    }
}
