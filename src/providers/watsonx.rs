use std::fmt;
use log::{debug, trace, error};
use crate::auth::AccessToken;
use crate::config::{ClientConfig, Credentials};
use crate::error::Error;
use crate::request::{ChatRequest, ChatResponse, SamplingParameters};

/// Chat API version pinned in every request
pub const CHAT_API_VERSION: &str = "2023-05-29";

// ===== Outcome =====

/// Result of one chat call that did not abort the run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatOutcome
{   /// Model reply text
    Reply(String)
  , /// Chat endpoint answered with a non-200 status
    HttpFailure
    {   status: u16
      , body: String
    }
  , /// Request never completed (connect, DNS, timeout, body read)
    TransportFailure(String)
}

impl ChatOutcome
{   pub fn is_reply(&self) -> bool
    {   matches!(self, ChatOutcome::Reply(_))
    }

    pub fn reply(&self) -> Option<&str>
    {   match self
        {   ChatOutcome::Reply(text) => Some(text)
          , _ => None
        }
    }
}

impl fmt::Display for ChatOutcome
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   match self
        {   ChatOutcome::Reply(text) => write!(f, "{}", text)
          , ChatOutcome::HttpFailure { status, body } => {
              write!(f, "Error: {} - {}", status, body)
            }
          , ChatOutcome::TransportFailure(desc) => {
              write!(f, "Exception occurred: {}", desc)
            }
        }
    }
}

// ===== Invoker =====

/// Posts chat requests to a watsonx.ai deployment
pub struct ChatInvoker
{   sampling: SamplingParameters
  , http_client: reqwest::Client
}

/// `<base_url>/ml/v1/text/chat?version=...`
pub fn chat_url(base_url: &str) -> String
{   format!(
      "{}/ml/v1/text/chat?version={}",
      base_url.trim_end_matches('/'),
      CHAT_API_VERSION
    )
}

impl ChatInvoker
{   pub fn new(config: &ClientConfig) -> Result<Self, Error>
    {   debug!("Creating ChatInvoker");
        Ok(ChatInvoker
        {   sampling: config.sampling.clone()
          , http_client: config.http_client()?
        })
    }

    /// One chat round trip.
    ///
    /// Status and transport failures come back as `Ok(ChatOutcome)`;
    /// only a 200 whose body lacks the reply text is an `Err`.
    pub async fn invoke(
      &self
    , credentials: &Credentials
    , token: &AccessToken
    , system_prompt: &str
    , user_message: &str
    ) -> Result<ChatOutcome, Error>
    {   debug!("Invoking chat on model: {}", credentials.model_id);

        let request = ChatRequest::new(
          credentials,
          &self.sampling,
          system_prompt,
          user_message
        );
        trace!("Chat request: {:?}", request);

        let sent = self.http_client
          .post(chat_url(&credentials.base_url))
          .header("Authorization", format!("Bearer {}", token.as_str()))
          .header("Content-Type", "application/json")
          .header("Accept", "application/json")
          .json(&request)
          .send()
          .await;

        let response = match sent
        {   Ok(response) => response
          , Err(e) => {
              error!("Chat transport error: {}", e);
              return Ok(ChatOutcome::TransportFailure(e.to_string()));
            }
        };

        let status = response.status();
        trace!("Chat response status: {}", status);

        if status != reqwest::StatusCode::OK
        {   let body = response.text().await
              .unwrap_or_else(|_|
                "Unknown error".to_string()
              );
            error!("Chat API error {}: {}", status, body);
            return Ok(ChatOutcome::HttpFailure
            {   status: status.as_u16()
              , body
            });
        }

        let body = match response.text().await
        {   Ok(body) => body
          , Err(e) => {
              error!("Failed reading chat response: {}", e);
              return Ok(ChatOutcome::TransportFailure(e.to_string()));
            }
        };

        let chat_response: ChatResponse = serde_json::from_str(&body)
          .map_err(|e| {
            error!("Chat response is not JSON: {}", e);
            Error::MalformedResponse(format!("chat body: {}", e))
          })?;

        let content = chat_response.first_content()
          .map_err(|e| {
            error!("No reply text in chat response");
            e
          })?;

        let finish_reason = chat_response.choices.first()
          .and_then(|c| c.finish_reason.as_deref());
        debug!("Chat reply received ({} chars, finish_reason: {:?})",
          content.len(), finish_reason);
        Ok(ChatOutcome::Reply(content))
    }
}
