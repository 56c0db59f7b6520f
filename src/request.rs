//! Wire types for the identity and chat endpoints

use serde::{Deserialize, Serialize};
use crate::config::Credentials;
use crate::error::Error;

/// Speaker of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role
{   System
  , User
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage
{   pub role: Role
  , pub content: String
}

impl ChatMessage
{   pub fn system(content: impl Into<String>) -> Self
    {   ChatMessage
        {   role: Role::System
          , content: content.into()
        }
    }

    pub fn user(content: impl Into<String>) -> Self
    {   ChatMessage
        {   role: Role::User
          , content: content.into()
        }
    }
}

/// Sampling knobs sent with every chat request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingParameters
{   /// Randomness of generation
    pub temperature: f32
  , /// Upper bound on generated tokens
    pub max_new_tokens: u32
  , /// Nucleus sampling cutoff
    pub top_p: f32
}

impl Default for SamplingParameters
{   fn default() -> Self
    {   SamplingParameters
        {   temperature: 0.7
          , max_new_tokens: 500
          , top_p: 0.9
        }
    }
}

/// Body of `POST /ml/v1/text/chat`.
///
/// Built only through [`ChatRequest::new`], so `messages` is always
/// one system message followed by one user message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest
{   pub model_id: String
  , pub project_id: String
  , pub parameters: SamplingParameters
  , messages: Vec<ChatMessage>
}

impl ChatRequest
{   pub fn new(
      credentials: &Credentials
    , parameters: &SamplingParameters
    , system_prompt: &str
    , user_message: &str
    ) -> Self
    {   ChatRequest
        {   model_id: credentials.model_id.clone()
          , project_id: credentials.project_id.clone()
          , parameters: parameters.clone()
          , messages: vec![
              ChatMessage::system(system_prompt)
            , ChatMessage::user(user_message)
            ]
        }
    }

    pub fn messages(&self) -> &[ChatMessage]
    {   &self.messages
    }
}

/// Identity endpoint reply
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse
{   #[serde(default)]
    pub access_token: Option<String>
  , /// Lifetime in seconds
    #[serde(default)]
    pub expires_in: Option<u64>
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse
{   #[serde(default)]
    pub choices: Vec<Choice>
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice
{   #[serde(default)]
    pub message: Option<ChoiceMessage>
  , #[serde(default)]
    pub finish_reason: Option<String>
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage
{   #[serde(default)]
    pub content: Option<String>
}

impl ChatResponse
{   /// Text at `choices[0].message.content`
    pub fn first_content(&self) -> Result<String, Error>
    {   self.choices.first()
          .and_then(|c| c.message.as_ref())
          .and_then(|m| m.content.clone())
          .ok_or_else(|| Error::MalformedResponse(
            "choices[0].message.content".to_string()
          ))
    }
}
