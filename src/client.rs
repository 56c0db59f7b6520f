use log::{debug, info};
use crate::auth::{AccessToken, Authenticator, TokenCache};
use crate::config::{ClientConfig, Credentials};
use crate::error::Error;
use crate::providers::watsonx::{ChatInvoker, ChatOutcome};

/// Token acquisition plus one chat call per question.
///
/// `Err` from [`GraniteClient::ask`] means the run cannot go on
/// (no token, unreadable reply). Every `Ok` outcome, failed or not,
/// leaves the client usable for the next question.
pub struct GraniteClient
{   credentials: Credentials
  , config: ClientConfig
  , authenticator: Authenticator
  , invoker: ChatInvoker
  , token_cache: TokenCache
}

impl GraniteClient
{   pub fn new(
      credentials: Credentials
    , config: ClientConfig
    ) -> Result<Self, Error>
    {   debug!("Creating GraniteClient for {:?}", credentials);
        let authenticator = Authenticator::new(&config)?;
        let invoker = ChatInvoker::new(&config)?;
        Ok(GraniteClient
        {   credentials
          , config
          , authenticator
          , invoker
          , token_cache: TokenCache::new()
        })
    }

    async fn token(&mut self) -> Result<AccessToken, Error>
    {   if self.config.reuse_token
        {   self.token_cache
              .get_or_fetch(&self.authenticator, &self.credentials.api_key)
              .await
        } else
        {   self.authenticator
              .fetch_token(&self.credentials.api_key)
              .await
        }
    }

    /// Ask one question under `system_prompt`
    pub async fn ask(
      &mut self
    , system_prompt: &str
    , question: &str
    ) -> Result<ChatOutcome, Error>
    {   let token = self.token().await?;
        let outcome = self.invoker
          .invoke(&self.credentials, &token, system_prompt, question)
          .await?;

        if let ChatOutcome::HttpFailure { status: 401, .. } = outcome
        {   // stale or revoked; next question fetches again
            self.token_cache.clear();
        }

        info!("Question answered: {}",
          if outcome.is_reply() { "reply" } else { "failure" });
        Ok(outcome)
    }
}
