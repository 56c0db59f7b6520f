//! API key to bearer token exchange against IBM Cloud IAM

use std::fmt;
use std::time::{Duration, Instant};
use log::{debug, error, trace};
use crate::config::ClientConfig;
use crate::error::Error;
use crate::request::TokenResponse;

/// IAM grant type for API key exchange
pub const APIKEY_GRANT_TYPE: &str
  = "urn:ibm:params:oauth:grant-type:apikey";

/// Tokens are treated as stale this long before they expire
pub const EXPIRY_BUFFER: Duration = Duration::from_secs(300);

/// Short-lived bearer credential
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken
{   value: String
  , expires_in: Option<Duration>
}

impl fmt::Debug for AccessToken
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   f.debug_struct("AccessToken")
          .field("value", &"<redacted>")
          .field("expires_in", &self.expires_in)
          .finish()
    }
}

impl AccessToken
{   pub fn new(
      value: impl Into<String>
    , expires_in: Option<Duration>
    ) -> Self
    {   AccessToken
        {   value: value.into()
          , expires_in
        }
    }

    pub fn as_str(&self) -> &str
    {   &self.value
    }

    pub fn expires_in(&self) -> Option<Duration>
    {   self.expires_in
    }

    /// Whether a token obtained at `obtained` is still usable at `now`.
    /// Tokens without a known lifetime are never considered fresh.
    pub fn is_fresh_at(&self, obtained: Instant, now: Instant) -> bool
    {   match self.expires_in
        {   Some(lifetime) => {
              let elapsed = now.saturating_duration_since(obtained);
              elapsed + EXPIRY_BUFFER < lifetime
            }
          , None => false
        }
    }
}

/// Exchanges API keys for access tokens
pub struct Authenticator
{   identity_url: String
  , http_client: reqwest::Client
}

impl Authenticator
{   pub fn new(config: &ClientConfig) -> Result<Self, Error>
    {   debug!("Creating Authenticator for {}", config.identity_url);
        Ok(Authenticator
        {   identity_url: config.identity_url.clone()
          , http_client: config.http_client()?
        })
    }

    /// One uncached exchange: no retry, no expiry tracking
    pub async fn fetch_token(&self, api_key: &str)
      -> Result<AccessToken, Error>
    {   debug!("Requesting access token");

        let form = [
          ("grant_type", APIKEY_GRANT_TYPE)
        , ("apikey", api_key)
        ];

        let response = self.http_client
          .post(&self.identity_url)
          .header("Content-Type", "application/x-www-form-urlencoded")
          .form(&form)
          .send()
          .await
          .map_err(|e| {
            error!("Token request failed: {}", e);
            Error::HttpError(e.to_string())
          })?;

        let status = response.status();
        trace!("Token response status: {}", status);

        if status != reqwest::StatusCode::OK
        {   let body = response.text().await
              .unwrap_or_else(|_|
                "Unknown error".to_string()
              );
            error!("Token exchange rejected with {}", status);
            return Err(Error::AuthenticationFailed
            {   status: status.as_u16()
              , body
            });
        }

        let body = response.text().await
          .map_err(|e| {
            error!("Failed reading token response: {}", e);
            Error::HttpError(e.to_string())
          })?;

        let parsed: TokenResponse = serde_json::from_str(&body)
          .map_err(|e| {
            error!("Token response is not JSON: {}", e);
            Error::MalformedResponse(format!("token body: {}", e))
          })?;

        let value = parsed.access_token
          .filter(|t| !t.is_empty())
          .ok_or_else(|| {
            error!("Token response has no access_token");
            Error::MalformedResponse("access_token".to_string())
          })?;

        debug!("Access token obtained (expires_in: {:?})",
          parsed.expires_in);
        Ok(AccessToken::new(
          value,
          parsed.expires_in.map(Duration::from_secs)
        ))
    }
}

/// Holds at most one token between questions
#[derive(Debug, Default)]
pub struct TokenCache
{   slot: Option<(AccessToken, Instant)>
}

impl TokenCache
{   pub fn new() -> Self
    {   TokenCache { slot: None }
    }

    /// Cached token if still fresh at `now`
    pub fn get_at(&self, now: Instant) -> Option<&AccessToken>
    {   self.slot.as_ref()
          .filter(|(token, obtained)| token.is_fresh_at(*obtained, now))
          .map(|(token, _)| token)
    }

    pub fn store(&mut self, token: AccessToken, obtained: Instant)
    {   self.slot = Some((token, obtained));
    }

    pub fn clear(&mut self)
    {   debug!("Clearing token cache");
        self.slot = None;
    }

    /// Reuse the cached token or fetch and remember a new one
    pub async fn get_or_fetch(
      &mut self
    , authenticator: &Authenticator
    , api_key: &str
    ) -> Result<AccessToken, Error>
    {   if let Some(token) = self.get_at(Instant::now())
        {   debug!("Reusing cached access token");
            return Ok(token.clone());
        }

        let token = authenticator.fetch_token(api_key).await?;
        self.store(token.clone(), Instant::now());
        Ok(token)
    }
}
