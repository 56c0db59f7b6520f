//! Credentials and client configuration

use std::fmt;
use std::time::Duration;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use crate::error::Error;
use crate::request::SamplingParameters;

/// IBM Cloud IAM token endpoint
pub const DEFAULT_IDENTITY_URL: &str
  = "https://iam.cloud.ibm.com/identity/token";

/// Account credentials, fixed for the process lifetime
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials
{   /// Long-lived IBM Cloud API key
    #[serde(skip_serializing)]
    pub api_key: String
  , /// watsonx.ai project the model runs under
    pub project_id: String
  , /// Model to chat with, e.g. "ibm/granite-3-8b-instruct"
    pub model_id: String
  , /// Regional service root, e.g. "https://us-south.ml.cloud.ibm.com"
    pub base_url: String
}

impl fmt::Debug for Credentials
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   f.debug_struct("Credentials")
          .field("api_key", &"<redacted>")
          .field("project_id", &self.project_id)
          .field("model_id", &self.model_id)
          .field("base_url", &self.base_url)
          .finish()
    }
}

impl Credentials
{   /// Load `.env` (if any) and read credentials from the environment.
    /// Variables already set in the process win over the file.
    pub fn from_env() -> Result<Self, Error>
    {   match dotenvy::dotenv()
        {   Ok(path) => debug!("Loaded {}", path.display())
          , Err(e) => trace!("No .env loaded: {}", e)
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve credentials through an arbitrary lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
      where F: Fn(&str) -> Option<String>
    {   let required = |name: &str| {
          lookup(name)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| Error::MissingConfig(name.to_string()))
        };

        Ok(Credentials
        {   api_key: required("API_KEY")?
          , project_id: required("PROJECT_ID")?
          , model_id: required("MODEL_ID")?
          , base_url: required("URL")?
        })
    }
}

/// Knobs for both HTTP calls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig
{   /// Where API keys are exchanged for bearer tokens
    pub identity_url: String
  , /// Whole-request timeout; none when unset
    pub timeout_secs: Option<u64>
  , /// Sampling parameters for every chat request
    pub sampling: SamplingParameters
  , /// Keep one token across questions until near expiry
    pub reuse_token: bool
}

impl Default for ClientConfig
{   fn default() -> Self
    {   ClientConfig
        {   identity_url: DEFAULT_IDENTITY_URL.to_string()
          , timeout_secs: None
          , sampling: SamplingParameters::default()
          , reuse_token: false
        }
    }
}

impl ClientConfig
{   pub fn from_env() -> Result<Self, Error>
    {   Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads optional `IAM_URL`, `REQUEST_TIMEOUT_SECS` and
    /// `REUSE_TOKEN`; anything absent keeps its default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
      where F: Fn(&str) -> Option<String>
    {   let optional = |name: &str| {
          lookup(name).filter(|v| !v.trim().is_empty())
        };
        let mut config = ClientConfig::default();

        if let Some(url) = optional("IAM_URL")
        {   config.identity_url = url;
        }

        if let Some(raw) = optional("REQUEST_TIMEOUT_SECS")
        {   let secs = raw.trim().parse::<u64>()
              .map_err(|_| Error::InvalidConfiguration(
                format!("REQUEST_TIMEOUT_SECS={}", raw)
              ))?;
            config.timeout_secs = Some(secs);
        }

        if let Some(raw) = optional("REUSE_TOKEN")
        {   config.reuse_token = match raw.trim().to_ascii_lowercase().as_str()
            {   "1" | "true" | "yes" => true
              , "0" | "false" | "no" => false
              , _ => return Err(Error::InvalidConfiguration(
                  format!("REUSE_TOKEN={}", raw)
                ))
            };
        }

        debug!("Client config: {:?}", config);
        Ok(config)
    }

    pub fn timeout(&self) -> Option<Duration>
    {   self.timeout_secs.map(Duration::from_secs)
    }

    /// HTTP client honoring `timeout_secs`
    pub(crate) fn http_client(&self) -> Result<reqwest::Client, Error>
    {   let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout()
        {   builder = builder.timeout(timeout);
        }
        builder.build()
          .map_err(|e| Error::HttpError(e.to_string()))
    }
}
