use std::fmt;

/// Error type for granite-probe operations.
/// Every variant here is fatal to a test run; recoverable
/// chat failures travel as `ChatOutcome` values instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error
{   /// Required environment variable is missing or empty
    MissingConfig(String)
  , /// Environment variable present but unusable
    InvalidConfiguration(String)
  , /// Identity endpoint refused the API key
    AuthenticationFailed
    {   status: u16
      , body: String
    }
  , /// Expected JSON field absent or body not JSON
    MalformedResponse(String)
  , /// Transport failure outside the recoverable chat call
    HttpError(String)
  , /// Generic error
    Other(String)
}

impl fmt::Display for Error
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   match self
        {   Error::MissingConfig(var) => {
              write!(f,
                "Missing required environment variable: {}",
                var
              )
            }
          , Error::InvalidConfiguration(msg) => {
              write!(f, "Invalid configuration: {}", msg)
            }
          , Error::AuthenticationFailed { status, body } => {
              write!(f,
                "Failed to get access token ({}): {}",
                status, body
              )
            }
          , Error::MalformedResponse(what) => {
              write!(f, "Malformed response: {}", what)
            }
          , Error::HttpError(msg) => {
              write!(f, "HTTP error: {}", msg)
            }
          , Error::Other(msg) => {
              write!(f, "Error: {}", msg)
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<String> for Error
{   fn from(s: String) -> Self
    {   Error::Other(s)
    }
}
