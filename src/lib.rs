pub mod error;
pub mod config;
pub mod request;
pub mod auth;
pub mod providers;
pub mod client;
pub mod suite;

/*

granite-probe: smoke test for a Granite model hosted on watsonx.ai.

  1. read credentials (env / .env)
  2. exchange the API key for an IAM bearer token
  3. POST one chat request per test question
  4. print the reply, or the failure, and move on

granite-probe/
├── Cargo.toml
├── src/
│   ├── lib.rs          # Re-exports
│   ├── main.rs         # Binary entry point
│   ├── error.rs        # Fatal error type
│   ├── config.rs       # Credentials and client knobs
│   ├── request.rs      # Wire types
│   ├── auth.rs         # IAM token exchange and cache
│   ├── client.rs       # Token + chat per question
│   ├── suite.rs        # Question set and console report
│   └── providers/
│       ├── mod.rs
│       └── watsonx.rs  # Chat endpoint
└── tests/

Auth failures are fatal to a run. A failed chat call is not:
it comes back as a `ChatOutcome` and the next question runs.

*/

pub use error::Error;
pub use config::{ClientConfig, Credentials};
pub use auth::{AccessToken, Authenticator, TokenCache};
pub use providers::watsonx::{ChatInvoker, ChatOutcome};
pub use client::GraniteClient;
pub use suite::{run_suite, SuiteReport, SYSTEM_PROMPT, TEST_QUESTIONS};
