//! # Controlplane
//!
//! Blocking client for the Common Fate control plane API.
//!
//! Calls use the Connect protocol with JSON encoding: every method is an
//! HTTP POST to `{api_url}/{package}.{Service}/{Method}` carrying a bearer
//! token obtained through the OIDC client-credentials flow.
//!
//! ## Example
//!
//! ```no_run
//! use controlplane::{Client, ClientConfig};
//! use controlplane::services::workflow::AccessWorkflow;
//!
//! let client = Client::connect(&ClientConfig {
//!     api_url: "https://commonfate.example.com".into(),
//!     oidc_issuer: "https://login.example.com".into(),
//!     client_id: "provider".into(),
//!     client_secret: std::env::var("CF_OIDC_CLIENT_SECRET").unwrap(),
//!     timeout: controlplane::transport::DEFAULT_TIMEOUT,
//! })?;
//!
//! let workflow = client.entities::<AccessWorkflow>().get("wf_123")?;
//! println!("{}", workflow.value.name);
//! # Ok::<(), controlplane::Error>(())
//! ```
//!
//! ## Testing
//!
//! [`transport::MockTransport`] answers calls from queued responses and
//! records every request, so services can be exercised without a network.

pub mod auth;
pub mod client;
pub mod error;
pub mod services;
pub mod transport;
pub mod types;

pub use auth::{OidcClientCredentials, StaticToken, TokenSource};
pub use client::{Client, ClientConfig, Entities, Entity};
pub use error::{Code, Error, ErrorCategory, Result};
pub use transport::{HttpTransport, MockTransport, Transport};
pub use types::{Diagnostic, DiagnosticLevel, Duration, Eid, Response};
