//! X (Twitter) publishing for tweetsmith.
//!
//! [`oauth`] signs individual requests with a pre-provisioned OAuth 1.0a
//! token pair; [`client::XClient`] uses it to check identity and create posts.

pub mod client;
pub mod error;
pub mod oauth;
pub mod types;

pub use client::XClient;
pub use error::{OAuthError, PublishError};
pub use oauth::{Credentials, SignatureBody, Signer};
pub use tweetsmith_core::PostApi;
pub use types::{PublishResult, XUser};
