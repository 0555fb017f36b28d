use serde::{Deserialize, Serialize};

/// A post accepted by X.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishResult {
    pub id: String,
    pub text: String,
}

/// The account the access token belongs to, from `GET 2/users/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XUser {
    pub id: String,
    pub name: String,
    pub username: String,
}

/// The `{"data": ...}` wrapper used by every v2 endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct DataEnvelope<T> {
    pub data: T,
}

/// Subset of a v1.1 status object.
#[derive(Debug, Deserialize)]
pub(crate) struct LegacyStatus {
    pub id_str: String,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreatePostBody<'a> {
    pub text: &'a str,
}
