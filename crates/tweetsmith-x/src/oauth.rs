//! One-legged OAuth 1.0a request signing with HMAC-SHA1.
//!
//! All four credential values are pre-provisioned; there is no token
//! handshake. Every call to [`Signer::sign`] draws a fresh nonce and
//! timestamp, so a header must never be reused across requests.
//!
//! The body shape decides what enters the signature base string:
//! form-encoded pairs are signed, a JSON payload is not. Getting this wrong
//! either way produces a `401` with "could not authenticate you".

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rand::{distr::Alphanumeric, Rng};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Method, Url};
use sha1::Sha1;

use crate::error::OAuthError;
use tweetsmith_core::XCredentialsConfig;

type HmacSha1 = Hmac<Sha1>;

const SIGNATURE_METHOD: &str = "HMAC-SHA1";
const OAUTH_VERSION: &str = "1.0";
const NONCE_LEN: usize = 32;

/// RFC 3986 unreserved characters stay literal; everything else is encoded.
const RFC3986: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encodes `value` the way OAuth 1.0a requires (`%20` for space,
/// uppercase hex, only `A-Z a-z 0-9 - . _ ~` left bare).
#[must_use]
pub fn percent_encode(value: &str) -> String {
    utf8_percent_encode(value, RFC3986).to_string()
}

/// Consumer key/secret plus access token/secret.
#[derive(Clone)]
pub struct Credentials {
    consumer_key: String,
    consumer_secret: String,
    access_token: String,
    access_secret: String,
}

impl Credentials {
    /// Builds credentials, trimming each value.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::MissingCredential`] naming the first value that
    /// is empty after trimming.
    pub fn new(
        consumer_key: &str,
        consumer_secret: &str,
        access_token: &str,
        access_secret: &str,
    ) -> Result<Self, OAuthError> {
        let field = |name: &'static str, value: &str| -> Result<String, OAuthError> {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                Err(OAuthError::MissingCredential(name))
            } else {
                Ok(trimmed.to_owned())
            }
        };

        Ok(Self {
            consumer_key: field("consumer_key", consumer_key)?,
            consumer_secret: field("consumer_secret", consumer_secret)?,
            access_token: field("access_token", access_token)?,
            access_secret: field("access_secret", access_secret)?,
        })
    }
}

impl TryFrom<&XCredentialsConfig> for Credentials {
    type Error = OAuthError;

    fn try_from(config: &XCredentialsConfig) -> Result<Self, Self::Error> {
        Self::new(
            &config.consumer_key,
            &config.consumer_secret,
            &config.access_token,
            &config.access_secret,
        )
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("consumer_key", &"[redacted]")
            .field("consumer_secret", &"[redacted]")
            .field("access_token", &"[redacted]")
            .field("access_secret", &"[redacted]")
            .finish()
    }
}

/// What the outbound request carries, and therefore what gets signed.
#[derive(Debug, Clone, Copy)]
pub enum SignatureBody<'a> {
    /// No body (GET, DELETE).
    Empty,
    /// `application/x-www-form-urlencoded`; these pairs ARE signed.
    Form(&'a [(&'a str, &'a str)]),
    /// `application/json`; the payload is NOT signed.
    Json,
}

/// Stateless request signer. Safe to share across tasks.
#[derive(Debug, Clone)]
pub struct Signer {
    credentials: Credentials,
}

impl Signer {
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    /// Signs one request with a fresh nonce and the current timestamp.
    ///
    /// Returns a header map holding a single `Authorization` header.
    ///
    /// # Errors
    ///
    /// See [`Signer::sign_with`].
    pub fn sign(
        &self,
        method: &Method,
        url: &Url,
        body: SignatureBody<'_>,
    ) -> Result<HeaderMap, OAuthError> {
        let nonce = generate_nonce();
        let timestamp = chrono::Utc::now().timestamp();
        self.sign_with(method, url, body, &nonce, timestamp)
    }

    /// Deterministic variant of [`Signer::sign`] with caller-supplied nonce
    /// and timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::InvalidKey`] or [`OAuthError::InvalidHeader`];
    /// neither occurs for credentials accepted by [`Credentials::new`].
    pub fn sign_with(
        &self,
        method: &Method,
        url: &Url,
        body: SignatureBody<'_>,
        nonce: &str,
        timestamp: i64,
    ) -> Result<HeaderMap, OAuthError> {
        let header = self.authorization_header(method, url, body, nonce, timestamp)?;
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&header)?);
        Ok(headers)
    }

    /// Builds the `OAuth ...` header value.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::InvalidKey`] if the HMAC key is rejected.
    pub fn authorization_header(
        &self,
        method: &Method,
        url: &Url,
        body: SignatureBody<'_>,
        nonce: &str,
        timestamp: i64,
    ) -> Result<String, OAuthError> {
        let mut oauth_params = self.protocol_params(nonce, timestamp);
        let signature = self.signature(method, url, body, &oauth_params)?;
        oauth_params.push(("oauth_signature", signature));
        oauth_params.sort_by(|a, b| a.0.cmp(b.0));

        let fields = oauth_params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join(", ");
        Ok(format!("OAuth {fields}"))
    }

    fn protocol_params(&self, nonce: &str, timestamp: i64) -> Vec<(&'static str, String)> {
        vec![
            ("oauth_consumer_key", self.credentials.consumer_key.clone()),
            ("oauth_nonce", nonce.to_owned()),
            ("oauth_signature_method", SIGNATURE_METHOD.to_owned()),
            ("oauth_timestamp", timestamp.to_string()),
            ("oauth_token", self.credentials.access_token.clone()),
            ("oauth_version", OAUTH_VERSION.to_owned()),
        ]
    }

    fn signature(
        &self,
        method: &Method,
        url: &Url,
        body: SignatureBody<'_>,
        oauth_params: &[(&'static str, String)],
    ) -> Result<String, OAuthError> {
        let mut params: Vec<(String, String)> = oauth_params
            .iter()
            .map(|(k, v)| ((*k).to_owned(), v.clone()))
            .collect();
        params.extend(
            url.query_pairs()
                .map(|(k, v)| (k.into_owned(), v.into_owned())),
        );
        if let SignatureBody::Form(pairs) = body {
            params.extend(pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())));
        }

        let base = signature_base_string(method, url, &params);
        let key = format!(
            "{}&{}",
            percent_encode(&self.credentials.consumer_secret),
            percent_encode(&self.credentials.access_secret)
        );

        let mut mac = HmacSha1::new_from_slice(key.as_bytes())
            .map_err(|e| OAuthError::InvalidKey(e.to_string()))?;
        mac.update(base.as_bytes());
        Ok(STANDARD.encode(mac.finalize().into_bytes()))
    }
}

/// `METHOD&enc(base-uri)&enc(normalized-params)`.
pub(crate) fn signature_base_string(
    method: &Method,
    url: &Url,
    params: &[(String, String)],
) -> String {
    format!(
        "{}&{}&{}",
        method.as_str().to_ascii_uppercase(),
        percent_encode(&base_string_uri(url)),
        percent_encode(&normalized_parameters(params))
    )
}

/// Scheme, host, non-default port and path; query and fragment dropped.
fn base_string_uri(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
    match url.port() {
        Some(port) => format!("{}://{host}:{port}{}", url.scheme(), url.path()),
        None => format!("{}://{host}{}", url.scheme(), url.path()),
    }
}

/// Encodes every pair, sorts by encoded key then encoded value, joins with `&`.
fn normalized_parameters(params: &[(String, String)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .collect();
    encoded.sort();
    encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

fn generate_nonce() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(NONCE_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Worked example from the X developer docs ("Creating a signature").
    const DOC_NONCE: &str = "kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg";
    const DOC_TIMESTAMP: i64 = 1_318_622_958;
    const DOC_STATUS: &str = "Hello Ladies + Gentlemen, a signed OAuth request!";

    fn doc_signer() -> Signer {
        Signer::new(
            Credentials::new(
                "xvz1evFS4wEEPTGEFPHBog",
                "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw",
                "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb",
                "LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE",
            )
            .expect("valid credentials"),
        )
    }

    fn doc_url() -> Url {
        Url::parse("https://api.twitter.com/1.1/statuses/update.json?include_entities=true")
            .expect("valid url")
    }

    fn signature_of(header: &str) -> String {
        header
            .split(", ")
            .find_map(|field| field.trim_start_matches("OAuth ").strip_prefix("oauth_signature=\""))
            .map(|v| v.trim_end_matches('"').to_owned())
            .expect("header carries oauth_signature")
    }

    #[test]
    fn percent_encode_leaves_unreserved_characters() {
        assert_eq!(percent_encode("Az09-._~"), "Az09-._~");
        assert_eq!(percent_encode("a b+c,!"), "a%20b%2Bc%2C%21");
        assert_eq!(percent_encode("☃"), "%E2%98%83");
    }

    #[test]
    fn base_string_matches_documented_example() {
        let signer = doc_signer();
        let mut params: Vec<(String, String)> = signer
            .protocol_params(DOC_NONCE, DOC_TIMESTAMP)
            .into_iter()
            .map(|(k, v)| (k.to_owned(), v))
            .collect();
        params.push(("include_entities".into(), "true".into()));
        params.push(("status".into(), DOC_STATUS.into()));

        let base = signature_base_string(&Method::POST, &doc_url(), &params);
        assert_eq!(
            base,
            "POST&https%3A%2F%2Fapi.twitter.com%2F1.1%2Fstatuses%2Fupdate.json&include_entities%3Dtrue%26oauth_consumer_key%3Dxvz1evFS4wEEPTGEFPHBog%26oauth_nonce%3DkYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg%26oauth_signature_method%3DHMAC-SHA1%26oauth_timestamp%3D1318622958%26oauth_token%3D370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb%26oauth_version%3D1.0%26status%3DHello%2520Ladies%2520%252B%2520Gentlemen%252C%2520a%2520signed%2520OAuth%2520request%2521"
        );
    }

    #[test]
    fn form_signature_matches_documented_example() {
        let pairs = [("status", DOC_STATUS)];
        let header = doc_signer()
            .authorization_header(
                &Method::POST,
                &doc_url(),
                SignatureBody::Form(&pairs),
                DOC_NONCE,
                DOC_TIMESTAMP,
            )
            .expect("header");
        assert_eq!(signature_of(&header), "hCtSmYh%2BiHYCEqBWrE7C7hYmtUk%3D");
    }

    #[test]
    fn header_lists_oauth_fields_sorted_and_quoted() {
        let header = doc_signer()
            .authorization_header(
                &Method::GET,
                &Url::parse("https://api.twitter.com/2/users/me").expect("url"),
                SignatureBody::Empty,
                DOC_NONCE,
                DOC_TIMESTAMP,
            )
            .expect("header");

        assert!(header.starts_with("OAuth oauth_consumer_key=\"xvz1evFS4wEEPTGEFPHBog\", "));
        let keys: Vec<&str> = header
            .trim_start_matches("OAuth ")
            .split(", ")
            .map(|f| f.split('=').next().expect("key"))
            .collect();
        assert_eq!(
            keys,
            vec![
                "oauth_consumer_key",
                "oauth_nonce",
                "oauth_signature",
                "oauth_signature_method",
                "oauth_timestamp",
                "oauth_token",
                "oauth_version",
            ]
        );
        assert!(header.contains("oauth_timestamp=\"1318622958\""));
        assert!(!header.contains("include_entities"));
    }

    #[test]
    fn json_signature_ignores_body_content() {
        let url = Url::parse("https://api.twitter.com/2/tweets").expect("url");
        let signer = doc_signer();
        let sign = || {
            signer
                .authorization_header(
                    &Method::POST,
                    &url,
                    SignatureBody::Json,
                    DOC_NONCE,
                    DOC_TIMESTAMP,
                )
                .expect("header")
        };
        // The payload never reaches the signer; only method, URL and OAuth params count.
        assert_eq!(sign(), sign());

        let empty = signer
            .authorization_header(&Method::POST, &url, SignatureBody::Empty, DOC_NONCE, DOC_TIMESTAMP)
            .expect("header");
        assert_eq!(sign(), empty);
    }

    #[test]
    fn form_signature_depends_on_body_pairs() {
        let url = Url::parse("https://api.twitter.com/1.1/statuses/update.json").expect("url");
        let signer = doc_signer();
        let sign = |body: SignatureBody<'_>| {
            signature_of(
                &signer
                    .authorization_header(&Method::POST, &url, body, DOC_NONCE, DOC_TIMESTAMP)
                    .expect("header"),
            )
        };

        let first = [("status", "first draft")];
        let second = [("status", "second draft")];
        let form_a = sign(SignatureBody::Form(&first));
        let form_b = sign(SignatureBody::Form(&second));
        let json = sign(SignatureBody::Json);

        assert_ne!(form_a, form_b);
        assert_ne!(form_a, json);
        assert_ne!(form_b, json);
    }

    #[test]
    fn base_string_uri_keeps_non_default_port_and_drops_query() {
        let url = Url::parse("HTTP://Example.COM:8080/r%20v/X?id=123").expect("url");
        assert_eq!(base_string_uri(&url), "http://example.com:8080/r%20v/X");

        let default_port = Url::parse("https://example.com:443/path").expect("url");
        assert_eq!(base_string_uri(&default_port), "https://example.com/path");
    }

    #[test]
    fn normalized_parameters_sort_by_key_then_value() {
        let params = vec![
            ("b".to_owned(), "2".to_owned()),
            ("a".to_owned(), "z".to_owned()),
            ("a".to_owned(), "a b".to_owned()),
        ];
        assert_eq!(normalized_parameters(&params), "a=a%20b&a=z&b=2");
    }

    #[test]
    fn sign_returns_single_authorization_header_with_fresh_nonce() {
        let signer = doc_signer();
        let url = Url::parse("https://api.twitter.com/2/users/me").expect("url");

        let first = signer.sign(&Method::GET, &url, SignatureBody::Empty).expect("sign");
        let second = signer.sign(&Method::GET, &url, SignatureBody::Empty).expect("sign");

        assert_eq!(first.len(), 1);
        let a = first[AUTHORIZATION].to_str().expect("ascii");
        let b = second[AUTHORIZATION].to_str().expect("ascii");
        assert!(a.starts_with("OAuth "));
        assert_ne!(a, b, "each call must use its own nonce");
    }

    #[test]
    fn generated_nonce_is_alphanumeric() {
        let nonce = generate_nonce();
        assert_eq!(nonce.len(), NONCE_LEN);
        assert!(nonce.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn credentials_reject_blank_values() {
        let err = Credentials::new("key", "secret", "  ", "token-secret")
            .expect_err("blank access token");
        assert!(matches!(err, OAuthError::MissingCredential("access_token")));
    }

    #[test]
    fn credentials_debug_is_redacted() {
        let rendered = format!("{:?}", doc_signer());
        assert!(!rendered.contains("kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw"));
    }
}
