//! OAuth 1.0a request signing (HMAC-SHA1) for the X API user context.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::Utc;
use hmac::{Hmac, Mac};
use rand::Rng;
use rand::distributions::Alphanumeric;
use sha1::Sha1;

use crate::io::credentials::Credentials;

type HmacSha1 = Hmac<Sha1>;

const NONCE_LEN: usize = 32;

/// Per-request values that must be unique (nonce) and current (timestamp).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthStamp {
    pub nonce: String,
    pub timestamp: i64,
}

impl OAuthStamp {
    pub fn fresh() -> Self {
        let mut rng = rand::thread_rng();
        let nonce = std::iter::repeat_with(|| rng.sample(Alphanumeric))
            .map(char::from)
            .take(NONCE_LEN)
            .collect();
        Self {
            nonce,
            timestamp: Utc::now().timestamp(),
        }
    }
}

/// Build the `Authorization` header value for one request.
///
/// `base_url` must not contain a query string; query (and form body)
/// parameters go in `params`. JSON bodies are not part of the signature.
pub fn authorization_header(
    credentials: &Credentials,
    method: &str,
    base_url: &str,
    params: &[(String, String)],
    stamp: &OAuthStamp,
) -> String {
    let timestamp = stamp.timestamp.to_string();
    let oauth_params: Vec<(&str, &str)> = vec![
        ("oauth_consumer_key", credentials.api_key.as_str()),
        ("oauth_nonce", stamp.nonce.as_str()),
        ("oauth_signature_method", "HMAC-SHA1"),
        ("oauth_timestamp", timestamp.as_str()),
        ("oauth_token", credentials.access_token.as_str()),
        ("oauth_version", "1.0"),
    ];

    let mut all: Vec<(String, String)> = oauth_params
        .iter()
        .map(|(k, v)| (encode(k), encode(v)))
        .chain(params.iter().map(|(k, v)| (encode(k), encode(v))))
        .collect();
    all.sort();
    let param_string = all
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let base_string = format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        encode(base_url),
        encode(&param_string)
    );
    let signing_key = format!(
        "{}&{}",
        encode(&credentials.api_key_secret),
        encode(&credentials.access_token_secret)
    );
    let signature = sign(&base_string, &signing_key);

    let mut header_params: Vec<(&str, &str)> = oauth_params;
    header_params.push(("oauth_signature", signature.as_str()));
    header_params.sort_by(|a, b| a.0.cmp(b.0));
    let fields = header_params
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", encode(k), encode(v)))
        .collect::<Vec<_>>()
        .join(", ");
    format!("OAuth {fields}")
}

fn sign(base_string: &str, key: &str) -> String {
    let mut mac = HmacSha1::new_from_slice(key.as_bytes()).expect("HMAC can take key of any size");
    mac.update(base_string.as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}

/// RFC 3986 percent-encoding (unreserved characters pass through).
fn encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}
