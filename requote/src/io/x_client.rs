//! X API v2 adapter for [`Platform`].
//!
//! Requests are signed with OAuth 1.0a user-context credentials. Timelines are
//! read with media and metrics expansions so the filter sees media types and
//! like counts; long posts carry their full text in `note_tweet`.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::core::types::{AccountId, MediaKind, Post};
use crate::io::credentials::Credentials;
use crate::io::oauth::{OAuthStamp, authorization_header};
use crate::io::platform::{Platform, PlatformError, PlatformResult};

pub const DEFAULT_BASE_URL: &str = "https://api.x.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// `max_results` bounds accepted by the user timeline endpoint.
const TIMELINE_MIN_RESULTS: usize = 5;
const TIMELINE_MAX_RESULTS: usize = 100;

pub struct XClient {
    client: Client,
    credentials: Credentials,
    base_url: String,
}

impl XClient {
    pub fn new(credentials: Credentials) -> PlatformResult<Self> {
        Self::with_base_url(credentials, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(credentials: Credentials, base_url: &str) -> PlatformResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("requote/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            credentials,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Resolve a handle to the platform's numeric user id and canonical username.
    #[instrument(skip_all, fields(account = %account))]
    pub fn lookup_user(&self, account: &AccountId) -> PlatformResult<UserData> {
        let url = format!(
            "{}/2/users/by/username/{}",
            self.base_url,
            urlencoding::encode(account.as_str())
        );
        let resp: UserLookupResponse = self.get_json(&url, &[])?;
        match resp.data {
            Some(user) => {
                debug!(user_id = %user.id, "resolved user");
                Ok(user)
            }
            None => Err(PlatformError::UnknownAccount(account.to_string())),
        }
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(String, String)],
    ) -> PlatformResult<T> {
        let auth = self.authorization("GET", url, query);
        let request = self
            .client
            .get(url)
            .query(query)
            .header(reqwest::header::AUTHORIZATION, auth);
        read_json(send(request)?)
    }

    fn authorization(&self, method: &str, url: &str, params: &[(String, String)]) -> String {
        authorization_header(
            &self.credentials,
            method,
            url,
            params,
            &OAuthStamp::fresh(),
        )
    }
}

impl Platform for XClient {
    #[instrument(skip_all, fields(account = %account))]
    fn fetch_recent(&self, account: &AccountId, max_count: usize) -> PlatformResult<Vec<Post>> {
        let user = self.lookup_user(account)?;
        let url = format!("{}/2/users/{}/tweets", self.base_url, user.id);
        let max_results = max_count.clamp(TIMELINE_MIN_RESULTS, TIMELINE_MAX_RESULTS);
        let query = vec![
            ("max_results".to_string(), max_results.to_string()),
            (
                "tweet.fields".to_string(),
                "public_metrics,attachments,note_tweet".to_string(),
            ),
            (
                "expansions".to_string(),
                "attachments.media_keys".to_string(),
            ),
            ("media.fields".to_string(), "type".to_string()),
        ];
        let timeline: TimelineResponse = self.get_json(&url, &query)?;
        let posts = timeline.into_posts(&AccountId::new(&user.username), max_count);
        info!(count = posts.len(), "fetched timeline");
        Ok(posts)
    }

    #[instrument(skip(self, caption))]
    fn publish_quote(&self, caption: &str, quoted_url: &str) -> PlatformResult<String> {
        let quote_tweet_id = quoted_post_id(quoted_url)?;
        let url = format!("{}/2/tweets", self.base_url);
        let body = CreateTweetRequest {
            text: caption,
            quote_tweet_id: &quote_tweet_id,
        };
        let auth = self.authorization("POST", &url, &[]);
        let request = self
            .client
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, auth)
            .json(&body);
        let created: CreateTweetResponse = read_json(send(request)?)?;
        info!(new_id = %created.data.id, quote_tweet_id = %quote_tweet_id, "published quote");
        Ok(created.data.id)
    }
}

fn send(request: RequestBuilder) -> PlatformResult<Response> {
    let resp = request.send()?;
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().unwrap_or_default();
        return Err(PlatformError::Api {
            status: status.as_u16(),
            message: body,
        });
    }
    Ok(resp)
}

fn read_json<T: DeserializeOwned>(resp: Response) -> PlatformResult<T> {
    let body = resp.text()?;
    Ok(serde_json::from_str(&body)?)
}

/// Extract the numeric post id from a `https://x.com/<user>/status/<id>` URL.
pub fn quoted_post_id(url: &str) -> PlatformResult<String> {
    let id = url
        .split('?')
        .next()
        .and_then(|path| path.split("/status/").nth(1))
        .and_then(|rest| rest.split('/').next())
        .filter(|id| !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()))
        .ok_or_else(|| PlatformError::InvalidQuoteTarget(url.to_string()))?;
    Ok(id.to_string())
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserData {
    pub id: String,
    pub username: String,
}

#[derive(Debug, Deserialize)]
struct UserLookupResponse {
    data: Option<UserData>,
}

#[derive(Debug, Deserialize)]
struct TimelineResponse {
    #[serde(default)]
    data: Vec<TweetData>,
    #[serde(default)]
    includes: Includes,
}

#[derive(Debug, Default, Deserialize)]
struct Includes {
    #[serde(default)]
    media: Vec<MediaData>,
}

#[derive(Debug, Deserialize)]
struct MediaData {
    media_key: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct TweetData {
    id: String,
    text: String,
    note_tweet: Option<NoteTweet>,
    public_metrics: Option<PublicMetrics>,
    attachments: Option<Attachments>,
}

#[derive(Debug, Deserialize)]
struct NoteTweet {
    text: String,
}

#[derive(Debug, Deserialize)]
struct PublicMetrics {
    #[serde(default)]
    like_count: u64,
}

#[derive(Debug, Deserialize)]
struct Attachments {
    #[serde(default)]
    media_keys: Vec<String>,
}

impl TimelineResponse {
    fn into_posts(self, author: &AccountId, max_count: usize) -> Vec<Post> {
        let kinds: HashMap<String, MediaKind> = self
            .includes
            .media
            .into_iter()
            .map(|m| (m.media_key, MediaKind::from_platform(&m.kind)))
            .collect();

        self.data
            .into_iter()
            .take(max_count)
            .map(|tweet| {
                let media = tweet
                    .attachments
                    .map(|a| a.media_keys)
                    .unwrap_or_default()
                    .iter()
                    .map(|key| kinds.get(key).copied().unwrap_or(MediaKind::Other))
                    .collect();
                Post {
                    text: tweet.note_tweet.map(|note| note.text).unwrap_or(tweet.text),
                    likes: tweet.public_metrics.map(|m| m.like_count).unwrap_or(0),
                    id: tweet.id,
                    media,
                    author: author.clone(),
                }
            })
            .collect()
    }
}

#[derive(Debug, Serialize)]
struct CreateTweetRequest<'a> {
    text: &'a str,
    quote_tweet_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreateTweetResponse {
    data: CreatedTweet,
}

#[derive(Debug, Deserialize)]
struct CreatedTweet {
    id: String,
}
