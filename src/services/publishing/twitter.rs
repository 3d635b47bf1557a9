use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use base64::Engine;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha1::Sha1;

use super::map::StaticMapRenderer;
use super::{http_client, Publisher, REQUEST_TIMEOUT};
use crate::config::TwitterCredentials;
use crate::errors::AppError;
use crate::models::Announcement;

const API_BASE: &str = "https://api.twitter.com/1.1";
const UPLOAD_BASE: &str = "https://upload.twitter.com/1.1";

#[derive(Deserialize)]
struct MediaUploadResponse {
    media_id_string: String,
}

/// Minimal Twitter v1.1 client: media upload and status update, signed
/// with OAuth 1.0a user credentials.
pub struct TwitterClient {
    credentials: TwitterCredentials,
    api_base: String,
    upload_base: String,
    client: reqwest::Client,
}

impl TwitterClient {
    pub fn new(credentials: TwitterCredentials) -> anyhow::Result<Self> {
        Self::with_base_urls(credentials, API_BASE, UPLOAD_BASE)
    }

    pub fn with_base_urls(
        credentials: TwitterCredentials,
        api_base: &str,
        upload_base: &str,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            credentials,
            api_base: api_base.trim_end_matches('/').to_string(),
            upload_base: upload_base.trim_end_matches('/').to_string(),
            client: http_client(REQUEST_TIMEOUT)?,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> anyhow::Result<Self> {
        self.client = http_client(timeout)?;
        Ok(self)
    }

    /// Uploads a PNG and returns its media id.
    pub async fn upload_media(&self, png: Vec<u8>) -> anyhow::Result<String> {
        let url = format!("{}/media/upload.json", self.upload_base);
        // Multipart bodies are not part of the OAuth signature base.
        let auth = self.authorization("POST", &url, &[])?;

        let part = reqwest::multipart::Part::bytes(png)
            .file_name("map.png")
            .mime_str("image/png")
            .context("invalid media mime type")?;
        let form = reqwest::multipart::Form::new().part("media", part);

        let resp = self
            .client
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, auth)
            .multipart(form)
            .send()
            .await
            .context("failed to upload media to Twitter")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AppError::Twitter(format!("media upload failed ({status}): {body}")).into());
        }

        let uploaded: MediaUploadResponse = resp
            .json()
            .await
            .context("failed to parse Twitter media upload response")?;
        Ok(uploaded.media_id_string)
    }

    pub async fn post_status(&self, text: &str, media_id: &str) -> anyhow::Result<()> {
        let url = format!("{}/statuses/update.json", self.api_base);
        let params = [("status", text), ("media_ids", media_id)];
        let auth = self.authorization("POST", &url, &params)?;

        let resp = self
            .client
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, auth)
            .form(&params)
            .send()
            .await
            .context("failed to post status to Twitter")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AppError::Twitter(format!("status update failed ({status}): {body}")).into());
        }

        Ok(())
    }

    fn authorization(
        &self,
        method: &str,
        url: &str,
        params: &[(&str, &str)],
    ) -> anyhow::Result<String> {
        let nonce = uuid::Uuid::new_v4().simple().to_string();
        let timestamp = chrono::Utc::now().timestamp().to_string();
        oauth_header(&self.credentials, method, url, params, &nonce, &timestamp)
    }
}

/// Builds an OAuth 1.0a `Authorization` header value (HMAC-SHA1).
/// `params` are the query and form-encoded body parameters of the request.
pub fn oauth_header(
    credentials: &TwitterCredentials,
    method: &str,
    url: &str,
    params: &[(&str, &str)],
    nonce: &str,
    timestamp: &str,
) -> anyhow::Result<String> {
    let oauth_params = [
        ("oauth_consumer_key", credentials.app_key.as_str()),
        ("oauth_nonce", nonce),
        ("oauth_signature_method", "HMAC-SHA1"),
        ("oauth_timestamp", timestamp),
        ("oauth_token", credentials.access_token.as_str()),
        ("oauth_version", "1.0"),
    ];

    let mut encoded: Vec<(String, String)> = oauth_params
        .iter()
        .chain(params.iter())
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .collect();
    encoded.sort();

    let param_string = encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let base = format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        percent_encode(url),
        percent_encode(&param_string)
    );
    let signing_key = format!(
        "{}&{}",
        percent_encode(&credentials.app_secret),
        percent_encode(&credentials.access_secret)
    );

    let signature = sign(&signing_key, &base)?;

    let mut header_params: Vec<(&str, &str)> = oauth_params.to_vec();
    header_params.push(("oauth_signature", signature.as_str()));
    header_params.sort();

    let fields = header_params
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
        .collect::<Vec<_>>()
        .join(", ");
    Ok(format!("OAuth {fields}"))
}

fn sign(key: &str, data: &str) -> anyhow::Result<String> {
    let mut mac = Hmac::<Sha1>::new_from_slice(key.as_bytes())
        .map_err(|e| AppError::Twitter(format!("invalid signing key: {e}")))?;
    mac.update(data.as_bytes());
    Ok(base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes()))
}

fn percent_encode(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

/// Production publisher: map image, media upload, then the tweet.
pub struct TwitterPublisher {
    map: StaticMapRenderer,
    twitter: TwitterClient,
}

impl TwitterPublisher {
    pub fn new(map: StaticMapRenderer, twitter: TwitterClient) -> Self {
        Self { map, twitter }
    }
}

#[async_trait]
impl Publisher for TwitterPublisher {
    async fn publish(&self, announcement: &Announcement) -> anyhow::Result<()> {
        tracing::info!(identity = %announcement.identity, "generating the map");
        let image = self.map.render(announcement.coordinate).await?;

        tracing::info!(identity = %announcement.identity, bytes = image.len(), "uploading the media");
        let media_id = self.twitter.upload_media(image).await?;

        tracing::info!(identity = %announcement.identity, media_id = %media_id, "tweeting");
        self.twitter.post_status(&announcement.message, &media_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_credentials() -> TwitterCredentials {
        TwitterCredentials {
            app_key: "xvz1evFS4wEEPTGEFPHBog".to_string(),
            app_secret: "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw".to_string(),
            access_token: "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb".to_string(),
            access_secret: "LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE".to_string(),
        }
    }

    #[test]
    fn test_signature_matches_twitter_reference() {
        let header = oauth_header(
            &doc_credentials(),
            "post",
            "https://api.twitter.com/1.1/statuses/update.json",
            &[
                ("include_entities", "true"),
                ("status", "Hello Ladies + Gentlemen, a signed OAuth request!"),
            ],
            "kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg",
            "1318622958",
        )
        .unwrap();

        assert!(header.starts_with("OAuth "));
        assert!(
            header.contains(r#"oauth_signature="hCtSmYh%2BiHYCEqBWrE7C7hYmtUk%3D""#),
            "{header}"
        );
        assert!(header.contains(r#"oauth_consumer_key="xvz1evFS4wEEPTGEFPHBog""#));
        assert!(!header.contains("status="));
    }

    #[test]
    fn test_percent_encode_reserved() {
        assert_eq!(percent_encode("a b+c/d~e"), "a%20b%2Bc%2Fd~e");
        assert_eq!(percent_encode("à"), "%C3%A0");
    }
}
