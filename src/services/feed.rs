use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::{AppointmentCenter, Department};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Only the part of a department document this bot reads. Centers are
/// kept raw so one malformed record does not reject the whole file.
#[derive(Debug, Deserialize)]
struct FeedDocument {
    centres_disponibles: Vec<serde_json::Value>,
}

pub struct FeedClient {
    base_url: String,
    client: reqwest::Client,
}

impl FeedClient {
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build feed HTTP client")?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn department_url(&self, department: &Department) -> String {
        format!("{}/{}.json", self.base_url, department.feed_key())
    }

    pub async fn fetch_department(
        &self,
        department: &Department,
    ) -> anyhow::Result<Vec<AppointmentCenter>> {
        let url = self.department_url(department);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("failed to fetch {url}"))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AppError::Feed(format!("{url} returned {status}")).into());
        }

        let document: FeedDocument = resp
            .json()
            .await
            .with_context(|| format!("failed to parse {url}"))?;

        Ok(decode_centers(department, document.centres_disponibles))
    }
}

fn decode_centers(department: &Department, raw: Vec<serde_json::Value>) -> Vec<AppointmentCenter> {
    raw.into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(center) => Some(center),
            Err(e) => {
                tracing::warn!(department = %department, index, error = %e, "skipping malformed center");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_department_url() {
        let feed = FeedClient::new("https://vitemadose.gitlab.io/vitemadose/").unwrap();
        assert_eq!(
            feed.department_url(&Department::from_number(3)),
            "https://vitemadose.gitlab.io/vitemadose/03.json"
        );
        assert_eq!(
            feed.department_url(&Department::from_number(33)),
            "https://vitemadose.gitlab.io/vitemadose/33.json"
        );
    }

    #[test]
    fn test_decode_skips_malformed_records() {
        let raw = vec![
            json!({
                "nom": "Centre A",
                "url": "https://example.org/a",
                "location": {"latitude": 44.8, "longitude": -0.5, "city": "Bordeaux"},
                "metadata": {"address": "1 place A"},
                "appointment_schedules": [{"name": "chronodose", "total": 1}],
                "prochain_rdv": "2021-05-20T14:30:00+02:00"
            }),
            json!({"nom": "Centre sans url"}),
            json!(42),
        ];
        let centers = decode_centers(&Department::from_number(33), raw);
        assert_eq!(centers.len(), 1);
        assert_eq!(centers[0].name, "Centre A");
    }
}
