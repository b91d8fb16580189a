//! Cache-first HTTP client for the challenge API.
//!
//! # Responsibilities
//! - Call the standard and data-science list endpoints with pagination defaults
//! - Enrich each standard summary with its detail record (concurrent fan-out)
//! - Read through / write through the shared cache per URL + query
//! - Map non-success statuses and transport failures to `UpstreamError`

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::try_join_all;
use serde_json::Value;

use crate::cache::{CacheKey, Payload, ResponseCache};
use crate::config::UpstreamConfig;
use crate::feed::record::ChallengeRecord;
use crate::observability::metrics;
use crate::upstream::types::{MarathonChallenge, StandardChallenge, UpstreamError, UpstreamResult};

const STANDARD_PATH: &str = "/v2/challenges";
const DATA_SCIENCE_PATH: &str = "/v2/data/marathon/challenges";

/// Client for the upstream challenge API.
#[derive(Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    cache: ResponseCache,
    standard_url: String,
    data_science_url: String,
    page_size: u32,
}

impl UpstreamClient {
    /// Create a client. `timeout` bounds each individual upstream call.
    pub fn new(
        config: &UpstreamConfig,
        timeout: Duration,
        cache: ResponseCache,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("challenge-feed/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let host = config.api_host.trim_end_matches('/');

        Ok(Self {
            http,
            cache,
            standard_url: format!("{}{}", host, STANDARD_PATH),
            data_science_url: format!("{}{}", host, DATA_SCIENCE_PATH),
            page_size: config.page_size,
        })
    }

    /// Fetch standard challenges for a list, each merged with its detail record.
    ///
    /// Fails as a whole if the list call or any single detail call fails.
    pub async fn fetch_standard_challenges(
        &self,
        list: &str,
        filters: &[(String, String)],
    ) -> UpstreamResult<Vec<ChallengeRecord>> {
        let url = format!("{}/{}", self.standard_url, list);
        let params = self.with_pagination(filters);
        let body = self.get_json("standard", &url, &params).await?;
        let summaries = data_array(&body, &url)?;

        let enriched = try_join_all(summaries.iter().cloned().map(|s| self.enrich(s))).await?;

        let records = enriched
            .into_iter()
            .filter_map(|merged| match serde_json::from_value::<StandardChallenge>(merged) {
                Ok(challenge) => Some(ChallengeRecord::from(challenge)),
                Err(e) => {
                    tracing::warn!(url = %url, error = %e, "Skipping malformed challenge record");
                    None
                }
            })
            .collect::<Vec<_>>();

        tracing::info!(url = %url, count = records.len(), "Standard challenges fetched");
        Ok(records)
    }

    /// Fetch marathon matches for a list, mapped into the common record shape.
    pub async fn fetch_data_science_challenges(
        &self,
        list: &str,
    ) -> UpstreamResult<Vec<ChallengeRecord>> {
        let url = self.data_science_url.clone();
        let params = self.with_pagination(&[("listType".to_string(), list.to_string())]);
        let body = self.get_json("data_science", &url, &params).await?;

        let records = data_array(&body, &url)?
            .iter()
            .filter_map(|item| match serde_json::from_value::<MarathonChallenge>(item.clone()) {
                Ok(challenge) => Some(ChallengeRecord::from(challenge)),
                Err(e) => {
                    tracing::warn!(url = %url, error = %e, "Skipping malformed marathon record");
                    None
                }
            })
            .collect::<Vec<_>>();

        tracing::info!(url = %url, count = records.len(), "Data science challenges fetched");
        Ok(records)
    }

    /// Merge the detail record for a summary into it.
    async fn enrich(&self, summary: Value) -> UpstreamResult<Value> {
        let Some(id) = summary.get("challengeId").and_then(id_string) else {
            tracing::warn!("Challenge summary without challengeId, not enriched");
            return Ok(summary);
        };

        let url = format!("{}/{}", self.standard_url, id);
        let detail = self.get_json("detail", &url, &[]).await?;

        let mut merged = summary;
        merge_json(&mut merged, &detail);
        Ok(merged)
    }

    /// Query parameters with pagination defaults applied. Defaults win.
    fn with_pagination(&self, params: &[(String, String)]) -> Vec<(String, String)> {
        let mut out: Vec<(String, String)> = params
            .iter()
            .filter(|(k, _)| k != "pageIndex" && k != "pageSize")
            .cloned()
            .collect();
        out.push(("pageIndex".to_string(), "1".to_string()));
        out.push(("pageSize".to_string(), self.page_size.to_string()));
        out
    }

    /// GET a JSON body, consulting the cache first and filling it on success.
    async fn get_json(
        &self,
        endpoint: &'static str,
        url: &str,
        params: &[(String, String)],
    ) -> UpstreamResult<Arc<Value>> {
        let key = CacheKey::Upstream(upstream_cache_key(url, params));
        if let Some(json) = self.cache.get(&key).and_then(Payload::into_json) {
            tracing::debug!(url = %url, "Serving upstream response from cache");
            return Ok(json);
        }

        tracing::info!(url = %url, params = ?params, "Calling upstream API");

        let result = self.send(url, params).await;
        match &result {
            Ok(_) => metrics::record_upstream(endpoint, "ok"),
            Err(e) => {
                tracing::error!(url = %url, error = %e, "Upstream request failed");
                metrics::record_upstream(endpoint, e.outcome());
            }
        }

        let body = Arc::new(result?);
        self.cache.put(key, Payload::Json(body.clone()));
        Ok(body)
    }

    async fn send(&self, url: &str, params: &[(String, String)]) -> UpstreamResult<Value> {
        let transport = |source| UpstreamError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self
            .http
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(transport)?;
        serde_json::from_slice(&bytes).map_err(|e| UpstreamError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Cache key for an upstream call: URL plus its encoded query, in parameter order.
fn upstream_cache_key(url: &str, params: &[(String, String)]) -> String {
    if params.is_empty() {
        return url.to_string();
    }
    let query = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params)
        .finish();
    format!("{}?{}", url, query)
}

/// The `data` array of a collection envelope.
fn data_array<'a>(body: &'a Value, url: &str) -> UpstreamResult<&'a Vec<Value>> {
    body.get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| UpstreamError::Decode {
            url: url.to_string(),
            reason: "missing 'data' array".to_string(),
        })
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Deep-merge `source` into `target`. Objects merge key by key; anything else
/// is replaced, except that nulls in `source` never erase a value.
fn merge_json(target: &mut Value, source: &Value) {
    match (target, source) {
        (Value::Object(target), Value::Object(source)) => {
            for (key, value) in source {
                match target.get_mut(key) {
                    Some(existing) => merge_json(existing, value),
                    None => {
                        target.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (_, Value::Null) => {}
        (target, source) => *target = source.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_json() {
        let mut summary = json!({
            "challengeId": 1,
            "challengeName": "Summary name",
            "prize": {"first": 100},
            "platforms": null
        });
        merge_json(
            &mut summary,
            &json!({
                "challengeName": "Detail name",
                "prize": {"second": 50},
                "platforms": ["Linux"],
                "challengeId": null
            }),
        );
        assert_eq!(
            summary,
            json!({
                "challengeId": 1,
                "challengeName": "Detail name",
                "prize": {"first": 100, "second": 50},
                "platforms": ["Linux"]
            })
        );
    }

    #[test]
    fn test_upstream_cache_key() {
        let params = vec![
            ("listType".to_string(), "past".to_string()),
            ("pageSize".to_string(), "51".to_string()),
        ];
        assert_eq!(
            upstream_cache_key("http://api/v2/data/marathon/challenges", &params),
            "http://api/v2/data/marathon/challenges?listType=past&pageSize=51"
        );
        assert_eq!(upstream_cache_key("http://api/v2/challenges/1", &[]), "http://api/v2/challenges/1");
    }

    #[test]
    fn test_pagination_defaults_win() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        let client = UpstreamClient::new(
            &UpstreamConfig::default(),
            Duration::from_secs(1),
            cache,
        )
        .unwrap();

        let params = client.with_pagination(&[
            ("type".to_string(), "develop".to_string()),
            ("pageSize".to_string(), "1000".to_string()),
        ]);
        assert_eq!(
            params,
            vec![
                ("type".to_string(), "develop".to_string()),
                ("pageIndex".to_string(), "1".to_string()),
                ("pageSize".to_string(), "51".to_string()),
            ]
        );
    }

    #[test]
    fn test_data_array_required() {
        let err = data_array(&json!({"items": []}), "http://api/x").unwrap_err();
        assert!(matches!(err, UpstreamError::Decode { .. }));
        assert_eq!(data_array(&json!({"data": [1, 2]}), "u").unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_cached_body_short_circuits_network() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        let config = UpstreamConfig {
            // Nothing listens here; a network call would fail.
            api_host: "http://127.0.0.1:9".to_string(),
            page_size: 5,
        };
        let client = UpstreamClient::new(&config, Duration::from_millis(200), cache.clone()).unwrap();

        let url = "http://127.0.0.1:9/v2/data/marathon/challenges";
        let key = upstream_cache_key(
            url,
            &[
                ("listType".to_string(), "active".to_string()),
                ("pageIndex".to_string(), "1".to_string()),
                ("pageSize".to_string(), "5".to_string()),
            ],
        );
        cache.put(
            CacheKey::Upstream(key),
            Payload::Json(Arc::new(json!({"data": [{"fullName": "Cached MM", "problemId": 7}]}))),
        );

        let records = client.fetch_data_science_challenges("active").await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Cached MM");
    }

    #[tokio::test]
    async fn test_transport_failure_is_not_cached() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        let config = UpstreamConfig {
            api_host: "http://127.0.0.1:9".to_string(),
            page_size: 5,
        };
        let client = UpstreamClient::new(&config, Duration::from_millis(200), cache.clone()).unwrap();

        let err = client.fetch_standard_challenges("active", &[]).await.unwrap_err();
        assert!(matches!(err, UpstreamError::Transport { .. }));
        assert!(cache.is_empty());
    }
}
