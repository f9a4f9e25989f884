//! Comment-analysis API client (Perspective-style).

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::config::PerspectiveConfig;
use crate::error::ClassifierError;
use crate::types::{AnalysisCategories, Category};

use super::{Classification, Classifier};

const PROVIDER: &str = "perspective";
const CONFIDENCE: f64 = 0.95;

pub struct PerspectiveClassifier {
    client: Client,
    base_url: String,
    api_key: SecretString,
}

impl PerspectiveClassifier {
    pub fn new(config: &PerspectiveConfig, api_key: SecretString) -> Result<Self, ClassifierError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClassifierError::NotConfigured {
                provider: PROVIDER.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn api_url(&self) -> String {
        format!("{}/v1alpha1/comments:analyze", self.base_url)
    }
}

fn attribute_name(category: Category) -> &'static str {
    match category {
        Category::Toxicity => "TOXICITY",
        Category::IdentityAttack => "IDENTITY_ATTACK",
        Category::Insult => "INSULT",
        Category::Profanity => "PROFANITY",
        Category::Threat => "THREAT",
        Category::SexuallyExplicit => "SEXUALLY_EXPLICIT",
        Category::Flirtation => "FLIRTATION",
        Category::Spam => "SPAM",
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeRequest<'a> {
    comment: Comment<'a>,
    requested_attributes: HashMap<&'static str, EmptyObject>,
    languages: Vec<&'static str>,
    do_not_store: bool,
}

#[derive(Debug, Serialize)]
struct Comment<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct EmptyObject {}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeResponse {
    #[serde(default)]
    attribute_scores: HashMap<String, AttributeScore>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AttributeScore {
    summary_score: SummaryScore,
}

#[derive(Debug, Deserialize)]
struct SummaryScore {
    value: f64,
}

fn build_request(text: &str) -> AnalyzeRequest<'_> {
    AnalyzeRequest {
        comment: Comment { text },
        requested_attributes: Category::ALL
            .iter()
            .map(|c| (attribute_name(*c), EmptyObject {}))
            .collect(),
        languages: vec!["en"],
        do_not_store: true,
    }
}

/// Scores arrive in `[0, 1]`; missing attributes count as zero.
fn categories_from_response(body: &str) -> Result<AnalysisCategories, ClassifierError> {
    let resp: AnalyzeResponse =
        serde_json::from_str(body).map_err(|e| ClassifierError::InvalidResponse {
            provider: PROVIDER.to_string(),
            reason: format!("JSON parse error: {}", e),
        })?;

    Ok(AnalysisCategories::from_fn(|c| {
        resp.attribute_scores
            .get(attribute_name(c))
            .map(|a| a.summary_score.value * 100.0)
            .unwrap_or(0.0)
    }))
}

#[async_trait]
impl Classifier for PerspectiveClassifier {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn classify(&self, text: &str) -> Result<Classification, ClassifierError> {
        let url = self.api_url();
        tracing::debug!("Sending request to comment analyzer: {}", url);

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.expose_secret())])
            .json(&build_request(text))
            .send()
            .await
            .map_err(|e| ClassifierError::RequestFailed {
                provider: PROVIDER.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        tracing::debug!("Comment analyzer response status: {}", status);

        if !status.is_success() {
            return Err(ClassifierError::RequestFailed {
                provider: PROVIDER.to_string(),
                reason: format!("HTTP {}: {}", status, body),
            });
        }

        Ok(Classification {
            categories: categories_from_response(&body)?,
            confidence: CONFIDENCE,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_uses_api_field_names() {
        let v = serde_json::to_value(build_request("some words")).unwrap();
        assert_eq!(v["comment"]["text"], "some words");
        assert_eq!(v["doNotStore"], true);
        assert_eq!(v["languages"][0], "en");
        assert!(v["requestedAttributes"]["IDENTITY_ATTACK"].is_object());
        assert_eq!(v["requestedAttributes"].as_object().unwrap().len(), 8);
    }

    #[test]
    fn response_scores_scale_to_percent() {
        let body = r#"{
            "attributeScores": {
                "TOXICITY": {"summaryScore": {"value": 0.82, "type": "PROBABILITY"}},
                "INSULT": {"summaryScore": {"value": 0.5}}
            },
            "languages": ["en"]
        }"#;
        let c = categories_from_response(body).unwrap();
        assert!((c.toxicity - 82.0).abs() < 1e-9);
        assert!((c.insult - 50.0).abs() < 1e-9);
        assert_eq!(c.spam, 0.0);
    }

    #[test]
    fn malformed_response_is_an_error() {
        let err = categories_from_response("not json").unwrap_err();
        assert!(matches!(err, ClassifierError::InvalidResponse { .. }));
    }
}
