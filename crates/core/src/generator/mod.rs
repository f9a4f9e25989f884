//! Roast and apology generation with template fallback.

mod chat;
mod prompts;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::{rngs::StdRng, seq::SliceRandom};

use crate::config::{Config, Secrets};
use crate::error::GenerationError;
use crate::templates::{self, NO_APOLOGY_NEEDED};
use crate::types::{ContentSource, Personality, RiskLevel, RoastMode};

pub use chat::{ChatClient, ChatMessage, ChatRequest, OpenAiChatClient, Role};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub content: String,
    pub source: ContentSource,
}

impl Generated {
    fn template(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            source: ContentSource::Template,
        }
    }
}

pub struct ContentGenerator {
    chat: Option<Arc<dyn ChatClient>>,
    timeout: Duration,
    simulated_latency: Duration,
    rng: Mutex<StdRng>,
}

impl ContentGenerator {
    pub fn new(
        chat: Option<Arc<dyn ChatClient>>,
        timeout: Duration,
        simulated_latency: Duration,
        rng: StdRng,
    ) -> Self {
        Self {
            chat,
            timeout,
            simulated_latency,
            rng: Mutex::new(rng),
        }
    }

    pub fn has_llm(&self) -> bool {
        self.chat.is_some()
    }

    pub async fn roast(&self, level: RiskLevel, text: &str, personality: Personality) -> Generated {
        self.generate(
            || prompts::roast_request(text, level, personality),
            templates::roasts(level),
        )
        .await
    }

    /// SAFE and MILD never call out: they get the fixed no-apology message.
    pub async fn apology(&self, level: RiskLevel, text: &str, personality: Personality) -> Generated {
        if level < RiskLevel::Moderate {
            return Generated::template(NO_APOLOGY_NEEDED);
        }
        self.generate(
            || prompts::apology_request(text, level, personality),
            templates::apologies(level),
        )
        .await
    }

    pub async fn mode_roast(&self, text: &str, mode: RoastMode) -> Generated {
        self.generate(|| prompts::mode_request(text, mode), templates::mode_roasts(mode))
            .await
    }

    async fn generate(
        &self,
        request: impl FnOnce() -> ChatRequest,
        fallback: &'static [&'static str],
    ) -> Generated {
        match &self.chat {
            Some(chat) => match self.call(chat.as_ref(), request()).await {
                Ok(content) => {
                    return Generated {
                        content,
                        source: ContentSource::Llm,
                    }
                }
                Err(e) => tracing::warn!(error = %e, "LLM generation failed, using template"),
            },
            None => {
                if !self.simulated_latency.is_zero() {
                    tokio::time::sleep(self.simulated_latency).await;
                }
            }
        }
        Generated::template(self.pick(fallback))
    }

    async fn call(&self, chat: &dyn ChatClient, request: ChatRequest) -> Result<String, GenerationError> {
        let raw = tokio::time::timeout(self.timeout, chat.complete(request))
            .await
            .map_err(|_| GenerationError::Timeout(self.timeout))??;
        clean_completion(&raw).ok_or(GenerationError::EmptyContent)
    }

    fn pick(&self, table: &'static [&'static str]) -> &'static str {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        table.choose(&mut *rng).copied().unwrap_or(NO_APOLOGY_NEEDED)
    }
}

/// Trims whitespace and one layer of wrapping quotes.
fn clean_completion(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed)
        .trim();
    if unquoted.is_empty() {
        None
    } else {
        Some(unquoted.to_string())
    }
}

/// Chat client for `config.llm`, when enabled and a key is present.
pub fn build_chat_client(config: &Config, secrets: &Secrets) -> Option<Arc<dyn ChatClient>> {
    if !config.llm.enabled {
        return None;
    }
    let key = secrets.openai_api_key.clone()?;
    match OpenAiChatClient::new(&config.llm, key) {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            tracing::warn!(error = %e, "failed to build chat client, using templates only");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rand::SeedableRng;

    struct Scripted(Result<&'static str, u16>);

    #[async_trait]
    impl ChatClient for Scripted {
        async fn complete(&self, _request: ChatRequest) -> Result<String, GenerationError> {
            match self.0 {
                Ok(s) => Ok(s.to_string()),
                Err(status) => Err(GenerationError::Http {
                    status,
                    body: String::new(),
                }),
            }
        }
    }

    struct Hangs;

    #[async_trait]
    impl ChatClient for Hangs {
        async fn complete(&self, _request: ChatRequest) -> Result<String, GenerationError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok("too late".to_string())
        }
    }

    fn generator(chat: Option<Arc<dyn ChatClient>>) -> ContentGenerator {
        ContentGenerator::new(
            chat,
            Duration::from_secs(15),
            Duration::ZERO,
            StdRng::seed_from_u64(1),
        )
    }

    #[tokio::test]
    async fn template_roast_comes_from_level_table() {
        let g = generator(None);
        let out = g.roast(RiskLevel::High, "anything at all", Personality::Witty).await;
        assert_eq!(out.source, ContentSource::Template);
        assert!(templates::roasts(RiskLevel::High).contains(&out.content.as_str()));
    }

    #[tokio::test]
    async fn mild_apology_is_fixed_even_with_llm() {
        let g = generator(Some(Arc::new(Scripted(Ok("sorry!")))));
        let out = g.apology(RiskLevel::Mild, "text", Personality::Sarcastic).await;
        assert_eq!(out, Generated::template(NO_APOLOGY_NEEDED));
    }

    #[tokio::test]
    async fn llm_content_is_cleaned() {
        let g = generator(Some(Arc::new(Scripted(Ok("  \"nice try\"  ")))));
        let out = g.roast(RiskLevel::Safe, "text", Personality::Friendly).await;
        assert_eq!(out.content, "nice try");
        assert_eq!(out.source, ContentSource::Llm);
    }

    #[tokio::test]
    async fn http_error_falls_back_to_template() {
        let g = generator(Some(Arc::new(Scripted(Err(500)))));
        let out = g.apology(RiskLevel::Extreme, "text", Personality::Brutal).await;
        assert_eq!(out.source, ContentSource::Template);
        assert!(templates::apologies(RiskLevel::Extreme).contains(&out.content.as_str()));
    }

    #[tokio::test]
    async fn blank_completion_falls_back_to_template() {
        let g = generator(Some(Arc::new(Scripted(Ok("   ")))));
        let out = g.mode_roast("text", RoastMode::Hr).await;
        assert_eq!(out.source, ContentSource::Template);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_llm_times_out_to_template() {
        let g = generator(Some(Arc::new(Hangs)));
        let out = g.mode_roast("text", RoastMode::Savage).await;
        assert_eq!(out.source, ContentSource::Template);
        assert!(templates::mode_roasts(RoastMode::Savage).contains(&out.content.as_str()));
    }

    #[test]
    fn disabled_llm_builds_no_client() {
        let cfg = Config {
            llm: crate::config::LlmConfig {
                enabled: false,
                ..Default::default()
            },
            ..Config::default()
        };
        assert!(build_chat_client(&cfg, &Secrets::default()).is_none());
    }
}
