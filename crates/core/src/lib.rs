pub mod cache;
pub mod classifier;
pub mod config;
pub mod error;
pub mod generator;
pub mod history;
pub mod rate_limit;
pub mod report;
pub mod rules;
pub mod scoring;
pub mod templates;
pub mod types;
pub mod validate;

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use anyhow::Context;
use chrono::Utc;
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    cache::{cache_key, ResultCache},
    classifier::{build_classifier, jitter_from_config, Classifier, Jitter},
    config::{Config, Secrets},
    error::{Result, ScopeError},
    generator::{build_chat_client, ChatClient, ContentGenerator},
    rate_limit::SlidingWindow,
    types::{AnalysisResult, ContentSource, Personality, RoastMode, RoastResult},
    validate::{validate, LengthLimits},
};

pub const RESULT_VERSION: &str = env!("CARGO_PKG_VERSION");

const TEMPLATE_ROAST_CONFIDENCE: f64 = 0.75;
const LLM_ROAST_CONFIDENCE: f64 = 0.9;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzeOptions {
    /// Falls back to `config.personality`.
    pub personality: Option<Personality>,
    /// Skip the cache lookup. The fresh result is still cached.
    #[serde(skip)]
    pub bypass_cache: bool,
}

/// The parts of a request that change its outcome.
#[derive(Serialize)]
struct CacheScope<'a> {
    personality: Personality,
    classifier: &'a str,
}

pub struct ScandalScope {
    config: Config,
    classifier: Arc<dyn Classifier>,
    generator: ContentGenerator,
    cache: Mutex<ResultCache>,
    limiter: Mutex<SlidingWindow>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

impl ScandalScope {
    pub fn builder(config: Config) -> EngineBuilder {
        EngineBuilder::new(config)
    }

    /// Engine wired from `config` and API keys in the environment.
    pub fn from_env(config: Config) -> anyhow::Result<Self> {
        Self::builder(config).secrets(Secrets::from_env()).build()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn classifier_name(&self) -> &'static str {
        self.classifier.name()
    }

    pub fn has_llm(&self) -> bool {
        self.generator.has_llm()
    }

    pub fn clear_cache(&self) {
        lock(&self.cache).clear();
    }

    pub fn cached_results(&self) -> usize {
        lock(&self.cache).len()
    }

    fn limits(&self) -> LengthLimits {
        LengthLimits {
            min: self.config.min_length,
            max: self.config.max_length,
        }
    }

    fn acquire(&self) -> Result<()> {
        lock(&self.limiter)
            .try_acquire()
            .map_err(|retry_after| ScopeError::RateLimited { retry_after })
    }

    pub async fn analyze_text(&self, text: &str, options: &AnalyzeOptions) -> Result<AnalysisResult> {
        let started = Instant::now();
        let text = validate(text, self.limits())?;
        let personality = options.personality.unwrap_or(self.config.personality);

        let key = cache_key(
            text,
            &CacheScope {
                personality,
                classifier: self.classifier.name(),
            },
        );

        if !options.bypass_cache {
            let cached = lock(&self.cache).get(&key);
            if let Some(hit) = cached {
                tracing::debug!(id = %hit.id, "cache hit");
                return Ok(hit);
            }
        }

        self.acquire()?;

        let classification = self.classifier.classify(text).await?;
        let aggregate = scoring::aggregate(
            &classification.categories,
            &self.config.weights,
            &self.config.thresholds,
        );
        tracing::debug!(
            cancel_score = aggregate.cancel_score,
            risk_level = %aggregate.risk_level,
            "scored"
        );

        let roast = self
            .generator
            .roast(aggregate.risk_level, text, personality)
            .await;
        let apology = self
            .generator
            .apology(aggregate.risk_level, text, personality)
            .await;
        let recommendations = rules::recommend(&classification.categories, aggregate.risk_level);

        let result = AnalysisResult {
            id: Uuid::new_v4(),
            text: text.to_string(),
            cancel_score: aggregate.cancel_score,
            risk_level: aggregate.risk_level,
            roast: roast.content,
            apology: apology.content,
            timestamp: Utc::now(),
            categories: classification.categories,
            recommendations,
            confidence: classification.confidence,
            processing_time_ms: started.elapsed().as_millis() as u64,
            version: RESULT_VERSION.to_string(),
            classifier: self.classifier.name().to_string(),
            content_source: roast.source,
        };

        lock(&self.cache).put(key, result.clone());

        tracing::info!(
            id = %result.id,
            cancel_score = result.cancel_score,
            risk_level = %result.risk_level,
            elapsed_ms = result.processing_time_ms,
            "analysis complete"
        );

        Ok(result)
    }

    pub async fn generate_roast(&self, text: &str, mode: RoastMode) -> Result<RoastResult> {
        let text = validate(text, self.limits())?;
        self.acquire()?;

        let generated = self.generator.mode_roast(text, mode).await;
        let (confidence, source_tag) = match generated.source {
            ContentSource::Llm => (LLM_ROAST_CONFIDENCE, "llm"),
            ContentSource::Template => (TEMPLATE_ROAST_CONFIDENCE, "template"),
        };

        Ok(RoastResult {
            id: Uuid::new_v4(),
            content: generated.content,
            mode,
            timestamp: Utc::now(),
            original_text: text.to_string(),
            confidence,
            tags: vec![mode.as_str().to_string(), source_tag.to_string()],
        })
    }
}

pub struct EngineBuilder {
    config: Config,
    secrets: Secrets,
    classifier: Option<Arc<dyn Classifier>>,
    chat: Option<Arc<dyn ChatClient>>,
    templates_only: bool,
    jitter: Option<Arc<dyn Jitter>>,
    seed: Option<u64>,
}

impl EngineBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            secrets: Secrets::default(),
            classifier: None,
            chat: None,
            templates_only: false,
            jitter: None,
            seed: None,
        }
    }

    pub fn secrets(mut self, secrets: Secrets) -> Self {
        self.secrets = secrets;
        self
    }

    pub fn classifier(mut self, classifier: Arc<dyn Classifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn chat_client(mut self, chat: Arc<dyn ChatClient>) -> Self {
        self.chat = Some(chat);
        self
    }

    /// Never call an LLM, even when a key is configured.
    pub fn templates_only(mut self) -> Self {
        self.templates_only = true;
        self
    }

    pub fn jitter(mut self, jitter: Arc<dyn Jitter>) -> Self {
        self.jitter = Some(jitter);
        self
    }

    /// Seed for template selection.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(self) -> anyhow::Result<ScandalScope> {
        let config = self.config;
        config.validate().context("invalid configuration")?;

        let classifier = match self.classifier {
            Some(c) => c,
            None => {
                let jitter = self.jitter.unwrap_or_else(|| jitter_from_config(&config));
                build_classifier(&config, &self.secrets, jitter)
                    .context("failed to build classifier")?
            }
        };

        let chat = if self.templates_only {
            None
        } else {
            self.chat.or_else(|| build_chat_client(&config, &self.secrets))
        };

        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let generator = ContentGenerator::new(
            chat,
            Duration::from_secs(config.llm.timeout_secs),
            Duration::from_millis(config.simulated_latency_ms),
            rng,
        );

        let cache = ResultCache::new(
            config.cache.capacity,
            config.cache.ttl_secs.map(Duration::from_secs),
        );
        let limiter = SlidingWindow::new(
            config.rate_limit.max_requests,
            Duration::from_secs(config.rate_limit.window_secs),
        );

        tracing::debug!(
            classifier = classifier.name(),
            llm = generator.has_llm(),
            "engine ready"
        );

        Ok(ScandalScope {
            config,
            classifier,
            generator,
            cache: Mutex::new(cache),
            limiter: Mutex::new(limiter),
        })
    }
}
