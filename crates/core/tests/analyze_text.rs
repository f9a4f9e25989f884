use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use scandalscope_core::classifier::{Classification, Classifier, HeuristicClassifier, NoJitter};
use scandalscope_core::config::{Config, RateLimitConfig};
use scandalscope_core::error::{ClassifierError, GenerationError, ScopeError, ValidationError};
use scandalscope_core::generator::{ChatClient, ChatRequest};
use scandalscope_core::rules::{LOOKS_GOOD, PROFANITY_ADVICE, TOXICITY_ADVICE};
use scandalscope_core::templates::NO_APOLOGY_NEEDED;
use scandalscope_core::types::{ContentSource, RiskLevel, RoastMode};
use scandalscope_core::{AnalyzeOptions, ScandalScope};

/// Heuristic classifier that counts invocations.
struct Counting {
    inner: HeuristicClassifier,
    calls: AtomicUsize,
}

impl Counting {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: HeuristicClassifier::new(Arc::new(NoJitter)),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Classifier for Counting {
    fn name(&self) -> &'static str {
        "counting"
    }

    async fn classify(&self, text: &str) -> Result<Classification, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.inner.score(text))
    }
}

struct Broken;

#[async_trait]
impl Classifier for Broken {
    fn name(&self) -> &'static str {
        "broken"
    }

    async fn classify(&self, _text: &str) -> Result<Classification, ClassifierError> {
        Err(ClassifierError::RequestFailed {
            provider: "broken".to_string(),
            reason: "connection refused".to_string(),
        })
    }
}

struct Echo;

#[async_trait]
impl ChatClient for Echo {
    async fn complete(&self, request: ChatRequest) -> Result<String, GenerationError> {
        Ok(format!("echo: {} messages", request.messages.len()))
    }
}

fn engine() -> ScandalScope {
    ScandalScope::builder(Config::default())
        .seed(11)
        .build()
        .expect("engine builds")
}

#[tokio::test]
async fn pineapple_pizza_is_safe_and_wholesome() {
    let result = engine()
        .analyze_text(
            "I think pineapple on pizza is actually pretty good",
            &AnalyzeOptions::default(),
        )
        .await
        .expect("analysis ok");

    assert_eq!(result.risk_level, RiskLevel::Safe);
    assert!(result.cancel_score < 20, "score {}", result.cancel_score);
    let roast = result.roast.to_lowercase();
    assert!(roast.contains("vanilla") || roast.contains("wholesome"), "{roast}");
    assert_eq!(result.apology, NO_APOLOGY_NEEDED);
    assert_eq!(result.recommendations, vec![LOOKS_GOOD.to_string()]);
    assert_eq!(result.content_source, ContentSource::Template);
    assert_eq!(result.classifier, "heuristic");
}

#[tokio::test]
async fn hateful_rant_is_high_risk_with_advice() {
    let result = engine()
        .analyze_text(
            "I hate everyone and everything is stupid and worst terrible awful",
            &AnalyzeOptions::default(),
        )
        .await
        .expect("analysis ok");

    assert!(result.risk_level >= RiskLevel::High, "{:?}", result.risk_level);
    assert!(result.cancel_score >= 60);
    assert!(result.recommendations.contains(&TOXICITY_ADVICE.to_string()));
    assert!(result.recommendations.contains(&PROFANITY_ADVICE.to_string()));
    assert_ne!(result.apology, NO_APOLOGY_NEEDED);
}

#[tokio::test]
async fn short_text_is_rejected_before_scoring() {
    let counting = Counting::new();
    let engine = ScandalScope::builder(Config::default())
        .classifier(counting.clone())
        .build()
        .unwrap();

    let err = engine
        .analyze_text("  too short  ", &AnalyzeOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ScopeError::Validation(ValidationError::TooShort { len: 9, min: 10 })
    ));
    assert_eq!(counting.calls(), 0);
}

#[tokio::test]
async fn long_text_is_rejected_before_scoring() {
    let counting = Counting::new();
    let engine = ScandalScope::builder(Config::default())
        .classifier(counting.clone())
        .build()
        .unwrap();

    let text = "word ".repeat(401);
    let err = engine
        .analyze_text(&text, &AnalyzeOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ScopeError::Validation(ValidationError::TooLong { max: 2000, .. })
    ));
    assert_eq!(counting.calls(), 0);
}

#[tokio::test]
async fn eleventh_request_in_window_is_rate_limited() {
    let engine = engine();
    for i in 0..10 {
        engine
            .analyze_text(&format!("harmless message number {i}"), &AnalyzeOptions::default())
            .await
            .expect("within quota");
    }

    let err = engine
        .analyze_text("harmless message number 10", &AnalyzeOptions::default())
        .await
        .unwrap_err();

    match err {
        ScopeError::RateLimited { retry_after } => assert!(!retry_after.is_zero()),
        other => panic!("expected rate limit, got {other:?}"),
    }
}

#[tokio::test]
async fn roasts_share_the_rate_limit() {
    let cfg = Config {
        rate_limit: RateLimitConfig {
            max_requests: 1,
            window_secs: 60,
        },
        ..Config::default()
    };
    let engine = ScandalScope::builder(cfg).build().unwrap();
    engine
        .analyze_text("a calm note about the weather", &AnalyzeOptions::default())
        .await
        .unwrap();
    let err = engine
        .generate_roast("a calm note about the weather", RoastMode::Genz)
        .await
        .unwrap_err();
    assert!(matches!(err, ScopeError::RateLimited { .. }));
}

#[tokio::test]
async fn repeated_text_is_served_from_cache() {
    let counting = Counting::new();
    let engine = ScandalScope::builder(Config::default())
        .classifier(counting.clone())
        .build()
        .unwrap();
    let text = "Honestly, tabs are better than spaces";

    let first = engine.analyze_text(text, &AnalyzeOptions::default()).await.unwrap();
    for _ in 0..15 {
        let again = engine
            .analyze_text(text, &AnalyzeOptions::default())
            .await
            .expect("cache hits do not use quota");
        assert_eq!(again.id, first.id);
    }
    assert_eq!(counting.calls(), 1);

    engine.clear_cache();
    let fresh = engine.analyze_text(text, &AnalyzeOptions::default()).await.unwrap();
    assert_ne!(fresh.id, first.id);
    assert_eq!(fresh.cancel_score, first.cancel_score);
    assert_eq!(fresh.risk_level, first.risk_level);
}

#[tokio::test]
async fn classifier_failure_propagates() {
    let engine = ScandalScope::builder(Config::default())
        .classifier(Arc::new(Broken))
        .build()
        .unwrap();

    let err = engine
        .analyze_text("this will never get scored", &AnalyzeOptions::default())
        .await
        .unwrap_err();

    match err {
        ScopeError::Analysis { reason } => assert!(reason.contains("connection refused")),
        other => panic!("expected analysis error, got {other:?}"),
    }
}

#[tokio::test]
async fn llm_content_is_used_when_available() {
    let engine = ScandalScope::builder(Config::default())
        .chat_client(Arc::new(Echo))
        .build()
        .unwrap();

    let result = engine
        .analyze_text(
            "I hate everyone and everything is stupid and worst terrible awful",
            &AnalyzeOptions::default(),
        )
        .await
        .unwrap();
    assert_eq!(result.content_source, ContentSource::Llm);
    assert_eq!(result.roast, "echo: 2 messages");
    assert_eq!(result.apology, "echo: 2 messages");

    let roast = engine
        .generate_roast("I hate everyone and everything", RoastMode::Savage)
        .await
        .unwrap();
    assert_eq!(roast.tags, vec!["savage".to_string(), "llm".to_string()]);
}

#[tokio::test]
async fn templates_only_ignores_chat_client() {
    let engine = ScandalScope::builder(Config::default())
        .chat_client(Arc::new(Echo))
        .templates_only()
        .build()
        .unwrap();
    assert!(!engine.has_llm());

    let roast = engine
        .generate_roast("pineapple belongs on pizza", RoastMode::Friendly)
        .await
        .unwrap();
    assert_eq!(roast.tags[1], "template");
}
