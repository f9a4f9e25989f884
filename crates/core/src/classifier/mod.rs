//! Category scoring behind a pluggable `Classifier` capability.

mod heuristic;
mod perspective;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::config::{ClassifierKind, Config, Secrets, PERSPECTIVE_API_KEY_ENV};
use crate::error::ClassifierError;
use crate::types::{AnalysisCategories, Category};

pub use heuristic::HeuristicClassifier;
pub use perspective::PerspectiveClassifier;

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub categories: AnalysisCategories,
    /// In `[0, 1]`.
    pub confidence: f64,
}

#[async_trait]
pub trait Classifier: Send + Sync {
    fn name(&self) -> &'static str;

    async fn classify(&self, text: &str) -> Result<Classification, ClassifierError>;
}

/// Multiplicative noise applied to heuristic scores.
pub trait Jitter: Send + Sync {
    fn factor(&self, category: Category) -> f64;

    /// Maximum relative deviation of `factor` from 1.0.
    fn spread(&self) -> f64 {
        0.0
    }
}

pub struct NoJitter;

impl Jitter for NoJitter {
    fn factor(&self, _category: Category) -> f64 {
        1.0
    }
}

/// Uniform noise in `[1 - spread, 1 + spread]`.
pub struct RandomJitter {
    spread: f64,
    rng: Mutex<StdRng>,
}

impl RandomJitter {
    pub fn new(spread: f64) -> Self {
        Self::with_rng(spread, StdRng::from_entropy())
    }

    pub fn seeded(spread: f64, seed: u64) -> Self {
        Self::with_rng(spread, StdRng::seed_from_u64(seed))
    }

    fn with_rng(spread: f64, rng: StdRng) -> Self {
        Self {
            spread: spread.clamp(0.0, 0.99),
            rng: Mutex::new(rng),
        }
    }
}

impl Jitter for RandomJitter {
    fn factor(&self, _category: Category) -> f64 {
        if self.spread == 0.0 {
            return 1.0;
        }
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        rng.gen_range((1.0 - self.spread)..=(1.0 + self.spread))
    }

    fn spread(&self) -> f64 {
        self.spread
    }
}

/// Jitter source matching `config.jitter`.
pub fn jitter_from_config(config: &Config) -> Arc<dyn Jitter> {
    if config.jitter > 0.0 {
        Arc::new(RandomJitter::new(config.jitter))
    } else {
        Arc::new(NoJitter)
    }
}

/// Build the classifier selected by `config.classifier`.
pub fn build_classifier(
    config: &Config,
    secrets: &Secrets,
    jitter: Arc<dyn Jitter>,
) -> Result<Arc<dyn Classifier>, ClassifierError> {
    match config.classifier {
        ClassifierKind::Heuristic => Ok(Arc::new(HeuristicClassifier::new(jitter))),
        ClassifierKind::Perspective => {
            let key = secrets.perspective_api_key.clone().ok_or_else(|| {
                ClassifierError::NotConfigured {
                    provider: "perspective".to_string(),
                    reason: format!("{} is not set", PERSPECTIVE_API_KEY_ENV),
                }
            })?;
            Ok(Arc::new(PerspectiveClassifier::new(
                &config.perspective,
                key,
            )?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_jitter_stays_within_spread() {
        let j = RandomJitter::seeded(0.2, 7);
        for _ in 0..200 {
            let f = j.factor(Category::Toxicity);
            assert!((0.8..=1.2).contains(&f), "factor {f} out of range");
        }
    }

    #[test]
    fn zero_spread_is_identity() {
        let j = RandomJitter::seeded(0.0, 7);
        assert_eq!(j.factor(Category::Spam), 1.0);
    }

    #[test]
    fn perspective_without_key_is_not_configured() {
        let cfg = Config {
            classifier: ClassifierKind::Perspective,
            ..Config::default()
        };
        let err = build_classifier(&cfg, &Secrets::default(), Arc::new(NoJitter))
            .err()
            .expect("missing key must fail");
        assert!(matches!(err, ClassifierError::NotConfigured { .. }));
    }
}
