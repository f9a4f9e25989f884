//! Weighted aggregation of category scores and risk classification.

use serde::{Deserialize, Serialize};

use crate::types::{AnalysisCategories, Category, RiskLevel};

const WEIGHT_SUM_TOLERANCE: f64 = 1e-3;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Weights {
    pub toxicity: f64,
    pub identity_attack: f64,
    pub insult: f64,
    pub profanity: f64,
    pub threat: f64,
    pub sexually_explicit: f64,
    pub flirtation: f64,
    pub spam: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            toxicity: 0.25,
            identity_attack: 0.20,
            insult: 0.15,
            profanity: 0.10,
            threat: 0.15,
            sexually_explicit: 0.10,
            flirtation: 0.025,
            spam: 0.025,
        }
    }
}

impl Weights {
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Toxicity => self.toxicity,
            Category::IdentityAttack => self.identity_attack,
            Category::Insult => self.insult,
            Category::Profanity => self.profanity,
            Category::Threat => self.threat,
            Category::SexuallyExplicit => self.sexually_explicit,
            Category::Flirtation => self.flirtation,
            Category::Spam => self.spam,
        }
    }

    pub fn sum(&self) -> f64 {
        Category::ALL.iter().map(|c| self.get(*c)).sum()
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        for c in Category::ALL {
            let w = self.get(c);
            if !w.is_finite() || w < 0.0 {
                anyhow::bail!("weight for {} must be a non-negative number, got {}", c.as_str(), w);
            }
        }
        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            anyhow::bail!("weights must sum to 1.0, got {:.4}", sum);
        }
        Ok(())
    }
}

/// Lower bounds (inclusive) of each level above SAFE.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RiskThresholds {
    pub mild: u8,
    pub moderate: u8,
    pub high: u8,
    pub extreme: u8,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            mild: 20,
            moderate: 40,
            high: 60,
            extreme: 80,
        }
    }
}

impl RiskThresholds {
    pub fn classify(&self, score: u8) -> RiskLevel {
        if score < self.mild {
            RiskLevel::Safe
        } else if score < self.moderate {
            RiskLevel::Mild
        } else if score < self.high {
            RiskLevel::Moderate
        } else if score < self.extreme {
            RiskLevel::High
        } else {
            RiskLevel::Extreme
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let ascending = 0 < self.mild
            && self.mild < self.moderate
            && self.moderate < self.high
            && self.high < self.extreme
            && self.extreme <= 100;
        if !ascending {
            anyhow::bail!(
                "thresholds must be strictly ascending within (0, 100]: {}/{}/{}/{}",
                self.mild,
                self.moderate,
                self.high,
                self.extreme
            );
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Aggregate {
    pub cancel_score: u8,
    pub risk_level: RiskLevel,
}

pub fn cancel_score(categories: &AnalysisCategories, weights: &Weights) -> u8 {
    let raw: f64 = categories.iter().map(|(c, v)| weights.get(c) * v).sum();
    if raw.is_nan() {
        return 0;
    }
    raw.round().clamp(0.0, 100.0) as u8
}

pub fn aggregate(
    categories: &AnalysisCategories,
    weights: &Weights,
    thresholds: &RiskThresholds,
) -> Aggregate {
    let cancel_score = cancel_score(categories, weights);
    Aggregate {
        cancel_score,
        risk_level: thresholds.classify(cancel_score),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_sum_to_one() {
        assert!((Weights::default().sum() - 1.0).abs() < 1e-9);
        Weights::default().validate().unwrap();
    }

    #[test]
    fn bucket_boundaries() {
        let t = RiskThresholds::default();
        assert_eq!(t.classify(0), RiskLevel::Safe);
        assert_eq!(t.classify(19), RiskLevel::Safe);
        assert_eq!(t.classify(20), RiskLevel::Mild);
        assert_eq!(t.classify(39), RiskLevel::Mild);
        assert_eq!(t.classify(40), RiskLevel::Moderate);
        assert_eq!(t.classify(59), RiskLevel::Moderate);
        assert_eq!(t.classify(60), RiskLevel::High);
        assert_eq!(t.classify(79), RiskLevel::High);
        assert_eq!(t.classify(80), RiskLevel::Extreme);
        assert_eq!(t.classify(100), RiskLevel::Extreme);
    }

    #[test]
    fn all_max_categories_score_one_hundred() {
        let c = AnalysisCategories::from_fn(|_| 100.0);
        let agg = aggregate(&c, &Weights::default(), &RiskThresholds::default());
        assert_eq!(agg.cancel_score, 100);
        assert_eq!(agg.risk_level, RiskLevel::Extreme);
    }

    #[test]
    fn weighted_sum_rounds() {
        let c = AnalysisCategories {
            toxicity: 50.0,
            insult: 30.0,
            ..AnalysisCategories::default()
        };
        // 0.25 * 50 + 0.15 * 30 = 17.0
        assert_eq!(cancel_score(&c, &Weights::default()), 17);
    }

    #[test]
    fn rejects_unbalanced_weights() {
        let w = Weights {
            toxicity: 0.9,
            ..Weights::default()
        };
        assert!(w.validate().is_err());
    }

    #[test]
    fn rejects_unordered_thresholds() {
        let t = RiskThresholds {
            moderate: 10,
            ..RiskThresholds::default()
        };
        assert!(t.validate().is_err());
    }
}
