use std::collections::VecDeque;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::types::AnalysisResult;

pub const HISTORY_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct HistoryFile {
    version: u32,
    entries: VecDeque<AnalysisResult>,
}

/// Most-recent-first list of past analyses, bounded to `max_entries`.
#[derive(Debug, Clone)]
pub struct History {
    max_entries: usize,
    entries: VecDeque<AnalysisResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryStats {
    pub count: usize,
    pub average_score: f64,
    pub highest: Option<AnalysisResult>,
}

impl History {
    pub fn new(max_entries: usize) -> Self {
        Self {
            max_entries: max_entries.max(1),
            entries: VecDeque::new(),
        }
    }

    pub fn push(&mut self, result: AnalysisResult) {
        self.entries.retain(|e| e.id != result.id);
        self.entries.push_front(result);
        self.entries.truncate(self.max_entries);
    }

    pub fn entries(&self) -> impl Iterator<Item = &AnalysisResult> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn stats(&self) -> HistoryStats {
        let count = self.entries.len();
        let average_score = if count == 0 {
            0.0
        } else {
            self.entries.iter().map(|e| e.cancel_score as f64).sum::<f64>() / count as f64
        };
        HistoryStats {
            count,
            average_score,
            highest: self.entries.iter().max_by_key(|e| e.cancel_score).cloned(),
        }
    }

    pub fn from_json(bytes: &[u8], max_entries: usize) -> anyhow::Result<Self> {
        let mut history = Self::new(max_entries);
        let file: HistoryFile = serde_json::from_slice(bytes).context("parse history json")?;
        if file.version != HISTORY_VERSION {
            tracing::warn!(
                found = file.version,
                expected = HISTORY_VERSION,
                "history version mismatch, starting empty"
            );
            return Ok(history);
        }
        history.entries = file.entries;
        history.entries.truncate(history.max_entries);
        Ok(history)
    }

    /// A missing file loads as an empty history.
    pub fn load(path: &Path, max_entries: usize) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::new(max_entries));
        }
        let bytes = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
        Self::from_json(&bytes, max_entries)
            .with_context(|| format!("load history {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("create {}", dir.display()))?;
        }
        let file = HistoryFile {
            version: HISTORY_VERSION,
            entries: self.entries.clone(),
        };
        let json = serde_json::to_vec_pretty(&file).context("serialize history json")?;
        std::fs::write(path, json).with_context(|| format!("write {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AnalysisCategories, ContentSource, RiskLevel};
    use chrono::Utc;
    use uuid::Uuid;

    fn result(score: u8) -> AnalysisResult {
        AnalysisResult {
            id: Uuid::new_v4(),
            text: format!("text scoring {score}"),
            cancel_score: score,
            risk_level: RiskLevel::Safe,
            roast: String::new(),
            apology: String::new(),
            timestamp: Utc::now(),
            categories: AnalysisCategories::default(),
            recommendations: vec![],
            confidence: 0.7,
            processing_time_ms: 1,
            version: "test".to_string(),
            classifier: "heuristic".to_string(),
            content_source: ContentSource::Template,
        }
    }

    #[test]
    fn push_keeps_most_recent_first_and_bounded() {
        let mut h = History::new(2);
        h.push(result(1));
        h.push(result(2));
        h.push(result(3));
        let scores: Vec<u8> = h.entries().map(|e| e.cancel_score).collect();
        assert_eq!(scores, vec![3, 2]);
    }

    #[test]
    fn pushing_same_result_twice_keeps_one() {
        let mut h = History::new(5);
        let r = result(10);
        h.push(r.clone());
        h.push(r);
        assert_eq!(h.len(), 1);
    }

    #[test]
    fn stats_average_and_highest() {
        let mut h = History::new(5);
        assert_eq!(h.stats().count, 0);
        h.push(result(10));
        h.push(result(70));
        h.push(result(40));
        let s = h.stats();
        assert_eq!(s.count, 3);
        assert!((s.average_score - 40.0).abs() < 1e-9);
        assert_eq!(s.highest.unwrap().cancel_score, 70);
    }

    #[test]
    fn other_version_loads_empty() {
        let bytes = br#"{"version":0,"entries":[]}"#;
        let h = History::from_json(bytes, 10).unwrap();
        assert!(h.is_empty());
    }
}
