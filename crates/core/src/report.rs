use crate::types::{AnalysisResult, RoastResult};

impl AnalysisResult {
    pub fn to_markdown(&self) -> String {
        let mut s = String::new();
        s.push_str("# scandalscope report\n\n");
        s.push_str(&format!("- version: `{}`\n", self.version));
        s.push_str(&format!("- id: `{}`\n", self.id));
        s.push_str(&format!("- timestamp: `{}`\n", self.timestamp.to_rfc3339()));
        s.push_str(&format!("- classifier: `{}`\n", self.classifier));
        s.push('\n');

        s.push_str("## Text\n\n");
        for line in self.text.lines() {
            s.push_str(&format!("> {}\n", line));
        }
        s.push('\n');

        s.push_str("## Verdict\n\n");
        s.push_str(&format!("- cancel_score: `{}`\n", self.cancel_score));
        s.push_str(&format!("- risk_level: `{}`\n", self.risk_level));
        s.push_str(&format!("- confidence: `{:.2}`\n", self.confidence));
        s.push_str(&format!(
            "- processing_time_ms: `{}`\n",
            self.processing_time_ms
        ));
        s.push('\n');

        s.push_str("## Categories\n\n");
        for (c, v) in self.categories.iter() {
            s.push_str(&format!("- {}: `{:.1}`\n", c.as_str(), v));
        }
        s.push('\n');

        s.push_str("## Roast\n\n");
        s.push_str(&self.roast);
        s.push_str("\n\n");

        s.push_str("## Apology\n\n");
        s.push_str(&self.apology);
        s.push_str("\n\n");

        s.push_str("## Recommendations\n\n");
        for r in &self.recommendations {
            s.push_str(&format!("- {}\n", r));
        }

        s
    }
}

impl RoastResult {
    pub fn to_markdown(&self) -> String {
        let mut s = String::new();
        s.push_str(&format!("# {} roast\n\n", self.mode.as_str()));
        s.push_str(&format!("> {}\n\n", self.original_text));
        s.push_str(&self.content);
        s.push_str("\n\n");
        s.push_str(&format!("- confidence: `{:.2}`\n", self.confidence));
        if !self.tags.is_empty() {
            s.push_str(&format!("- tags: {}\n", self.tags.join(", ")));
        }
        s
    }
}
