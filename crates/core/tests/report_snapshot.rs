use chrono::{TimeZone, Utc};
use uuid::Uuid;

use scandalscope_core::rules::LOOKS_GOOD;
use scandalscope_core::templates::NO_APOLOGY_NEEDED;
use scandalscope_core::types::{AnalysisCategories, AnalysisResult, ContentSource, RiskLevel};

#[test]
fn analysis_markdown() {
    let result = AnalysisResult {
        id: Uuid::nil(),
        text: "cats are overrated".to_string(),
        cancel_score: 33,
        risk_level: RiskLevel::Mild,
        roast: "Mildly hot take, served lukewarm.".to_string(),
        apology: NO_APOLOGY_NEEDED.to_string(),
        timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        categories: AnalysisCategories {
            toxicity: 20.0,
            identity_attack: 12.0,
            insult: 36.0,
            profanity: 12.0,
            threat: 10.0,
            sexually_explicit: 2.0,
            flirtation: 2.0,
            spam: 2.0,
        },
        recommendations: vec![LOOKS_GOOD.to_string()],
        confidence: 0.74,
        processing_time_ms: 2,
        version: "1.0.0".to_string(),
        classifier: "heuristic".to_string(),
        content_source: ContentSource::Template,
    };

    let md = result.to_markdown();
    insta::assert_snapshot!(md);
}
