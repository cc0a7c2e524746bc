use super::*;
use serde_json::json;

#[test]
fn brief_payload_omits_unset_generation_knobs() {
    let brief = CampaignBrief {
        product: "SparkX Energy Drink".to_string(),
        audience: "students".to_string(),
        tone: "energetic".to_string(),
        goal: "awareness".to_string(),
        platform: vec!["instagram".to_string(), "instagram".to_string()],
        ..CampaignBrief::default()
    };

    let value = serde_json::to_value(&brief).expect("serialize");
    assert_eq!(
        value,
        json!({
            "product": "SparkX Energy Drink",
            "audience": "students",
            "tone": "energetic",
            "goal": "awareness",
            "platform": ["instagram", "instagram"],
        })
    );
}

#[test]
fn brief_payload_carries_knobs_when_set() {
    let mut brief = CampaignBrief {
        num_headlines: Some(2),
        num_long: Some(0),
        ..CampaignBrief::default()
    };
    brief.extra.insert("brand_color".to_string(), json!("#ff5050"));

    let value = serde_json::to_value(&brief).expect("serialize");
    assert_eq!(value["num_headlines"], json!(2));
    assert_eq!(value["num_long"], json!(0));
    assert_eq!(value["extra"]["brand_color"], json!("#ff5050"));
}

#[test]
fn result_without_top_assets_is_empty() {
    let result: GenerationResult = serde_json::from_str("{}").expect("deserialize");
    assert!(result.is_empty());
    assert!(result.report.is_none());
}

#[test]
fn null_top_assets_is_empty() {
    let result: GenerationResult =
        serde_json::from_str(r#"{"top_assets": null}"#).expect("deserialize");
    assert!(result.is_empty());
}

#[test]
fn result_keeps_server_order_and_report_paths() {
    let result: GenerationResult = serde_json::from_value(json!({
        "top_assets": [
            {"score": 0.2, "copy": "low", "image_url": "http://x/low.png"},
            {"score": 0.9, "copy": "high", "image_url": "http://x/high.png", "local_path": "/tmp/high.png"},
        ],
        "report": {"csv": "outputs/report.csv", "pdf": "outputs/report.pdf"},
    }))
    .expect("deserialize");

    let copies: Vec<_> = result.top_assets.iter().map(|a| a.copy.as_str()).collect();
    assert_eq!(copies, vec!["low", "high"]);
    assert_eq!(
        result.top_assets[1].local_path.as_deref(),
        Some("/tmp/high.png")
    );
    assert_eq!(
        result.report,
        Some(ReportPaths {
            csv: "outputs/report.csv".to_string(),
            pdf: "outputs/report.pdf".to_string(),
        })
    );
}

#[test]
fn integer_scores_deserialize() {
    let asset: GeneratedAsset =
        serde_json::from_value(json!({"score": 0, "copy": "", "image_url": ""})).expect("asset");
    assert_eq!(asset.score, 0.0);
}
