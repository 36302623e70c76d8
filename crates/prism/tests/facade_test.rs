//! End-to-end run through the facade re-exports.

use async_trait::async_trait;
use prism::{
    GenerateRequest, GenerateResponse, LogSink, MemoryLogSink, ModelConfig, OutputLayout, PrismConfig,
    PrismDriver, PrismResult, build_agent, load_plan, run_story,
};
use std::io::Write;
use std::sync::Arc;
use tempfile::{NamedTempFile, TempDir};

/// Answers every stage with a fixed line.
struct EchoDriver;

#[async_trait]
impl PrismDriver for EchoDriver {
    async fn generate(&self, req: &GenerateRequest) -> PrismResult<GenerateResponse> {
        let user = req.messages.last().map(|m| m.content.as_str()).unwrap_or_default();
        let text = if user.starts_with("Conduct a Focal Decision") {
            "Category: 'No Issue (all A)'".to_string()
        } else if user.starts_with("Perform Spectral Analysis") {
            "Grade: A".to_string()
        } else {
            "Stage output.".to_string()
        };
        Ok(GenerateResponse::text(text))
    }

    fn provider_name(&self) -> &'static str {
        "echo"
    }

    fn model_name(&self) -> &str {
        "echo-1"
    }
}

#[tokio::test]
async fn test_run_story_with_configured_agent() {
    let dir = TempDir::new().unwrap();
    let sink = Arc::new(MemoryLogSink::new());
    let model = ModelConfig {
        system_prompt: Some("Be brief.".to_string()),
        ..ModelConfig::default()
    };
    let agent = build_agent(Arc::new(EchoDriver), &model, Some(sink.clone() as Arc<dyn LogSink>));
    let layout = OutputLayout::default().in_dir(dir.path().join("ex_1"));

    let (plan, write) = run_story(&agent, "ex_1", "A lighthouse story.", &layout).await;

    assert!(plan.plan.is_complete());
    assert_eq!(write.full_story, "Stage output.");
    assert_eq!(load_plan(&layout.plan_path()).unwrap().task, "A lighthouse story.");
    let records = sink.records();
    assert!(records.iter().all(|r| r.story_id() == "ex_1"));
    assert!(records.iter().all(|r| !r.request_message().contains("Be brief.")));
    assert_eq!(
        sink.log_types().last().map(String::as_str),
        Some("prism_write_synthesis")
    );
}

#[test]
fn test_config_file_output_names_flow_into_layout() {
    let mut file = NamedTempFile::with_suffix(".toml").unwrap();
    writeln!(
        file,
        "[output]\nwrite_text_file = \"tale.txt\"\n\n[model]\nprovider = \"openai\"\nname = \"gpt-4o-mini\""
    )
    .unwrap();

    let config = PrismConfig::from_file(file.path()).unwrap();

    assert_eq!(config.model.provider, "openai");
    assert_eq!(config.model.api_key_env, "ZHIPUAI_API_KEY");
    assert_eq!(
        config.output.in_dir("runs").write_text_path(),
        std::path::PathBuf::from("runs/tale.txt")
    );
}
