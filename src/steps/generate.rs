use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::backends::{GenerationParams, ImageBackend};
use crate::message::Message;
use crate::state::{StateUpdate, StepStatus, WorkflowState};
use crate::step::{Step, StepContext, StepError};

/// Calls the image backend with the refined prompt.
///
/// Preconditions: `refined_prompt` must be present and non-empty; otherwise
/// the step fails locally without touching the backend. Responses that lack
/// the expected `data[*].url` shape degrade to a single stringified result
/// rather than failing. A backend failure is captured into the state; this
/// step never lets one escape.
pub struct GenerateStep {
    image: Arc<dyn ImageBackend>,
    params: GenerationParams,
}

impl GenerateStep {
    pub fn new(image: Arc<dyn ImageBackend>, params: GenerationParams) -> Self {
        Self { image, params }
    }
}

/// Pull image URLs out of a provider response, tolerating unknown shapes.
///
/// Entries under `data` without a string `url` are skipped; a response with
/// no `data` array at all becomes a single stringified fallback entry.
fn extract_urls(response: &Value) -> Vec<String> {
    match response.get("data").and_then(Value::as_array) {
        Some(items) => items
            .iter()
            .filter_map(|item| item.get("url").and_then(Value::as_str))
            .map(str::to_owned)
            .collect(),
        None => vec![response.to_string()],
    }
}

#[async_trait]
impl Step for GenerateStep {
    async fn run(
        &self,
        snapshot: &WorkflowState,
        ctx: StepContext,
    ) -> Result<StateUpdate, StepError> {
        let Some(prompt) = snapshot.refined_prompt.as_deref().filter(|p| !p.is_empty()) else {
            return Ok(StateUpdate::new()
                .with_status(StepStatus::Error)
                .with_error("No refined prompt available"));
        };

        let _ = ctx.emit(
            "generate",
            format!("requesting {} image(s) from {}", self.params.count, self.params.model),
        );

        match self.image.generate(prompt, &self.params).await {
            Ok(response) => {
                let urls = extract_urls(&response);
                let _ = ctx.emit("generate", format!("generated {} image(s)", urls.len()));
                Ok(StateUpdate::new()
                    .with_message(Message::assistant(format!(
                        "Generated {} image(s) from your prompt.",
                        urls.len()
                    )))
                    .with_image_urls(urls)
                    .with_status(StepStatus::Completed)
                    .clear_error())
            }
            Err(e) => Ok(StateUpdate::new()
                .with_status(StepStatus::Error)
                .with_error(format!("Error generating images: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_urls_from_data_array() {
        let response = json!({
            "data": [
                {"url": "https://img.example/a.png"},
                {"url": "https://img.example/b.png"},
            ]
        });
        assert_eq!(
            extract_urls(&response),
            vec!["https://img.example/a.png", "https://img.example/b.png"]
        );
    }

    #[test]
    fn skips_entries_without_urls() {
        let response = json!({"data": [{"url": "https://img.example/a.png"}, {"b64": "…"}]});
        assert_eq!(extract_urls(&response).len(), 1);
    }

    #[test]
    fn empty_data_array_yields_no_urls() {
        assert!(extract_urls(&json!({"data": []})).is_empty());
    }

    #[test]
    fn unexpected_shape_falls_back_to_stringified_result() {
        let response = json!("opaque-blob");
        assert_eq!(extract_urls(&response), vec![r#""opaque-blob""#.to_string()]);
    }
}
