//! Live producer adapter backed by the Anthropic messages API.
//!
//! Prompt construction and shape validation live here, on the far side of
//! the producer boundary: the core only ever sees validated
//! [`ProducedPart`] values or an error.

use std::env;
use std::error::Error;
use std::fmt::Write as _;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::document::{Exercise, ListField, ListItem, ProjectBrief, QuizQuestion, ScalarField};
use crate::ports::{ContentProducer, PartRequest, ProduceFuture, ProducedPart};
use crate::tree::{FileNode, FileTree};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const MAX_TOKENS: u32 = 4096;

type BoxedError = Box<dyn Error + Send + Sync>;

/// Live content producer calling the Anthropic Claude API.
pub struct LiveProducer {
    client: Client,
    model: String,
}

impl LiveProducer {
    /// Creates a producer using the default model.
    #[must_use]
    pub fn new() -> Self {
        Self { client: Client::new(), model: DEFAULT_MODEL.to_string() }
    }
}

impl Default for LiveProducer {
    fn default() -> Self {
        Self::new()
    }
}

/// Request body sent to the Anthropic messages API.
#[derive(Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<ApiMessage<'a>>,
}

/// A single message in the API request.
#[derive(Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Top-level response from the messages API.
#[derive(Deserialize)]
struct ApiResponse {
    content: Vec<ContentBlock>,
}

/// A content block in the API response.
#[derive(Deserialize)]
struct ContentBlock {
    text: String,
}

/// Error response from the API.
#[derive(Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

/// Detail inside an API error response.
#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl ContentProducer for LiveProducer {
    fn produce(&self, request: &PartRequest) -> ProduceFuture<'_> {
        let request = request.clone();

        Box::pin(async move {
            let api_key = env::var("ANTHROPIC_API_KEY").map_err(|_| {
                BoxedError::from("ANTHROPIC_API_KEY environment variable not set")
            })?;

            let prompt = build_prompt(&request);
            let body = ApiRequest {
                model: &self.model,
                max_tokens: MAX_TOKENS,
                messages: vec![ApiMessage { role: "user", content: &prompt }],
            };

            let response = self
                .client
                .post(ANTHROPIC_API_URL)
                .header("x-api-key", &api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&body)
                .send()
                .await
                .map_err(|e| -> BoxedError { format!("producer request failed: {e}").into() })?;

            let status = response.status();
            let response_text = response
                .text()
                .await
                .map_err(|e| -> BoxedError { format!("failed to read response: {e}").into() })?;

            if !status.is_success() {
                let msg = serde_json::from_str::<ApiError>(&response_text)
                    .map(|e| e.error.message)
                    .unwrap_or(response_text);
                // 429/529 and overload bodies are the transient-capacity
                // signal the session classifies for a retry-suggesting
                // message.
                if status.as_u16() == 429
                    || status.as_u16() == 529
                    || msg.to_lowercase().contains("overloaded")
                {
                    return Err(format!("producer overloaded ({}): {msg}", status.as_u16()).into());
                }
                return Err(format!("producer error ({}): {msg}", status.as_u16()).into());
            }

            let api_response: ApiResponse =
                serde_json::from_str(&response_text).map_err(|e| -> BoxedError {
                    format!("malformed producer response: {e}").into()
                })?;
            let text =
                api_response.content.into_iter().map(|block| block.text).collect::<String>();

            parse_part(&request, &text)
        })
    }
}

/// Builds the prompt for one part request.
fn build_prompt(request: &PartRequest) -> String {
    let mut prompt = String::from(
        "You are an experienced instructional designer helping author a course. \
         Respond with JSON only — no markdown fences, no commentary.\n\n",
    );

    match request {
        PartRequest::LessonScalar { field, request, draft, instructions } => {
            let _ = writeln!(
                prompt,
                "Write the \"{}\" section of a lesson plan on: {}",
                field.key(),
                request.topic
            );
            if let Some(audience) = &request.audience {
                let _ = writeln!(prompt, "Audience: {audience}");
            }
            if let Some(minutes) = request.minutes {
                let _ = writeln!(prompt, "Lesson length: {minutes} minutes");
            }
            write_scalar_context(&mut prompt, *field, draft);
            if let Some(extra) = instructions {
                let _ = writeln!(prompt, "Revision instructions: {extra}");
            }
            prompt.push_str("\nRespond with JSON: {\"text\": \"...\"}");
        }
        PartRequest::LessonList { field, request, draft } => {
            let _ = writeln!(
                prompt,
                "Write the {} for a lesson plan on: {}",
                field.key(),
                request.topic
            );
            let _ = writeln!(prompt, "Objectives: {}", draft.objectives);
            prompt.push('\n');
            prompt.push_str(list_schema(*field));
        }
        PartRequest::LessonListItem { field, request, current, instructions } => {
            match current {
                Some(item) => {
                    let _ = writeln!(
                        prompt,
                        "Rewrite one {} item of a lesson plan on: {}",
                        field.key(),
                        request.topic
                    );
                    let _ = writeln!(
                        prompt,
                        "Current item: {}",
                        serde_json::to_string(item).unwrap_or_default()
                    );
                }
                None => {
                    let _ = writeln!(
                        prompt,
                        "Write one additional {} item for a lesson plan on: {}",
                        field.key(),
                        request.topic
                    );
                }
            }
            if let Some(extra) = instructions {
                let _ = writeln!(prompt, "Instructions: {extra}");
            }
            prompt.push('\n');
            prompt.push_str(item_schema(*field));
        }
        PartRequest::ProjectBrief { request } => {
            let _ = writeln!(prompt, "Draft a capstone project brief on: {}", request.topic);
            if let Some(audience) = &request.audience {
                let _ = writeln!(prompt, "Audience: {audience}");
            }
            prompt.push_str(
                "\nRespond with JSON: {\"overview\": \"...\", \"learning_goals\": \"...\", \
                 \"milestones\": [{\"title\": \"...\", \"description\": \"...\"}]}",
            );
        }
        PartRequest::EnvironmentPlan { request, brief } => {
            let _ = writeln!(
                prompt,
                "Plan the starter file tree for a capstone project on: {}",
                request.topic
            );
            let _ = writeln!(prompt, "Overview: {}", brief.overview);
            prompt.push_str(
                "\nRespond with a JSON array of nodes. A file is \
                 {\"kind\": \"file\", \"name\": \"...\"} (no content yet); a folder is \
                 {\"kind\": \"folder\", \"name\": \"...\", \"children\": [...]}. \
                 Include readme.md and setup.md at the top level.",
            );
        }
        PartRequest::FileContent { request, overview, path, instructions } => {
            let _ = writeln!(
                prompt,
                "Write the content of `{}` for a capstone project on: {}",
                path.join("/"),
                request.topic
            );
            let _ = writeln!(prompt, "Project overview: {overview}");
            if let Some(extra) = instructions {
                let _ = writeln!(prompt, "Instructions: {extra}");
            }
            prompt.push_str("\nRespond with JSON: {\"content\": \"...\"}");
        }
        PartRequest::Suggestion { draft } => {
            let _ = writeln!(
                prompt,
                "Complete this partially-typed course authoring prompt:\n{draft}"
            );
            prompt.push_str("\nRespond with JSON: {\"completion\": \"...\"}");
        }
    }

    prompt
}

fn write_scalar_context(prompt: &mut String, field: ScalarField, draft: &crate::document::LessonPlan) {
    // Earlier sections give the model continuity; the addressed field's
    // current text is omitted so a regeneration starts fresh.
    let sections: [(ScalarField, &str); 4] = [
        (ScalarField::Objectives, &draft.objectives),
        (ScalarField::Activation, &draft.activation),
        (ScalarField::Instruction, &draft.instruction),
        (ScalarField::Closure, &draft.closure),
    ];
    for (other, text) in sections {
        if other != field && !text.is_empty() {
            let _ = writeln!(prompt, "Existing {}: {text}", other.key());
        }
    }
}

fn list_schema(field: ListField) -> &'static str {
    match field {
        ListField::Exercises => {
            "Respond with a JSON array of 3 to 5 exercises: \
             [{\"title\": \"...\", \"task\": \"...\", \"expected_outcome\": \"...\"}]"
        }
        ListField::Quiz => {
            "Respond with a JSON array of 3 to 5 questions: \
             [{\"prompt\": \"...\", \"options\": [\"...\"], \"answer\": 0, \
             \"explanation\": \"...\"}]"
        }
    }
}

fn item_schema(field: ListField) -> &'static str {
    match field {
        ListField::Exercises => {
            "Respond with one JSON object: \
             {\"title\": \"...\", \"task\": \"...\", \"expected_outcome\": \"...\"}"
        }
        ListField::Quiz => {
            "Respond with one JSON object: \
             {\"prompt\": \"...\", \"options\": [\"...\"], \"answer\": 0, \
             \"explanation\": \"...\"}"
        }
    }
}

/// Parses and shape-validates the model's text into the part the request
/// asked for.
fn parse_part(request: &PartRequest, text: &str) -> Result<ProducedPart, BoxedError> {
    let json = strip_fences(text);
    let parse_err =
        |e: serde_json::Error| -> BoxedError { format!("malformed producer response: {e}").into() };

    match request {
        PartRequest::LessonScalar { .. } => {
            #[derive(Deserialize)]
            struct Payload {
                text: String,
            }
            let payload: Payload = serde_json::from_str(json).map_err(parse_err)?;
            Ok(ProducedPart::Scalar(payload.text))
        }
        PartRequest::LessonList { field, .. } => match field {
            ListField::Exercises => {
                let items: Vec<Exercise> = serde_json::from_str(json).map_err(parse_err)?;
                Ok(ProducedPart::Exercises(items))
            }
            ListField::Quiz => {
                let items: Vec<QuizQuestion> = serde_json::from_str(json).map_err(parse_err)?;
                Ok(ProducedPart::Quiz(items))
            }
        },
        PartRequest::LessonListItem { field, .. } => match field {
            ListField::Exercises => {
                let item: Exercise = serde_json::from_str(json).map_err(parse_err)?;
                Ok(ProducedPart::Item(ListItem::Exercise(item)))
            }
            ListField::Quiz => {
                let item: QuizQuestion = serde_json::from_str(json).map_err(parse_err)?;
                Ok(ProducedPart::Item(ListItem::Question(item)))
            }
        },
        PartRequest::ProjectBrief { .. } => {
            let brief: ProjectBrief = serde_json::from_str(json).map_err(parse_err)?;
            Ok(ProducedPart::Brief(brief))
        }
        PartRequest::EnvironmentPlan { .. } => {
            let roots: Vec<FileNode> = serde_json::from_str(json).map_err(parse_err)?;
            Ok(ProducedPart::Tree(FileTree::new(roots)))
        }
        PartRequest::FileContent { .. } => {
            #[derive(Deserialize)]
            struct Payload {
                content: String,
            }
            let payload: Payload = serde_json::from_str(json).map_err(parse_err)?;
            Ok(ProducedPart::FileContent(payload.content))
        }
        PartRequest::Suggestion { .. } => {
            #[derive(Deserialize)]
            struct Payload {
                completion: String,
            }
            let payload: Payload = serde_json::from_str(json).map_err(parse_err)?;
            Ok(ProducedPart::Suggestion(payload.completion))
        }
    }
}

/// Strips a surrounding markdown code fence, if the model added one anyway.
fn strip_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
