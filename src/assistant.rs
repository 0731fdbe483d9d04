//! Thin typed client for the Gemini AI collaborator.
//!
//! One request/response wrapper per capability: chat (four behavior
//! profiles), image generation, image editing, and image description.
//! No retries, no backoff, no cancellation; a failure maps to a single
//! error the caller turns into one generic user-facing notice.

use log::{debug, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{AspectRatio, ChatMode, GroundingMetadata, JournalError, Location, Result};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

const SYSTEM_INSTRUCTION: &str = "You are a helpful, cute, and friendly assistant for a personal \
    journal app named 'Lulu Cute'. Keep responses concise and helpful.";

const DESCRIBE_PROMPT: &str =
    "Describe this image in detail, suitable for a journal entry. Keep it warm and cute.";

/// A chat reply plus any grounding citations the model attached.
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub text: String,
    pub grounding: Option<GroundingMetadata>,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<Tool>>,
    #[serde(rename = "toolConfig", skip_serializing_if = "Option::is_none")]
    tool_config: Option<ToolConfig>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

impl Content {
    fn text(text: &str) -> Self {
        Content {
            parts: vec![Part {
                text: Some(text.to_string()),
                inline_data: None,
            }],
        }
    }
}

#[derive(Debug, Serialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(rename = "inlineData", skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct Tool {
    #[serde(rename = "googleSearch", skip_serializing_if = "Option::is_none")]
    google_search: Option<Value>,
    #[serde(rename = "googleMaps", skip_serializing_if = "Option::is_none")]
    google_maps: Option<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolConfig {
    retrieval_config: RetrievalConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RetrievalConfig {
    lat_lng: LatLng,
}

#[derive(Debug, Serialize)]
struct LatLng {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    image_config: ImageConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageConfig {
    aspect_ratio: String,
    image_size: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    inline_data: Option<InlineData>,
}

/// Client for the generative-AI service.
pub struct GeminiClient {
    client: Client,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()?;
        Ok(Self { client, api_key })
    }

    /// Sends a chat message under the given behavior profile.
    pub async fn chat(
        &self,
        message: &str,
        mode: ChatMode,
        location: Option<Location>,
    ) -> Result<ChatReply> {
        let (model, request) = build_chat_request(message, mode, location);
        info!("Sending chat request ({:?} -> {})", mode, model);

        let response = self.generate(model, &request).await?;
        let candidate = response.candidates.into_iter().next();

        let text = candidate
            .as_ref()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "No text response".to_string());

        let grounding = candidate.and_then(|c| c.grounding_metadata);
        Ok(ChatReply { text, grounding })
    }

    /// Generates an image from a prompt; returns a PNG data URI.
    pub async fn generate_image(&self, prompt: &str, aspect_ratio: AspectRatio) -> Result<String> {
        let request = build_image_request(prompt, aspect_ratio);
        info!("Requesting image generation ({})", aspect_ratio.as_str());

        let response = self.generate("gemini-3-pro-image-preview", &request).await?;
        first_image(response).ok_or_else(|| JournalError::Collaborator {
            message: "No image generated".to_string(),
        })
    }

    /// Applies a prompt-driven edit to an image; returns a PNG data URI.
    pub async fn edit_image(&self, image: &str, prompt: &str) -> Result<String> {
        let request = build_edit_request(image, prompt);
        info!("Requesting image edit");

        let response = self.generate("gemini-2.5-flash-image", &request).await?;
        first_image(response).ok_or_else(|| JournalError::Collaborator {
            message: "No edited image returned".to_string(),
        })
    }

    /// Describes an image as journal-ready text.
    pub async fn describe_image(&self, image: &str) -> Result<String> {
        let request = build_describe_request(image);
        info!("Requesting image description");

        let response = self.generate("gemini-3-pro-preview", &request).await?;
        let text = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .filter(|t| !t.is_empty());

        text.ok_or_else(|| JournalError::Collaborator {
            message: "No description returned".to_string(),
        })
    }

    async fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let url = format!("{}/{}:generateContent", API_BASE, model);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(JournalError::Collaborator {
                message: format!("{} returned HTTP {}: {}", model, status, body),
            });
        }

        Ok(response.json().await?)
    }
}

/// Picks the model and assembles the request body for one chat turn.
fn build_chat_request(
    message: &str,
    mode: ChatMode,
    location: Option<Location>,
) -> (&'static str, GenerateContentRequest) {
    let mut model = "gemini-3-pro-preview";
    let mut tools: Option<Vec<Tool>> = None;
    let mut tool_config: Option<ToolConfig> = None;

    match mode {
        ChatMode::Pro => {}
        ChatMode::Fast => {
            model = "gemini-2.5-flash-lite-latest";
        }
        ChatMode::Search => {
            model = "gemini-3-flash-preview";
            tools = Some(vec![Tool {
                google_search: Some(json!({})),
                google_maps: None,
            }]);
        }
        ChatMode::Maps => {
            model = "gemini-2.5-flash";
            tools = Some(vec![Tool {
                google_search: None,
                google_maps: Some(json!({})),
            }]);
            tool_config = location.map(|loc| ToolConfig {
                retrieval_config: RetrievalConfig {
                    lat_lng: LatLng {
                        latitude: loc.lat,
                        longitude: loc.lng,
                    },
                },
            });
        }
    }

    let request = GenerateContentRequest {
        contents: vec![Content::text(message)],
        tools,
        tool_config,
        system_instruction: Some(Content::text(SYSTEM_INSTRUCTION)),
        generation_config: None,
    };

    (model, request)
}

fn build_image_request(prompt: &str, aspect_ratio: AspectRatio) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content::text(prompt)],
        tools: None,
        tool_config: None,
        system_instruction: None,
        generation_config: Some(GenerationConfig {
            image_config: ImageConfig {
                aspect_ratio: aspect_ratio.as_str().to_string(),
                image_size: "1K".to_string(),
            },
        }),
    }
}

fn build_edit_request(image: &str, prompt: &str) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            parts: vec![
                Part {
                    text: None,
                    inline_data: Some(InlineData {
                        mime_type: "image/png".to_string(),
                        data: strip_data_uri(image).to_string(),
                    }),
                },
                Part {
                    text: Some(prompt.to_string()),
                    inline_data: None,
                },
            ],
        }],
        tools: None,
        tool_config: None,
        system_instruction: None,
        generation_config: None,
    }
}

fn build_describe_request(image: &str) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            parts: vec![
                Part {
                    text: None,
                    inline_data: Some(InlineData {
                        mime_type: "image/jpeg".to_string(),
                        data: strip_data_uri(image).to_string(),
                    }),
                },
                Part {
                    text: Some(DESCRIBE_PROMPT.to_string()),
                    inline_data: None,
                },
            ],
        }],
        tools: None,
        tool_config: None,
        system_instruction: None,
        generation_config: None,
    }
}

/// Extracts the first inline image from a response as a PNG data URI.
fn first_image(response: GenerateContentResponse) -> Option<String> {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|content| {
            content
                .parts
                .into_iter()
                .find_map(|p| p.inline_data)
                .map(|inline| format!("data:image/png;base64,{}", inline.data))
        })
}

/// Strips a `data:image/...;base64,` prefix so only the raw payload goes
/// over the wire.
fn strip_data_uri(image: &str) -> &str {
    if let Some(rest) = image.strip_prefix("data:image/") {
        if let Some(idx) = rest.find(";base64,") {
            return &rest[idx + ";base64,".len()..];
        }
    }
    image
}
