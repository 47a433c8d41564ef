use serde::{Deserialize, Serialize};

// ============ Caller-Facing Chat Models ============

/// Request payload for `POST /api/chat`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// Ordered conversation turns; the last turn is the new user input.
    pub chat_history: Vec<ChatTurn>,

    /// Caller-supplied context prepended to the guardrail instruction.
    #[serde(default)]
    pub system_context: Option<String>,
}

/// One conversation turn.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatTurn {
    /// Turn owner. Anything other than "user" is treated as the model side.
    pub role: String,

    /// Text segments; only the first is forwarded to the provider.
    #[serde(default)]
    pub parts: Vec<TurnPart>,
}

/// A single text segment within a turn.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TurnPart {
    #[serde(default)]
    pub text: String,
}

impl ChatTurn {
    /// Convenience constructor, mainly for tests and the local responder.
    pub fn new(role: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            parts: vec![TurnPart { text: text.into() }],
        }
    }

    /// Text of the first segment, or empty if the turn carries none.
    pub fn first_text(&self) -> &str {
        self.parts.first().map(|p| p.text.as_str()).unwrap_or("")
    }
}

/// Response body for `POST /api/chat`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub text: String,
}

// ============ Gemini Wire Models ============

/// One content entry in a `generateContent` request.
#[derive(Debug, Clone, Serialize)]
pub struct GeminiContent {
    pub role: String,
    pub parts: Vec<GeminiPart>,
}

/// A text part, shared by requests and responses.
///
/// Response parts are not guaranteed to carry text (the API can return other
/// part kinds), so deserialization defaults to an empty string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiPart {
    #[serde(default)]
    pub text: String,
}

/// System instruction envelope (a role-less content).
#[derive(Debug, Serialize)]
pub struct GeminiSystemInstruction {
    pub parts: Vec<GeminiPart>,
}

impl GeminiSystemInstruction {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            parts: vec![GeminiPart { text: text.into() }],
        }
    }
}

/// Body of `POST /v1beta/models/{model}:generateContent`.
#[derive(Debug, Serialize)]
pub struct GenerateContentRequest<'a> {
    pub contents: &'a [GeminiContent],
    #[serde(rename = "systemInstruction")]
    pub system_instruction: GeminiSystemInstruction,
}

/// Successful `generateContent` response.
///
/// A 200 with zero candidates is valid on the wire; callers must treat it as
/// a failed attempt, so every level deserializes leniently.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
pub struct GeminiCandidate {
    #[serde(default)]
    pub content: Option<GeminiCandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct GeminiCandidateContent {
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

impl GenerateContentResponse {
    /// First candidate text that is non-empty after trimming, if any.
    pub fn first_text(&self) -> Option<String> {
        self.candidates.iter().find_map(|candidate| {
            candidate
                .content
                .as_ref()?
                .parts
                .iter()
                .map(|part| part.text.trim())
                .find(|text| !text.is_empty())
                .map(str::to_string)
        })
    }
}

/// Normalize a caller conversation into the provider's expected shape.
///
/// The provider accepts exactly two roles, so "user" passes through
/// (case-insensitively) and everything else becomes "model". Only the first
/// text segment of each turn is forwarded; a turn without segments forwards
/// an empty string rather than being dropped, preserving turn alternation.
pub fn to_gemini_contents(history: &[ChatTurn]) -> Vec<GeminiContent> {
    history
        .iter()
        .map(|turn| {
            let role = if turn.role.eq_ignore_ascii_case("user") {
                "user"
            } else {
                "model"
            };
            GeminiContent {
                role: role.to_string(),
                parts: vec![GeminiPart {
                    text: turn.first_text().to_string(),
                }],
            }
        })
        .collect()
}
