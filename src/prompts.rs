//! Fixed instruction text for the backend-facing steps.

/// System instruction for the classify step.
///
/// The reply is constrained to a two-valued enum; the step still validates
/// locally and falls back to `chat` on anything unparseable.
pub const CLASSIFY_SYSTEM_PROMPT: &str = "\
Classify the user message as exactly one of:
- 'image': the user asks for visual content to be created, with words like \
create, generate, draw, make an image
- 'chat': the user asks for facts, information, solutions, or general \
conversation

Reply with a JSON object of the form {\"category\": \"image\"} or \
{\"category\": \"chat\"} and nothing else.";

/// System instruction for the chat step.
pub const CHAT_SYSTEM_PROMPT: &str = "\
You are a helpful assistant. Answer the user's question as clearly and \
accurately as possible.";

/// Enhancement template for the refine step; the user's raw request is
/// appended after this text.
pub const REFINE_PROMPT: &str = "\
You are an expert prompt engineer for text-to-image models. Rewrite the user \
request below into one vivid, specific generation prompt by:
- adding concrete visual details (colors, textures, materials)
- describing the lighting (soft natural light, golden hour, dramatic shadows)
- naming an artistic style (photorealistic, digital art, oil painting)
- giving composition guidance (rule of thirds, close-up, wide shot)
- appending quality modifiers (highly detailed, sharp focus, 8k)

Return only the rewritten prompt, with elements separated by commas.";
