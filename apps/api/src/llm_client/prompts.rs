// Prompt fragments shared by every caller of the LLM client.
// Task-specific prompts live next to the service that sends them.

/// System prompt that pins the reply to a bare JSON document.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise data-extraction assistant. \
    Respond with one valid JSON object and nothing else: \
    no prose before or after it and no markdown code fences.";
