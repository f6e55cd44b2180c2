//! Prompt construction: locale display names, the system instruction, and
//! the `create_items` tool declaration.

use serde_json::json;

use crate::llm::ToolSpec;

/// Default locale when the request carries none (or an unknown tag).
pub const DEFAULT_LANGUAGE: &str = "pt-BR";

/// Locale tags with a display name used in the instruction text. Tags
/// outside this table are still forwarded as the requested output language;
/// only the display name falls back to the default's.
const LANGUAGE_NAMES: [(&str, &str); 4] = [
    ("pt-BR", "Portuguese (Brazil)"),
    ("en-US", "English"),
    ("fr-FR", "French"),
    ("es-ES", "Spanish"),
];

/// Display name for a locale tag, falling back to the default locale's name.
pub fn language_display_name(tag: &str) -> &'static str {
    LANGUAGE_NAMES
        .iter()
        .find(|(t, _)| *t == tag)
        .or_else(|| LANGUAGE_NAMES.iter().find(|(t, _)| *t == DEFAULT_LANGUAGE))
        .map(|(_, name)| *name)
        .unwrap_or("Portuguese (Brazil)")
}

/// System instruction: persona, hard language requirement, and the order to
/// extract via the tool rather than free text.
pub fn system_prompt(language: &str) -> String {
    let name = language_display_name(language);
    format!(
        "You are MindFlow AI, a smart personal assistant. \n\
         You MUST respond in {name} (language code: {language}).\n\
         Analyze the user's input and identify what they want to create. \n\
         Extract structured data using the provided tools.\n\
         Be helpful, concise, and always respond in the user's language."
    )
}

/// The single tool the model is forced to call. Its parameter schema is the
/// exact `ExtractionResult` shape: an array of items (required `type` +
/// `title`, optional date/time/amount/category/priority, nothing else) and
/// a required top-level `response` string.
pub fn create_items_tool() -> ToolSpec {
    ToolSpec {
        name: "create_items".to_string(),
        description: "Extract and create items from the user input. Can create tasks, events, expenses, and reminders.".to_string(),
        parameters: json!({
            "type": "object",
            "properties": {
                "items": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "type": { "type": "string", "enum": ["task", "event", "expense", "reminder"] },
                            "title": { "type": "string", "description": "Title/description of the item" },
                            "date": { "type": "string", "description": "ISO date if applicable (YYYY-MM-DD)" },
                            "time": { "type": "string", "description": "Time if applicable (HH:MM)" },
                            "amount": { "type": "number", "description": "Amount for expenses" },
                            "category": { "type": "string", "description": "Category (work, personal, family, shopping, transport, etc.)" },
                            "priority": { "type": "string", "enum": ["low", "medium", "high"] }
                        },
                        "required": ["type", "title"],
                        "additionalProperties": false
                    }
                },
                "response": {
                    "type": "string",
                    "description": "A brief friendly response to the user in their language confirming what was understood"
                }
            },
            "required": ["items", "response"],
            "additionalProperties": false
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_tags_resolve_display_names() {
        assert_eq!(language_display_name("pt-BR"), "Portuguese (Brazil)");
        assert_eq!(language_display_name("en-US"), "English");
        assert_eq!(language_display_name("fr-FR"), "French");
        assert_eq!(language_display_name("es-ES"), "Spanish");
    }

    #[test]
    fn unknown_tag_falls_back_to_default_name() {
        assert_eq!(language_display_name("de-DE"), "Portuguese (Brazil)");
        assert_eq!(language_display_name(""), "Portuguese (Brazil)");
    }

    #[test]
    fn prompt_embeds_requested_tag_even_when_unknown() {
        // Display name falls back, but the tag itself is forwarded verbatim.
        let p = system_prompt("de-DE");
        assert!(p.contains("Portuguese (Brazil)"));
        assert!(p.contains("language code: de-DE"));
    }

    #[test]
    fn prompt_embeds_supported_language() {
        let p = system_prompt("en-US");
        assert!(p.contains("MUST respond in English"));
        assert!(p.contains("language code: en-US"));
    }

    #[test]
    fn tool_schema_declares_required_fields() {
        let tool = create_items_tool();
        assert_eq!(tool.name, "create_items");
        let params = &tool.parameters;
        assert_eq!(params["required"], serde_json::json!(["items", "response"]));
        assert_eq!(params["additionalProperties"], serde_json::json!(false));
        let item_schema = &params["properties"]["items"]["items"];
        assert_eq!(item_schema["required"], serde_json::json!(["type", "title"]));
        assert_eq!(
            item_schema["properties"]["type"]["enum"],
            serde_json::json!(["task", "event", "expense", "reminder"])
        );
        assert_eq!(
            item_schema["properties"]["priority"]["enum"],
            serde_json::json!(["low", "medium", "high"])
        );
    }
}
