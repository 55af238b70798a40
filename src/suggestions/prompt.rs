//! Prompt text shared by every suggestion engine

use serde_json::{Value, json};

use super::SuggestionRequest;

pub const SYSTEM_PROMPT: &str = "You are a productivity assistant. Given the user's task list and \
context, pick the single task they should work on next and explain why in one or two sentences. \
Respond only with a JSON object of the form {\"suggestedTask\": string, \"reasoning\": string}.";

/// Render the user turn for a request
pub fn render_user_prompt(request: &SuggestionRequest) -> String {
    let (done, open): (Vec<_>, Vec<_>) = request.tasks.iter().partition(|t| t.completed);

    let mut out = String::from("Open tasks:\n");
    if open.is_empty() {
        out.push_str("- (none)\n");
    }
    for task in &open {
        out.push_str(&format!("- {}", task.title.trim()));
        if let Some(due) = task.due.as_deref().filter(|d| !d.trim().is_empty()) {
            out.push_str(&format!(" (due {})", due.trim()));
        }
        if let Some(notes) = task.notes.as_deref().filter(|n| !n.trim().is_empty()) {
            out.push_str(&format!(": {}", notes.trim()));
        }
        out.push('\n');
    }

    if !done.is_empty() {
        out.push_str("\nCompleted tasks:\n");
        for task in &done {
            out.push_str(&format!("- {}\n", task.title.trim()));
        }
    }

    if let Some(ctx) = request.context.as_deref().filter(|c| !c.trim().is_empty()) {
        out.push_str("\nContext:\n");
        out.push_str(ctx.trim());
        out.push('\n');
    }

    out
}

/// JSON schema for structured-output capable engines
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "suggestedTask": {
                "type": "STRING",
                "description": "The task the user should do next"
            },
            "reasoning": {
                "type": "STRING",
                "description": "Why this task was chosen"
            }
        },
        "required": ["suggestedTask", "reasoning"]
    })
}
