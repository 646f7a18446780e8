//! Feedback revision: rewrite existing HTML per a free-text instruction.

use tracing::info;

use crate::codegen::sanitize_html;
use crate::error::{Error, Result};
use crate::gemini::GeminiClient;

/// Ask the model to apply `instruction` to `html` and return the revised
/// markup. Blank inputs are rejected up front; an empty instruction would
/// just burn a model call.
pub fn revise_html(
    client: &GeminiClient,
    base_prompt: &str,
    instruction: &str,
    html: &str,
) -> Result<String> {
    if instruction.trim().is_empty() {
        return Err(Error::Validation {
            id: "instruction".to_string(),
            reason: "feedback instruction is empty".to_string(),
        });
    }
    if html.trim().is_empty() {
        return Err(Error::Validation {
            id: "html".to_string(),
            reason: "there is no HTML to revise".to_string(),
        });
    }

    let prompt = compose_prompt(base_prompt, instruction, html);
    let reply = client.generate_text(&prompt)?;
    let revised = sanitize_html(&reply)?;
    info!(bytes = revised.len(), "revision complete");
    Ok(revised)
}

/// Sections joined by a separator: base prompt, user request, then the
/// current HTML fenced so the model recognizes it as code to edit.
fn compose_prompt(base_prompt: &str, instruction: &str, html: &str) -> String {
    let sections = [
        base_prompt.trim().to_string(),
        format!("USER FEEDBACK / REQUEST:\n{}", instruction.trim()),
        format!(
            "CURRENT HTML (EDIT THIS AND RETURN ONLY VALID HTML MARKUP):\n```html\n{}\n```",
            html
        ),
    ];
    sections.join("\n\n---\n\n")
}
