//! Built-in prompts for the three hosted-model call sites.
//!
//! Each prompt can be overridden with a plain-text file via the pipeline
//! configuration; these constants are the defaults shipped with the binary.

use std::path::Path;

use crate::error::{Error, Result};

/// Prompt for the element-detection call (sent together with the image).
pub const DETECTION_PROMPT: &str = r#"You are analyzing a photo of a hand-drawn UI wireframe sketch.

Identify every UI element in the sketch and report it as one entry of a JSON
array. Each entry must be an object with these fields:

- "id": a short unique string identifier
- "kind": one of "container", "button", "input", "image", "text"
- "x", "y": top-left corner in image pixel coordinates
- "width", "height": size in image pixel coordinates
- "text": the handwritten label, only for elements that carry text

Rules:
- Rectangles drawn around groups of elements are "container".
- Report coordinates for the drawn outline, not the whole image.
- Return ONLY the JSON array, no commentary.
"#;

/// Prompt for the code-generation call (sent together with the layout JSON).
pub const GENERATION_PROMPT: &str = r#"You are given a JSON layout tree extracted from a hand-drawn UI wireframe.

Each node has a "type" ("root", "box" or "text"), a "layout" object with
margins and size expressed as fractions of the parent box, and optionally
"text" content and a relative "font" size.

Produce a single self-contained HTML document that reproduces this layout:
- Use semantic HTML elements where the structure suggests them.
- Express positions and sizes with percentage-based CSS matching the
  relative layout values.
- Render text nodes with their given text; scale font sizes from the
  relative font values.
- Inline all CSS in a <style> block; do not reference external assets.

Return ONLY the HTML markup, nothing else.
"#;

/// Base prompt for the feedback-revision call.
pub const FEEDBACK_PROMPT: &str = r#"You are revising an HTML prototype that was generated from a wireframe
sketch. Apply the user's requested changes to the document while preserving
everything the request does not touch.

Return ONLY the complete revised HTML markup, nothing else.
"#;

/// Read a prompt override from disk, or fall back to the built-in default.
pub fn load_or_default(path: Option<&Path>, default: &str) -> Result<String> {
    match path {
        Some(p) => {
            let text = std::fs::read_to_string(p)
                .map_err(|_| Error::FileNotFound(p.display().to_string()))?;
            if text.trim().is_empty() {
                return Err(Error::Serialization(format!(
                    "Prompt file {} is empty",
                    p.display()
                )));
            }
            Ok(text)
        }
        None => Ok(default.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_used_without_override() {
        let prompt = load_or_default(None, DETECTION_PROMPT).unwrap();
        assert_eq!(prompt, DETECTION_PROMPT);
    }

    #[test]
    fn override_file_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prompt.txt");
        std::fs::write(&path, "custom prompt").unwrap();
        assert_eq!(
            load_or_default(Some(&path), DETECTION_PROMPT).unwrap(),
            "custom prompt"
        );
    }

    #[test]
    fn empty_override_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prompt.txt");
        std::fs::write(&path, "  \n").unwrap();
        assert!(load_or_default(Some(&path), DETECTION_PROMPT).is_err());
    }

    #[test]
    fn missing_override_is_file_not_found() {
        let err = load_or_default(Some(Path::new("/nope.txt")), "x").unwrap_err();
        assert!(matches!(err, Error::FileNotFound(_)));
    }
}
