//! Code generation: one model call turning the layout document into HTML.

use scraper::{Html, Selector};
use tracing::info;

use crate::error::{Error, Result};
use crate::gemini::{strip_code_fence, GeminiClient, Part};
use crate::layout::LayoutDocument;

/// Generate HTML for a layout document. The reply is stripped of any
/// markdown fence and sanity-checked before being returned.
pub fn generate_html(
    client: &GeminiClient,
    prompt: &str,
    layout: &LayoutDocument,
) -> Result<String> {
    let layout_json = serde_json::to_string_pretty(layout)?;
    let reply = client.generate(vec![Part::text(prompt), Part::text(layout_json)])?;
    let html = sanitize_html(&reply)?;

    let document = Html::parse_document(&html);
    let title_sel = Selector::parse("title").unwrap();
    if let Some(title) = document.select(&title_sel).next() {
        info!(title = %title.text().collect::<String>(), "generated document");
    }

    Ok(html)
}

/// Strip a surrounding code fence and verify the reply is an HTML document
/// with at least one element in its body. The model occasionally answers
/// with prose instead of markup; that must not end up in `index.html`.
pub(crate) fn sanitize_html(reply: &str) -> Result<String> {
    let html = strip_code_fence(reply);
    if html.is_empty() {
        return Err(Error::ExternalService(
            "Model returned empty markup".to_string(),
        ));
    }

    let document = Html::parse_document(&html);
    let any_element = Selector::parse("body *").unwrap();
    if document.select(&any_element).next().is_none() {
        return Err(Error::ExternalService(
            "Model reply does not look like an HTML document".to_string(),
        ));
    }

    Ok(html)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fenced_html_is_unwrapped() {
        let reply = "```html\n<html><body><div>hi</div></body></html>\n```";
        let html = sanitize_html(reply).unwrap();
        assert!(html.starts_with("<html>"));
        assert!(!html.contains("```"));
    }

    #[test]
    fn bare_html_passes_through() {
        let reply = "<!DOCTYPE html><html><body><p>ok</p></body></html>";
        assert_eq!(sanitize_html(reply).unwrap(), reply);
    }

    #[test]
    fn prose_reply_is_rejected() {
        let err = sanitize_html("Sorry, I cannot generate that page.").unwrap_err();
        assert!(matches!(err, Error::ExternalService(_)));
    }

    #[test]
    fn empty_reply_is_rejected() {
        assert!(sanitize_html("   \n").is_err());
    }
}
