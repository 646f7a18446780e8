//! Element detection: one vision-model call turning the wireframe image into
//! a flat element list.

use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::element::{Element, ElementKind, RawDetection, RawId};
use crate::error::{Error, Result};
use crate::gemini::{strip_code_fence, GeminiClient};
use crate::geometry::Rect;

/// Element as the model reports it; the id is optional on the wire and
/// assigned from response order when absent.
#[derive(Debug, Deserialize)]
struct DetectedElement {
    #[serde(default)]
    id: Option<RawId>,
    kind: ElementKind,
    #[serde(flatten)]
    bounds: Rect,
    #[serde(default)]
    text: Option<String>,
}

/// Some models wrap the array in an object.
#[derive(Debug, Deserialize)]
struct DetectedWrapper {
    elements: Vec<DetectedElement>,
}

/// Run detection on one image and return the flat element list.
pub fn detect_elements(
    client: &GeminiClient,
    prompt: &str,
    image_path: &Path,
) -> Result<RawDetection> {
    let reply = client.generate_with_image(prompt, image_path)?;
    let detection = parse_detection(&reply, &image_path.display().to_string())?;
    info!(
        elements = detection.elements.len(),
        image = %image_path.display(),
        "detection complete"
    );
    Ok(detection)
}

/// Parse the model reply into a `RawDetection`, tolerating a markdown fence
/// and an `{"elements": [...]}` wrapper object.
pub fn parse_detection(reply: &str, image_path: &str) -> Result<RawDetection> {
    let body = strip_code_fence(reply);

    let detected: Vec<DetectedElement> = match serde_json::from_str(&body) {
        Ok(list) => list,
        Err(first_err) => serde_json::from_str::<DetectedWrapper>(&body)
            .map(|w| w.elements)
            .map_err(|_| {
                Error::ExternalService(format!("Unparseable detection reply: {}", first_err))
            })?,
    };

    let elements = detected
        .into_iter()
        .enumerate()
        .map(|(i, d)| {
            let id = d
                .id
                .map(String::from)
                .unwrap_or_else(|| format!("el_{}", i));
            let mut el = Element::new(id, d.kind, d.bounds);
            el.text = d.text;
            el
        })
        .collect();

    Ok(RawDetection {
        image_path: image_path.to_string(),
        elements,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_array() {
        let reply = r#"[
            {"id":"ui_0","kind":"container","x":0,"y":0,"width":100,"height":100},
            {"id":"t_0","kind":"text","x":10,"y":10,"width":40,"height":8,"text":"Login"}
        ]"#;
        let det = parse_detection(reply, "sketch.jpg").unwrap();
        assert_eq!(det.image_path, "sketch.jpg");
        assert_eq!(det.elements.len(), 2);
        assert_eq!(det.elements[1].text.as_deref(), Some("Login"));
    }

    #[test]
    fn parses_fenced_wrapper_object() {
        let reply = "```json\n{\"elements\":[{\"kind\":\"button\",\"x\":1,\"y\":2,\"width\":3,\"height\":4}]}\n```";
        let det = parse_detection(reply, "s.png").unwrap();
        assert_eq!(det.elements.len(), 1);
        assert_eq!(det.elements[0].kind, ElementKind::Button);
    }

    #[test]
    fn missing_ids_get_response_order() {
        let reply = r#"[
            {"kind":"button","x":0,"y":0,"width":10,"height":10},
            {"kind":"input","x":0,"y":20,"width":10,"height":10}
        ]"#;
        let det = parse_detection(reply, "s.png").unwrap();
        assert_eq!(det.elements[0].id, "el_0");
        assert_eq!(det.elements[1].id, "el_1");
    }

    #[test]
    fn garbage_reply_is_external_service_error() {
        let err = parse_detection("I could not find any elements.", "s.png").unwrap_err();
        assert!(matches!(err, Error::ExternalService(_)));
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let reply = r#"[{"kind":"blob","x":0,"y":0,"width":1,"height":1}]"#;
        assert!(parse_detection(reply, "s.png").is_err());
    }
}
