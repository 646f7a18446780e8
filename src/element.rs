//! Detected UI primitives and the raw-detection document they travel in.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::Rect;

/// Closed set of element kinds the detector may report.
///
/// `Root` is never produced by detection; it is synthesized by the
/// hierarchy builder for the implicit document root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Container,
    Button,
    Input,
    Image,
    Text,
    Root,
}

impl ElementKind {
    /// Model-facing type tag used in the layout document.
    pub fn layout_tag(&self) -> &'static str {
        match self {
            ElementKind::Root => "root",
            ElementKind::Text => "text",
            _ => "box",
        }
    }
}

/// Identifier as it appears on the wire. Detectors and hand-written
/// fixtures use both strings and bare numbers; both normalize to a string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawId {
    Text(String),
    Number(i64),
}

impl From<RawId> for String {
    fn from(id: RawId) -> Self {
        match id {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(String::from)
}

/// A single detected UI primitive. Immutable after detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Identifier assigned at detection time, unique within one pass
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub kind: ElementKind,
    #[serde(flatten)]
    pub bounds: Rect,
    /// Recognized text, present for text-bearing elements
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Element {
    pub fn new(id: impl Into<String>, kind: ElementKind, bounds: Rect) -> Self {
        Self {
            id: id.into(),
            kind,
            bounds,
            text: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Reject malformed bounding boxes. The detector occasionally emits
    /// degenerate geometry; the builder refuses it outright rather than
    /// guessing.
    pub fn validate(&self) -> Result<()> {
        let b = &self.bounds;
        for (name, v) in [
            ("x", b.x),
            ("y", b.y),
            ("width", b.width),
            ("height", b.height),
        ] {
            if !v.is_finite() {
                return Err(Error::Validation {
                    id: self.id.clone(),
                    reason: format!("{} is not a finite number", name),
                });
            }
        }
        if b.width < 0.0 || b.height < 0.0 {
            return Err(Error::Validation {
                id: self.id.clone(),
                reason: format!("negative dimensions {}x{}", b.width, b.height),
            });
        }
        Ok(())
    }
}

/// Stage-1 artifact: the flat element list as detected from one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDetection {
    pub image_path: String,
    pub elements: Vec<Element>,
}
