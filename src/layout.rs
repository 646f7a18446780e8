//! Model-facing layout document derived from the containment tree.
//!
//! The hosted model sees relative geometry, not raw pixels: every node
//! carries its margins and size as fractions of its parent, and text nodes
//! carry a font size relative to the root height. Fractions are rounded to
//! four decimal places to keep the document compact.

use serde::{Deserialize, Serialize};

use crate::element::ElementKind;
use crate::geometry::Rect;
use crate::hierarchy::HierarchyNode;

/// Stage-2 artifact: what gets serialized to `hierarchy_wireframe.json` and
/// handed to the code generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutDocument {
    pub image_path: String,
    pub layout: LayoutNode,
}

/// Parent-relative placement of one node. All values are fractions of the
/// parent box; the root is all-zero margins with unit size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutGeometry {
    pub top: f64,
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub width: f64,
    pub height: f64,
}

/// Typography hint for text nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontInfo {
    /// Text-box height as a fraction of the root height
    pub size_rel_outer: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutNode {
    pub id: String,
    /// One of "root", "box", "text"
    #[serde(rename = "type")]
    pub tag: String,
    pub layout: LayoutGeometry,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<FontInfo>,
    pub children: Vec<LayoutNode>,
}

impl LayoutDocument {
    pub fn from_hierarchy(root: &HierarchyNode, image_path: impl Into<String>) -> Self {
        let root_bounds = root.element.bounds;
        Self {
            image_path: image_path.into(),
            layout: convert(root, &root_bounds, &root_bounds, true),
        }
    }
}

fn convert(
    node: &HierarchyNode,
    parent_bounds: &Rect,
    root_bounds: &Rect,
    is_root: bool,
) -> LayoutNode {
    let bounds = &node.element.bounds;

    let layout = if is_root {
        LayoutGeometry {
            top: 0.0,
            left: 0.0,
            right: 0.0,
            bottom: 0.0,
            width: 1.0,
            height: 1.0,
        }
    } else {
        let m_left = bounds.x - parent_bounds.x;
        let m_top = bounds.y - parent_bounds.y;
        let m_right = (parent_bounds.x + parent_bounds.width) - (bounds.x + bounds.width);
        let m_bottom = (parent_bounds.y + parent_bounds.height) - (bounds.y + bounds.height);
        LayoutGeometry {
            top: round4(ratio(m_top, parent_bounds.height)),
            left: round4(ratio(m_left, parent_bounds.width)),
            right: round4(ratio(m_right, parent_bounds.width)),
            bottom: round4(ratio(m_bottom, parent_bounds.height)),
            width: round4(ratio(bounds.width, parent_bounds.width)),
            height: round4(ratio(bounds.height, parent_bounds.height)),
        }
    };

    let font = match node.element.kind {
        ElementKind::Text => Some(FontInfo {
            size_rel_outer: round4(ratio(bounds.height, root_bounds.height)),
        }),
        _ => None,
    };

    LayoutNode {
        id: node.element.id.clone(),
        tag: node.element.kind.layout_tag().to_string(),
        layout,
        text: node.element.text.clone(),
        font,
        children: node
            .children
            .iter()
            .map(|c| convert(c, bounds, root_bounds, false))
            .collect(),
    }
}

fn ratio(value: f64, base: f64) -> f64 {
    if base == 0.0 {
        0.0
    } else {
        value / base
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
