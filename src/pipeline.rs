//! Pipeline driver: wires the stages together over the working files
//! directory. Every stage reads one file and writes one file; any failure
//! aborts the whole run with the stage name attached, and later stages are
//! not attempted.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use crate::codegen::generate_html;
use crate::detect::detect_elements;
use crate::element::RawDetection;
use crate::error::{Error, Result};
use crate::feedback::revise_html;
use crate::gemini::{load_api_key, GeminiClient, DEFAULT_API_BASE, DEFAULT_MODEL};
use crate::hierarchy::build_tree;
use crate::layout::LayoutDocument;
use crate::prompt;

/// The four pipeline stages, used for error attribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Detect,
    Hierarchy,
    Codegen,
    Feedback,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Detect => "detect",
            Stage::Hierarchy => "hierarchy",
            Stage::Codegen => "codegen",
            Stage::Feedback => "feedback",
        };
        write!(f, "{}", name)
    }
}

/// Configuration for one pipeline run.
///
/// Defaults mirror the conventional working layout: artifacts live under
/// `files/` next to the binary and the API key sits in `gemini_key.txt`.
///
/// # Examples
///
/// ```
/// let cfg = wiregen::PipelineConfig::default();
/// assert_eq!(cfg.model, "gemini-2.5-flash");
/// assert!(cfg.html_path().ends_with("index.html"));
/// ```
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Wireframe image to analyze
    pub image_path: PathBuf,
    /// Directory holding intermediate and final artifacts
    pub files_dir: PathBuf,
    /// Plain-text file with the API key on its first line
    pub key_file: PathBuf,
    /// Hosted model identifier
    pub model: String,
    /// Base URL of the model endpoint (overridable for tests)
    pub api_base: String,
    /// HTTP timeout for model calls in milliseconds
    pub timeout_ms: u64,
    /// Containment tolerance in pixels for the hierarchy builder
    pub tolerance: f64,
    /// Optional prompt override files
    pub detection_prompt: Option<PathBuf>,
    pub generation_prompt: Option<PathBuf>,
    pub feedback_prompt: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            image_path: PathBuf::from("files/sample.jpg"),
            files_dir: PathBuf::from("files"),
            key_file: PathBuf::from("gemini_key.txt"),
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            timeout_ms: 60_000,
            tolerance: 2.0,
            detection_prompt: None,
            generation_prompt: None,
            feedback_prompt: None,
        }
    }
}

impl PipelineConfig {
    /// Stage-1 artifact: the flat element list.
    pub fn raw_detection_path(&self) -> PathBuf {
        self.files_dir.join("raw_wireframe.json")
    }

    /// Stage-2 artifact: the model-facing layout document.
    pub fn layout_path(&self) -> PathBuf {
        self.files_dir.join("hierarchy_wireframe.json")
    }

    /// Final artifact: the generated prototype.
    pub fn html_path(&self) -> PathBuf {
        self.files_dir.join("index.html")
    }

    fn client(&self) -> Result<GeminiClient> {
        let api_key = load_api_key(&self.key_file)?;
        GeminiClient::new(
            &self.api_base,
            &self.model,
            api_key,
            Duration::from_millis(self.timeout_ms),
        )
    }
}

/// Run the full pipeline: detect, build the hierarchy, generate HTML.
/// Returns the path of the written HTML file.
pub fn run(config: &PipelineConfig) -> Result<PathBuf> {
    let client = config.client()?;

    let detection = (|| {
        let prompt =
            prompt::load_or_default(config.detection_prompt.as_deref(), prompt::DETECTION_PROMPT)?;
        let detection = detect_elements(&client, &prompt, &config.image_path)?;
        ensure_files_dir(&config.files_dir)?;
        write_json(&config.raw_detection_path(), &detection)?;
        Ok(detection)
    })()
    .map_err(|e: Error| e.at_stage(Stage::Detect))?;
    info!(path = %config.raw_detection_path().display(), "wrote raw detection");

    let layout = build_layout(config, &detection).map_err(|e| e.at_stage(Stage::Hierarchy))?;
    info!(path = %config.layout_path().display(), "wrote layout document");

    (|| {
        let prompt = prompt::load_or_default(
            config.generation_prompt.as_deref(),
            prompt::GENERATION_PROMPT,
        )?;
        let html = generate_html(&client, &prompt, &layout)?;
        write_text(&config.html_path(), &html)
    })()
    .map_err(|e: Error| e.at_stage(Stage::Codegen))?;
    info!(path = %config.html_path().display(), "wrote generated HTML");

    Ok(config.html_path())
}

/// Run only the hierarchy stage from an existing raw-detection file.
/// Returns the path of the written layout document.
pub fn run_hierarchy(config: &PipelineConfig) -> Result<PathBuf> {
    (|| {
        let detection: RawDetection = read_json(&config.raw_detection_path())?;
        build_layout(config, &detection)?;
        Ok(())
    })()
    .map_err(|e: Error| e.at_stage(Stage::Hierarchy))?;
    Ok(config.layout_path())
}

/// Apply a feedback instruction to the existing HTML file, overwriting it.
pub fn run_feedback(config: &PipelineConfig, instruction: &str) -> Result<PathBuf> {
    (|| {
        let client = config.client()?;
        let html_path = config.html_path();
        let html = std::fs::read_to_string(&html_path)
            .map_err(|_| Error::FileNotFound(html_path.display().to_string()))?;
        let base_prompt =
            prompt::load_or_default(config.feedback_prompt.as_deref(), prompt::FEEDBACK_PROMPT)?;
        let revised = revise_html(&client, &base_prompt, instruction, &html)?;
        write_text(&html_path, &revised)
    })()
    .map_err(|e: Error| e.at_stage(Stage::Feedback))?;
    Ok(config.html_path())
}

fn build_layout(config: &PipelineConfig, detection: &RawDetection) -> Result<LayoutDocument> {
    let tree = build_tree(&detection.elements, config.tolerance)?;
    info!(nodes = tree.node_count(), "hierarchy built");
    let layout = LayoutDocument::from_hierarchy(&tree, detection.image_path.clone());
    ensure_files_dir(&config.files_dir)?;
    write_json(&config.layout_path(), &layout)?;
    Ok(layout)
}

fn ensure_files_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .map_err(|e| Error::Serialization(format!("Cannot create {}: {}", dir.display(), e)))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path)
        .map_err(|_| Error::FileNotFound(path.display().to_string()))?;
    Ok(serde_json::from_str(&contents)?)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    write_text(path, &json)
}

fn write_text(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents)
        .map_err(|e| Error::Serialization(format!("Cannot write {}: {}", path.display(), e)))
}
