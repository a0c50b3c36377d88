//! Note expansion: prompt, response cleanup and parsing.
//!
//! The model is asked to answer with a bare JSON object
//! `{title, category, markdown}`. Models frequently wrap that object in a
//! markdown code fence anyway, so the raw text is cleaned before parsing.

use std::time::Instant;

use serde::Deserialize;
use tracing::{debug, warn};

use ideaforge_core::{Category, Error, ExpansionResult, GenerationBackend, Result};

/// System prompt sent with every expansion request.
pub const EXPANSION_SYSTEM_PROMPT: &str = r##"You are a productivity assistant that transforms quick notes into structured, actionable markdown todo lists.

Given a brief note or idea, you will:
1. Determine the most appropriate category from: homelab, coding, personal, learning, creative
2. Create a clear, descriptive title
3. Expand the note into a markdown checklist with logical steps
4. Keep steps actionable and specific
5. Add brief context where helpful

Respond ONLY with valid JSON in this exact format:
{
  "title": "Clear Title Here",
  "category": "category_name",
  "markdown": "# Title\n\n## Tasks\n- [ ] First step\n- [ ] Second step\n..."
}

Keep the markdown concise but comprehensive. Each task should be completable in one sitting.
Do not include any text outside the JSON object."##;

/// Raw shape of the model's answer before category coercion.
#[derive(Debug, Deserialize)]
struct RawExpansion {
    #[serde(default)]
    title: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    markdown: String,
}

/// Strip surrounding whitespace and markdown code fences from model output.
pub fn clean_json_response(text: &str) -> &str {
    let mut text = text.trim();

    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }

    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }

    text.trim()
}

/// Parse cleaned model output into an [`ExpansionResult`].
///
/// Unknown categories fall back to [`Category::FALLBACK`]. A missing or blank
/// title or markdown body is an error.
pub fn parse_expansion_response(raw: &str) -> Result<ExpansionResult> {
    let cleaned = clean_json_response(raw);
    let parsed: RawExpansion = serde_json::from_str(cleaned).map_err(|e| {
        Error::Inference(format!("Failed to parse LLM response as JSON: {}", e))
    })?;

    let title = parsed.title.trim().to_string();
    if title.is_empty() {
        return Err(Error::Inference("LLM response has an empty title".to_string()));
    }
    if parsed.markdown.trim().is_empty() {
        return Err(Error::Inference(
            "LLM response has an empty markdown body".to_string(),
        ));
    }

    let category = match parsed.category.parse::<Category>() {
        Ok(category) => category,
        Err(_) => {
            warn!(
                subsystem = "inference",
                component = "expansion",
                category = %parsed.category,
                fallback = %Category::FALLBACK,
                "Model returned unknown category, using fallback"
            );
            Category::FALLBACK
        }
    };

    Ok(ExpansionResult {
        title,
        category,
        markdown: parsed.markdown,
    })
}

/// Expand a raw note with the given backend.
pub async fn expand_note(
    backend: &dyn GenerationBackend,
    raw_content: &str,
) -> Result<ExpansionResult> {
    let start = Instant::now();
    let response = backend
        .generate_with_system(EXPANSION_SYSTEM_PROMPT, raw_content)
        .await?;
    let expansion = parse_expansion_response(&response)?;

    debug!(
        subsystem = "inference",
        component = "expansion",
        op = "expand",
        model = backend.model_name(),
        category = %expansion.category,
        response_len = response.len(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Note expanded"
    );
    Ok(expansion)
}
