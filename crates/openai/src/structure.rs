//! Structure-prompt handling.
//!
//! Every generated texture shares one set of physical constraints (flat,
//! black and white, edge-connected) expressed as a structure prompt that
//! is appended to each theme prompt before the API call.

use std::path::Path;

/// Fallback constraints used when no structure-prompt file is configured
/// or the configured file cannot be read.
pub const DEFAULT_STRUCTURE_PROMPT: &str =
    "Flat, two-dimensional black and white pattern filling entire canvas edge-to-edge. \
     No perspective, no depth, no shadows, no 3D appearance, no separate objects. \
     Black pattern connects image edges; white material forms connected structure. \
     Bold, simplified style with large-scale elements (minimum 3-5 pixels). \
     High contrast only, no grayscale.";

/// Load the structure prompt from a file, falling back to the default.
pub fn load_structure_prompt(path: Option<&Path>) -> String {
    let Some(path) = path else {
        return DEFAULT_STRUCTURE_PROMPT.to_string();
    };

    match std::fs::read_to_string(path) {
        Ok(content) if !content.trim().is_empty() => content.trim().to_string(),
        Ok(_) => {
            tracing::warn!(path = %path.display(), "structure prompt file is empty, using default");
            DEFAULT_STRUCTURE_PROMPT.to_string()
        }
        Err(err) => {
            tracing::warn!(
                path = %path.display(),
                error = %err,
                "failed to read structure prompt file, using default"
            );
            DEFAULT_STRUCTURE_PROMPT.to_string()
        }
    }
}

/// Combine a theme prompt with the structure constraints.
///
/// Theme first so it dominates, then the shared constraints.
pub fn combine_prompts(theme_prompt: &str, structure_prompt: &str) -> String {
    format!("{theme_prompt}. {structure_prompt}")
}

/// Strip `##` tracking markers before sending a prompt to the API.
///
/// The keyword text itself stays in the prompt; only the markers go.
pub fn strip_tags(prompt: &str) -> String {
    prompt.replace("##", "")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_path_uses_default() {
        assert_eq!(load_structure_prompt(None), DEFAULT_STRUCTURE_PROMPT);
    }

    #[test]
    fn unreadable_file_falls_back_to_default() {
        let path = Path::new("/nonexistent/structure.md");
        assert_eq!(load_structure_prompt(Some(path)), DEFAULT_STRUCTURE_PROMPT);
    }

    #[test]
    fn combine_puts_theme_first() {
        assert_eq!(
            combine_prompts("organic cells", "black and white"),
            "organic cells. black and white"
        );
    }

    #[test]
    fn strip_removes_markers_but_keeps_words() {
        assert_eq!(
            strip_tags("a ##fractal and ##flowing texture"),
            "a fractal and flowing texture"
        );
    }
}
