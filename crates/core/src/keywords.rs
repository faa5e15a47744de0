//! Keyword extraction and the fixed keyword taxonomy.
//!
//! Prompts carry tracking tags of the form `##word`. The tags never reach
//! the image API (the client strips them); they exist so ratings can be
//! correlated back to the vocabulary that produced them.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::policy::{HIGH_RATING_THRESHOLD, MIN_WORD_LENGTH, STOP_WORDS};
use crate::round2;

/// Matches `##word`: two hash marks immediately followed by word characters.
/// A lone `#` or a `##` with no trailing word character does not match.
static KEYWORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"##(\w+)").expect("keyword pattern is valid"));

/// Matches plain words for descriptive-keyword extraction.
static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+").expect("word pattern is valid"));

// ---------------------------------------------------------------------------
// Taxonomy
// ---------------------------------------------------------------------------

/// The fixed keyword taxonomy, in declaration order.
///
/// Declaration order matters: [`suggest_keywords`] scans categories in this
/// order when topping up suggestions. Membership checks are
/// case-insensitive; first matching category wins (no term is listed twice).
pub const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "structural",
        &["grid", "radial", "fractal", "voronoi", "maze", "tessellated", "lattice"],
    ),
    (
        "organic",
        &["cellular", "flowing", "growth", "branching", "veins", "natural", "biological"],
    ),
    (
        "textural",
        &["rough", "smooth", "grainy", "sharp", "soft", "coarse", "fine", "gritty"],
    ),
    (
        "map_like",
        &["topographic", "contour", "terrain", "elevation", "isoline", "cartographic"],
    ),
    (
        "geometric",
        &["angular", "curved", "symmetrical", "tessellated", "polygonal", "circular"],
    ),
    (
        "visual",
        &["bold", "subtle", "delicate", "strong", "gentle", "dramatic", "minimalist"],
    ),
];

/// Synthetic bucket for keywords matching no taxonomy category.
pub const UNCATEGORIZED: &str = "uncategorized";

/// The category a keyword belongs to, or [`UNCATEGORIZED`].
pub fn keyword_category(keyword: &str) -> &'static str {
    let lower = keyword.to_lowercase();
    CATEGORIES
        .iter()
        .find(|(_, members)| members.contains(&lower.as_str()))
        .map(|(category, _)| *category)
        .unwrap_or(UNCATEGORIZED)
}

/// All known members of the category a keyword belongs to, if any.
pub fn category_members(keyword: &str) -> Option<&'static [&'static str]> {
    let lower = keyword.to_lowercase();
    CATEGORIES
        .iter()
        .find(|(_, members)| members.contains(&lower.as_str()))
        .map(|(_, members)| *members)
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Extract `##keyword` tags from a prompt, in order of appearance,
/// duplicates preserved.
pub fn extract_keywords(prompt: &str) -> Vec<String> {
    KEYWORD_RE
        .captures_iter(prompt)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Tagged and descriptive keywords pulled from one prompt.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractedKeywords {
    /// `##word` tags, in order.
    pub tagged: Vec<String>,
    /// Plain words from the lower-cased prompt: longer than
    /// [`MIN_WORD_LENGTH`] and not a stop word, duplicates preserved.
    pub descriptive: Vec<String>,
}

/// Extract both `##keywords` and regular descriptive words.
pub fn extract_all_keywords(prompt: &str) -> ExtractedKeywords {
    let tagged = extract_keywords(prompt);

    let lower = prompt.to_lowercase();
    let descriptive = WORD_RE
        .find_iter(&lower)
        .map(|m| m.as_str())
        .filter(|word| word.len() > MIN_WORD_LENGTH && !STOP_WORDS.contains(word))
        .map(str::to_string)
        .collect();

    ExtractedKeywords { tagged, descriptive }
}

/// Classify keywords against the taxonomy.
///
/// Every taxonomy category is present in the result (possibly empty); the
/// [`UNCATEGORIZED`] bucket appears only when at least one keyword matched
/// nothing.
pub fn categorize_keywords(keywords: &[String]) -> BTreeMap<&'static str, Vec<String>> {
    let mut categorized: BTreeMap<&'static str, Vec<String>> = CATEGORIES
        .iter()
        .map(|(category, _)| (*category, Vec::new()))
        .collect();
    let mut uncategorized = Vec::new();

    for keyword in keywords {
        let lower = keyword.to_lowercase();
        match CATEGORIES
            .iter()
            .find(|(_, members)| members.contains(&lower.as_str()))
        {
            Some((category, _)) => {
                categorized.entry(category).or_default().push(keyword.clone());
            }
            None => uncategorized.push(keyword.clone()),
        }
    }

    if !uncategorized.is_empty() {
        categorized.insert(UNCATEGORIZED, uncategorized);
    }

    categorized
}

// ---------------------------------------------------------------------------
// Effectiveness
// ---------------------------------------------------------------------------

/// One rated prompt's keywords, as supplied by the caller.
#[derive(Debug, Clone)]
pub struct KeywordSample {
    pub keywords: Vec<String>,
    pub rating: f64,
}

/// Per-keyword effectiveness metrics derived from rated samples.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordEffectiveness {
    pub average_rating: f64,
    pub total_uses: usize,
    pub high_rated_count: usize,
    pub success_rate: f64,
    pub category: &'static str,
}

/// Aggregate rated samples into per-keyword effectiveness.
///
/// A sample credits its full rating once per keyword it contains: a
/// three-keyword prompt feeds the same rating into all three keywords.
/// Returns an empty map for empty input. Recomputation is idempotent
/// given the same input set.
pub fn analyze_keyword_effectiveness(
    samples: &[KeywordSample],
) -> HashMap<String, KeywordEffectiveness> {
    let mut keyword_ratings: HashMap<&str, Vec<f64>> = HashMap::new();

    for sample in samples {
        for keyword in &sample.keywords {
            keyword_ratings
                .entry(keyword.as_str())
                .or_default()
                .push(sample.rating);
        }
    }

    keyword_ratings
        .into_iter()
        .map(|(keyword, ratings)| {
            let total_uses = ratings.len();
            let average = ratings.iter().sum::<f64>() / total_uses as f64;
            let high_rated_count = ratings
                .iter()
                .filter(|r| **r >= f64::from(HIGH_RATING_THRESHOLD))
                .count();
            let success_rate = high_rated_count as f64 / total_uses as f64;

            (
                keyword.to_string(),
                KeywordEffectiveness {
                    average_rating: round2(average),
                    total_uses,
                    high_rated_count,
                    success_rate: round2(success_rate),
                    category: keyword_category(keyword),
                },
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Suggestions
// ---------------------------------------------------------------------------

/// Suggest new keywords to try, based on effectiveness data.
///
/// High-performing keywords (success rate > 0.5) not already in use come
/// first, best first. If that pool runs short, suggestions are topped up
/// from taxonomy categories not represented among the current keywords'
/// categories, scanned in declaration order. At most `num_suggestions`
/// are returned; fewer if supply runs out.
pub fn suggest_keywords(
    current_keywords: &[String],
    effectiveness: &HashMap<String, KeywordEffectiveness>,
    num_suggestions: usize,
) -> Vec<String> {
    let mut available: Vec<(&String, f64)> = effectiveness
        .iter()
        .filter(|(keyword, data)| {
            !current_keywords.contains(keyword) && data.success_rate > 0.5
        })
        .map(|(keyword, data)| (keyword, data.success_rate))
        .collect();

    // Best success rate first; keyword order as a deterministic tie-break.
    available.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let mut suggestions: Vec<String> = available
        .into_iter()
        .take(num_suggestions)
        .map(|(keyword, _)| keyword.clone())
        .collect();

    if suggestions.len() < num_suggestions {
        let current_categories: HashSet<&'static str> = current_keywords
            .iter()
            .map(|keyword| keyword_category(keyword))
            .collect();

        'categories: for (category, members) in CATEGORIES {
            if current_categories.contains(category) {
                continue;
            }
            for member in *members {
                if current_keywords.iter().any(|k| k == member)
                    || suggestions.iter().any(|s| s == member)
                {
                    continue;
                }
                suggestions.push((*member).to_string());
                if suggestions.len() >= num_suggestions {
                    break 'categories;
                }
            }
        }
    }

    suggestions.truncate(num_suggestions);
    suggestions
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
