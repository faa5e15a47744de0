//! Prompt variation generation.
//!
//! Each generation request takes a base prompt plus the theme's rated
//! history and emits `num_variations` reworked prompts, each produced by
//! one of five strategies. The random source is injected so callers and
//! tests can seed it.

use std::collections::HashMap;

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::Serialize;

use crate::keywords::{category_members, extract_keywords};
use crate::policy::HIGH_RATING_THRESHOLD;
use crate::ratings::HistoryRecord;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    KeywordSubstitution,
    DescriptorAddition,
    EmphasisShifting,
    KeywordCombination,
    ParameterTweaking,
}

pub const ALL_STRATEGIES: &[Strategy] = &[
    Strategy::KeywordSubstitution,
    Strategy::DescriptorAddition,
    Strategy::EmphasisShifting,
    Strategy::KeywordCombination,
    Strategy::ParameterTweaking,
];

const DESCRIPTORS: &[&str] = &[
    "with flowing lines",
    "with subtle texture",
    "with organic growth",
    "with geometric precision",
    "with natural randomness",
    "with structured chaos",
];

const EMPHASIS_MODIFIERS: &[&str] = &["bold", "subtle", "delicate", "strong", "gentle", "dramatic"];

const PARAMETERS: &[&str] = &[
    "high contrast",
    "low contrast",
    "fine detail",
    "coarse texture",
    "smooth transitions",
    "sharp edges",
];

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// One generated prompt variation.
#[derive(Debug, Clone, Serialize)]
pub struct Variation {
    pub prompt: String,
    pub strategy: Strategy,
    pub changes: Vec<String>,
}

/// Keyword frequencies mined from a theme's high-rated history.
#[derive(Debug, Clone, Default)]
pub struct SuccessfulPatterns {
    /// Keyword to occurrence count across high-rated prompts.
    pub successful_keywords: HashMap<String, usize>,
    pub high_rated_count: usize,
    pub total_count: usize,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Generate `num_variations` prompt variations from a base prompt.
///
/// Never fails: empty history and keyword-free prompts all have defined
/// fallbacks. Variation `i` in the output corresponds to request index `i`.
pub fn generate_variations(
    base_prompt: &str,
    num_variations: u32,
    theme_history: &[HistoryRecord],
    rng: &mut impl Rng,
) -> Vec<Variation> {
    let current_keywords = extract_keywords(base_prompt);
    let patterns = analyze_successful_patterns(theme_history);

    (0..num_variations as usize)
        .map(|index| {
            let strategy = select_strategy(index, &patterns, rng);
            apply_strategy(base_prompt, strategy, &current_keywords, &patterns, index, rng)
        })
        .collect()
}

/// Mine keyword frequencies from high-rated history entries.
///
/// Returns the empty default when the history has no entry rated at or
/// above [`HIGH_RATING_THRESHOLD`].
pub fn analyze_successful_patterns(theme_history: &[HistoryRecord]) -> SuccessfulPatterns {
    let high_rated: Vec<&HistoryRecord> = theme_history
        .iter()
        .filter(|record| record.rating.is_some_and(|r| r >= HIGH_RATING_THRESHOLD))
        .collect();

    if high_rated.is_empty() {
        return SuccessfulPatterns::default();
    }

    let mut counts: HashMap<String, usize> = HashMap::new();
    for record in &high_rated {
        for keyword in extract_keywords(&record.prompt) {
            *counts.entry(keyword).or_insert(0) += 1;
        }
    }

    SuccessfulPatterns {
        successful_keywords: counts,
        high_rated_count: high_rated.len(),
        total_count: theme_history.len(),
    }
}

/// Pick a strategy for output index `index`.
///
/// When the history has successful patterns, the schedule leans on them:
/// every third index combines a proven keyword, the next substitutes, and
/// the rest explore randomly. New themes explore randomly throughout.
pub fn select_strategy(
    index: usize,
    patterns: &SuccessfulPatterns,
    rng: &mut impl Rng,
) -> Strategy {
    if patterns.high_rated_count > 0 {
        match index % 3 {
            0 => Strategy::KeywordCombination,
            1 => Strategy::KeywordSubstitution,
            _ => random_strategy(rng),
        }
    } else {
        random_strategy(rng)
    }
}

fn random_strategy(rng: &mut impl Rng) -> Strategy {
    ALL_STRATEGIES
        .choose(rng)
        .copied()
        .unwrap_or(Strategy::DescriptorAddition)
}

/// Apply one strategy to the base prompt.
pub fn apply_strategy(
    base_prompt: &str,
    strategy: Strategy,
    current_keywords: &[String],
    patterns: &SuccessfulPatterns,
    index: usize,
    rng: &mut impl Rng,
) -> Variation {
    match strategy {
        Strategy::KeywordSubstitution => keyword_substitution(base_prompt, current_keywords, rng),
        Strategy::DescriptorAddition => descriptor_addition(base_prompt, index),
        Strategy::EmphasisShifting => emphasis_shifting(base_prompt, index),
        Strategy::KeywordCombination => keyword_combination(base_prompt, patterns, index),
        Strategy::ParameterTweaking => parameter_tweaking(base_prompt, index),
    }
}

/// Swap up to the first two tagged keywords for random same-category
/// alternatives. Uncategorized keywords are left untouched.
fn keyword_substitution(prompt: &str, keywords: &[String], rng: &mut impl Rng) -> Variation {
    let mut new_prompt = prompt.to_string();
    let mut changes = Vec::new();

    for keyword in keywords.iter().take(2) {
        let Some(members) = category_members(keyword) else {
            continue;
        };
        let lower = keyword.to_lowercase();
        let alternatives: Vec<&&str> = members.iter().filter(|m| **m != lower).collect();
        if let Some(replacement) = alternatives.choose(rng) {
            new_prompt = new_prompt.replace(&format!("##{keyword}"), &format!("##{replacement}"));
            changes.push(format!("##{keyword} -> ##{replacement}"));
        }
    }

    Variation {
        prompt: new_prompt,
        strategy: Strategy::KeywordSubstitution,
        changes,
    }
}

fn descriptor_addition(prompt: &str, index: usize) -> Variation {
    let descriptor = DESCRIPTORS[index % DESCRIPTORS.len()];
    Variation {
        prompt: format!("{prompt}, {descriptor}"),
        strategy: Strategy::DescriptorAddition,
        changes: vec![format!("Added: {descriptor}")],
    }
}

fn emphasis_shifting(prompt: &str, index: usize) -> Variation {
    let modifier = EMPHASIS_MODIFIERS[index % EMPHASIS_MODIFIERS.len()];
    Variation {
        prompt: format!("{modifier} {prompt}"),
        strategy: Strategy::EmphasisShifting,
        changes: vec![format!("Added emphasis: {modifier}")],
    }
}

/// Append one of the top three most frequent successful keywords. Falls
/// back to descriptor addition when the history has none.
fn keyword_combination(prompt: &str, patterns: &SuccessfulPatterns, index: usize) -> Variation {
    if patterns.successful_keywords.is_empty() {
        return descriptor_addition(prompt, index);
    }

    let mut ranked: Vec<(&String, &usize)> = patterns.successful_keywords.iter().collect();
    // Most frequent first; keyword order as a deterministic tie-break.
    ranked.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    ranked.truncate(3);

    let keyword = ranked[index % ranked.len()].0;
    Variation {
        prompt: format!("{prompt}, ##{keyword}"),
        strategy: Strategy::KeywordCombination,
        changes: vec![format!("Added successful keyword: ##{keyword}")],
    }
}

fn parameter_tweaking(prompt: &str, index: usize) -> Variation {
    let parameter = PARAMETERS[index % PARAMETERS.len()];
    Variation {
        prompt: format!("{prompt}, {parameter}"),
        strategy: Strategy::ParameterTweaking,
        changes: vec![format!("Added parameter: {parameter}")],
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn history_entry(prompt: &str, rating: Option<i32>) -> HistoryRecord {
        HistoryRecord {
            prompt: prompt.to_string(),
            keywords: extract_keywords(prompt),
            rating,
            created_at: None,
        }
    }

    // -- analyze_successful_patterns --

    #[test]
    fn patterns_count_keywords_from_high_rated_only() {
        let history = vec![
            history_entry("##fractal ##flowing", Some(5)),
            history_entry("##fractal", Some(4)),
            history_entry("##grid", Some(2)),
            history_entry("##maze", None),
        ];

        let patterns = analyze_successful_patterns(&history);

        assert_eq!(patterns.high_rated_count, 2);
        assert_eq!(patterns.total_count, 4);
        assert_eq!(patterns.successful_keywords["fractal"], 2);
        assert_eq!(patterns.successful_keywords["flowing"], 1);
        assert!(!patterns.successful_keywords.contains_key("grid"));
    }

    #[test]
    fn patterns_empty_without_high_ratings() {
        let history = vec![history_entry("##grid", Some(2))];
        let patterns = analyze_successful_patterns(&history);
        assert_eq!(patterns.high_rated_count, 0);
        assert!(patterns.successful_keywords.is_empty());

        assert_eq!(analyze_successful_patterns(&[]).total_count, 0);
    }

    // -- select_strategy --

    #[test]
    fn strategy_schedule_with_successful_patterns() {
        let patterns = SuccessfulPatterns {
            high_rated_count: 1,
            ..Default::default()
        };
        let mut rng = rng();

        assert_eq!(
            select_strategy(0, &patterns, &mut rng),
            Strategy::KeywordCombination
        );
        assert_eq!(
            select_strategy(1, &patterns, &mut rng),
            Strategy::KeywordSubstitution
        );
        assert_eq!(
            select_strategy(3, &patterns, &mut rng),
            Strategy::KeywordCombination
        );
    }

    #[test]
    fn strategy_random_pick_is_a_known_strategy() {
        let mut rng = rng();
        for index in 0..10 {
            let strategy = select_strategy(index, &SuccessfulPatterns::default(), &mut rng);
            assert!(ALL_STRATEGIES.contains(&strategy));
        }
    }

    // -- individual strategies --

    #[test]
    fn substitution_swaps_within_category() {
        let keywords = vec!["fractal".to_string()];
        let variation = keyword_substitution("a ##fractal pattern", &keywords, &mut rng());

        assert!(!variation.prompt.contains("##fractal"));
        assert!(variation.prompt.contains("##"));
        assert_eq!(variation.changes.len(), 1);
        assert!(variation.changes[0].starts_with("##fractal -> ##"));
    }

    #[test]
    fn substitution_limits_to_first_two_keywords() {
        let keywords = vec![
            "fractal".to_string(),
            "flowing".to_string(),
            "rough".to_string(),
        ];
        let variation =
            keyword_substitution("##fractal ##flowing ##rough", &keywords, &mut rng());

        assert!(variation.changes.len() <= 2);
        assert!(variation.prompt.contains("##rough"));
    }

    #[test]
    fn substitution_without_keywords_is_a_no_op() {
        let variation = keyword_substitution("plain prompt", &[], &mut rng());
        assert_eq!(variation.prompt, "plain prompt");
        assert!(variation.changes.is_empty());
    }

    #[test]
    fn substitution_skips_uncategorized_keywords() {
        let keywords = vec!["zzz".to_string()];
        let variation = keyword_substitution("a ##zzz pattern", &keywords, &mut rng());
        assert_eq!(variation.prompt, "a ##zzz pattern");
        assert!(variation.changes.is_empty());
    }

    #[test]
    fn descriptor_addition_cycles_through_the_list() {
        let first = descriptor_addition("base", 0);
        assert_eq!(first.prompt, "base, with flowing lines");

        let wrapped = descriptor_addition("base", 6);
        assert_eq!(wrapped.prompt, first.prompt);
    }

    #[test]
    fn emphasis_prepends_a_modifier() {
        let variation = emphasis_shifting("base prompt", 0);
        assert_eq!(variation.prompt, "bold base prompt");
        assert_eq!(variation.changes, ["Added emphasis: bold"]);
    }

    #[test]
    fn combination_appends_most_frequent_keyword() {
        let history = vec![
            history_entry("##fractal ##flowing", Some(5)),
            history_entry("##fractal", Some(4)),
        ];
        let patterns = analyze_successful_patterns(&history);

        let variation = keyword_combination("base", &patterns, 0);

        assert_eq!(variation.prompt, "base, ##fractal");
        assert_eq!(variation.strategy, Strategy::KeywordCombination);
    }

    #[test]
    fn combination_falls_back_to_descriptor_without_patterns() {
        let variation = keyword_combination("base", &SuccessfulPatterns::default(), 1);
        assert_eq!(variation.strategy, Strategy::DescriptorAddition);
        assert_eq!(variation.prompt, "base, with subtle texture");
    }

    #[test]
    fn parameter_tweaking_appends_a_parameter() {
        let variation = parameter_tweaking("base", 2);
        assert_eq!(variation.prompt, "base, fine detail");
    }

    // -- generate_variations --

    #[test]
    fn generates_requested_count_for_new_theme() {
        let variations = generate_variations("a ##grid texture", 3, &[], &mut rng());
        assert_eq!(variations.len(), 3);
        for variation in &variations {
            assert!(!variation.prompt.is_empty());
        }
    }

    #[test]
    fn generation_with_history_leads_with_proven_keywords() {
        let history = vec![
            history_entry("##fractal pattern", Some(5)),
            history_entry("##fractal again", Some(4)),
            history_entry("##grid", Some(1)),
        ];

        let variations = generate_variations("base ##grid", 2, &history, &mut rng());

        assert_eq!(variations[0].strategy, Strategy::KeywordCombination);
        assert_eq!(variations[0].prompt, "base ##grid, ##fractal");
        assert_eq!(variations[1].strategy, Strategy::KeywordSubstitution);
    }

    #[test]
    fn generation_is_deterministic_for_a_fixed_seed() {
        let history = vec![history_entry("##fractal", Some(5))];
        let first = generate_variations("base ##grid", 4, &history, &mut rng());
        let second = generate_variations("base ##grid", 4, &history, &mut rng());

        let prompts = |vs: &[Variation]| vs.iter().map(|v| v.prompt.clone()).collect::<Vec<_>>();
        assert_eq!(prompts(&first), prompts(&second));
    }
}
