//! Rating analysis over historical generation records.
//!
//! All functions operate on caller-supplied record lists; nothing here
//! touches storage. Repositories load the history, these functions fold
//! it into performance and effectiveness reports.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::CoreError;
use crate::keywords::extract_keywords;
use crate::policy::{
    EXCELLENT_AVG_RATING, EXCELLENT_SUCCESS_RATE, FAIR_AVG_RATING, FAIR_SUCCESS_RATE,
    GOOD_AVG_RATING, GOOD_SUCCESS_RATE, HIGH_CONFIDENCE_MIN_SAMPLES, HIGH_RATING_THRESHOLD,
    HIGH_SUCCESS_RATE, LOW_SUCCESS_RATE, MEDIUM_CONFIDENCE_MIN_SAMPLES, MEDIUM_SUCCESS_RATE,
    MIN_SAMPLES_FOR_ANALYSIS, SUGGESTION_HIGH_MIN_RECORDS, SUGGESTION_MEDIUM_MIN_RECORDS,
    TREND_BAND, TREND_MIN_RATED, TREND_MIN_RECORDS, TREND_WINDOW,
};
use crate::round2;

/// One historical generation record, as loaded from storage.
#[derive(Debug, Clone, Default)]
pub struct HistoryRecord {
    pub prompt: String,
    pub keywords: Vec<String>,
    /// Absent until a human rates the image.
    pub rating: Option<i32>,
    /// RFC 3339 timestamp; compared lexicographically for trend ordering.
    pub created_at: Option<String>,
}

// ---------------------------------------------------------------------------
// Classifications
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Declining,
    Stable,
    InsufficientData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceLevel {
    Excellent,
    Good,
    Fair,
    Poor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisQuality {
    High,
    Medium,
    Low,
    NoData,
}

// ---------------------------------------------------------------------------
// Theme performance
// ---------------------------------------------------------------------------

/// Aggregate performance report for one theme's history.
#[derive(Debug, Clone, Serialize)]
pub struct ThemePerformance {
    pub total_images: usize,
    pub rated_images: usize,
    pub average_rating: f64,
    pub median_rating: f64,
    pub high_rated_count: usize,
    pub success_rate: f64,
    /// Rating value to occurrence count.
    pub rating_distribution: BTreeMap<i32, usize>,
    pub trend: Trend,
    pub performance_level: PerformanceLevel,
}

/// Analyze overall performance of a theme's generation history.
///
/// Fails with [`CoreError::NoData`] on an empty record set and
/// [`CoreError::NoRatings`] when records exist but none is rated.
pub fn analyze_theme_performance(records: &[HistoryRecord]) -> Result<ThemePerformance, CoreError> {
    if records.is_empty() {
        return Err(CoreError::NoData);
    }

    let ratings: Vec<i32> = records.iter().filter_map(|r| r.rating).collect();
    if ratings.is_empty() {
        return Err(CoreError::NoRatings);
    }

    let average = ratings.iter().map(|r| f64::from(*r)).sum::<f64>() / ratings.len() as f64;
    let high_rated_count = ratings
        .iter()
        .filter(|r| **r >= HIGH_RATING_THRESHOLD)
        .count();
    let success_rate = high_rated_count as f64 / ratings.len() as f64;

    let mut distribution = BTreeMap::new();
    for rating in &ratings {
        *distribution.entry(*rating).or_insert(0) += 1;
    }

    Ok(ThemePerformance {
        total_images: records.len(),
        rated_images: ratings.len(),
        average_rating: round2(average),
        median_rating: median(&ratings),
        high_rated_count,
        success_rate: round2(success_rate),
        rating_distribution: distribution,
        trend: rating_trend(records),
        performance_level: performance_level(success_rate, average),
    })
}

/// Whether ratings are improving over time.
///
/// Compares the mean of the first [`TREND_WINDOW`] ratings against the
/// mean of the last, over records sorted ascending by `created_at`.
pub fn rating_trend(records: &[HistoryRecord]) -> Trend {
    if records.len() < TREND_MIN_RECORDS {
        return Trend::InsufficientData;
    }

    let mut sorted: Vec<&HistoryRecord> = records.iter().collect();
    sorted.sort_by(|a, b| a.created_at.cmp(&b.created_at));

    let ratings: Vec<f64> = sorted
        .iter()
        .filter_map(|r| r.rating)
        .map(f64::from)
        .collect();
    if ratings.len() < TREND_MIN_RATED {
        return Trend::InsufficientData;
    }

    let early = &ratings[..TREND_WINDOW.min(ratings.len())];
    let recent = &ratings[ratings.len().saturating_sub(TREND_WINDOW)..];
    let early_mean = early.iter().sum::<f64>() / early.len() as f64;
    let recent_mean = recent.iter().sum::<f64>() / recent.len() as f64;

    if recent_mean > early_mean + TREND_BAND {
        Trend::Improving
    } else if recent_mean < early_mean - TREND_BAND {
        Trend::Declining
    } else {
        Trend::Stable
    }
}

/// Four-tier classification; each tier requires both thresholds.
pub fn performance_level(success_rate: f64, average_rating: f64) -> PerformanceLevel {
    if success_rate >= EXCELLENT_SUCCESS_RATE && average_rating >= EXCELLENT_AVG_RATING {
        PerformanceLevel::Excellent
    } else if success_rate >= GOOD_SUCCESS_RATE && average_rating >= GOOD_AVG_RATING {
        PerformanceLevel::Good
    } else if success_rate >= FAIR_SUCCESS_RATE && average_rating >= FAIR_AVG_RATING {
        PerformanceLevel::Fair
    } else {
        PerformanceLevel::Poor
    }
}

fn median(ratings: &[i32]) -> f64 {
    let mut sorted = ratings.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        f64::from(sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        f64::from(sorted[mid])
    }
}

// ---------------------------------------------------------------------------
// Keyword effectiveness
// ---------------------------------------------------------------------------

/// Per-keyword statistics for keywords with enough rated samples.
#[derive(Debug, Clone, Serialize)]
pub struct KeywordStats {
    pub total_uses: usize,
    pub average_rating: f64,
    pub high_rated_count: usize,
    pub success_rate: f64,
    pub confidence: Confidence,
}

/// Keyword effectiveness report for one theme's history.
#[derive(Debug, Clone, Serialize)]
pub struct KeywordAnalysis {
    /// Ordered best-first by `(success_rate, average_rating)`.
    pub keyword_effectiveness: IndexMap<String, KeywordStats>,
    pub top_performers: Vec<String>,
    pub underperformers: Vec<String>,
    pub analysis_quality: AnalysisQuality,
}

/// Analyze which keywords correlate with high ratings.
///
/// Keywords with fewer than [`MIN_SAMPLES_FOR_ANALYSIS`] rated samples
/// are excluded entirely: precision over recall.
pub fn analyze_keyword_effectiveness(records: &[HistoryRecord]) -> KeywordAnalysis {
    let mut keyword_ratings: BTreeMap<&str, Vec<i32>> = BTreeMap::new();
    for record in records {
        if let Some(rating) = record.rating {
            for keyword in &record.keywords {
                keyword_ratings.entry(keyword.as_str()).or_default().push(rating);
            }
        }
    }

    let mut entries: Vec<(String, KeywordStats)> = keyword_ratings
        .into_iter()
        .filter(|(_, ratings)| ratings.len() >= MIN_SAMPLES_FOR_ANALYSIS)
        .map(|(keyword, ratings)| {
            let total_uses = ratings.len();
            let average =
                ratings.iter().map(|r| f64::from(*r)).sum::<f64>() / total_uses as f64;
            let high_rated_count = ratings
                .iter()
                .filter(|r| **r >= HIGH_RATING_THRESHOLD)
                .count();
            let success_rate = high_rated_count as f64 / total_uses as f64;

            (
                keyword.to_string(),
                KeywordStats {
                    total_uses,
                    average_rating: round2(average),
                    high_rated_count,
                    success_rate: round2(success_rate),
                    confidence: keyword_confidence(total_uses, success_rate),
                },
            )
        })
        .collect();

    // Best first; keyword order as a deterministic tie-break.
    entries.sort_by(|a, b| {
        b.1.success_rate
            .total_cmp(&a.1.success_rate)
            .then_with(|| b.1.average_rating.total_cmp(&a.1.average_rating))
            .then_with(|| a.0.cmp(&b.0))
    });

    let top_performers = entries
        .iter()
        .take(5)
        .filter(|(_, stats)| stats.success_rate > MEDIUM_SUCCESS_RATE)
        .map(|(keyword, _)| keyword.clone())
        .collect();
    let underperformers = entries
        .iter()
        .filter(|(_, stats)| stats.success_rate < LOW_SUCCESS_RATE)
        .map(|(keyword, _)| keyword.clone())
        .collect();

    let high_confidence_count = entries
        .iter()
        .filter(|(_, stats)| stats.confidence == Confidence::High)
        .count();
    let analysis_quality = if entries.is_empty() {
        AnalysisQuality::NoData
    } else if high_confidence_count >= 3 {
        AnalysisQuality::High
    } else if high_confidence_count >= 1 {
        AnalysisQuality::Medium
    } else {
        AnalysisQuality::Low
    };

    KeywordAnalysis {
        keyword_effectiveness: entries.into_iter().collect(),
        top_performers,
        underperformers,
        analysis_quality,
    }
}

fn keyword_confidence(sample_size: usize, success_rate: f64) -> Confidence {
    if sample_size >= HIGH_CONFIDENCE_MIN_SAMPLES && success_rate > HIGH_SUCCESS_RATE {
        Confidence::High
    } else if sample_size >= MEDIUM_CONFIDENCE_MIN_SAMPLES && success_rate > MEDIUM_SUCCESS_RATE {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

// ---------------------------------------------------------------------------
// Prompt improvement suggestions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct KeywordSuggestion {
    pub keyword: String,
    pub reason: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApproachSuggestion {
    pub suggestion: &'static str,
    pub reason: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct PromptImprovements {
    pub add_keywords: Vec<KeywordSuggestion>,
    pub remove_keywords: Vec<KeywordSuggestion>,
    pub modify_approach: Vec<ApproachSuggestion>,
    pub confidence: Confidence,
}

/// Suggest improvements to a prompt based on theme history.
///
/// Never fails: an unrateable history simply produces no approach
/// suggestion and low confidence.
pub fn suggest_prompt_improvements(
    current_prompt: &str,
    records: &[HistoryRecord],
    analysis: &KeywordAnalysis,
) -> PromptImprovements {
    let current_keywords = extract_keywords(current_prompt);

    let add_keywords = analysis
        .top_performers
        .iter()
        .filter(|keyword| !current_keywords.contains(keyword))
        .map(|keyword| KeywordSuggestion {
            keyword: keyword.clone(),
            reason: "High success rate in theme history",
        })
        .collect();

    let remove_keywords = analysis
        .underperformers
        .iter()
        .filter(|keyword| current_keywords.contains(keyword))
        .map(|keyword| KeywordSuggestion {
            keyword: keyword.clone(),
            reason: "Low success rate in theme history",
        })
        .collect();

    let mut modify_approach = Vec::new();
    if let Ok(performance) = analyze_theme_performance(records) {
        match performance.performance_level {
            PerformanceLevel::Poor => modify_approach.push(ApproachSuggestion {
                suggestion: "Consider more dramatic changes to prompt structure",
                reason: "Theme has low success rate",
            }),
            PerformanceLevel::Good => modify_approach.push(ApproachSuggestion {
                suggestion: "Fine-tune existing successful patterns",
                reason: "Theme is performing well, refine rather than overhaul",
            }),
            PerformanceLevel::Excellent | PerformanceLevel::Fair => {}
        }
    }

    let confidence = suggestion_confidence(records.len(), analysis.analysis_quality);

    PromptImprovements {
        add_keywords,
        remove_keywords,
        modify_approach,
        confidence,
    }
}

// The 20/10 record thresholds here are deliberately distinct from the
// 10/5 sample thresholds in keyword_confidence.
fn suggestion_confidence(record_count: usize, quality: AnalysisQuality) -> Confidence {
    if record_count >= SUGGESTION_HIGH_MIN_RECORDS && quality == AnalysisQuality::High {
        Confidence::High
    } else if record_count >= SUGGESTION_MEDIUM_MIN_RECORDS
        && matches!(quality, AnalysisQuality::High | AnalysisQuality::Medium)
    {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
