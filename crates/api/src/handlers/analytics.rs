//! Handlers for the `/analytics` resource.
//!
//! All analytics are computed from stored rows by the core analyzers at
//! request time; nothing here is precomputed or cached.

use axum::extract::{Path, Query, State};
use axum::Json;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use textures_core::keywords::{self, keyword_category, KeywordSample};
use textures_core::ratings::{
    analyze_keyword_effectiveness, analyze_theme_performance, suggest_prompt_improvements,
    AnalysisQuality, KeywordStats, PromptImprovements, ThemePerformance,
};
use textures_core::types::DbId;
use textures_db::models::image::GlobalStats;
use textures_db::repositories::{ImageRepo, ThemeRepo};

use crate::error::AppResult;
use crate::handlers::{themes, to_history};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /analytics/keywords`.
#[derive(Debug, Deserialize)]
pub struct KeywordQuery {
    /// Restrict to one theme's history; omitted means the whole corpus.
    pub theme_id: Option<DbId>,
    /// Restrict to one taxonomy category.
    pub category: Option<String>,
    /// Drop keywords with fewer rated uses than this.
    pub min_uses: Option<usize>,
}

/// Per-keyword stats plus the taxonomy category, as served to clients.
#[derive(Debug, Serialize)]
pub struct KeywordReportEntry {
    #[serde(flatten)]
    pub stats: KeywordStats,
    pub category: &'static str,
}

/// Keyword effectiveness report.
#[derive(Debug, Serialize)]
pub struct KeywordReport {
    pub keyword_effectiveness: IndexMap<String, KeywordReportEntry>,
    pub top_performers: Vec<String>,
    pub underperformers: Vec<String>,
    pub analysis_quality: AnalysisQuality,
    pub total_records: usize,
}

/// GET /api/v1/analytics/keywords
pub async fn keywords(
    State(state): State<AppState>,
    Query(query): Query<KeywordQuery>,
) -> AppResult<Json<DataResponse<KeywordReport>>> {
    let rows = match query.theme_id {
        Some(theme_id) => {
            themes::ensure_theme_exists(&state, theme_id).await?;
            ImageRepo::theme_history(&state.pool, theme_id).await?
        }
        None => ImageRepo::all_history(&state.pool).await?,
    };
    let records = to_history(&rows);
    let analysis = analyze_keyword_effectiveness(&records);

    let min_uses = query.min_uses.unwrap_or(0);
    let keyword_effectiveness: IndexMap<String, KeywordReportEntry> = analysis
        .keyword_effectiveness
        .into_iter()
        .filter(|(_, stats)| stats.total_uses >= min_uses)
        .map(|(keyword, stats)| {
            let category = keyword_category(&keyword);
            (keyword, KeywordReportEntry { stats, category })
        })
        .filter(|(_, entry)| {
            query
                .category
                .as_deref()
                .is_none_or(|category| entry.category == category)
        })
        .collect();

    Ok(Json(DataResponse {
        data: KeywordReport {
            top_performers: analysis
                .top_performers
                .into_iter()
                .filter(|k| keyword_effectiveness.contains_key(k))
                .collect(),
            underperformers: analysis
                .underperformers
                .into_iter()
                .filter(|k| keyword_effectiveness.contains_key(k))
                .collect(),
            analysis_quality: analysis.analysis_quality,
            total_records: records.len(),
            keyword_effectiveness,
        },
    }))
}

/// One theme's performance report.
#[derive(Debug, Serialize)]
pub struct ThemePerformanceEntry {
    pub theme_id: DbId,
    pub theme_name: String,
    #[serde(flatten)]
    pub performance: ThemePerformance,
}

/// GET /api/v1/analytics/themes/performance
///
/// Themes without any rated image are omitted rather than reported as
/// errors.
pub async fn theme_performance(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ThemePerformanceEntry>>>> {
    let themes = ThemeRepo::list_all(&state.pool).await?;

    let mut entries = Vec::new();
    for theme in themes {
        let rows = ImageRepo::theme_history(&state.pool, theme.id).await?;
        let records = to_history(&rows);
        if let Ok(performance) = analyze_theme_performance(&records) {
            entries.push(ThemePerformanceEntry {
                theme_id: theme.id,
                theme_name: theme.name,
                performance,
            });
        }
    }

    Ok(Json(DataResponse { data: entries }))
}

/// Improvement suggestions for one theme.
#[derive(Debug, Serialize)]
pub struct SuggestionsReport {
    #[serde(flatten)]
    pub improvements: PromptImprovements,
    /// Fresh keywords worth trying, from effectiveness data and the
    /// taxonomy.
    pub suggested_keywords: Vec<String>,
}

/// GET /api/v1/analytics/themes/{id}/suggestions
pub async fn suggestions(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<SuggestionsReport>>> {
    let theme = themes::ensure_theme_exists(&state, id).await?;

    let rows = ImageRepo::theme_history(&state.pool, id).await?;
    let records = to_history(&rows);

    let analysis = analyze_keyword_effectiveness(&records);
    let improvements = suggest_prompt_improvements(&theme.base_prompt, &records, &analysis);

    let samples: Vec<KeywordSample> = records
        .iter()
        .filter_map(|record| {
            record.rating.map(|rating| KeywordSample {
                keywords: record.keywords.clone(),
                rating: f64::from(rating),
            })
        })
        .collect();
    let effectiveness = keywords::analyze_keyword_effectiveness(&samples);
    let current = keywords::extract_keywords(&theme.base_prompt);
    let suggested_keywords = keywords::suggest_keywords(&current, &effectiveness, 3);

    Ok(Json(DataResponse {
        data: SuggestionsReport {
            improvements,
            suggested_keywords,
        },
    }))
}

/// Corpus-wide summary.
#[derive(Debug, Serialize)]
pub struct SummaryReport {
    #[serde(flatten)]
    pub stats: GlobalStats,
    pub top_performers: Vec<String>,
}

/// GET /api/v1/analytics/summary
pub async fn summary(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<SummaryReport>>> {
    let stats = ImageRepo::global_stats(&state.pool).await?;

    let rows = ImageRepo::all_history(&state.pool).await?;
    let analysis = analyze_keyword_effectiveness(&to_history(&rows));

    Ok(Json(DataResponse {
        data: SummaryReport {
            stats,
            top_performers: analysis.top_performers,
        },
    }))
}
