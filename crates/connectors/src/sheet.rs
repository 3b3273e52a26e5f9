use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use desk_core::{normalize_text, CollaboratorError};
use serde::{Deserialize, Serialize};

const DEFAULT_MIN_OVERLAP: f32 = 0.34;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetRow {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone)]
struct IndexedRow {
    keywords: HashSet<String>,
    answer: String,
}

/// Spreadsheet-backed FAQ table: rows loaded once from a JSON file,
/// matched by normalized keyword overlap against the query.
#[derive(Clone)]
pub struct SheetLookup {
    rows: Vec<IndexedRow>,
    min_overlap: f32,
}

impl SheetLookup {
    pub fn from_rows(rows: Vec<SheetRow>) -> Self {
        let rows = rows
            .into_iter()
            .map(|row| IndexedRow {
                keywords: tokenize(&row.question),
                answer: row.answer,
            })
            .collect();

        Self {
            rows,
            min_overlap: DEFAULT_MIN_OVERLAP,
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed reading FAQ sheet at {}", path.display()))?;
        let rows: Vec<SheetRow> = serde_json::from_str(&raw)
            .with_context(|| format!("invalid FAQ sheet at {}", path.display()))?;

        Ok(Self::from_rows(rows))
    }

    pub fn empty() -> Self {
        Self::from_rows(Vec::new())
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn best_match(&self, query: &str) -> Option<String> {
        let query_tokens = tokenize(query);
        if query_tokens.is_empty() {
            return None;
        }

        self.rows
            .iter()
            .map(|row| (overlap_score(&query_tokens, &row.keywords), row))
            .filter(|(score, _)| *score >= self.min_overlap)
            .max_by(|(a, _), (b, _)| a.total_cmp(b))
            .map(|(_, row)| row.answer.clone())
    }
}

#[async_trait]
impl super::LookupClient for SheetLookup {
    async fn lookup(&self, query: &str) -> Result<Option<String>, CollaboratorError> {
        Ok(self.best_match(query))
    }
}

fn tokenize(input: &str) -> HashSet<String> {
    normalize_text(input)
        .split_whitespace()
        .filter(|token| token.chars().count() > 1)
        .map(|token| token.to_string())
        .collect()
}

fn overlap_score(query: &HashSet<String>, row: &HashSet<String>) -> f32 {
    if query.is_empty() {
        return 0.0;
    }
    let matched = query.intersection(row).count();
    matched as f32 / query.len() as f32
}
