//! Candidate-label loading.
//!
//! Candidates come from a `tag_id,name,category,count` table; frequent names
//! are kept, minus anything listed in an optional exclusions table.

use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::{error, info, warn};

/// Names must be seen more often than this to become candidates.
pub const MIN_TAG_COUNT: i64 = 100;

/// Upper bound on the candidate list handed to the classifier.
pub const MAX_CANDIDATE_LABELS: usize = 50;

/// Used whenever the candidate table is unusable.
pub const DEFAULT_LABELS: [&str; 20] = [
    "cat", "dog", "car", "tree", "sky", "building", "person", "landscape", "night", "day",
    "beach", "forest", "city", "food", "animal", "water", "mountain", "road", "cloud", "sun",
];

const REQUIRED_COLUMNS: [&str; 4] = ["tag_id", "name", "category", "count"];

#[derive(Debug, Deserialize)]
struct CandidateRow {
    tag_id: String,
    #[serde(default)]
    name: String,
    count: i64,
}

fn default_labels() -> Vec<String> {
    DEFAULT_LABELS.iter().map(|s| s.to_string()).collect()
}

/// Load candidate labels. Never fails: any structural problem with the
/// candidate table yields [`DEFAULT_LABELS`].
pub fn load_candidate_labels(input_tags: &Path, exclusions: &Path) -> Vec<String> {
    info!(path = %input_tags.display(), "Loading candidate tags");

    let ranked = match read_ranked_names(input_tags) {
        Ok(names) => names,
        Err(message) => {
            error!(path = %input_tags.display(), "{}", message);
            return default_labels();
        }
    };

    let excluded = load_exclusions(exclusions);
    let filtered: Vec<String> = ranked
        .into_iter()
        .filter(|name| !excluded.contains(&name.to_lowercase()))
        .take(MAX_CANDIDATE_LABELS)
        .collect();

    if filtered.is_empty() {
        warn!(
            path = %input_tags.display(),
            "No valid tags remain after filtering, using defaults"
        );
        return default_labels();
    }

    info!(count = filtered.len(), "Loaded candidate tags");
    filtered
}

/// Names with count above the threshold, most frequent first.
fn read_ranked_names(path: &Path) -> Result<Vec<String>, String> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| format!("Cannot open candidate tags: {}", e))?;

    let headers = reader
        .headers()
        .map_err(|e| format!("Invalid CSV format: {}", e))?
        .clone();
    if let Some(missing) = REQUIRED_COLUMNS
        .iter()
        .find(|col| !headers.iter().any(|h| h == **col))
    {
        return Err(format!("Invalid CSV format: missing required column '{}'", missing));
    }

    let mut rows = Vec::new();
    for row in reader.deserialize::<CandidateRow>() {
        rows.push(row.map_err(|e| format!("Invalid CSV format: {}", e))?);
    }

    let mut seen_ids = HashSet::new();
    if rows.iter().any(|r| !seen_ids.insert(r.tag_id.as_str())) {
        warn!(path = %path.display(), "Duplicate tag_ids found in candidate tags");
    }
    if rows.iter().any(|r| r.name.is_empty()) {
        warn!(path = %path.display(), "Empty or missing tag names in candidate tags");
    }

    let mut valid: Vec<CandidateRow> = rows
        .into_iter()
        .filter(|r| !r.name.is_empty() && r.count > MIN_TAG_COUNT)
        .collect();
    valid.sort_by(|a, b| b.count.cmp(&a.count));
    Ok(valid.into_iter().map(|r| r.name).collect())
}

/// Lowercased excluded names. Problems with this table only skip exclusions.
fn load_exclusions(path: &Path) -> HashSet<String> {
    if !path.exists() {
        warn!(path = %path.display(), "Exclusions file not found, skipping exclusions");
        return HashSet::new();
    }

    let mut reader = match csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
    {
        Ok(reader) => reader,
        Err(e) => {
            warn!(path = %path.display(), "Failed to read exclusions, skipping: {}", e);
            return HashSet::new();
        }
    };

    let name_col = match reader.headers() {
        Ok(headers) => headers.iter().position(|h| h == "name"),
        Err(e) => {
            warn!(path = %path.display(), "Invalid exclusions CSV, skipping: {}", e);
            return HashSet::new();
        }
    };
    let Some(name_col) = name_col else {
        warn!(path = %path.display(), "No 'name' column in exclusions, skipping");
        return HashSet::new();
    };

    let mut excluded = HashSet::new();
    for record in reader.records() {
        match record {
            Ok(record) => {
                if let Some(name) = record.get(name_col).filter(|n| !n.is_empty()) {
                    excluded.insert(name.to_lowercase());
                }
            }
            Err(e) => {
                warn!(path = %path.display(), "Invalid exclusions CSV, skipping: {}", e);
                return HashSet::new();
            }
        }
    }

    info!(count = excluded.len(), "Loaded excluded tags");
    excluded
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_filters_sorts_and_excludes() {
        let dir = TempDir::new().unwrap();
        let tags = write(
            &dir,
            "selected.csv",
            "tag_id,name,category,count\n\
             1,beach,0,150\n\
             2,Dog,0,900\n\
             3,rare,0,100\n\
             4,,0,5000\n\
             5,sunset,0,300\n",
        );
        let exclusions = write(&dir, "exclusions.csv", "name\ndog\n");

        let labels = load_candidate_labels(&tags, &exclusions);
        assert_eq!(labels, vec!["sunset", "beach"]);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let labels = load_candidate_labels(&dir.path().join("nope.csv"), &dir.path().join("x.csv"));
        assert_eq!(labels.len(), 20);
        assert_eq!(labels[0], "cat");
    }

    #[test]
    fn test_missing_column_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let tags = write(&dir, "selected.csv", "tag_id,name,count\n1,beach,500\n");
        assert_eq!(
            load_candidate_labels(&tags, &dir.path().join("x.csv")).len(),
            DEFAULT_LABELS.len()
        );
    }

    #[test]
    fn test_non_numeric_count_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let tags = write(
            &dir,
            "selected.csv",
            "tag_id,name,category,count\n1,beach,0,lots\n",
        );
        assert_eq!(load_candidate_labels(&tags, &dir.path().join("x.csv"))[0], "cat");
    }

    #[test]
    fn test_everything_excluded_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let tags = write(&dir, "selected.csv", "tag_id,name,category,count\n1,beach,0,500\n");
        let exclusions = write(&dir, "exclusions.csv", "name\nBEACH\n");
        assert_eq!(load_candidate_labels(&tags, &exclusions).len(), 20);
    }

    #[test]
    fn test_truncates_to_fifty() {
        let dir = TempDir::new().unwrap();
        let mut content = String::from("tag_id,name,category,count\n");
        for i in 0..80 {
            content.push_str(&format!("{i},tag{i},0,{}\n", 1000 + i));
        }
        let tags = write(&dir, "selected.csv", &content);

        let labels = load_candidate_labels(&tags, &dir.path().join("x.csv"));
        assert_eq!(labels.len(), MAX_CANDIDATE_LABELS);
        assert_eq!(labels[0], "tag79");
    }
}
