//! CSV tag index.
//!
//! Header: `media_id,media_type,tag1..tagN` with `N = max(20, tags per item)`.
//! Rows are padded with empty cells; readers accept ragged rows.

use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{StorageError, StorageResult};
use vprev_models::{MediaType, TagEntry, GIF_MEDIA_PREFIX};

/// Minimum number of tag columns in the header.
pub const MIN_TAG_COLUMNS: usize = 20;

/// Handle to the persisted tag table.
#[derive(Debug, Clone)]
pub struct TagIndex {
    path: PathBuf,
    tag_columns: usize,
}

impl TagIndex {
    pub fn new(path: impl Into<PathBuf>, tags_per_item: usize) -> Self {
        Self {
            path: path.into(),
            tag_columns: tags_per_item.max(MIN_TAG_COLUMNS),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn tag_columns(&self) -> usize {
        self.tag_columns
    }

    fn header(&self, columns: usize) -> Vec<String> {
        let mut header = vec!["media_id".to_string(), "media_type".to_string()];
        header.extend((1..=columns).map(|i| format!("tag{}", i)));
        header
    }

    fn row(entry: &TagEntry, columns: usize) -> Vec<String> {
        let mut row = Vec::with_capacity(columns + 2);
        row.push(entry.media_id.clone());
        row.push(entry.media_type.to_string());
        row.extend(entry.tags.iter().take(columns).cloned());
        row.resize(columns + 2, String::new());
        row
    }

    /// Read all entries. A missing file is an empty index.
    pub fn load(&self) -> StorageResult<Vec<TagEntry>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "Tag index does not exist yet");
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .has_headers(true)
            .from_path(&self.path)?;

        let headers = reader.headers()?;
        if headers.get(0).map(str::trim) != Some("media_id") {
            return Err(StorageError::invalid_table(
                &self.path,
                "first column must be media_id",
            ));
        }

        let mut entries = Vec::new();
        for record in reader.records() {
            let record = record?;
            let media_id = record.get(0).unwrap_or_default().trim();
            if media_id.is_empty() {
                continue;
            }
            let media_type = record
                .get(1)
                .and_then(|t| t.parse::<MediaType>().ok())
                .unwrap_or_else(|| {
                    warn!(media_id, "Unknown media type in tag index, inferring from id");
                    if media_id.starts_with(GIF_MEDIA_PREFIX) {
                        MediaType::Gif
                    } else {
                        MediaType::Video
                    }
                });
            let tags = record
                .iter()
                .skip(2)
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect();
            entries.push(TagEntry {
                media_id: media_id.to_string(),
                media_type,
                tags,
            });
        }

        debug!(path = %self.path.display(), count = entries.len(), "Loaded tag index");
        Ok(entries)
    }

    /// Add one row, writing the header first if the file is new or empty.
    pub fn append(&self, entry: &TagEntry) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let needs_header = file.metadata()?.len() == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_writer(file);
        if needs_header {
            writer.write_record(self.header(self.tag_columns))?;
        }
        writer.write_record(Self::row(entry, self.tag_columns))?;
        writer.flush()?;

        debug!(media_id = %entry.media_id, "Appended tag entry");
        Ok(())
    }

    /// Replace the whole table.
    pub fn rewrite(&self, entries: &[TagEntry]) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let columns = entries
            .iter()
            .map(|e| e.tags.len())
            .max()
            .unwrap_or(0)
            .max(self.tag_columns);

        let tmp = self.path.with_extension("csv.tmp");
        {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_path(&tmp)?;
            writer.write_record(self.header(columns))?;
            for entry in entries {
                writer.write_record(Self::row(entry, columns))?;
            }
            writer.flush()?;
        }
        fs::rename(&tmp, &self.path)?;

        info!(path = %self.path.display(), count = entries.len(), "Wrote tag index");
        Ok(())
    }

    /// Drop entries whose media id is not live and persist the result if
    /// anything was removed.
    pub fn prune(&self, live: &HashSet<String>) -> StorageResult<Vec<TagEntry>> {
        let entries = self.load()?;
        let before = entries.len();
        let survivors = prune_entries(entries, live);
        if survivors.len() != before {
            self.rewrite(&survivors)?;
        }
        Ok(survivors)
    }
}

/// Keep entries whose media id is in `live`, logging each removal.
pub fn prune_entries(entries: Vec<TagEntry>, live: &HashSet<String>) -> Vec<TagEntry> {
    entries
        .into_iter()
        .filter(|entry| {
            let keep = live.contains(&entry.media_id);
            if !keep {
                info!(media_id = %entry.media_id, "Pruned orphan tag entry");
            }
            keep
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use vprev_models::VideoId;

    fn entry(id: &str, tags: &[&str]) -> TagEntry {
        TagEntry::video(
            &VideoId::from(id),
            tags.iter().map(|t| t.to_string()).collect(),
        )
    }

    #[test]
    fn test_load_missing_is_empty() {
        let dir = TempDir::new().unwrap();
        let index = TagIndex::new(dir.path().join("tags.csv"), 15);
        assert!(index.load().unwrap().is_empty());
    }

    #[test]
    fn test_append_writes_header_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/tags.csv");
        let index = TagIndex::new(&path, 15);

        index.append(&entry("a", &["cat", "dog"])).unwrap();
        index
            .append(&TagEntry::gif(&VideoId::from("a"), vec!["cat".to_string()]))
            .unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("media_id,media_type,tag1,"));
        assert!(lines[0].ends_with(",tag20"));
        assert!(lines[1].starts_with("a,video,cat,dog,"));
        assert_eq!(lines[1].split(',').count(), 22);

        let loaded = index.load().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].tags, vec!["cat", "dog"]);
        assert_eq!(loaded[1].media_id, "gif_a");
        assert_eq!(loaded[1].media_type, MediaType::Gif);
    }

    #[test]
    fn test_header_widens_for_large_k() {
        let dir = TempDir::new().unwrap();
        let index = TagIndex::new(dir.path().join("tags.csv"), 25);
        assert_eq!(index.tag_columns(), 25);
        index.rewrite(&[entry("a", &["x"])]).unwrap();
        let text = fs::read_to_string(index.path()).unwrap();
        assert!(text.lines().next().unwrap().ends_with(",tag25"));
    }

    #[test]
    fn test_prune_rewrites_table() {
        let dir = TempDir::new().unwrap();
        let index = TagIndex::new(dir.path().join("tags.csv"), 15);
        index
            .rewrite(&[entry("a", &["cat"]), entry("b", &["dog"]), entry("c", &[])])
            .unwrap();

        let live: HashSet<String> = ["a".to_string(), "c".to_string()].into_iter().collect();
        let survivors = index.prune(&live).unwrap();

        let ids: Vec<&str> = survivors.iter().map(|e| e.media_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(index.load().unwrap().len(), 2);
    }

    #[test]
    fn test_rejects_foreign_table() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tags.csv");
        fs::write(&path, "tag_id,name\n1,cat\n").unwrap();
        assert!(matches!(
            TagIndex::new(&path, 15).load(),
            Err(StorageError::InvalidTable { .. })
        ));
    }
}
