//! Local artifact store.
//!
//! This crate provides:
//! - Canonical artifact paths and public URLs
//! - Cache-state queries (`CacheState`) with a disk-backed and an in-memory implementation
//! - Source video inventory
//! - Orphan artifact cleanup
//! - Cache clear with timestamped backup
//! - The CSV tag index

pub mod backup;
pub mod cache;
pub mod error;
pub mod inventory;
pub mod layout;
pub mod orphans;
pub mod tag_index;

pub use backup::{backup_stamp, clear_cache};
pub use cache::{CacheState, MemoryCache};
pub use error::{StorageError, StorageResult};
pub use inventory::{scan_videos, SourceVideo, VIDEO_EXTENSIONS};
pub use layout::ArtifactLayout;
pub use orphans::{cleanup_orphans, OrphanReport};
pub use tag_index::{prune_entries, TagIndex, MIN_TAG_COLUMNS};
