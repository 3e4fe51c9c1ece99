//! In-process document store with a JSON snapshot on disk
//!
//! Each collection is a concurrent map keyed by document id. Mutations mark
//! the store dirty; `flush` writes `site.json` atomically (temp file + rename)
//! and is driven by the server's periodic flush task and by shutdown.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tracing::{debug, info, warn};

use super::{
    AdminUser, Document, Editable, Event, FormResponse, GalleryImage, Project, TeamMember,
};
use crate::constants::{SNAPSHOT_FILE_NAME, SNAPSHOT_VERSION};
use crate::errors::{AppError, Result as AppResult};
use crate::metrics;
use crate::validation;

/// One collection. Insertion sequence breaks `created_at` ties so listing
/// order is stable.
pub struct DocumentSet<D> {
    docs: DashMap<String, (u64, D)>,
    seq: AtomicU64,
}

impl<D> Default for DocumentSet<D> {
    fn default() -> Self {
        Self {
            docs: DashMap::new(),
            seq: AtomicU64::new(0),
        }
    }
}

impl<D: Document> DocumentSet<D> {
    /// Newest first
    pub fn list(&self) -> Vec<D> {
        let mut entries: Vec<(u64, D)> = self
            .docs
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        entries.sort_by(|(seq_a, a), (seq_b, b)| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| seq_b.cmp(seq_a))
        });
        entries.into_iter().map(|(_, doc)| doc).collect()
    }

    pub fn get(&self, id: &str) -> Option<D> {
        self.docs.get(id).map(|entry| entry.value().1.clone())
    }

    pub fn insert(&self, doc: D) {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        self.docs.insert(doc.id().to_string(), (seq, doc));
    }

    pub fn remove(&self, id: &str) -> Option<D> {
        self.docs.remove(id).map(|(_, (_, doc))| doc)
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn clear(&self) {
        self.docs.clear();
    }

    /// Load documents listed newest first, preserving that order.
    fn load(&self, docs: Vec<D>) {
        for doc in docs.into_iter().rev() {
            self.insert(doc);
        }
    }
}

impl<D: Editable> DocumentSet<D> {
    fn update(&self, id: &str, patch: D::Patch) -> Option<AppResult<D>> {
        let mut entry = self.docs.get_mut(id)?;
        let doc = &mut entry.value_mut().1;
        Some(doc.apply(patch).map(|()| doc.clone()))
    }
}

/// Per-collection document counts for the admin dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentCounts {
    pub projects: usize,
    pub events: usize,
    pub team: usize,
    pub gallery: usize,
    pub forms: usize,
    pub admins: usize,
}

/// On-disk form of the whole store
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub version: u32,
    pub saved_at: Option<DateTime<Utc>>,
    pub projects: Vec<Project>,
    pub events: Vec<Event>,
    pub team: Vec<TeamMember>,
    pub gallery: Vec<GalleryImage>,
    pub forms: Vec<FormResponse>,
    pub admins: Vec<AdminUser>,
}

pub struct ContentStore {
    pub(crate) projects: DocumentSet<Project>,
    pub(crate) events: DocumentSet<Event>,
    pub(crate) team: DocumentSet<TeamMember>,
    pub(crate) gallery: DocumentSet<GalleryImage>,
    pub(crate) forms: DocumentSet<FormResponse>,

    /// Admin accounts keyed by username
    admins: DashMap<String, AdminUser>,

    /// Snapshot file; `None` for a purely in-memory store
    snapshot_path: Option<PathBuf>,

    dirty: AtomicBool,

    /// Serializes concurrent flushes onto the same temp file
    flush_lock: parking_lot::Mutex<()>,
}

impl ContentStore {
    /// Store with no snapshot file
    pub fn in_memory() -> Self {
        Self {
            projects: DocumentSet::default(),
            events: DocumentSet::default(),
            team: DocumentSet::default(),
            gallery: DocumentSet::default(),
            forms: DocumentSet::default(),
            admins: DashMap::new(),
            snapshot_path: None,
            dirty: AtomicBool::new(false),
            flush_lock: parking_lot::Mutex::new(()),
        }
    }

    /// Open the store under `dir`, loading `site.json` if present.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create storage directory {}", dir.display()))?;

        let path = dir.join(SNAPSHOT_FILE_NAME);
        let mut store = Self::in_memory();

        if path.exists() {
            let raw = std::fs::read(&path)
                .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
            let snapshot: Snapshot = serde_json::from_slice(&raw)
                .with_context(|| format!("Corrupt snapshot {}", path.display()))?;
            if snapshot.version > SNAPSHOT_VERSION {
                warn!(
                    "Snapshot version {} is newer than supported version {}",
                    snapshot.version, SNAPSHOT_VERSION
                );
            }
            store.restore(snapshot);
            let counts = store.counts();
            info!(
                "Loaded snapshot {}: {} projects, {} events, {} team, {} gallery, {} forms, {} admins",
                path.display(),
                counts.projects,
                counts.events,
                counts.team,
                counts.gallery,
                counts.forms,
                counts.admins
            );
        } else {
            info!("No snapshot at {}, starting empty", path.display());
        }

        store.snapshot_path = Some(path);
        store.record_all_counts();
        Ok(store)
    }

    fn restore(&self, snapshot: Snapshot) {
        self.projects.load(snapshot.projects);
        self.events.load(snapshot.events);
        self.team.load(snapshot.team);
        self.gallery.load(snapshot.gallery);
        self.forms.load(snapshot.forms);
        for admin in snapshot.admins {
            self.admins.insert(admin.username.clone(), admin);
        }
    }

    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot_path.as_deref()
    }

    // =========================================================================
    // Documents
    // =========================================================================

    pub fn list<D: Document>(&self) -> Vec<D> {
        D::documents(self).list()
    }

    pub fn get<D: Document>(&self, id: &str) -> AppResult<D> {
        check_id(id)?;
        D::documents(self)
            .get(id)
            .ok_or_else(|| AppError::not_found(D::COLLECTION, id))
    }

    /// Validate a draft and insert the new document.
    pub fn create<D: Document>(&self, draft: D::Draft) -> AppResult<D> {
        let doc = D::create(draft)?;
        self.insert(doc.clone());
        debug!(collection = D::COLLECTION.as_str(), id = doc.id(), "Created document");
        Ok(doc)
    }

    /// Insert an already-built document.
    pub fn insert<D: Document>(&self, doc: D) {
        D::documents(self).insert(doc);
        self.touched::<D>();
    }

    pub fn update<D: Editable>(&self, id: &str, patch: D::Patch) -> AppResult<D> {
        check_id(id)?;
        let updated = D::documents(self)
            .update(id, patch)
            .ok_or_else(|| AppError::not_found(D::COLLECTION, id))??;
        self.mark_dirty();
        debug!(collection = D::COLLECTION.as_str(), id, "Updated document");
        Ok(updated)
    }

    pub fn delete<D: Document>(&self, id: &str) -> AppResult<D> {
        check_id(id)?;
        let removed = D::documents(self)
            .remove(id)
            .ok_or_else(|| AppError::not_found(D::COLLECTION, id))?;
        self.touched::<D>();
        debug!(collection = D::COLLECTION.as_str(), id, "Deleted document");
        Ok(removed)
    }

    /// Empty the public collections. Feedback responses and admin accounts
    /// are kept.
    pub fn clear_content(&self) {
        self.projects.clear();
        self.events.clear();
        self.team.clear();
        self.gallery.clear();
        self.mark_dirty();
        self.record_all_counts();
    }

    /// True when none of the public collections hold anything
    pub fn is_content_empty(&self) -> bool {
        self.projects.is_empty()
            && self.events.is_empty()
            && self.team.is_empty()
            && self.gallery.is_empty()
    }

    // =========================================================================
    // Admins
    // =========================================================================

    pub fn find_admin(&self, username: &str) -> Option<AdminUser> {
        self.admins.get(username).map(|entry| entry.value().clone())
    }

    /// Insert unless the username is taken. Returns whether it was inserted.
    pub fn insert_admin(&self, admin: AdminUser) -> bool {
        match self.admins.entry(admin.username.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => false,
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(admin);
                self.mark_dirty();
                true
            }
        }
    }

    pub fn admin_count(&self) -> usize {
        self.admins.len()
    }

    // =========================================================================
    // Snapshot
    // =========================================================================

    pub fn counts(&self) -> ContentCounts {
        ContentCounts {
            projects: self.projects.len(),
            events: self.events.len(),
            team: self.team.len(),
            gallery: self.gallery.len(),
            forms: self.forms.len(),
            admins: self.admins.len(),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            version: SNAPSHOT_VERSION,
            saved_at: Some(Utc::now()),
            projects: self.projects.list(),
            events: self.events.list(),
            team: self.team.list(),
            gallery: self.gallery.list(),
            forms: self.forms.list(),
            admins: self
                .admins
                .iter()
                .map(|entry| entry.value().clone())
                .collect(),
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::Release);
    }

    /// Write the snapshot if anything changed since the last flush.
    ///
    /// Returns whether a file was written. On failure the store stays dirty
    /// so the next flush retries.
    pub fn flush(&self) -> Result<bool> {
        let Some(path) = self.snapshot_path.as_deref() else {
            return Ok(false);
        };

        let _guard = self.flush_lock.lock();
        if !self.dirty.swap(false, Ordering::AcqRel) {
            return Ok(false);
        }

        let result = write_snapshot(path, &self.snapshot());
        if result.is_err() {
            self.mark_dirty();
        }
        result.map(|()| true)
    }

    fn touched<D: Document>(&self) {
        self.mark_dirty();
        record_count(D::COLLECTION.as_str(), D::documents(self).len());
    }

    fn record_all_counts(&self) {
        let counts = self.counts();
        record_count("projects", counts.projects);
        record_count("events", counts.events);
        record_count("team", counts.team);
        record_count("gallery", counts.gallery);
        record_count("forms", counts.forms);
    }
}

fn check_id(id: &str) -> AppResult<()> {
    validation::validate_id(id)
        .map(|_| ())
        .map_err(|e| AppError::InvalidId(e.to_string()))
}

fn record_count(collection: &str, len: usize) {
    metrics::DOCUMENTS_BY_COLLECTION
        .with_label_values(&[collection])
        .set(len as i64);
}

fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(snapshot).context("Failed to serialize snapshot")?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, bytes)
        .with_context(|| format!("Failed to write snapshot {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("Failed to move snapshot into place at {}", path.display()))?;
    debug!("Snapshot written to {}", path.display());
    Ok(())
}
