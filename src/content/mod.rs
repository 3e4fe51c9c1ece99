//! Site content: documents, the document store, and demo seed data
//!
//! Every collection shown on the public site (projects, events, team, gallery)
//! plus feedback form responses and admin accounts lives here.

pub mod documents;
pub mod seed;
pub mod store;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

use crate::errors::Result;

pub use documents::{
    AdminUser, Event, EventDraft, EventPatch, FormDraft, FormResponse, GalleryDraft,
    GalleryImage, GalleryPatch, Project, ProjectDraft, ProjectPatch, TeamDraft, TeamMember,
    TeamPatch,
};
pub use store::{ContentCounts, ContentStore, DocumentSet, Snapshot};

/// Named collections in the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Projects,
    Events,
    Team,
    Gallery,
    Forms,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Projects => "projects",
            Self::Events => "events",
            Self::Team => "team",
            Self::Gallery => "gallery",
            Self::Forms => "forms",
        }
    }

    /// Human label used in envelope messages ("Projects fetched.")
    pub fn label(&self) -> &'static str {
        match self {
            Self::Projects => "Project",
            Self::Events => "Event",
            Self::Team => "Team member",
            Self::Gallery => "Gallery image",
            Self::Forms => "Response",
        }
    }

    pub fn plural_label(&self) -> &'static str {
        match self {
            Self::Projects => "Projects",
            Self::Events => "Events",
            Self::Team => "Team members",
            Self::Gallery => "Gallery images",
            Self::Forms => "Responses",
        }
    }
}

/// A stored document with server-assigned identity and timestamps.
pub trait Document: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Body accepted on create
    type Draft: DeserializeOwned + Send + 'static;

    const COLLECTION: Collection;

    /// Validate a draft and stamp a fresh id and timestamps.
    fn create(draft: Self::Draft) -> Result<Self>;

    fn id(&self) -> &str;

    /// Title or name shown on the card
    fn display_title(&self) -> &str;

    fn created_at(&self) -> DateTime<Utc>;

    /// The set holding this document type.
    fn documents(store: &ContentStore) -> &DocumentSet<Self>;

    /// Key for gradient assignment: the id, or the title before one exists.
    fn gradient_key(&self) -> &str {
        if self.id().is_empty() {
            self.display_title()
        } else {
            self.id()
        }
    }
}

/// Documents the admin surface can edit in place.
pub trait Editable: Document {
    /// Partial update body; absent fields are left unchanged
    type Patch: DeserializeOwned + Send + 'static;

    /// Validate and apply a patch, bumping `updated_at`. Leaves `self`
    /// untouched on error.
    fn apply(&mut self, patch: Self::Patch) -> Result<()>;
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
