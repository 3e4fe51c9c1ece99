//! Document types, their create bodies (drafts) and partial-update bodies (patches)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{new_id, Collection, ContentStore, Document, DocumentSet, Editable};
use crate::auth::{constant_time_compare, hash_password};
use crate::errors::{Result, ValidationErrorExt};
use crate::validation::{self, MAX_TEXT_LENGTH, MAX_TITLE_LENGTH};

/// Treat blank optional strings as absent
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn trimmed(value: String) -> String {
    value.trim().to_string()
}

// =============================================================================
// Projects
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProjectDraft {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub github: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub github: Option<String>,
}

impl Project {
    fn validate(&self) -> Result<()> {
        validation::validate_required(&self.title, MAX_TITLE_LENGTH).map_validation_err("title")?;
        validation::validate_text(&self.description, MAX_TEXT_LENGTH)
            .map_validation_err("description")?;
        validation::validate_tags(&self.tags).map_validation_err("tags")?;
        if let Some(github) = &self.github {
            validation::validate_url(github).map_validation_err("github")?;
        }
        Ok(())
    }
}

impl Document for Project {
    type Draft = ProjectDraft;
    const COLLECTION: Collection = Collection::Projects;

    fn create(draft: ProjectDraft) -> Result<Self> {
        let now = Utc::now();
        let project = Self {
            id: new_id(),
            title: trimmed(draft.title),
            description: trimmed(draft.description),
            tags: draft.tags.into_iter().map(trimmed).collect(),
            github: non_blank(draft.github),
            created_at: now,
            updated_at: now,
        };
        project.validate()?;
        Ok(project)
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn display_title(&self) -> &str {
        &self.title
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn documents(store: &ContentStore) -> &DocumentSet<Self> {
        &store.projects
    }
}

impl Editable for Project {
    type Patch = ProjectPatch;

    fn apply(&mut self, patch: ProjectPatch) -> Result<()> {
        let mut next = self.clone();
        if let Some(title) = patch.title {
            next.title = trimmed(title);
        }
        if let Some(description) = patch.description {
            next.description = trimmed(description);
        }
        if let Some(tags) = patch.tags {
            next.tags = tags.into_iter().map(trimmed).collect();
        }
        if patch.github.is_some() {
            next.github = non_blank(patch.github);
        }
        next.validate()?;
        next.updated_at = Utc::now();
        *self = next;
        Ok(())
    }
}

// =============================================================================
// Events
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    pub id: String,
    pub title: String,
    /// Display date as entered, e.g. "2025-03-14"
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub venue: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EventDraft {
    pub title: String,
    pub date: String,
    pub time: String,
    pub venue: String,
    pub description: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EventPatch {
    pub title: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub venue: Option<String>,
    pub description: Option<String>,
}

impl Event {
    fn validate(&self) -> Result<()> {
        validation::validate_required(&self.title, MAX_TITLE_LENGTH).map_validation_err("title")?;
        validation::validate_text(&self.date, MAX_TITLE_LENGTH).map_validation_err("date")?;
        validation::validate_text(&self.time, MAX_TITLE_LENGTH).map_validation_err("time")?;
        validation::validate_text(&self.venue, MAX_TITLE_LENGTH).map_validation_err("venue")?;
        validation::validate_text(&self.description, MAX_TEXT_LENGTH)
            .map_validation_err("description")
    }
}

impl Document for Event {
    type Draft = EventDraft;
    const COLLECTION: Collection = Collection::Events;

    fn create(draft: EventDraft) -> Result<Self> {
        let now = Utc::now();
        let event = Self {
            id: new_id(),
            title: trimmed(draft.title),
            date: trimmed(draft.date),
            time: trimmed(draft.time),
            venue: trimmed(draft.venue),
            description: trimmed(draft.description),
            created_at: now,
            updated_at: now,
        };
        event.validate()?;
        Ok(event)
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn display_title(&self) -> &str {
        &self.title
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn documents(store: &ContentStore) -> &DocumentSet<Self> {
        &store.events
    }
}

impl Editable for Event {
    type Patch = EventPatch;

    fn apply(&mut self, patch: EventPatch) -> Result<()> {
        let mut next = self.clone();
        if let Some(title) = patch.title {
            next.title = trimmed(title);
        }
        if let Some(date) = patch.date {
            next.date = trimmed(date);
        }
        if let Some(time) = patch.time {
            next.time = trimmed(time);
        }
        if let Some(venue) = patch.venue {
            next.venue = trimmed(venue);
        }
        if let Some(description) = patch.description {
            next.description = trimmed(description);
        }
        next.validate()?;
        next.updated_at = Utc::now();
        *self = next;
        Ok(())
    }
}

// =============================================================================
// Team
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamMember {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub role: String,
    /// Portrait URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TeamDraft {
    pub name: String,
    pub role: String,
    pub image: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TeamPatch {
    pub name: Option<String>,
    pub role: Option<String>,
    pub image: Option<String>,
}

impl TeamMember {
    fn validate(&self) -> Result<()> {
        validation::validate_required(&self.name, MAX_TITLE_LENGTH).map_validation_err("name")?;
        validation::validate_text(&self.role, MAX_TITLE_LENGTH).map_validation_err("role")?;
        if let Some(image) = &self.image {
            validation::validate_url(image).map_validation_err("image")?;
        }
        Ok(())
    }
}

impl Document for TeamMember {
    type Draft = TeamDraft;
    const COLLECTION: Collection = Collection::Team;

    fn create(draft: TeamDraft) -> Result<Self> {
        let now = Utc::now();
        let member = Self {
            id: new_id(),
            name: trimmed(draft.name),
            role: trimmed(draft.role),
            image: non_blank(draft.image),
            created_at: now,
            updated_at: now,
        };
        member.validate()?;
        Ok(member)
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn display_title(&self) -> &str {
        &self.name
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn documents(store: &ContentStore) -> &DocumentSet<Self> {
        &store.team
    }
}

impl Editable for TeamMember {
    type Patch = TeamPatch;

    fn apply(&mut self, patch: TeamPatch) -> Result<()> {
        let mut next = self.clone();
        if let Some(name) = patch.name {
            next.name = trimmed(name);
        }
        if let Some(role) = patch.role {
            next.role = trimmed(role);
        }
        if patch.image.is_some() {
            next.image = non_blank(patch.image);
        }
        next.validate()?;
        next.updated_at = Utc::now();
        *self = next;
        Ok(())
    }
}

// =============================================================================
// Gallery
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GalleryImage {
    pub id: String,
    /// Image URL
    pub src: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default)]
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GalleryDraft {
    pub src: String,
    pub alt: String,
    pub title: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GalleryPatch {
    pub src: Option<String>,
    pub alt: Option<String>,
    pub title: Option<String>,
}

impl GalleryImage {
    fn validate(&self) -> Result<()> {
        validation::validate_required(&self.src, validation::MAX_URL_LENGTH)
            .and_then(|_| validation::validate_url(&self.src))
            .map_validation_err("src")?;
        validation::validate_text(&self.alt, MAX_TITLE_LENGTH).map_validation_err("alt")?;
        validation::validate_text(&self.title, MAX_TITLE_LENGTH).map_validation_err("title")
    }
}

impl Document for GalleryImage {
    type Draft = GalleryDraft;
    const COLLECTION: Collection = Collection::Gallery;

    fn create(draft: GalleryDraft) -> Result<Self> {
        let now = Utc::now();
        let image = Self {
            id: new_id(),
            src: trimmed(draft.src),
            alt: trimmed(draft.alt),
            title: trimmed(draft.title),
            created_at: now,
            updated_at: now,
        };
        image.validate()?;
        Ok(image)
    }

    fn id(&self) -> &str {
        &self.id
    }

    /// Title, or the alt text for untitled images
    fn display_title(&self) -> &str {
        if self.title.is_empty() {
            &self.alt
        } else {
            &self.title
        }
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn documents(store: &ContentStore) -> &DocumentSet<Self> {
        &store.gallery
    }
}

impl Editable for GalleryImage {
    type Patch = GalleryPatch;

    fn apply(&mut self, patch: GalleryPatch) -> Result<()> {
        let mut next = self.clone();
        if let Some(src) = patch.src {
            next.src = trimmed(src);
        }
        if let Some(alt) = patch.alt {
            next.alt = trimmed(alt);
        }
        if let Some(title) = patch.title {
            next.title = trimmed(title);
        }
        next.validate()?;
        next.updated_at = Utc::now();
        *self = next;
        Ok(())
    }
}

// =============================================================================
// Feedback form responses
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FormResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FormDraft {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl Document for FormResponse {
    type Draft = FormDraft;
    const COLLECTION: Collection = Collection::Forms;

    fn create(draft: FormDraft) -> Result<Self> {
        let name = trimmed(draft.name);
        let email = trimmed(draft.email);
        let message = trimmed(draft.message);

        validation::validate_required(&name, MAX_TITLE_LENGTH).map_validation_err("name")?;
        validation::validate_required(&email, validation::MAX_EMAIL_LENGTH)
            .and_then(|_| validation::validate_email(&email))
            .map_validation_err("email")?;
        validation::validate_required(&message, MAX_TEXT_LENGTH).map_validation_err("message")?;

        let now = Utc::now();
        Ok(Self {
            id: new_id(),
            name,
            email,
            message,
            created_at: now,
            updated_at: now,
        })
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn display_title(&self) -> &str {
        &self.name
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn documents(store: &ContentStore) -> &DocumentSet<Self> {
        &store.forms
    }
}

// =============================================================================
// Admin accounts
// =============================================================================

/// Admin account as persisted. Never serialized into an API response.
#[derive(Clone, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub salt: String,
    pub created_at: DateTime<Utc>,
}

impl std::fmt::Debug for AdminUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminUser")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

impl AdminUser {
    /// Validate credentials and hash the password under a fresh salt.
    pub fn new(username: &str, password: &str) -> Result<Self> {
        let username = username.trim();
        validation::validate_username(username).map_validation_err("username")?;
        validation::validate_password(password).map_validation_err("password")?;

        let salt = uuid::Uuid::new_v4().simple().to_string();
        Ok(Self {
            id: new_id(),
            username: username.to_string(),
            password_hash: hash_password(password, &salt),
            salt,
            created_at: Utc::now(),
        })
    }

    pub fn verify_password(&self, password: &str) -> bool {
        constant_time_compare(&hash_password(password, &self.salt), &self.password_hash)
    }
}
