//! The canonical dataset shapes.
//!
//! A [`Dataset`] is the snapshot document served at the well-known path and
//! re-ingested by the export round-trip. The client treats it as read-only;
//! every edit lives in the patch set layered on top (see [`crate::patch`]).

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Identifier for a worker record. Unique across the merged collection;
/// assigned as `max(existing ids) + 1` and never reused while the override
/// store lives.
pub type WorkerId = u32;

/// Photo URL used when a worker is created without one.
pub const PLACEHOLDER_PHOTO_URL: &str =
    "https://images.unsplash.com/photo-1535713875002-d1d0cf377fde?w=300&h=300&fit=crop&crop=face";

/// Company name used by the fallback dataset.
pub const FALLBACK_COMPANY_NAME: &str = "Rostra Directory";

/// A client review attached to a worker record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    /// Person who wrote the review.
    pub author: String,

    /// Organization the author belongs to.
    pub organization: String,

    /// Review body.
    pub text: String,

    /// Star rating, 1 through 5.
    pub stars: u8,

    /// Date the review was left.
    pub date: NaiveDate,
}

impl Review {
    /// Build a review, validating the star rating.
    pub fn new(
        author: impl Into<String>,
        organization: impl Into<String>,
        text: impl Into<String>,
        stars: u8,
        date: NaiveDate,
    ) -> Result<Self> {
        if !(1..=5).contains(&stars) {
            return Err(Error::validation_field(
                "stars",
                format!("star rating must be 1-5, got {stars}"),
            ));
        }
        Ok(Self {
            author: author.into(),
            organization: organization.into(),
            text: text.into(),
            stars,
            date,
        })
    }
}

/// A member of the worker roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerRecord {
    /// Stable unique identifier.
    pub id: WorkerId,

    /// Full name.
    pub name: String,

    /// Role or job title.
    pub role: String,

    /// Area of specialty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,

    /// Free-form tenure description (e.g. "8 years").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenure: Option<String>,

    /// Contact phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Contact email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Profile photo URL. Defaults to [`PLACEHOLDER_PHOTO_URL`].
    #[serde(default = "default_photo_url")]
    pub photo_url: String,

    /// Short biography.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,

    /// Skills. Order is irrelevant; compare via [`WorkerRecord::skill_set`].
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<String>,

    /// Availability description (e.g. "Full time").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability: Option<String>,

    /// Date the worker joined.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joined: Option<NaiveDate>,

    /// Whether the worker's documents have been verified.
    #[serde(default)]
    pub verified: bool,

    /// Whether the worker is featured on the public site.
    #[serde(default)]
    pub featured: bool,

    /// Aggregate rating, derived from `reviews` at write time by the
    /// repository. Zero when there are no reviews.
    #[serde(default)]
    pub rating: f64,

    /// Reviews in insertion order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reviews: Vec<Review>,

    /// Documents checked during verification.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub verified_documents: Vec<String>,
}

fn default_photo_url() -> String {
    PLACEHOLDER_PHOTO_URL.to_string()
}

impl WorkerRecord {
    /// An empty record with the given id, used as the base when a patch
    /// entry has no matching snapshot record.
    pub fn empty(id: WorkerId) -> Self {
        Self {
            id,
            name: String::new(),
            role: String::new(),
            specialty: None,
            tenure: None,
            phone: None,
            email: None,
            photo_url: default_photo_url(),
            bio: None,
            skills: Vec::new(),
            availability: None,
            joined: None,
            verified: false,
            featured: false,
            rating: 0.0,
            reviews: Vec::new(),
            verified_documents: Vec::new(),
        }
    }

    /// Skills as a set, for order-irrelevant comparison.
    pub fn skill_set(&self) -> BTreeSet<&str> {
        self.skills.iter().map(String::as_str).collect()
    }
}

/// Company identity shown across the public site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyInfo {
    /// Display name.
    pub name: String,
}

impl Default for CompanyInfo {
    fn default() -> Self {
        Self {
            name: FALLBACK_COMPANY_NAME.to_string(),
        }
    }
}

/// A service the company offers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceInfo {
    /// Stable service slug.
    pub id: String,

    /// Display name.
    pub name: String,

    /// One-line description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Icon name used by the presentation layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// A company-level testimonial (distinct from per-worker reviews).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Testimonial {
    /// Client organization.
    pub client: String,

    /// Quote body.
    pub text: String,

    /// Person quoted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// The author's role at the client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_role: Option<String>,

    /// Star rating, 1 through 5.
    pub stars: u8,
}

/// The operator credential carried by the snapshot.
///
/// `password_digest` is the lowercase hex SHA-256 of `salt + password`.
/// A locally stored digest override (changed password) supersedes it; the
/// username and salt are never overridden.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// Operator login name, compared case-sensitively.
    #[serde(default)]
    pub username: String,

    /// Salt prepended to the password before hashing.
    #[serde(default)]
    pub salt: String,

    /// Canonical digest from the snapshot.
    #[serde(default)]
    pub password_digest: String,
}

/// The canonical snapshot document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Company identity.
    #[serde(default)]
    pub company: CompanyInfo,

    /// Offered services.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<ServiceInfo>,

    /// The worker roster, in canonical order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub workers: Vec<WorkerRecord>,

    /// Company-level testimonials.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub testimonials: Vec<Testimonial>,

    /// The single operator credential.
    #[serde(default)]
    pub auth: CredentialRecord,
}

impl Dataset {
    /// The documented minimal fallback: empty collections and a placeholder
    /// company name. The system stays renderable with zero records.
    pub fn fallback() -> Self {
        Self::default()
    }

    /// Highest worker id present in the snapshot, or zero when empty.
    pub fn max_worker_id(&self) -> WorkerId {
        self.workers.iter().map(|w| w.id).max().unwrap_or(0)
    }
}
