use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::sync::LazyLock;
use strum::{Display, EnumIter, EnumString};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Minimum number of characters in a user name
pub const NAME_MIN_CHARS: usize = 3;

/// http(s) URL ending in an image extension, or an inline base64 image
static IMAGE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(https?://.*\.(?:png|jpg|jpeg|gif|svg|bmp|webp)|data:image/(?:png|jpg|jpeg|gif|svg|bmp|webp);base64,.*)$",
    )
    .unwrap()
});

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::new("required").with_message(Cow::Borrowed("Name required")));
    }
    if name.chars().count() < NAME_MIN_CHARS {
        return Err(ValidationError::new("too_short").with_message(Cow::Owned(format!(
            "The name must have at least {} characters",
            NAME_MIN_CHARS
        ))));
    }
    Ok(())
}

fn validate_image_url(url: &str) -> Result<(), ValidationError> {
    if url.is_empty() {
        return Err(ValidationError::new("required").with_message(Cow::Borrowed("Image required")));
    }
    if !IMAGE_URL.is_match(url) {
        return Err(ValidationError::new("invalid_image_url").with_message(Cow::Borrowed("Invalid Url")));
    }
    Ok(())
}

/// Companies a user can belong to
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Company {
    Reliance,
    Opportunity,
    #[serde(rename = "Hire you")]
    #[strum(serialize = "Hire you")]
    HireYou,
}

/// Job roles
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Role {
    #[serde(rename = "UI Designer")]
    #[strum(serialize = "UI Designer")]
    UiDesigner,
    #[serde(rename = "Hr Manager")]
    #[strum(serialize = "Hr Manager")]
    HrManager,
    Leader,
    Developer,
}

/// Account status
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Status {
    #[default]
    Active,
    Banned,
    Idle,
}

/// User entity, serialized exactly as stored under the collection key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier (hyphenated UUID for records created here)
    pub id: String,
    pub name: String,
    /// http(s) image URL or `data:image/...;base64,` payload
    pub image_url: String,
    pub company: Company,
    pub role: Role,
    #[serde(default)]
    pub verified: bool,
    pub status: Status,
}

/// Payload for creating or replacing a user; everything but the id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserInput {
    #[validate(custom(function = "validate_name"))]
    pub name: String,
    #[validate(custom(function = "validate_image_url"))]
    pub image_url: String,
    pub company: Company,
    pub role: Role,
    #[serde(default)]
    pub verified: bool,
    pub status: Status,
}

impl User {
    /// Create a user with a fresh v4 id (validation is the service's job)
    pub fn new(input: UserInput) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), input)
    }

    /// Build a user with a known id, replacing every other field from `input`
    ///
    /// `name` and `image_url` are stored with surrounding whitespace trimmed.
    pub fn with_id(id: impl Into<String>, input: UserInput) -> Self {
        Self {
            id: id.into(),
            name: input.name.trim().to_string(),
            image_url: input.image_url.trim().to_string(),
            company: input.company,
            role: input.role,
            verified: input.verified,
            status: input.status,
        }
    }

    /// The editable fields of this user, e.g. to prefill an edit
    pub fn to_input(&self) -> UserInput {
        UserInput {
            name: self.name.clone(),
            image_url: self.image_url.clone(),
            company: self.company,
            role: self.role,
            verified: self.verified,
            status: self.status,
        }
    }
}
