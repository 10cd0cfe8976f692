//! Wire types exchanged with the server.
//!
//! Field names follow the server's camelCase JSON. Records the client only
//! displays keep unknown fields so nothing is lost on a round trip.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// AUTH
// =============================================================================

/// Access + refresh bearer tokens issued by the server.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl std::fmt::Debug for CredentialPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialPair")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// Current user as returned by the server. Treated as read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Accepts `id` or `_id`, as a string or a number.
    #[serde(default, alias = "_id", deserialize_with = "loose_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Everything else the server sent, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    /// Best human-readable label: name, then email, then id.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .or(self.id.as_deref())
            .unwrap_or("unknown user")
    }
}

fn loose_id<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(id)) => Ok(Some(id)),
        Some(Value::Number(id)) => Ok(Some(id.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!("unsupported user id: {other}"))),
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

/// Body of a successful `POST /api/auth/login`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserProfile,
}

impl LoginResponse {
    #[must_use]
    pub fn credentials(&self) -> CredentialPair {
        CredentialPair {
            access_token: self.access_token.clone(),
            refresh_token: self.refresh_token.clone(),
        }
    }
}

/// Body of a successful `POST /api/auth/register`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

/// Error envelope the server uses for non-success responses.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

// =============================================================================
// MEDIA
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

impl MediaType {
    pub const ALL: [Self; 2] = [Self::Movie, Self::Tv];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Tv => "tv",
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "movie" | "movies" | "film" => Ok(Self::Movie),
            "tv" | "show" | "series" => Ok(Self::Tv),
            other => Err(format!("unknown media type '{other}' (expected 'movie' or 'tv')")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    #[serde(alias = "tmdbId")]
    pub id: i64,
    pub title: String,
    pub media_type: MediaType,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    #[serde(default)]
    pub results: Vec<Media>,
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default = "first_page")]
    pub total_pages: u32,
}

fn first_page() -> u32 {
    1
}

// =============================================================================
// WATCHLIST
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatchStatus {
    PlanToWatch,
    Watching,
    Completed,
    OnHold,
    Dropped,
}

impl WatchStatus {
    /// Display order used when grouping.
    pub const ALL: [Self; 5] = [Self::PlanToWatch, Self::Watching, Self::Completed, Self::OnHold, Self::Dropped];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PlanToWatch => "plan_to_watch",
            Self::Watching => "watching",
            Self::Completed => "completed",
            Self::OnHold => "on_hold",
            Self::Dropped => "dropped",
        }
    }

    /// Statuses reachable from `self` in one step.
    #[must_use]
    pub fn next(self) -> &'static [Self] {
        match self {
            Self::PlanToWatch => &[Self::Watching, Self::Dropped],
            Self::Watching => &[Self::Completed, Self::OnHold, Self::Dropped],
            Self::OnHold => &[Self::Watching, Self::Dropped],
            Self::Dropped => &[Self::PlanToWatch, Self::Watching],
            // Rewatch.
            Self::Completed => &[Self::Watching],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, to: Self) -> bool {
        self.next().contains(&to)
    }
}

impl std::fmt::Display for WatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WatchStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| format!("unknown watch status '{s}'"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistItem {
    #[serde(alias = "_id")]
    pub id: String,
    pub media_id: i64,
    pub media_type: MediaType,
    pub title: String,
    pub status: WatchStatus,
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub added_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWatchlistItem {
    pub media_id: i64,
    pub media_type: MediaType,
    pub title: String,
    pub status: WatchStatus,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<WatchStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

// =============================================================================
// REVIEWS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(alias = "_id")]
    pub id: String,
    pub media_id: i64,
    pub media_type: MediaType,
    pub rating: u8,
    pub content: String,
    #[serde(default)]
    pub user: Option<UserProfile>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub media_id: i64,
    pub media_type: MediaType,
    pub rating: u8,
    pub content: String,
}

// =============================================================================
// FRIENDS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Friend {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendActivity {
    pub user: Friend,
    pub action: String,
    pub media_title: String,
    pub media_type: MediaType,
    #[serde(default)]
    pub status: Option<WatchStatus>,
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
