//! Core type definitions for PSAT
//!
//! These types mirror the JSON the extension's cookie store hands to the
//! DevTools panel, and are shared by every stage of the filtering pipeline.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::error::{Error, Result};
use crate::url::extract_host;

// =============================================================================
// Parsed Cookie
// =============================================================================

/// Cookie attributes as parsed from a `Set-Cookie`/`Cookie` header or storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default)]
pub struct ParsedCookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    pub samesite: String,
    pub secure: bool,
    pub httponly: bool,
    pub expires: String,
}

// =============================================================================
// Analytics Classification
// =============================================================================

/// Known-cookie classification from the open cookie database.
///
/// An all-empty value is what the store attaches to cookies it could not match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default, rename_all = "camelCase")]
pub struct CookieAnalytics {
    pub platform: String,
    pub category: String,
    pub name: String,
    pub domain: String,
    pub description: String,
    pub retention: String,
    pub data_controller: String,
    pub gdpr_url: String,
    pub wildcard: String,
}

impl CookieAnalytics {
    /// True when no field carries a value.
    pub fn is_empty(&self) -> bool {
        [
            &self.platform,
            &self.category,
            &self.name,
            &self.domain,
            &self.description,
            &self.retention,
            &self.data_controller,
            &self.gdpr_url,
            &self.wildcard,
        ]
        .iter()
        .all(|field| field.trim().is_empty())
    }
}

// =============================================================================
// Header Type
// =============================================================================

/// Which side of the exchange the cookie was observed on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
pub enum HeaderType {
    Request,
    #[default]
    Response,
}

impl HeaderType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Request => "Request",
            Self::Response => "Response",
        }
    }
}

// =============================================================================
// Frame Identifiers
// =============================================================================

/// Browser-assigned id of one document instance.
///
/// The extension stores these as numbers, some fixtures as strings; both decode.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, TS)]
pub struct FrameId(pub String);

impl FrameId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FrameId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<i64> for FrameId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for FrameId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(i64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(text) => Self(text),
            Raw::Number(number) => Self::from(number),
        })
    }
}

/// Frame ids recorded for one frame key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default, rename_all = "camelCase")]
pub struct FrameInfo {
    pub frame_ids: Option<Vec<FrameId>>,
}

/// Frame key -> frame ids.
pub type TabFrames = IndexMap<String, FrameInfo>;

// =============================================================================
// Cookie Record
// =============================================================================

/// One observed cookie, keyed by name in the tab's cookie map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct CookieRecord {
    pub parsed_cookie: ParsedCookie,
    #[serde(default)]
    pub analytics: Option<CookieAnalytics>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub header_type: HeaderType,
    #[serde(default)]
    pub frame_id_list: Option<Vec<FrameId>>,
}

impl CookieRecord {
    pub fn name(&self) -> &str {
        &self.parsed_cookie.name
    }

    /// Analytics, treating an all-empty classification as absent.
    pub fn known_analytics(&self) -> Option<&CookieAnalytics> {
        self.analytics.as_ref().filter(|analytics| !analytics.is_empty())
    }

    /// Host the cookie belongs to: its `Domain` attribute without the leading
    /// dot, or the host of the URL it was observed on.
    pub fn host(&self) -> Option<&str> {
        let domain = self.parsed_cookie.domain.trim().trim_start_matches('.');
        if !domain.is_empty() {
            return Some(domain);
        }
        extract_host(&self.url).filter(|host| !host.is_empty())
    }
}

/// Cookie name -> record, in the order the store observed them.
pub type CookieMap = IndexMap<String, Arc<CookieRecord>>;

// =============================================================================
// Tab State
// =============================================================================

/// Everything the panel consumes from the extension's cookie store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(default, rename_all = "camelCase")]
pub struct TabState {
    pub tab_cookies: CookieMap,
    pub tab_url: Option<String>,
    pub selected_frame: Option<String>,
    pub tab_frames: TabFrames,
}

impl TabState {
    /// Decode a tab state exported by the cookie store.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

// =============================================================================
// Party
// =============================================================================

/// First-party / third-party classification relative to the tab's site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
pub enum Party {
    #[serde(rename = "First Party")]
    FirstParty,
    #[serde(rename = "Third Party")]
    ThirdParty,
}

impl Party {
    pub fn label(self) -> &'static str {
        match self {
            Self::FirstParty => "First Party",
            Self::ThirdParty => "Third Party",
        }
    }
}

// =============================================================================
// Privacy Sandbox APIs
// =============================================================================

/// Privacy Sandbox APIs the panel has info cards for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
pub enum PsApiKey {
    PrivateStateToken,
    Topics,
    ProtectedAudience,
    AttributionReporting,
    FirstPartySets,
    SharedStorage,
    Chips,
    FencedFrames,
    Fedcm,
    BounceTracking,
    UserAgentReduction,
}

impl PsApiKey {
    pub const ALL: [PsApiKey; 11] = [
        Self::PrivateStateToken,
        Self::Topics,
        Self::ProtectedAudience,
        Self::AttributionReporting,
        Self::FirstPartySets,
        Self::SharedStorage,
        Self::Chips,
        Self::FencedFrames,
        Self::Fedcm,
        Self::BounceTracking,
        Self::UserAgentReduction,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::PrivateStateToken => "private-state-token",
            Self::Topics => "topics",
            Self::ProtectedAudience => "protected-audience",
            Self::AttributionReporting => "attribution-reporting",
            Self::FirstPartySets => "first-party-sets",
            Self::SharedStorage => "shared-storage",
            Self::Chips => "chips",
            Self::FencedFrames => "fenced-frames",
            Self::Fedcm => "fedcm",
            Self::BounceTracking => "bounce-tracking",
            Self::UserAgentReduction => "user-agent-reduction",
        }
    }
}

impl fmt::Display for PsApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PsApiKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| Error::UnknownApiKey(s.to_string()))
    }
}
