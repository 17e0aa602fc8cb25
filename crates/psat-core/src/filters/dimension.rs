//! Filter dimensions and how a cookie resolves to a value in each.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{Error, Result};
use crate::psl::get_etld1;
use crate::types::{CookieAnalytics, CookieRecord, Party};
use crate::url::extract_host;

/// Label for cookies without a known category.
pub const UNCATEGORISED: &str = "Uncategorised";

/// A classification dimension the panel can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub enum FilterKey {
    Category,
    Platform,
    Party,
    HeaderType,
    Domain,
    Retention,
    DataController,
    SameSite,
    Secure,
    HttpOnly,
}

impl FilterKey {
    /// All dimensions, in the order the catalog emits them.
    pub const ALL: [FilterKey; 10] = [
        Self::Category,
        Self::Platform,
        Self::Party,
        Self::HeaderType,
        Self::Domain,
        Self::Retention,
        Self::DataController,
        Self::SameSite,
        Self::Secure,
        Self::HttpOnly,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Platform => "platform",
            Self::Party => "party",
            Self::HeaderType => "headerType",
            Self::Domain => "domain",
            Self::Retention => "retention",
            Self::DataController => "dataController",
            Self::SameSite => "sameSite",
            Self::Secure => "secure",
            Self::HttpOnly => "httpOnly",
        }
    }

    /// Human-readable heading for the filter list.
    pub fn title(self) -> &'static str {
        match self {
            Self::Category => "Category",
            Self::Platform => "Platform",
            Self::Party => "Scope",
            Self::HeaderType => "Set Via",
            Self::Domain => "Domain",
            Self::Retention => "Retention Period",
            Self::DataController => "Data Controller",
            Self::SameSite => "SameSite",
            Self::Secure => "Secure",
            Self::HttpOnly => "HttpOnly",
        }
    }

    /// Value of this dimension for a cookie, or `None` when the cookie has none.
    ///
    /// Category always resolves: a missing or blank category is
    /// [`UNCATEGORISED`], regardless of other analytics fields.
    pub fn value_of<'c>(self, cookie: &'c CookieRecord, site: &SiteContext) -> Option<Cow<'c, str>> {
        match self {
            Self::Category => Some(
                analytics_value(cookie, |a| a.category.as_str())
                    .unwrap_or(Cow::Borrowed(UNCATEGORISED)),
            ),
            Self::Platform => analytics_value(cookie, |a| a.platform.as_str()),
            Self::Retention => analytics_value(cookie, |a| a.retention.as_str()),
            Self::DataController => analytics_value(cookie, |a| a.data_controller.as_str()),
            Self::Party => site.party_of(cookie).map(|party| Cow::Borrowed(party.label())),
            Self::HeaderType => Some(Cow::Borrowed(cookie.header_type.label())),
            Self::Domain => non_empty(&cookie.parsed_cookie.domain),
            Self::SameSite => non_empty(&cookie.parsed_cookie.samesite),
            Self::Secure => Some(Cow::Borrowed(bool_label(cookie.parsed_cookie.secure))),
            Self::HttpOnly => Some(Cow::Borrowed(bool_label(cookie.parsed_cookie.httponly))),
        }
    }

    /// Parse a `key=value` pair as given on a command line.
    pub fn parse_selection(pair: &str) -> Result<(FilterKey, String)> {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| Error::InvalidFilterSelection(pair.to_string()))?;
        let value = value.trim();
        if value.is_empty() {
            return Err(Error::InvalidFilterSelection(pair.to_string()));
        }
        Ok((key.trim().parse()?, value.to_string()))
    }
}

fn analytics_value<'c>(
    cookie: &'c CookieRecord,
    field: impl Fn(&'c CookieAnalytics) -> &'c str,
) -> Option<Cow<'c, str>> {
    cookie.known_analytics().and_then(|a| non_empty(field(a)))
}

fn non_empty(value: &str) -> Option<Cow<'_, str>> {
    let value = value.trim();
    (!value.is_empty()).then_some(Cow::Borrowed(value))
}

fn bool_label(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownFilterKey(s.to_string()))
    }
}

// =============================================================================
// Site Context
// =============================================================================

/// What the party dimension compares cookies against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteContext {
    site_etld1: Option<String>,
}

impl SiteContext {
    pub fn from_tab_url(tab_url: Option<&str>) -> Self {
        let site_etld1 = tab_url
            .and_then(extract_host)
            .filter(|host| !host.is_empty())
            .map(get_etld1);
        Self { site_etld1 }
    }

    pub fn site_etld1(&self) -> Option<&str> {
        self.site_etld1.as_deref()
    }

    /// `None` when either the tab or the cookie has no host.
    pub fn party_of(&self, cookie: &CookieRecord) -> Option<Party> {
        let site = self.site_etld1.as_deref()?;
        let host = cookie.host()?;
        if get_etld1(host) == site {
            Some(Party::FirstParty)
        } else {
            Some(Party::ThirdParty)
        }
    }
}
