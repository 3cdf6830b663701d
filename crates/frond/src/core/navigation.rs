//! Outbound navigation: search redirects and download proxying.

use std::{borrow::Cow, sync::LazyLock};

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::{Url, form_urlencoded};

use crate::error::{Error, Result};

/// Bytes `encodeURIComponent` escapes: everything but ASCII alphanumerics
/// and `-_.!~*'()`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Markup tags.
static TAGS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tags regex"));

/// A deployment environment recognised by hostname.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    /// Hostname this entry applies to.
    pub hostname: String,
    /// Path prefix the site is served under.
    pub base_path: String,
    /// Pattern whose first capture is the region segment.
    pub region_pattern: String,
}

/// Search redirect configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Known non-production deployments.
    pub deployments: Vec<Deployment>,
    /// Region pattern for any other host.
    pub default_region_pattern: String,
    /// Region slugs that may prefix the search path.
    pub regions: Vec<String>,
    /// Path of the results page, appended after the region.
    pub results_path: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            deployments: vec![
                Deployment {
                    hostname: "localhost".into(),
                    base_path: "/tata-chemicals/dist".into(),
                    region_pattern: r"/dist/([^/]+)".into(),
                },
                Deployment {
                    hostname: "bdcdev.in".into(),
                    base_path: "/work/tata-chemicals.com/latest".into(),
                    region_pattern: r"/latest/([^/]+)".into(),
                },
            ],
            default_region_pattern: r"^/([^/]+)".into(),
            regions: vec!["north-america".into(), "kenya".into(), "europe".into()],
            results_path: "/global-search".into(),
        }
    }
}

/// Percent-encode a string the way `encodeURIComponent` does.
pub fn encode_uri_component(s: &str) -> String {
    utf8_percent_encode(s, URI_COMPONENT).to_string()
}

/// Decode percent escapes. Input with a malformed escape, or that does not
/// decode to UTF-8, is returned unchanged.
pub fn decode_uri_component(s: &str) -> String {
    let well_formed = s
        .split('%')
        .skip(1)
        .all(|seg| seg.as_bytes().get(..2).is_some_and(|h| h.iter().all(u8::is_ascii_hexdigit)));
    if !well_formed {
        return s.to_string();
    }
    percent_decode_str(s)
        .decode_utf8()
        .map_or_else(|_| s.to_string(), Cow::into_owned)
}

/// Strip markup from a string, keeping its text content.
pub fn strip_tags(s: &str) -> String {
    TAGS.replace_all(s, "")
        .replace("&nbsp;", "\u{a0}")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Clean a raw search query: trim, decode escapes, strip markup. Returns
/// None when nothing searchable remains.
pub fn clean_query(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let cleaned = strip_tags(&decode_uri_component(raw)).trim().to_string();
    (!cleaned.is_empty()).then_some(cleaned)
}

/// Build the search results URL for a cleaned query from the current
/// location.
pub fn search_url(location: &Url, query: &str, cfg: &SearchConfig) -> Result<String> {
    let host = location.host_str().unwrap_or_default();
    let (base, pattern) = cfg
        .deployments
        .iter()
        .find(|d| d.hostname == host)
        .map_or(("", cfg.default_region_pattern.as_str()), |d| {
            (d.base_path.as_str(), d.region_pattern.as_str())
        });
    let re = Regex::new(pattern).map_err(|e| Error::Config(e.to_string()))?;
    let region = re
        .captures(location.path())
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .filter(|r| cfg.regions.iter().any(|a| a == r));
    let region_path = region.map(|r| format!("/{r}")).unwrap_or_default();
    let params = form_urlencoded::Serializer::new(String::new())
        .append_pair("search", query)
        .finish();
    Ok(format!(
        "{}{base}{region_path}{}?{params}",
        location.origin().ascii_serialization(),
        cfg.results_path
    ))
}

/// For a clicked download link, the proxy URL to open instead, or None when
/// the browser should handle the download itself (same origin or a
/// non-http scheme).
pub fn download_proxy_url(
    location: &Url,
    href: &str,
    download_attr: Option<&str>,
    base_path: &str,
    proxy_path: &str,
) -> Result<Option<String>> {
    let url = location.join(href)?.to_string();
    let origin = location.origin().ascii_serialization();
    let same_origin =
        url.starts_with(&origin) || !(url.starts_with("http://") || url.starts_with("https://"));
    if same_origin {
        return Ok(None);
    }
    let filename = download_attr
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .or_else(|| {
            url.rsplit('/')
                .next()
                .and_then(|seg| seg.split('?').next())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| "file".to_string());
    Ok(Some(format!(
        "{origin}{base_path}{proxy_path}?url={}&filename={}",
        encode_uri_component(&url),
        encode_uri_component(&filename)
    )))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn query_cleaning() {
        assert_eq!(clean_query("   "), None);
        assert_eq!(clean_query("<b></b>"), None);
        assert_eq!(clean_query(" soda%20ash "), Some("soda ash".into()));
        assert_eq!(clean_query("<i>salt</i> &amp; more"), Some("salt & more".into()));
        assert_eq!(clean_query("100%"), Some("100%".into()));
    }

    #[test]
    fn uri_components() {
        assert_eq!(encode_uri_component("a b!~*'()-_.é/?"), "a%20b!~*'()-_.%C3%A9%2F%3F");
        assert_eq!(decode_uri_component("caf%C3%A9%20au%2Flait"), "café au/lait");
        assert_eq!(decode_uri_component("caf%c3%a9"), "café");
        assert_eq!(decode_uri_component("50%25%"), "50%25%");
        assert_eq!(decode_uri_component("%zz%20"), "%zz%20");
        assert_eq!(decode_uri_component("%FF"), "%FF");
    }

    #[test]
    fn search_urls() -> Result<()> {
        let cfg = SearchConfig::default();
        let loc = Url::parse("https://www.example.com/kenya/products")?;
        assert_eq!(
            search_url(&loc, "soda ash", &cfg)?,
            "https://www.example.com/kenya/global-search?search=soda+ash"
        );
        let loc = Url::parse("https://www.example.com/india/products")?;
        assert_eq!(
            search_url(&loc, "x", &cfg)?,
            "https://www.example.com/global-search?search=x"
        );
        let loc = Url::parse("http://localhost:3000/tata-chemicals/dist/europe/a.html")?;
        assert_eq!(
            search_url(&loc, "a&b", &cfg)?,
            "http://localhost:3000/tata-chemicals/dist/europe/global-search?search=a%26b"
        );
        let loc = Url::parse("https://bdcdev.in/work/tata-chemicals.com/latest/index.html")?;
        assert_eq!(
            search_url(&loc, "q", &cfg)?,
            "https://bdcdev.in/work/tata-chemicals.com/latest/global-search?search=q"
        );
        Ok(())
    }

    #[test]
    fn download_proxy() -> Result<()> {
        let loc = Url::parse("https://www.example.com/reports")?;
        let proxy = "/api/download-file.php";
        assert_eq!(download_proxy_url(&loc, "/files/a.pdf", None, "", proxy)?, None);
        assert_eq!(download_proxy_url(&loc, "mailto:x@y.z", None, "", proxy)?, None);
        assert_eq!(
            download_proxy_url(&loc, "https://cdn.example.net/r/a%20b.pdf?v=1", None, "", proxy)?,
            Some(
                "https://www.example.com/api/download-file.php?url=https%3A%2F%2Fcdn.example.net%2Fr%2Fa%2520b.pdf%3Fv%3D1&filename=a%2520b.pdf"
                    .into()
            )
        );
        assert_eq!(
            download_proxy_url(
                &loc,
                "https://cdn.example.net/",
                Some("Annual Report.pdf"),
                "/site",
                proxy
            )?,
            Some(
                "https://www.example.com/site/api/download-file.php?url=https%3A%2F%2Fcdn.example.net%2F&filename=Annual%20Report.pdf"
                    .into()
            )
        );
        let fallback = download_proxy_url(&loc, "https://cdn.example.net/", None, "", proxy)?;
        assert!(fallback.is_some_and(|u| u.ends_with("filename=file")));
        Ok(())
    }
}
