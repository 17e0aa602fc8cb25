//! URL slicing helpers
//!
//! These functions avoid allocations and work directly on string slices.

// =============================================================================
// Scheme
// =============================================================================

/// Get the position after "://".
#[inline]
pub fn get_scheme_end(url: &str) -> Option<usize> {
    let bytes = url.as_bytes();

    let colon_pos = bytes.iter().position(|&b| b == b':')?;

    if bytes.len() > colon_pos + 2
        && bytes[colon_pos + 1] == b'/'
        && bytes[colon_pos + 2] == b'/'
    {
        return Some(colon_pos + 3);
    }

    None
}

// =============================================================================
// Host Extraction
// =============================================================================

/// Get the start and end positions of the hostname in a URL.
#[inline]
pub fn get_host_position(url: &str) -> Option<(usize, usize)> {
    let scheme_end = get_scheme_end(url)?;
    let bytes = url.as_bytes();

    // Skip userinfo
    let mut host_start = scheme_end;
    for (i, &b) in bytes.iter().enumerate().skip(scheme_end) {
        if b == b'@' {
            host_start = i + 1;
            break;
        }
        if b == b'/' {
            break;
        }
    }

    let mut host_end = bytes.len();
    for (i, &b) in bytes.iter().enumerate().skip(host_start) {
        if b == b'/' || b == b'?' || b == b'#' || b == b':' {
            host_end = i;
            break;
        }
    }

    Some((host_start, host_end))
}

/// Host slice of a URL, without port or userinfo.
#[inline]
pub fn extract_host(url: &str) -> Option<&str> {
    let url = url.trim();
    let (host_start, host_end) = get_host_position(url)?;
    Some(&url[host_start..host_end])
}

/// Strip one leading `www.` label.
#[inline]
pub fn strip_www(host: &str) -> &str {
    match host.get(..4) {
        Some(prefix) if prefix.eq_ignore_ascii_case("www.") => &host[4..],
        _ => host,
    }
}

/// Whether two URLs point at the same host once `www.` is ignored.
///
/// URLs without a host never match.
pub fn same_host_ignoring_www(a: &str, b: &str) -> bool {
    match (extract_host(a), extract_host(b)) {
        (Some(a), Some(b)) if !a.is_empty() && !b.is_empty() => {
            strip_www(a).eq_ignore_ascii_case(strip_www(b))
        }
        _ => false,
    }
}
