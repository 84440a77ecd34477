//! URL helpers for image references.
//!
//! [URL Standard](https://url.spec.whatwg.org/)

/// Whether `reference` is an absolute `http://` or `https://` URL the output
/// engine can fetch on its own. The scheme is matched case-insensitively.
#[must_use]
pub fn is_remote(reference: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        reference
            .get(..scheme.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(scheme))
    })
}

/// Whether `reference` is a `data:` URL.
#[must_use]
pub fn is_data_url(reference: &str) -> bool {
    reference
        .get(..5)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:"))
}

/// Local filesystem path of a `file:` URL, percent-decoded.
///
/// [RFC 8089 § 2](https://www.rfc-editor.org/rfc/rfc8089#section-2):
/// `file://host/path`, `file:///path` and `file:/path` all name `path`; a
/// non-empty host other than `localhost` is kept as a UNC-style prefix.
/// Returns `None` for references that are not `file:` URLs.
#[must_use]
pub fn file_url_path(reference: &str) -> Option<String> {
    let rest = reference
        .get(..5)
        .filter(|scheme| scheme.eq_ignore_ascii_case("file:"))
        .map(|_| &reference[5..])?;

    let path = match rest.strip_prefix("//") {
        Some(authority_and_path) => {
            let split = authority_and_path.find('/').unwrap_or(authority_and_path.len());
            let (host, path) = authority_and_path.split_at(split);
            if host.is_empty() || host.eq_ignore_ascii_case("localhost") {
                path.to_string()
            } else {
                format!("//{host}{path}")
            }
        }
        None => rest.to_string(),
    };

    let path = path.split(['?', '#']).next().unwrap_or_default();
    Some(urlencoding::decode(path).map_or_else(|_| path.to_string(), |p| p.into_owned()))
}

/// Resolve a potentially relative reference against a base URL.
///
/// # Algorithm
///
/// STEP 1: "If url is an absolute URL, return url."
///
/// STEP 2: "Otherwise, resolve url relative to base."
///
/// NOTE: This is a simplified implementation covering protocol-relative
/// references, absolute paths and plain relative paths.
#[must_use]
pub fn resolve_url(href: &str, base_url: Option<&str>) -> String {
    // STEP 1: Check if href is already absolute.
    //
    // [URL Standard § 4.3](https://url.spec.whatwg.org/#url-parsing)
    // "An absolute-URL string is a URL-scheme string, followed by U+003A (:),
    // followed by a scheme-specific part."
    if href.starts_with("http://")
        || href.starts_with("https://")
        || is_data_url(href)
        || href.starts_with("file:")
    {
        return href.to_string();
    }

    // STEP 2: Resolve relative URL against base.
    let Some(base) = base_url else {
        return href.to_string();
    };

    if href.starts_with("//") {
        // Protocol-relative URL - prepend scheme from base
        if base.starts_with("https:") {
            format!("https:{href}")
        } else {
            format!("http:{href}")
        }
    } else if href.starts_with('/') {
        // Absolute path - join with the origin of base
        base.find("://").map_or_else(
            || href.to_string(),
            |scheme_end| {
                let after_scheme = &base[scheme_end + 3..];
                after_scheme.find('/').map_or_else(
                    || format!("{base}{href}"),
                    |path_start| {
                        let origin = &base[..scheme_end + 3 + path_start];
                        format!("{origin}{href}")
                    },
                )
            },
        )
    } else {
        // Relative path - join with base directory
        let base_dir = base.rsplit_once('/').map_or(base, |(dir, _)| dir);
        format!("{base_dir}/{href}")
    }
}
