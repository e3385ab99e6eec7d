//! Endpoint templates and path resolution.
//!
//! A template is a `/`-separated list of segments. A segment starting with
//! `:` is a placeholder; a trailing `?` on its name makes it optional. A
//! missing optional placeholder drops its segment entirely, a supplied one is
//! spliced into the path like any required placeholder.

use crate::error::{Result, ScryfallError};
use crate::http::HttpMethod;
use crate::params::Params;

const PLACEHOLDER_PREFIX: char = ':';
const OPTIONAL_MARKER: char = '?';

/// A fixed endpoint: HTTP method plus path template. Defined as constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub method: HttpMethod,
    pub template: &'static str,
}

impl Endpoint {
    pub const fn get(template: &'static str) -> Self {
        Self {
            method: HttpMethod::Get,
            template,
        }
    }

    pub const fn post(template: &'static str) -> Self {
        Self {
            method: HttpMethod::Post,
            template,
        }
    }

    pub fn resolve(&self, params: &Params) -> Result<String> {
        resolve_path(self.template, params)
    }

    pub fn segments<'a>(&self, params: &'a Params) -> Result<Vec<&'a str>> {
        resolve_segments(self.template, params)
    }
}

/// Substitute `params` into `template`.
///
/// The result never has a leading or trailing `/`. Values are inserted
/// verbatim; `Client::build_request` percent-encodes them per segment.
pub fn resolve_path(template: &str, params: &Params) -> Result<String> {
    Ok(resolve_segments(template, params)?.join("/"))
}

/// The resolved path as individual segments, one per template segment that
/// survives. A value containing `/` stays a single segment.
pub fn resolve_segments<'a>(template: &'a str, params: &'a Params) -> Result<Vec<&'a str>> {
    let trimmed = template.trim_matches('/');
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let mut segments = Vec::new();
    for segment in trimmed.split('/') {
        let Some(name) = segment.strip_prefix(PLACEHOLDER_PREFIX) else {
            segments.push(segment);
            continue;
        };
        let (name, optional) = match name.strip_suffix(OPTIONAL_MARKER) {
            Some(stripped) => (stripped, true),
            None => (name, false),
        };
        match params.get(name) {
            Some(value) => segments.push(value),
            None if optional => {}
            None => {
                return Err(ScryfallError::MissingParameter {
                    name: name.to_string(),
                })
            }
        }
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_template_is_unchanged() {
        assert_eq!(resolve_path("cards/random", &Params::new()).unwrap(), "cards/random");
    }

    #[test]
    fn leading_and_trailing_separators_are_stripped() {
        assert_eq!(resolve_path("/sets/", &Params::new()).unwrap(), "sets");
    }

    #[test]
    fn optional_placeholder_omitted() {
        let params = Params::new().with("code", "m21").with("number", "123");
        let path = resolve_path("cards/:code/:number/:lang?", &params).unwrap();
        assert_eq!(path, "cards/m21/123");
    }

    #[test]
    fn optional_placeholder_spliced_when_supplied() {
        let params = Params::new().with("code", "m21").with("number", "123").with("lang", "ja");
        let path = resolve_path("cards/:code/:number/:lang?", &params).unwrap();
        assert_eq!(path, "cards/m21/123/ja");
    }

    #[test]
    fn missing_required_names_the_parameter() {
        let err = resolve_path("cards/:id", &Params::new()).unwrap_err();
        match err {
            ScryfallError::MissingParameter { name } => assert_eq!(name, "id"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn optional_in_the_middle_leaves_no_gap() {
        let params = Params::new().with("id", "42");
        let path = resolve_path("cards/:kind?/:id/rulings", &params).unwrap();
        assert_eq!(path, "cards/42/rulings");
    }

    #[test]
    fn unused_params_are_ignored() {
        let params = Params::new().with("id", "abc").with("extra", "x");
        assert_eq!(resolve_path("cards/:id", &params).unwrap(), "cards/abc");
    }

    #[test]
    fn segments_keep_slashes_inside_values() {
        let params = Params::new().with("code", "a/b").with("number", "1");
        let segments = resolve_segments("cards/:code/:number", &params).unwrap();
        assert_eq!(segments, ["cards", "a/b", "1"]);
    }

    #[test]
    fn resolved_path_has_no_placeholder_syntax() {
        let params = Params::new().with("code", "khm").with("number", "1").with("lang", "en");
        let path = Endpoint::get("cards/:code/:number/:lang?").resolve(&params).unwrap();
        assert!(!path.contains(':'));
        assert!(!path.contains('?'));
    }
}
