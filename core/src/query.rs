//! Query-string construction.
//!
//! Every request carries `format`, `face`, `version` and `pretty`. Caller
//! values override these defaults; everything else the caller passes is
//! appended verbatim. Pairs are encoded in name order so the same logical
//! query always produces the same string.

use url::form_urlencoded;

use crate::params::Params;

/// The parameters sent on every request unless the caller overrides them.
pub fn default_query() -> Params {
    Params::new()
        .with("format", "json")
        .with("face", "")
        .with("version", "")
        .with("pretty", "")
}

/// Merge `defaults` with `params` (caller wins).
pub fn merge_query(defaults: &Params, params: &Params) -> Params {
    defaults.merged(params)
}

/// Merge and URL-encode. Empty values are kept as `name=`.
pub fn build_query(defaults: &Params, params: &Params) -> String {
    encode_query(&merge_query(defaults, params))
}

pub fn encode_query(params: &Params) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (name, value) in params.iter() {
        serializer.append_pair(name, value);
    }
    serializer.finish()
}
