//! Route pattern generation for registered resources.
//!
//! Every resource gets exactly four patterns, generated mechanically from its
//! name at registration time and never mutated afterward: collection,
//! collection-with-extension, instance, instance-with-extension. The
//! extension alternatives are concrete (one axum route per registered
//! extension token), so a request like `/api.rb` simply matches nothing and
//! falls through to 404.
//!
//! Instance paths share one axum route whose trailing segment is parsed here:
//! `{id}` or `{id}.{ext}`. The id is an opaque string handed unchanged to the
//! capability; a trailing dot-token is split off only when it names a
//! registered extension, otherwise the whole match fails (the deliberate
//! "extension present but invalid" 404).

use std::sync::Arc;

use crate::encoding::Encoder;

/// The four URL patterns generated for one resource.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteSet {
    /// `{prefix}/{name}`
    pub collection: String,
    /// `{prefix}/{name}.{ext}`, one concrete path per registered extension.
    pub collection_extensions: Vec<String>,
    /// `{prefix}/{name}/{id}` (axum pattern; the id segment is opaque).
    pub instance: String,
    /// `{prefix}/{name}/{id}.{ext}`, described as a display pattern; matching
    /// happens through [`parse_instance_tail`] on the instance route.
    pub instance_extension: String,
}

impl RouteSet {
    /// Generate the route set for a resource.
    #[must_use]
    pub fn for_resource(prefix: &str, name: &str, extensions: &[&str]) -> Self {
        let collection = format!("{prefix}/{name}");
        RouteSet {
            collection_extensions: extensions
                .iter()
                .map(|ext| format!("{collection}.{ext}"))
                .collect(),
            instance: format!("{collection}/{{id}}"),
            instance_extension: format!("{collection}/{{id}}.{{ext}}"),
            collection,
        }
    }
}

/// Split an instance-route trailing segment into id and optional extension.
///
/// Returns `None` when the segment cannot match any instance pattern for the
/// given encoder sequence: empty id, or a dot-suffix that is not a registered
/// extension token.
#[must_use]
pub fn parse_instance_tail<'a>(
    tail: &'a str,
    encoders: &[Arc<dyn Encoder>],
) -> Option<(&'a str, Option<&'a str>)> {
    if tail.is_empty() {
        return None;
    }
    match tail.rsplit_once('.') {
        Some((id, ext)) => {
            if id.is_empty() || !encoders.iter().any(|e| e.extension() == ext) {
                return None;
            }
            Some((id, Some(ext)))
        }
        None => Some((tail, None)),
    }
}

/// Build the instance URL for a `Location` header.
///
/// Carries an extension only when one drove negotiation for the request.
#[must_use]
pub fn instance_location(prefix: &str, name: &str, id: &str, extension: Option<&str>) -> String {
    match extension {
        Some(ext) => format!("{prefix}/{name}/{id}.{ext}"),
        None => format!("{prefix}/{name}/{id}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::{JsonEncoder, JsonpEncoder};

    fn encoders() -> Vec<Arc<dyn Encoder>> {
        vec![Arc::new(JsonEncoder), Arc::new(JsonpEncoder::default())]
    }

    // ========== RouteSet Tests ==========

    #[test]
    fn test_route_set_patterns() {
        let routes = RouteSet::for_resource("", "api", &["json", "js"]);
        assert_eq!(routes.collection, "/api");
        assert_eq!(routes.collection_extensions, vec!["/api.json", "/api.js"]);
        assert_eq!(routes.instance, "/api/{id}");
        assert_eq!(routes.instance_extension, "/api/{id}.{ext}");
    }

    #[test]
    fn test_route_set_with_prefix() {
        let routes = RouteSet::for_resource("/v1", "comments", &["json"]);
        assert_eq!(routes.collection, "/v1/comments");
        assert_eq!(routes.instance, "/v1/comments/{id}");
    }

    // ========== Instance Tail Tests ==========

    #[test]
    fn test_tail_plain_id() {
        let encoders = encoders();
        assert_eq!(parse_instance_tail("1", &encoders), Some(("1", None)));
    }

    #[test]
    fn test_tail_id_with_known_extension() {
        let encoders = encoders();
        assert_eq!(
            parse_instance_tail("1.json", &encoders),
            Some(("1", Some("json")))
        );
    }

    #[test]
    fn test_tail_unknown_extension_fails_match() {
        let encoders = encoders();
        assert_eq!(parse_instance_tail("1.rb", &encoders), None);
    }

    #[test]
    fn test_tail_empty_id_fails_match() {
        let encoders = encoders();
        assert_eq!(parse_instance_tail("", &encoders), None);
        assert_eq!(parse_instance_tail(".json", &encoders), None);
    }

    #[test]
    fn test_tail_opaque_id_is_untouched() {
        let encoders = encoders();
        assert_eq!(
            parse_instance_tail("abc-123", &encoders),
            Some(("abc-123", None))
        );
    }

    // ========== Location Tests ==========

    #[test]
    fn test_instance_location_without_extension() {
        assert_eq!(instance_location("", "api", "10", None), "/api/10");
    }

    #[test]
    fn test_instance_location_with_extension() {
        assert_eq!(
            instance_location("", "api", "10", Some("xml")),
            "/api/10.xml"
        );
    }

    #[test]
    fn test_instance_location_with_prefix() {
        assert_eq!(
            instance_location("/v1", "api", "3", None),
            "/v1/api/3"
        );
    }
}
