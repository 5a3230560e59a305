//! Content negotiation: one deterministic encoder per request.
//!
//! Response-encoder selection reconciles four competing signals, in strict
//! priority order (first matching rule wins):
//!
//! 1. URL path extension, matched exactly against registered extension tokens
//!    (the route layer has already rejected unknown extensions with 404);
//! 2. the callback override parameter, when an encoder declares
//!    [`Encoder::supports_callback`];
//! 3. the `Accept` header, parsed into quality-sorted media ranges;
//! 4. the first registered encoder (the default).
//!
//! An unsatisfiable or unparseable `Accept` value is not an error: selection
//! degrades to the default encoder and the request proceeds with 200. This is
//! the deliberate asymmetry with path extensions, where an unknown token
//! fails the route match itself.
//!
//! Request-decoder selection is simpler: exact `Content-Type` match, with the
//! first registered encoder as fallback.

use std::sync::Arc;

use tracing::trace;

use crate::encoding::Encoder;

/// The per-request signals negotiation reconciles.
#[derive(Clone, Debug, Default)]
pub struct NegotiationContext {
    /// Extension token from the URL path, already validated by the route
    /// match.
    pub extension: Option<String>,
    /// Value of the callback override query parameter.
    pub callback: Option<String>,
    /// Raw `Accept` header value.
    pub accept: Option<String>,
}

/// One entry of an `Accept` header.
#[derive(Clone, Debug, PartialEq)]
pub struct MediaRange {
    /// Lowercased `type/subtype`, possibly wildcarded.
    pub media_type: String,
    /// Quality value; 1.0 when absent or unparseable.
    pub quality: f32,
}

/// Parse an `Accept` header into media ranges sorted by descending quality.
///
/// The sort is stable: among ranges of equal quality the one listed first in
/// the header wins. Entries without a parseable `type/subtype` shape are
/// skipped; a malformed `q` parameter falls back to 1.0 rather than
/// discarding the range.
#[must_use]
pub fn parse_accept(header: &str) -> Vec<MediaRange> {
    let mut ranges: Vec<MediaRange> = header
        .split(',')
        .filter_map(parse_media_range)
        .collect();
    ranges.sort_by(|a, b| b.quality.total_cmp(&a.quality));
    ranges
}

fn parse_media_range(entry: &str) -> Option<MediaRange> {
    let mut parts = entry.split(';');
    let media_type = parts.next()?.trim().to_ascii_lowercase();
    if media_type.is_empty() || !media_type.contains('/') {
        return None;
    }
    let mut quality = 1.0_f32;
    for param in parts {
        if let Some((name, value)) = param.split_once('=') {
            if name.trim().eq_ignore_ascii_case("q") {
                quality = value.trim().parse().unwrap_or(1.0);
            }
        }
    }
    Some(MediaRange {
        media_type,
        quality,
    })
}

/// Choose the response encoder for a request.
///
/// `encoders` is the resource's registered sequence and must be non-empty
/// (the registry enforces this); its order defines the default and all
/// tie-breaks.
#[must_use]
pub fn select_encoder<'a>(
    encoders: &'a [Arc<dyn Encoder>],
    ctx: &NegotiationContext,
) -> &'a dyn Encoder {
    debug_assert!(!encoders.is_empty());

    if let Some(ext) = &ctx.extension {
        if let Some(encoder) = encoders.iter().find(|e| e.extension() == ext) {
            trace!(extension = %ext, mime = encoder.mime_type(), "encoder chosen by extension");
            return encoder.as_ref();
        }
    }

    if ctx.callback.is_some() {
        if let Some(encoder) = encoders.iter().find(|e| e.supports_callback()) {
            trace!(mime = encoder.mime_type(), "encoder chosen by callback override");
            return encoder.as_ref();
        }
    }

    if let Some(accept) = &ctx.accept {
        for range in parse_accept(accept) {
            if range.media_type == "*/*" {
                return encoders[0].as_ref();
            }
            if let Some(major) = range.media_type.strip_suffix("/*") {
                if let Some(encoder) = encoders
                    .iter()
                    .find(|e| e.mime_type().split('/').next() == Some(major))
                {
                    return encoder.as_ref();
                }
                continue;
            }
            if let Some(encoder) = encoders
                .iter()
                .find(|e| e.mime_type().eq_ignore_ascii_case(&range.media_type))
            {
                trace!(mime = encoder.mime_type(), "encoder chosen by accept header");
                return encoder.as_ref();
            }
        }
    }

    encoders[0].as_ref()
}

/// Choose the request-body decoder from a `Content-Type` value.
///
/// Parameters after `;` are ignored. Absent or unmatched content types fall
/// back to the first registered encoder's decoder; an actual parse failure is
/// then that decoder's to report.
#[must_use]
pub fn select_decoder<'a>(
    encoders: &'a [Arc<dyn Encoder>],
    content_type: Option<&str>,
) -> &'a dyn Encoder {
    debug_assert!(!encoders.is_empty());

    if let Some(raw) = content_type {
        let media_type = raw.split(';').next().unwrap_or("").trim();
        if let Some(encoder) = encoders
            .iter()
            .find(|e| e.mime_type().eq_ignore_ascii_case(media_type))
        {
            return encoder.as_ref();
        }
    }
    encoders[0].as_ref()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::{HtmlEncoder, JsonEncoder, JsonpEncoder};

    fn encoders() -> Vec<Arc<dyn Encoder>> {
        vec![
            Arc::new(JsonEncoder),
            Arc::new(JsonpEncoder::default()),
            Arc::new(HtmlEncoder),
        ]
    }

    // ========== Accept Parsing Tests ==========

    #[test]
    fn test_parse_accept_single() {
        let ranges = parse_accept("application/json");
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].media_type, "application/json");
        assert_eq!(ranges[0].quality, 1.0);
    }

    #[test]
    fn test_parse_accept_with_quality() {
        let ranges = parse_accept("text/html;q=0.9, application/json");
        assert_eq!(ranges[0].media_type, "application/json");
        assert_eq!(ranges[1].media_type, "text/html");
        assert_eq!(ranges[1].quality, 0.9);
    }

    #[test]
    fn test_parse_accept_stable_on_equal_quality() {
        // Equal (default) quality: header order is preserved.
        let ranges = parse_accept("application/json, text/xml");
        assert_eq!(ranges[0].media_type, "application/json");
        assert_eq!(ranges[1].media_type, "text/xml");
    }

    #[test]
    fn test_parse_accept_chrome_header() {
        let ranges =
            parse_accept("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8");
        assert_eq!(ranges[0].media_type, "text/html");
        assert_eq!(ranges[1].media_type, "application/xhtml+xml");
        assert_eq!(ranges[2].media_type, "application/xml");
        assert_eq!(ranges[3].media_type, "*/*");
    }

    #[test]
    fn test_parse_accept_skips_malformed_entries() {
        let ranges = parse_accept("garbage, text/xml");
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].media_type, "text/xml");
    }

    #[test]
    fn test_parse_accept_malformed_quality_defaults_to_one() {
        let ranges = parse_accept("text/xml;q=banana");
        assert_eq!(ranges[0].quality, 1.0);
    }

    #[test]
    fn test_parse_accept_empty() {
        assert!(parse_accept("").is_empty());
    }

    #[test]
    fn test_parse_accept_normalizes_case() {
        let ranges = parse_accept("Text/XML");
        assert_eq!(ranges[0].media_type, "text/xml");
    }

    // ========== Encoder Selection Tests ==========

    #[test]
    fn test_select_default_with_no_signals() {
        let encoders = encoders();
        let encoder = select_encoder(&encoders, &NegotiationContext::default());
        assert_eq!(encoder.mime_type(), "application/json");
    }

    #[test]
    fn test_select_by_extension() {
        let encoders = encoders();
        let ctx = NegotiationContext {
            extension: Some("html".to_string()),
            ..Default::default()
        };
        assert_eq!(select_encoder(&encoders, &ctx).mime_type(), "text/html");
    }

    #[test]
    fn test_extension_overrides_accept() {
        let encoders = encoders();
        let ctx = NegotiationContext {
            extension: Some("html".to_string()),
            accept: Some("application/json".to_string()),
            ..Default::default()
        };
        assert_eq!(select_encoder(&encoders, &ctx).mime_type(), "text/html");
    }

    #[test]
    fn test_callback_overrides_accept() {
        let encoders = encoders();
        let ctx = NegotiationContext {
            callback: Some("cb".to_string()),
            accept: Some("application/json".to_string()),
            ..Default::default()
        };
        assert_eq!(
            select_encoder(&encoders, &ctx).mime_type(),
            "text/javascript"
        );
    }

    #[test]
    fn test_callback_without_jsonp_encoder_is_ignored() {
        let encoders: Vec<Arc<dyn Encoder>> = vec![Arc::new(JsonEncoder)];
        let ctx = NegotiationContext {
            callback: Some("cb".to_string()),
            ..Default::default()
        };
        assert_eq!(
            select_encoder(&encoders, &ctx).mime_type(),
            "application/json"
        );
    }

    #[test]
    fn test_select_by_exact_accept() {
        let encoders = encoders();
        let ctx = NegotiationContext {
            accept: Some("text/html".to_string()),
            ..Default::default()
        };
        assert_eq!(select_encoder(&encoders, &ctx).mime_type(), "text/html");
    }

    #[test]
    fn test_accept_tie_first_listed_wins() {
        let encoders = encoders();
        let ctx = NegotiationContext {
            accept: Some("application/json, text/html".to_string()),
            ..Default::default()
        };
        assert_eq!(
            select_encoder(&encoders, &ctx).mime_type(),
            "application/json"
        );
    }

    #[test]
    fn test_accept_quality_beats_header_order() {
        let encoders = encoders();
        let ctx = NegotiationContext {
            accept: Some("application/json;q=0.5, text/html".to_string()),
            ..Default::default()
        };
        assert_eq!(select_encoder(&encoders, &ctx).mime_type(), "text/html");
    }

    #[test]
    fn test_accept_type_wildcard() {
        let encoders = encoders();
        let ctx = NegotiationContext {
            accept: Some("text/*".to_string()),
            ..Default::default()
        };
        // First registered text/* encoder is JSONP.
        assert_eq!(
            select_encoder(&encoders, &ctx).mime_type(),
            "text/javascript"
        );
    }

    #[test]
    fn test_accept_full_wildcard_selects_default() {
        let encoders = encoders();
        let ctx = NegotiationContext {
            accept: Some("lol/cat;q=0.9, */*".to_string()),
            ..Default::default()
        };
        assert_eq!(
            select_encoder(&encoders, &ctx).mime_type(),
            "application/json"
        );
    }

    #[test]
    fn test_unsatisfiable_accept_falls_back_to_default() {
        let encoders = encoders();
        let ctx = NegotiationContext {
            accept: Some("lol/cat".to_string()),
            ..Default::default()
        };
        assert_eq!(
            select_encoder(&encoders, &ctx).mime_type(),
            "application/json"
        );
    }

    #[test]
    fn test_unparseable_accept_falls_back_to_default() {
        let encoders = encoders();
        let ctx = NegotiationContext {
            accept: Some(";;;,,,".to_string()),
            ..Default::default()
        };
        assert_eq!(
            select_encoder(&encoders, &ctx).mime_type(),
            "application/json"
        );
    }

    #[test]
    fn test_unmatched_range_falls_through_to_next() {
        let encoders = encoders();
        let ctx = NegotiationContext {
            accept: Some("image/*, text/html;q=0.8".to_string()),
            ..Default::default()
        };
        assert_eq!(select_encoder(&encoders, &ctx).mime_type(), "text/html");
    }

    // ========== Decoder Selection Tests ==========

    #[test]
    fn test_select_decoder_exact_match() {
        let encoders = encoders();
        let decoder = select_decoder(&encoders, Some("text/html"));
        assert_eq!(decoder.mime_type(), "text/html");
    }

    #[test]
    fn test_select_decoder_ignores_parameters() {
        let encoders = encoders();
        let decoder = select_decoder(&encoders, Some("text/html; charset=utf-8"));
        assert_eq!(decoder.mime_type(), "text/html");
    }

    #[test]
    fn test_select_decoder_missing_content_type() {
        let encoders = encoders();
        let decoder = select_decoder(&encoders, None);
        assert_eq!(decoder.mime_type(), "application/json");
    }

    #[test]
    fn test_select_decoder_unknown_content_type() {
        let encoders = encoders();
        let decoder = select_decoder(&encoders, Some("application/octet-stream"));
        assert_eq!(decoder.mime_type(), "application/json");
    }
}
