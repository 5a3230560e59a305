//! Per-request dispatch: verb + path shape to capability invocation.
//!
//! Each handler here implements one row of the dispatch table:
//!
//! | Verb | Shape | Capability | Success |
//! |------|-------|------------|---------|
//! | GET | collection | `list_collection` | 200, encoded list |
//! | POST | collection | `create` | 201, `Location`, encoded resource |
//! | GET | instance | `get_one` | 200, encoded resource |
//! | PUT | instance | `update` | 204, `Location`, no body |
//! | DELETE | instance | `delete` | 200, no body |
//!
//! The per-request sequence is strict: decode (POST/PUT) happens before the
//! capability is invoked (a body the selected decoder cannot parse aborts
//! with 400 before any capability runs), and encoding happens after. Every
//! domain failure crosses exactly this boundary and is mapped by
//! [`RestError::status`]; no response bytes are written before the final
//! status and headers are known.
//!
//! Capabilities are awaited, never blocked on: an operation that cannot
//! complete immediately suspends only this request's remaining work.

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use tracing::{debug, warn};

use crate::encoding::{EncodeContext, Payload};
use crate::error::RestError;
use crate::negotiation::{NegotiationContext, select_decoder, select_encoder};
use crate::registry::RouteBinding;
use crate::routes::{instance_location, parse_instance_tail};

/// Query parameter that forces the JSONP encoder; its value becomes the
/// wrapper function name.
pub const CALLBACK_PARAM: &str = "callback";

type Params = Query<HashMap<String, String>>;

/// Fallback for verb/shape combinations outside the dispatch table.
///
/// Deliberately 404 rather than 405: an unsupported operation is
/// wire-indistinguishable from an unknown route.
pub(crate) async fn reject() -> StatusCode {
    StatusCode::NOT_FOUND
}

/// GET on a collection route.
pub(crate) async fn list_collection(
    State(binding): State<Arc<RouteBinding>>,
    Query(params): Params,
    headers: HeaderMap,
) -> Response {
    let ctx = negotiation_context(&binding, None, &params, &headers);
    match binding.entry.handler.list_collection().await {
        Ok(items) => encode_payload(&binding, &ctx, StatusCode::OK, Payload::Many(&items)),
        Err(err) => error_response(&binding, &err),
    }
}

/// GET on an instance route.
pub(crate) async fn get_instance(
    State(binding): State<Arc<RouteBinding>>,
    Path(tail): Path<String>,
    Query(params): Params,
    headers: HeaderMap,
) -> Response {
    let Some((id, ext)) = parse_instance_tail(&tail, &binding.entry.encoders) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let ctx = negotiation_context(&binding, ext, &params, &headers);
    match binding.entry.handler.get_one(id).await {
        Ok(resource) => encode_payload(&binding, &ctx, StatusCode::OK, Payload::One(&resource)),
        Err(err) => error_response(&binding, &err),
    }
}

/// POST on a collection route.
pub(crate) async fn create_resource(
    State(binding): State<Arc<RouteBinding>>,
    Query(params): Params,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let ctx = negotiation_context(&binding, None, &params, &headers);
    let resource = match decode_body(&binding, &headers, &body) {
        Ok(resource) => resource,
        Err(err) => return error_response(&binding, &err),
    };
    match binding.entry.handler.create(resource).await {
        Ok(created) => {
            debug!(resource = %binding.entry.name, "created instance");
            let mut response =
                encode_payload(&binding, &ctx, StatusCode::CREATED, Payload::One(&created));
            if let Some(id) = resource_id(&created) {
                set_location(&mut response, &binding, &id, ctx.extension.as_deref());
            }
            response
        }
        Err(err) => error_response(&binding, &err),
    }
}

/// PUT on an instance route.
pub(crate) async fn update_instance(
    State(binding): State<Arc<RouteBinding>>,
    Path(tail): Path<String>,
    Query(params): Params,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some((id, ext)) = parse_instance_tail(&tail, &binding.entry.encoders) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let ctx = negotiation_context(&binding, ext, &params, &headers);
    let mut resource = match decode_body(&binding, &headers, &body) {
        Ok(resource) => resource,
        Err(err) => return error_response(&binding, &err),
    };
    // The URL-supplied id is authoritative; a body-supplied id never wins.
    if let Value::Object(fields) = &mut resource {
        fields.insert("id".to_string(), coerce_id(id));
    }
    match binding.entry.handler.update(resource, id).await {
        Ok(()) => {
            debug!(resource = %binding.entry.name, id, "updated instance");
            let mut response = StatusCode::NO_CONTENT.into_response();
            set_location(&mut response, &binding, id, ctx.extension.as_deref());
            response
        }
        Err(err) => error_response(&binding, &err),
    }
}

/// DELETE on an instance route.
pub(crate) async fn delete_instance(
    State(binding): State<Arc<RouteBinding>>,
    Path(tail): Path<String>,
    Query(params): Params,
    headers: HeaderMap,
) -> Response {
    let Some((id, ext)) = parse_instance_tail(&tail, &binding.entry.encoders) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    // Negotiation runs for every verb; the bodiless response simply has no
    // use for the selected encoder.
    let ctx = negotiation_context(&binding, ext, &params, &headers);
    let _encoder = select_encoder(&binding.entry.encoders, &ctx);
    match binding.entry.handler.delete(id).await {
        Ok(()) => {
            debug!(resource = %binding.entry.name, id, "deleted instance");
            StatusCode::OK.into_response()
        }
        Err(err) => error_response(&binding, &err),
    }
}

fn negotiation_context(
    binding: &RouteBinding,
    path_extension: Option<&str>,
    params: &HashMap<String, String>,
    headers: &HeaderMap,
) -> NegotiationContext {
    NegotiationContext {
        extension: path_extension
            .map(str::to_string)
            .or_else(|| binding.forced_extension.clone()),
        callback: params.get(CALLBACK_PARAM).cloned(),
        accept: headers
            .get(header::ACCEPT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    }
}

fn decode_body(
    binding: &RouteBinding,
    headers: &HeaderMap,
    body: &[u8],
) -> crate::error::Result<Value> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    let decoder = select_decoder(&binding.entry.encoders, content_type);
    decoder.decode(body)
}

fn encode_payload(
    binding: &RouteBinding,
    ctx: &NegotiationContext,
    status: StatusCode,
    payload: Payload<'_>,
) -> Response {
    let encoder = select_encoder(&binding.entry.encoders, ctx);
    let encode_ctx = EncodeContext {
        callback: ctx.callback.as_deref(),
    };
    match encoder.encode(payload, &encode_ctx) {
        Ok(body) => Response::builder()
            .status(status)
            .header(header::CONTENT_TYPE, encoder.mime_type())
            .body(Body::from(body))
            .unwrap(),
        Err(err) => error_response(binding, &err),
    }
}

fn set_location(response: &mut Response, binding: &RouteBinding, id: &str, ext: Option<&str>) {
    let location = instance_location(
        &binding.entry.config.prefix,
        &binding.entry.name,
        id,
        ext,
    );
    match HeaderValue::from_str(&location) {
        Ok(value) => {
            response.headers_mut().insert(header::LOCATION, value);
        }
        Err(_) => {
            warn!(resource = %binding.entry.name, id, "instance id not representable in Location header");
        }
    }
}

fn error_response(binding: &RouteBinding, err: &RestError) -> Response {
    debug!(resource = %binding.entry.name, error = %err, "request failed");
    err.status().into_response()
}

/// The created resource's id, for `Location` generation. Only number and
/// string ids name an instance route.
fn resource_id(resource: &Value) -> Option<String> {
    match resource.get("id")? {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

/// URL ids are opaque strings, but the conventional stores use numeric ids;
/// keep the stored field numeric when the id parses as an integer.
fn coerce_id(id: &str) -> Value {
    match id.parse::<i64>() {
        Ok(n) => Value::from(n),
        Err(_) => Value::from(id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resource_id_number() {
        assert_eq!(resource_id(&json!({"id": 10})), Some("10".to_string()));
    }

    #[test]
    fn test_resource_id_string() {
        assert_eq!(resource_id(&json!({"id": "abc"})), Some("abc".to_string()));
    }

    #[test]
    fn test_resource_id_missing() {
        assert_eq!(resource_id(&json!({"text": "x"})), None);
        assert_eq!(resource_id(&json!({"id": null})), None);
    }

    #[test]
    fn test_coerce_id_numeric() {
        assert_eq!(coerce_id("7"), json!(7));
    }

    #[test]
    fn test_coerce_id_opaque() {
        assert_eq!(coerce_id("abc-1"), json!("abc-1"));
    }
}
