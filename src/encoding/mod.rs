//! Representation formats for resources.
//!
//! An [`Encoder`] is one representation: a MIME type, a URL extension token,
//! and a serialize/parse pair. Each registered resource carries an **ordered**
//! sequence of encoders; the order is precedence: the first entry is the
//! default format and the tie-break everywhere negotiation needs one. The
//! engine never re-sorts the sequence.
//!
//! Built-in variants: [`JsonEncoder`], [`JsonpEncoder`], [`HtmlEncoder`].
//! Anything else (XML, CSV, ...) is supplied by the application through the
//! same trait.

use bytes::Bytes;
use serde_json::Value;

use crate::error::Result;

mod html;
mod json;
mod jsonp;

pub use html::HtmlEncoder;
pub use json::JsonEncoder;
pub use jsonp::JsonpEncoder;

/// What is being serialized: one resource or an ordered collection.
#[derive(Clone, Copy, Debug)]
pub enum Payload<'a> {
    /// A single resource instance.
    One(&'a Value),
    /// The full collection, in handler order.
    Many(&'a [Value]),
}

/// Per-request context available to encoders.
#[derive(Clone, Copy, Debug, Default)]
pub struct EncodeContext<'a> {
    /// Value of the callback override parameter, if the request carried one.
    pub callback: Option<&'a str>,
}

/// A single representation format.
pub trait Encoder: Send + Sync {
    /// MIME type sent as `Content-Type` and matched against `Accept` /
    /// `Content-Type` values.
    fn mime_type(&self) -> &'static str;

    /// URL extension token (`json` in `/api/1.json`).
    fn extension(&self) -> &'static str;

    /// True if this encoder is the target of the callback override
    /// parameter.
    fn supports_callback(&self) -> bool {
        false
    }

    /// Serialize a resource or collection.
    fn encode(&self, payload: Payload<'_>, ctx: &EncodeContext<'_>) -> Result<Bytes>;

    /// Parse a request body into a resource value.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RestError::Decode`] when the body is not a valid
    /// document in this format.
    fn decode(&self, body: &[u8]) -> Result<Value>;
}
