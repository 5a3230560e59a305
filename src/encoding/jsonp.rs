//! JSONP representation: JSON wrapped in a caller-named function invocation.
//!
//! Selected by the callback override parameter (its value becomes the wrapper
//! name) or by the `.js` extension. Without an explicit callback the wrapper
//! name falls back to the one baked in at registration time
//! ([`crate::ApiConfig::default_callback`]).

use bytes::Bytes;
use serde_json::Value;

use crate::encoding::{EncodeContext, Encoder, JsonEncoder, Payload};
use crate::error::Result;

/// `text/javascript` / `.js`.
#[derive(Clone, Debug)]
pub struct JsonpEncoder {
    default_callback: String,
}

impl JsonpEncoder {
    #[must_use]
    pub fn new(default_callback: impl Into<String>) -> Self {
        JsonpEncoder {
            default_callback: default_callback.into(),
        }
    }
}

impl Default for JsonpEncoder {
    fn default() -> Self {
        JsonpEncoder::new("callback")
    }
}

impl Encoder for JsonpEncoder {
    fn mime_type(&self) -> &'static str {
        "text/javascript"
    }

    fn extension(&self) -> &'static str {
        "js"
    }

    fn supports_callback(&self) -> bool {
        true
    }

    fn encode(&self, payload: Payload<'_>, ctx: &EncodeContext<'_>) -> Result<Bytes> {
        let json = JsonEncoder.encode(payload, ctx)?;
        let callback = ctx.callback.unwrap_or(&self.default_callback);
        let mut body = Vec::with_capacity(callback.len() + json.len() + 3);
        body.extend_from_slice(callback.as_bytes());
        body.push(b'(');
        body.extend_from_slice(&json);
        body.extend_from_slice(b");");
        Ok(Bytes::from(body))
    }

    fn decode(&self, body: &[u8]) -> Result<Value> {
        // Inbound JSONP bodies are plain JSON; the wrapper exists only on
        // the way out.
        JsonEncoder.decode(body)
    }
}
