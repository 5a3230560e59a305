//! JSON representation, the conventional default.

use bytes::Bytes;
use serde_json::Value;

use crate::encoding::{EncodeContext, Encoder, Payload};
use crate::error::{RestError, Result};

/// `application/json` / `.json`.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonEncoder;

impl Encoder for JsonEncoder {
    fn mime_type(&self) -> &'static str {
        "application/json"
    }

    fn extension(&self) -> &'static str {
        "json"
    }

    fn encode(&self, payload: Payload<'_>, _ctx: &EncodeContext<'_>) -> Result<Bytes> {
        let bytes = match payload {
            Payload::One(value) => serde_json::to_vec(value)?,
            Payload::Many(values) => serde_json::to_vec(values)?,
        };
        Ok(Bytes::from(bytes))
    }

    fn decode(&self, body: &[u8]) -> Result<Value> {
        serde_json::from_slice(body).map_err(|e| RestError::Decode(e.to_string()))
    }
}
