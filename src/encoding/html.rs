//! HTML representation for browser consumption.
//!
//! Renders the resource as pretty-printed JSON inside a minimal page, so a
//! browser hitting an API route gets something readable. Decoding HTML
//! request bodies is not supported.

use bytes::Bytes;
use serde_json::Value;

use crate::encoding::{EncodeContext, Encoder, Payload};
use crate::error::{RestError, Result};

/// `text/html` / `.html`.
#[derive(Clone, Copy, Debug, Default)]
pub struct HtmlEncoder;

impl Encoder for HtmlEncoder {
    fn mime_type(&self) -> &'static str {
        "text/html"
    }

    fn extension(&self) -> &'static str {
        "html"
    }

    fn encode(&self, payload: Payload<'_>, _ctx: &EncodeContext<'_>) -> Result<Bytes> {
        let pretty = match payload {
            Payload::One(value) => serde_json::to_string_pretty(value)?,
            Payload::Many(values) => serde_json::to_string_pretty(values)?,
        };
        let page = format!(
            "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"></head>\n\
             <body><pre>{}</pre></body>\n</html>\n",
            escape(&pretty)
        );
        Ok(Bytes::from(page))
    }

    fn decode(&self, _body: &[u8]) -> Result<Value> {
        Err(RestError::Decode(
            "text/html request bodies are not supported".to_string(),
        ))
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
