//! Wire-format dumps of requests and responses for debug mode.
//!
//! Dumps are written to the `tracing` target [`DUMP_TARGET`] at `INFO`.

use http::header::{HeaderMap, CONTENT_LENGTH, HOST};
use std::fmt::Write as _;

use super::response::DmResponse;
use crate::error::{DmError, DmResult};

/// `tracing` target that receives debug dumps.
pub const DUMP_TARGET: &str = "integrations_aliyun_dm::dump";

/// Render an outgoing request the way it goes on the wire.
///
/// Fails if a header value is not visible ASCII or the body is a stream
/// rather than buffered bytes.
pub fn dump_request(request: &reqwest::Request) -> DmResult<String> {
    let url = request.url();
    let mut out = String::new();

    let target = match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    };
    let _ = write!(out, "{} {} HTTP/1.1\r\n", request.method(), target);

    if !request.headers().contains_key(HOST) {
        let host = url.host_str().ok_or_else(|| DmError::Dump {
            message: format!("request URL has no host: {}", url),
        })?;
        match url.port() {
            Some(port) => {
                let _ = write!(out, "Host: {}:{}\r\n", host, port);
            }
            None => {
                let _ = write!(out, "Host: {}\r\n", host);
            }
        }
    }

    let body: &[u8] = match request.body() {
        Some(body) => body.as_bytes().ok_or_else(|| DmError::Dump {
            message: "request body is not buffered".to_string(),
        })?,
        None => &[],
    };

    write_headers(&mut out, request.headers())?;
    if !request.headers().contains_key(CONTENT_LENGTH) {
        let _ = write!(out, "Content-Length: {}\r\n", body.len());
    }
    out.push_str("\r\n");
    out.push_str(&String::from_utf8_lossy(body));

    Ok(out)
}

/// Render a received response. The body is included only when asked.
pub fn dump_response(response: &DmResponse, include_body: bool) -> DmResult<String> {
    let mut out = String::new();

    let _ = write!(out, "{:?} {}\r\n", response.version(), response.status());
    write_headers(&mut out, response.headers())?;
    out.push_str("\r\n");

    if include_body {
        out.push_str(&String::from_utf8_lossy(response.body()));
    }

    Ok(out)
}

/// Log a dump, applying the dump failure policy.
///
/// With `fatal` set a failed dump is returned as the error of the send;
/// otherwise it is logged and dropped.
pub(crate) fn emit(label: &str, dump: DmResult<String>, fatal: bool) -> DmResult<()> {
    match dump {
        Ok(text) => {
            tracing::info!(target: DUMP_TARGET, kind = label, "\n{}", text);
            Ok(())
        }
        Err(err) if fatal => Err(err),
        Err(err) => {
            tracing::warn!(kind = label, error = %err, "debug dump failed");
            Ok(())
        }
    }
}

fn write_headers(out: &mut String, headers: &HeaderMap) -> DmResult<()> {
    for (name, value) in headers {
        let value = value.to_str().map_err(|e| DmError::Dump {
            message: format!("header {} cannot be rendered: {}", name, e),
        })?;
        let _ = write!(out, "{}: {}\r\n", name, value);
    }
    Ok(())
}
