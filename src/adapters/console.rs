//! Line-oriented JSON console transport.
//!
//! Reads one JSON request per line, hands it to a [`CommandHandler`] and
//! writes one JSON reply per line:
//!
//! ```text
//!   → {"op":"start","recipe":{...},"total_weight":100}
//!   ← {"ok":true,"data":{"message":"Mixing session started.",...}}
//!   → {"op":"stop"}
//!   ← {"ok":false,"error":{"kind":"conflict","message":"..."}}
//! ```
//!
//! Blank lines are ignored.  A line that does not parse gets a
//! `bad_request` reply and the loop keeps going.

use std::io::{self, BufRead, Write};

use log::{debug, warn};
use serde::Serialize;

use crate::app::commands::AppCommand;
use crate::app::ports::CommandHandler;
use crate::app::replies::AppReply;
use crate::error::Error;

/// Wire kind for requests that never reached the handler.
pub const BAD_REQUEST: &str = "bad_request";

#[derive(Debug, Serialize)]
struct ErrorBody {
    kind: &'static str,
    message: String,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Response {
    Ok { ok: bool, data: AppReply },
    Err { ok: bool, error: ErrorBody },
}

impl Response {
    fn success(data: AppReply) -> Self {
        Self::Ok { ok: true, data }
    }

    fn failure(kind: &'static str, message: String) -> Self {
        Self::Err {
            ok: false,
            error: ErrorBody { kind, message },
        }
    }
}

impl From<Error> for Response {
    fn from(e: Error) -> Self {
        Self::failure(e.kind(), e.to_string())
    }
}

/// Process one request line.  Returns `None` for blank lines.
pub fn handle_line(handler: &impl CommandHandler, line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let response = match serde_json::from_str::<AppCommand>(line) {
        Ok(command) => {
            debug!("Console: {:?}", command);
            match handler.dispatch(command) {
                Ok(reply) => Response::success(reply),
                Err(e) => {
                    debug!("Console: request failed: {}", e);
                    e.into()
                }
            }
        }
        Err(e) => {
            warn!("Console: malformed request: {}", e);
            Response::failure(BAD_REQUEST, e.to_string())
        }
    };

    Some(serde_json::to_string(&response).unwrap_or_else(|e| {
        format!(r#"{{"ok":false,"error":{{"kind":"{BAD_REQUEST}","message":"unencodable reply: {e}"}}}}"#)
    }))
}

/// Serve requests from `input` until end of stream.  Returns the number of
/// replies written.
pub fn run<R: BufRead, W: Write>(
    handler: &impl CommandHandler,
    input: R,
    mut output: W,
) -> io::Result<u64> {
    let mut replies = 0;
    for line in input.lines() {
        let line = line?;
        if let Some(reply) = handle_line(handler, &line) {
            writeln!(output, "{reply}")?;
            output.flush()?;
            replies += 1;
        }
    }
    Ok(replies)
}
