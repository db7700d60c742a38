//! FFI layer for mobile host integration.
//!
//! This module provides C-compatible functions that can be called from the
//! app shell (Dart, Swift, Kotlin, React Native modules).
//! All data crosses the boundary as JSON strings.
//!
//! # Memory Management
//!
//! - Strings returned by `answer_*` functions are allocated by Rust
//! - Caller must free them with `answer_string_free`
//!
//! # Error Handling
//!
//! Functions return JSON with either:
//! - `{"ok": <result>}` on success
//! - `{"error": "<message>"}` on failure

use crate::{exchange, merge, AnswerSet};
use std::ffi::{c_char, CStr, CString};

/// Result wrapper for FFI responses.
#[derive(serde::Serialize)]
#[serde(untagged)]
enum FfiResult<T: serde::Serialize> {
    Ok { ok: T },
    Err { error: String },
}

impl<T: serde::Serialize> FfiResult<T> {
    fn ok(value: T) -> Self {
        FfiResult::Ok { ok: value }
    }

    fn err(message: impl Into<String>) -> Self {
        FfiResult::Err {
            error: message.into(),
        }
    }

    fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|e| format!(r#"{{"error":"serialization failed: {}"}}"#, e))
    }
}

/// Convert a Rust string to a C string pointer.
/// Caller must free with `answer_string_free`.
fn to_c_string(s: String) -> *mut c_char {
    match CString::new(s) {
        Ok(cs) => cs.into_raw(),
        Err(_) => {
            // Serialized JSON escapes NUL, so this only guards against misuse.
            let error = CString::from(c"{\"error\":\"string contained null bytes\"}");
            error.into_raw()
        }
    }
}

/// Convert a C string pointer to a Rust string.
/// Returns None if pointer is null or invalid UTF-8.
unsafe fn from_c_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Parse an answer set argument, or produce the error JSON to return.
unsafe fn parse_set(ptr: *const c_char, name: &str) -> Result<AnswerSet, String> {
    let json = from_c_string(ptr).ok_or_else(|| format!("invalid {name} string"))?;
    serde_json::from_str(&json).map_err(|e| format!("parse error in {name}: {e}"))
}

/// Free a string allocated by the engine.
///
/// # Safety
/// - `s` must be a valid pointer from an `answer_*` function
/// - Must not be called twice on the same pointer
#[no_mangle]
pub unsafe extern "C" fn answer_string_free(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

/// Merge local and remote answers.
///
/// # Arguments
/// - `local_json`: JSON object `{questionId: answerText}` of local answers
/// - `remote_json`: JSON object of remote answers
///
/// # Returns
/// JSON string: `{"ok": MergeResult}` or `{"error": "message"}`
///
/// # Safety
/// - Both arguments must be valid null-terminated C strings or null
/// - Caller must free the returned string with `answer_string_free`
#[no_mangle]
pub unsafe extern "C" fn answer_merge(
    local_json: *const c_char,
    remote_json: *const c_char,
) -> *mut c_char {
    let local = match parse_set(local_json, "local") {
        Ok(set) => set,
        Err(e) => return to_c_string(FfiResult::<()>::err(e).to_json()),
    };
    let remote = match parse_set(remote_json, "remote") {
        Ok(set) => set,
        Err(e) => return to_c_string(FfiResult::<()>::err(e).to_json()),
    };

    to_c_string(FfiResult::ok(merge(&local, &remote)).to_json())
}

/// Render answers as export text.
///
/// # Returns
/// JSON string: `{"ok": "<exchange text>"}` or `{"error": "message"}`
///
/// # Safety
/// - `set_json` must be a valid null-terminated C string or null
/// - Caller must free the returned string with `answer_string_free`
#[no_mangle]
pub unsafe extern "C" fn answer_export(set_json: *const c_char) -> *mut c_char {
    let set = match parse_set(set_json, "answers") {
        Ok(set) => set,
        Err(e) => return to_c_string(FfiResult::<()>::err(e).to_json()),
    };

    match exchange::export_text(&set) {
        Ok(text) => to_c_string(FfiResult::ok(text).to_json()),
        Err(e) => to_c_string(FfiResult::<()>::err(e.to_string()).to_json()),
    }
}

/// Parse import text.
///
/// # Returns
/// JSON string: `{"ok": {questionId: answerText}}` or `{"error": "message"}`
///
/// # Safety
/// - `text` must be a valid null-terminated C string or null
/// - Caller must free the returned string with `answer_string_free`
#[no_mangle]
pub unsafe extern "C" fn answer_import(text: *const c_char) -> *mut c_char {
    let text = match from_c_string(text) {
        Some(s) => s,
        None => return to_c_string(FfiResult::<()>::err("invalid import string").to_json()),
    };

    match exchange::import_text(&text) {
        Ok(set) => to_c_string(FfiResult::ok(set).to_json()),
        Err(e) => to_c_string(FfiResult::<()>::err(e.to_string()).to_json()),
    }
}

/// Get the engine version.
///
/// # Returns
/// Static string pointer (do not free)
#[no_mangle]
pub extern "C" fn answer_engine_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
