//! C-ABI wrapper around `http-facade`.
//!
//! # Overview
//! Exposes the pooled GET / form POST / JSON POST helpers and the query and
//! decode utilities through `extern "C"` functions, so any language with a C
//! FFI can share one connection pool without linking to Rust types.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Request functions return one `FfiHttpResult` envelope carrying either
//!   the status and body or an error code and message.
//! - Maps cross the boundary as `FfiPair` arrays plus a length.
//! - The C caller owns all returned pointers and must call the matching
//!   `hf_free_*` function to release them.

pub mod types;

use std::ffi::CString;
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use http_facade::{decode_url, parse_query_string_to_map, HttpFacade, HttpRequest, PoolConfig};

use types::*;

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a facade with the default pool configuration.
///
/// Returns null if an internal panic occurs.
/// The caller must free the returned pointer with `hf_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn hf_client_new() -> *mut FfiHttpFacade {
    catch_unwind(|| match HttpFacade::new(PoolConfig::default()) {
        Ok(inner) => Box::into_raw(Box::new(FfiHttpFacade { inner })),
        Err(_) => std::ptr::null_mut(),
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Create a facade from explicit pool limits and timeouts.
///
/// Returns null if `config` is null or the configuration is invalid.
#[unsafe(no_mangle)]
pub extern "C" fn hf_client_new_with_config(config: *const FfiPoolConfig) -> *mut FfiHttpFacade {
    catch_unwind(|| {
        if config.is_null() {
            return std::ptr::null_mut();
        }
        let config = PoolConfig::from(unsafe { &*config });
        match HttpFacade::new(config) {
            Ok(inner) => Box::into_raw(Box::new(FfiHttpFacade { inner })),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a facade created by `hf_client_new*`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn hf_client_free(client: *mut FfiHttpFacade) {
    if !client.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { Box::from_raw(client) });
        }));
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Build a request with `build`, execute it, and wrap the outcome.
fn run(
    client: *const FfiHttpFacade,
    name: &str,
    build: impl FnOnce(&HttpFacade) -> Result<Result<HttpRequest, http_facade::FacadeError>, ArgError>,
) -> *mut FfiHttpResult {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return FfiHttpResult::from_arg(ArgError::Null("client"));
        }
        let facade = unsafe { &(*client).inner };
        let request = match build(facade) {
            Ok(Ok(request)) => request,
            Ok(Err(err)) => return FfiHttpResult::from_error(err),
            Err(arg) => return FfiHttpResult::from_arg(arg),
        };
        match facade.execute(&request) {
            Ok(response) => FfiHttpResult::ok(response),
            Err(err) => FfiHttpResult::from_error(err),
        }
    }))
    .unwrap_or_else(|_| FfiHttpResult::panic(&format!("panic in {name}")))
}

/// GET `url` with optional query `params` and `headers`.
///
/// `params` / `headers` may be null when their length is zero.
#[unsafe(no_mangle)]
pub extern "C" fn hf_get(
    client: *const FfiHttpFacade,
    url: *const c_char,
    params: *const FfiPair,
    params_len: u32,
    headers: *const FfiPair,
    headers_len: u32,
) -> *mut FfiHttpResult {
    run(client, "hf_get", |facade| {
        let url = unsafe { read_str(url, "url") }?;
        let params = unsafe { read_pairs(params, params_len, "params") }?;
        let headers = unsafe { read_pairs(headers, headers_len, "headers") }?;
        Ok(facade.build_get(url, &params, &headers))
    })
}

/// POST `fields` to `url` as a form-urlencoded body.
#[unsafe(no_mangle)]
pub extern "C" fn hf_post_form(
    client: *const FfiHttpFacade,
    url: *const c_char,
    fields: *const FfiPair,
    fields_len: u32,
) -> *mut FfiHttpResult {
    run(client, "hf_post_form", |facade| {
        let url = unsafe { read_str(url, "url") }?;
        let fields = unsafe { read_pairs(fields, fields_len, "fields") }?;
        Ok(facade.build_post_form(url, &fields))
    })
}

/// POST `json` verbatim to `url` with optional extra `headers`. The JSON
/// content type always wins over a caller-supplied one.
#[unsafe(no_mangle)]
pub extern "C" fn hf_post_json(
    client: *const FfiHttpFacade,
    url: *const c_char,
    json: *const c_char,
    headers: *const FfiPair,
    headers_len: u32,
) -> *mut FfiHttpResult {
    run(client, "hf_post_json", |facade| {
        let url = unsafe { read_str(url, "url") }?;
        let json = unsafe { read_str(json, "json") }?;
        let headers = unsafe { read_pairs(headers, headers_len, "headers") }?;
        Ok(facade.build_post_json(url, json, &headers))
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse the query string of `url` into key/value pairs (not decoded).
///
/// Returns null if `url` is null or not UTF-8, or if the pair count does not
/// fit the list's `u32` length. Free with `hf_free_pairs`.
#[unsafe(no_mangle)]
pub extern "C" fn hf_parse_query_string(url: *const c_char) -> *mut FfiPairList {
    catch_unwind(|| match unsafe { read_str(url, "url") } {
        Ok(url) => {
            let mut pairs: Vec<_> = parse_query_string_to_map(url).into_iter().collect();
            pairs.sort();
            FfiPairList::from_pairs(pairs)
        }
        Err(_) => std::ptr::null_mut(),
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Percent-decode `url`, replacing invalid UTF-8 with U+FFFD. Returns null
/// if `url` is null or has a malformed escape.
/// Free with `hf_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn hf_decode_url(url: *const c_char) -> *mut c_char {
    catch_unwind(|| {
        let Ok(url) = (unsafe { read_str(url, "url") }) else {
            return std::ptr::null_mut();
        };
        decode_url(url)
            .and_then(|decoded| CString::new(decoded).ok())
            .map_or(std::ptr::null_mut(), CString::into_raw)
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpResult` returned by any request function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn hf_free_result(result: *mut FfiHttpResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| {
        let result = unsafe { Box::from_raw(result) };
        if !result.error_message.is_null() {
            drop(unsafe { CString::from_raw(result.error_message) });
        }
        if !result.body.is_null() {
            drop(unsafe { CString::from_raw(result.body) });
        }
    }));
}

/// Free an `FfiPairList` returned by `hf_parse_query_string`.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn hf_free_pairs(list: *mut FfiPairList) {
    if list.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| {
        let list = unsafe { Box::from_raw(list) };
        if list.items.is_null() || list.len == 0 {
            return;
        }
        let items = unsafe {
            Box::from_raw(std::ptr::slice_from_raw_parts_mut(list.items, list.len as usize))
        };
        for pair in items.iter() {
            if !pair.key.is_null() {
                drop(unsafe { CString::from_raw(pair.key) });
            }
            if !pair.value.is_null() {
                drop(unsafe { CString::from_raw(pair.value) });
            }
        }
    }));
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn hf_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { CString::from_raw(s) });
        }));
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
