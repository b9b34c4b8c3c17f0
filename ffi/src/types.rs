//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, pointer + length instead of maps, and
//! enums with explicit discriminants. Conversion functions live here to keep
//! `lib.rs` focused on the `extern "C"` surface.

use std::collections::BTreeMap;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use http_facade::{FacadeError, HttpFacade, HttpResponse, PoolConfig};

/// Opaque handle to an `HttpFacade`. C callers receive a pointer to this
/// and pass it back into every request function.
pub struct FfiHttpFacade {
    pub(crate) inner: HttpFacade,
}

/// Pool limits and timeouts. Zero fields are rejected by
/// `hf_client_new_with_config`.
#[repr(C)]
pub struct FfiPoolConfig {
    pub max_total_connections: u32,
    pub max_connections_per_route: u32,
    pub connect_timeout_ms: u64,
    pub acquire_timeout_ms: u64,
    pub read_timeout_ms: u64,
}

impl From<&FfiPoolConfig> for PoolConfig {
    fn from(c: &FfiPoolConfig) -> Self {
        PoolConfig {
            max_total_connections: c.max_total_connections as usize,
            max_connections_per_route: c.max_connections_per_route as usize,
            connect_timeout_ms: c.connect_timeout_ms,
            acquire_timeout_ms: c.acquire_timeout_ms,
            read_timeout_ms: c.read_timeout_ms,
            ..PoolConfig::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Key/value pairs
// ---------------------------------------------------------------------------

/// A key/value pair of C strings, used for params, headers, and parsed
/// query strings.
///
/// When passed in, the FFI layer only reads the strings. When returned inside
/// an `FfiPairList`, they are owned by the list.
#[repr(C)]
pub struct FfiPair {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// A list of pairs returned by `hf_parse_query_string`.
#[repr(C)]
pub struct FfiPairList {
    pub items: *mut FfiPair,
    pub len: u32,
}

impl FfiPairList {
    /// Convert owned pairs into a heap-allocated list. Pairs whose key or
    /// value contains a NUL byte are skipped. Returns null when there are
    /// more pairs than a `u32` length can describe.
    pub(crate) fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> *mut Self {
        let items: Box<[FfiPair]> = pairs
            .into_iter()
            .filter_map(|(k, v)| match (CString::new(k), CString::new(v)) {
                (Ok(k), Ok(v)) => Some(FfiPair {
                    key: k.into_raw(),
                    value: v.into_raw(),
                }),
                _ => None,
            })
            .collect();

        let Some(len) = list_len(items.len()) else {
            for pair in items.iter() {
                drop(unsafe { CString::from_raw(pair.key) });
                drop(unsafe { CString::from_raw(pair.value) });
            }
            return std::ptr::null_mut();
        };
        let items = if items.is_empty() {
            std::ptr::null_mut()
        } else {
            Box::into_raw(items) as *mut FfiPair
        };
        Box::into_raw(Box::new(FfiPairList { items, len }))
    }
}

/// Length of a pair list as seen by C, if it fits.
pub(crate) fn list_len(len: usize) -> Option<u32> {
    u32::try_from(len).ok()
}

/// Why a C argument could not be read.
pub(crate) enum ArgError {
    Null(&'static str),
    NotUtf8(&'static str),
}

/// Read a C string argument as UTF-8.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string that outlives `'a`.
pub(crate) unsafe fn read_str<'a>(ptr: *const c_char, name: &'static str) -> Result<&'a str, ArgError> {
    if ptr.is_null() {
        return Err(ArgError::Null(name));
    }
    unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .map_err(|_| ArgError::NotUtf8(name))
}

/// Read `len` caller-owned pairs into a map. A null `ptr` is accepted only
/// when `len` is zero.
///
/// # Safety
/// `ptr` must point to `len` valid `FfiPair` values whose strings are
/// NUL-terminated.
pub(crate) unsafe fn read_pairs(
    ptr: *const FfiPair,
    len: u32,
    name: &'static str,
) -> Result<BTreeMap<String, String>, ArgError> {
    let mut map = BTreeMap::new();
    if len == 0 {
        return Ok(map);
    }
    if ptr.is_null() {
        return Err(ArgError::Null(name));
    }
    let pairs = unsafe { std::slice::from_raw_parts(ptr, len as usize) };
    for pair in pairs {
        let key = unsafe { read_str(pair.key, name) }?;
        let value = unsafe { read_str(pair.value, name) }?;
        map.insert(key.to_string(), value.to_string());
    }
    Ok(map)
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiHttpResult`.
#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    InvalidUrl = 1,
    Transport = 2,
    Body = 3,
    InvalidConfig = 4,
    InvalidString = 5,
    Panic = 6,
    NullArg = 7,
}

/// Result envelope for every request function.
///
/// On success `error_code` is `Ok`, `error_message` is null, `http_status`
/// is the response status (never interpreted), and `body` is the response
/// text. On failure `error_code` describes the category, `error_message` is
/// a human-readable C string, and `body` is null.
#[repr(C)]
pub struct FfiHttpResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub body: *mut c_char,
}

impl FfiHttpResult {
    fn boxed(error_code: FfiErrorCode, message: Option<String>, http_status: u16, body: *mut c_char) -> *mut Self {
        let error_message = match message {
            Some(msg) => CString::new(msg.replace('\0', " "))
                .unwrap_or_default()
                .into_raw(),
            None => std::ptr::null_mut(),
        };
        Box::into_raw(Box::new(FfiHttpResult {
            error_code,
            error_message,
            http_status,
            body,
        }))
    }

    /// Build a success result from a fully read response.
    pub(crate) fn ok(response: HttpResponse) -> *mut Self {
        match CString::new(response.body) {
            Ok(body) => Self::boxed(FfiErrorCode::Ok, None, response.status, body.into_raw()),
            Err(_) => Self::boxed(
                FfiErrorCode::InvalidString,
                Some("response body contains a NUL byte".to_string()),
                response.status,
                std::ptr::null_mut(),
            ),
        }
    }

    /// Build an error result from a `FacadeError`.
    pub(crate) fn from_error(err: FacadeError) -> *mut Self {
        let code = match &err {
            FacadeError::InvalidUrl { .. } => FfiErrorCode::InvalidUrl,
            FacadeError::Transport(_) | FacadeError::PoolTimeout { .. } => FfiErrorCode::Transport,
            FacadeError::Body(_) | FacadeError::Decode { .. } => FfiErrorCode::Body,
            FacadeError::InvalidConfig(_) => FfiErrorCode::InvalidConfig,
        };
        Self::boxed(code, Some(err.to_string()), 0, std::ptr::null_mut())
    }

    /// Build an error result for an argument that was null or not UTF-8.
    pub(crate) fn from_arg(err: ArgError) -> *mut Self {
        match err {
            ArgError::Null(name) => Self::boxed(
                FfiErrorCode::NullArg,
                Some(format!("null argument: {name}")),
                0,
                std::ptr::null_mut(),
            ),
            ArgError::NotUtf8(name) => Self::boxed(
                FfiErrorCode::InvalidString,
                Some(format!("argument is not valid UTF-8: {name}")),
                0,
                std::ptr::null_mut(),
            ),
        }
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::boxed(FfiErrorCode::Panic, Some(msg.to_string()), 0, std::ptr::null_mut())
    }
}
