//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String` and raw pointer + length instead of
//! `Vec`. Conversion functions live here to keep `lib.rs` focused on the
//! `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

/// Opaque handle to a `RequestBuilder`. C callers receive a pointer to this
/// and pass it back into every build function.
pub struct FfiDripBuilder {
    pub(crate) inner: drip_core::RequestBuilder,
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// A POST request described as C-compatible plain data.
///
/// Built by `drip_build_*` functions. `path` is account-relative; the C
/// caller prefixes its base URL, executes the request and passes the outcome
/// to `drip_normalize_response` or `drip_normalize_transport_failure`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub path: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    ///
    /// Returns null if any string contains an interior NUL byte.
    pub(crate) fn from_core(req: drip_core::HttpRequest) -> *mut Self {
        let Ok(path) = CString::new(req.path) else {
            return std::ptr::null_mut();
        };
        let Ok(body) = CString::new(req.body) else {
            return std::ptr::null_mut();
        };
        let pairs: Option<Vec<(CString, CString)>> = req
            .headers
            .into_iter()
            .map(|(k, v)| Some((CString::new(k).ok()?, CString::new(v).ok()?)))
            .collect();
        let Some(pairs) = pairs else {
            return std::ptr::null_mut();
        };

        let headers_len = pairs.len() as u32;
        let headers = if pairs.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Vec<FfiHeader> = pairs
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: k.into_raw(),
                    value: v.into_raw(),
                })
                .collect();
            // Exact capacity so `drip_free_request` can rebuild the Vec from len.
            Box::into_raw(ffi_headers.into_boxed_slice()) as *mut FfiHeader
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            path: path.into_raw(),
            headers,
            headers_len,
            body: body.into_raw(),
        }))
    }
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// A normalized response owned by the library.
///
/// `status` is the HTTP status, or 0 when the request never produced a
/// response. `body` is never null. Free with `drip_free_response`.
#[repr(C)]
pub struct FfiResponse {
    pub status: u16,
    pub body: *mut c_char,
}

impl FfiResponse {
    pub(crate) fn from_core(response: drip_core::Response) -> *mut Self {
        // Interior NULs would truncate the body in C; drop them instead.
        let body = CString::new(response.body.replace('\0', "")).unwrap_or_default();
        Box::into_raw(Box::new(FfiResponse {
            status: response.status,
            body: body.into_raw(),
        }))
    }
}
