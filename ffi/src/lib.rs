//! C-ABI wrapper around `drip-core`.
//!
//! # Overview
//! Exposes the host-does-IO half of the orders client through `extern "C"`
//! functions: build the request for an operation, let the C host execute the
//! HTTP round-trip, then normalize whatever came back into a response.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Records cross the boundary as JSON object strings and are parsed with
//!   order-preserving maps, so key order survives into the request body.
//! - Build functions return null on any bad input (null pointer, invalid
//!   UTF-8, malformed JSON, missing order id).
//! - The C caller owns all returned pointers and must call the matching
//!   `drip_free_*` function to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::catch_unwind;

use drip_core::{normalize, HttpResponse, Order, Refund, RequestBuilder, TransportError};

use types::*;

/// Borrow a C string as `&str`. Null or invalid UTF-8 yields `None`.
fn c_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

/// Parse an optional JSON object string. Null means an empty record.
fn parse_record<T: serde::de::DeserializeOwned + Default>(ptr: *const c_char) -> Option<T> {
    if ptr.is_null() {
        return Some(T::default());
    }
    serde_json::from_str(c_str(ptr)?).ok()
}

// ---------------------------------------------------------------------------
// Builder lifecycle
// ---------------------------------------------------------------------------

/// Create a request builder bound to `account_id`.
///
/// Returns null if `account_id` is null, not UTF-8, or empty.
/// The caller must free the returned pointer with `drip_builder_free`.
#[unsafe(no_mangle)]
pub extern "C" fn drip_builder_new(account_id: *const c_char) -> *mut FfiDripBuilder {
    catch_unwind(|| {
        let Some(account_id) = c_str(account_id).filter(|s| !s.is_empty()) else {
            return std::ptr::null_mut();
        };
        let inner = RequestBuilder::new(account_id);
        Box::into_raw(Box::new(FfiDripBuilder { inner }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a builder created by `drip_builder_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn drip_builder_free(builder: *mut FfiDripBuilder) {
    if !builder.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(builder) });
        });
    }
}

// ---------------------------------------------------------------------------
// Build request functions
// ---------------------------------------------------------------------------

/// Build the request for upserting one order.
///
/// `options_json` is a JSON object of order fields, or null. `email`
/// overwrites any email it contains.
/// The caller must free the returned pointer with `drip_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn drip_build_create_or_update_order(
    builder: *const FfiDripBuilder,
    email: *const c_char,
    options_json: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if builder.is_null() {
            return std::ptr::null_mut();
        }
        let builder = unsafe { &*builder };
        let Some(email) = c_str(email) else {
            return std::ptr::null_mut();
        };
        let Some(options) = parse_record::<Order>(options_json) else {
            return std::ptr::null_mut();
        };
        match builder.inner.build_create_or_update_order(email, options) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build the request for upserting a batch of orders.
///
/// `orders_json` must be a JSON array of order objects.
#[unsafe(no_mangle)]
pub extern "C" fn drip_build_create_or_update_orders(
    builder: *const FfiDripBuilder,
    orders_json: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if builder.is_null() {
            return std::ptr::null_mut();
        }
        let builder = unsafe { &*builder };
        let Some(orders) = c_str(orders_json).and_then(|s| serde_json::from_str::<Vec<Order>>(s).ok())
        else {
            return std::ptr::null_mut();
        };
        match builder.inner.build_create_or_update_orders(orders) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build the request for upserting a refund against `order_id`.
///
/// `options_json` is a JSON object of refund fields, or null. `amount`
/// overwrites any amount it contains. Returns null if `order_id` is null or
/// empty.
#[unsafe(no_mangle)]
pub extern "C" fn drip_build_create_or_update_refund(
    builder: *const FfiDripBuilder,
    order_id: *const c_char,
    amount: i64,
    options_json: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if builder.is_null() {
            return std::ptr::null_mut();
        }
        let builder = unsafe { &*builder };
        let Some(order_id) = c_str(order_id) else {
            return std::ptr::null_mut();
        };
        let Some(options) = parse_record::<Refund>(options_json) else {
            return std::ptr::null_mut();
        };
        match builder.inner.build_create_or_update_refund(order_id, amount, options) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Normalize functions
// ---------------------------------------------------------------------------

/// Normalize an HTTP response the host received. Any status is accepted.
/// A null `body` is treated as empty; invalid UTF-8 is replaced with U+FFFD.
///
/// The caller must free the returned pointer with `drip_free_response`.
#[unsafe(no_mangle)]
pub extern "C" fn drip_normalize_response(status: u16, body: *const c_char) -> *mut FfiResponse {
    catch_unwind(|| {
        let body = if body.is_null() {
            String::new()
        } else {
            unsafe { CStr::from_ptr(body) }.to_string_lossy().into_owned()
        };
        let response = normalize(Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body,
        }));
        FfiResponse::from_core(response)
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Normalize a failure to obtain any HTTP response. The result has status 0
/// and a body describing `message`.
#[unsafe(no_mangle)]
pub extern "C" fn drip_normalize_transport_failure(message: *const c_char) -> *mut FfiResponse {
    catch_unwind(|| {
        let message = c_str(message).unwrap_or("unknown").to_string();
        FfiResponse::from_core(normalize(Err(TransportError::Other(message))))
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by any `drip_build_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn drip_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        if !req.path.is_null() {
            drop(unsafe { CString::from_raw(req.path) });
        }
        if !req.body.is_null() {
            drop(unsafe { CString::from_raw(req.body) });
        }
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                    req.headers,
                    req.headers_len as usize,
                ))
            };
            for h in headers.iter() {
                if !h.key.is_null() {
                    drop(unsafe { CString::from_raw(h.key) });
                }
                if !h.value.is_null() {
                    drop(unsafe { CString::from_raw(h.value) });
                }
            }
        }
    });
}

/// Free an `FfiResponse` returned by a `drip_normalize_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn drip_free_response(response: *mut FfiResponse) {
    if response.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let response = unsafe { Box::from_raw(response) };
        if !response.body.is_null() {
            drop(unsafe { CString::from_raw(response.body) });
        }
    });
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
