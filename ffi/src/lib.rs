//! C-ABI wrapper around `genericbro-core`.
//!
//! # Overview
//! Exposes the medicine finder's request building and response parsing
//! through `extern "C"` functions. The host (a mobile app) performs the
//! HTTP call itself; no async runtime or serde crosses the boundary.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - `genericbro_build_*` / `genericbro_parse_*` mirror the core client 1:1.
//!   Parsing search and type listings also applies the client-side sort by
//!   generic price.
//! - A single `FfiResult` envelope with `FfiDataTag` + `void* data`
//!   conveys success payloads and errors uniformly.
//! - The host owns all returned pointers and must call the matching
//!   `genericbro_free_*` function to release them.

pub mod types;

use std::ffi::CStr;
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::ptr;

use genericbro_core::{
    sort_by_generic_price, HttpResponse, MedicineClient, SearchCriteria, SortOrder, Theme,
};

use types::*;

/// Borrow a C string as UTF-8. Null and invalid UTF-8 both yield `None`.
///
/// # Safety
/// A non-null `s` must point to a NUL-terminated string that outlives the
/// returned reference.
unsafe fn str_arg<'a>(s: *const c_char) -> Option<&'a str> {
    if s.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(s) }.to_str().ok()
}

fn ffi_response_to_core(resp: &FfiHttpResponse) -> HttpResponse {
    let body = unsafe { str_arg(resp.body) }.unwrap_or("");
    HttpResponse::new(resp.status, body)
}

/// Shared body of every `genericbro_build_*`: null client or a panic give
/// null, otherwise whatever `build` decides.
fn build_with(
    client: *const FfiMedicineClient,
    build: impl FnOnce(&MedicineClient) -> *mut FfiHttpRequest,
) -> *mut FfiHttpRequest {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return ptr::null_mut();
        }
        let client = unsafe { &*client };
        build(&client.inner)
    }))
    .unwrap_or(ptr::null_mut())
}

/// Shared body of every `genericbro_parse_*`: null checks, response
/// conversion and panic capture.
fn parse_with(
    name: &str,
    client: *const FfiMedicineClient,
    response: *const FfiHttpResponse,
    parse: impl FnOnce(&MedicineClient, HttpResponse) -> *mut FfiResult,
) -> *mut FfiResult {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return FfiResult::null_arg("client");
        }
        if response.is_null() {
            return FfiResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let response = ffi_response_to_core(unsafe { &*response });
        parse(&client.inner, response)
    }))
    .unwrap_or_else(|_| FfiResult::panic(&format!("panic in {name}")))
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a client bound to `base_url` (for example
/// `http://127.0.0.1:8000/finder`).
///
/// Returns null if `base_url` is null, not UTF-8, or not an absolute
/// http(s)-style URL. Free with `genericbro_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn genericbro_client_new(base_url: *const c_char) -> *mut FfiMedicineClient {
    catch_unwind(|| {
        let Some(url) = (unsafe { str_arg(base_url) }) else {
            return ptr::null_mut();
        };
        match MedicineClient::new(url) {
            Ok(inner) => Box::into_raw(Box::new(FfiMedicineClient { inner })),
            Err(_) => ptr::null_mut(),
        }
    })
    .unwrap_or(ptr::null_mut())
}

/// Free a client created by `genericbro_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn genericbro_client_free(client: *mut FfiMedicineClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Build request functions
// ---------------------------------------------------------------------------

/// Build `GET /suggestions/{field}?query=...`.
///
/// Returns null for a null client, a null query, or an empty query: there
/// is nothing to ask the server in that case.
#[unsafe(no_mangle)]
pub extern "C" fn genericbro_build_suggestions(
    client: *const FfiMedicineClient,
    field: FfiSuggestionField,
    query: *const c_char,
) -> *mut FfiHttpRequest {
    build_with(client, |client| {
        let query = match unsafe { str_arg(query) } {
            Some(q) if !q.is_empty() => q,
            _ => return ptr::null_mut(),
        };
        client
            .build_suggestions(field.into(), query)
            .map_or(ptr::null_mut(), FfiHttpRequest::from_core)
    })
}

/// Build `POST /search`. Any of the four criteria may be null; blank values
/// are dropped.
///
/// Returns null when no criterion is left.
#[unsafe(no_mangle)]
pub extern "C" fn genericbro_build_search(
    client: *const FfiMedicineClient,
    name: *const c_char,
    formulation: *const c_char,
    medicine_type: *const c_char,
    dosage: *const c_char,
    sort_order: FfiSortOrder,
) -> *mut FfiHttpRequest {
    build_with(client, |client| {
        let criteria = unsafe {
            SearchCriteria::new(
                str_arg(name),
                str_arg(formulation),
                str_arg(medicine_type),
                str_arg(dosage),
            )
        };
        let sort_order = SortOrder::from(sort_order).as_param();
        client
            .build_search(&criteria, sort_order)
            .map_or(ptr::null_mut(), FfiHttpRequest::from_core)
    })
}

/// Build `GET /medicine/{name}`. Returns null if `name` is null.
#[unsafe(no_mangle)]
pub extern "C" fn genericbro_build_medicine_details(
    client: *const FfiMedicineClient,
    name: *const c_char,
) -> *mut FfiHttpRequest {
    build_with(client, |client| {
        let Some(name) = (unsafe { str_arg(name) }) else {
            return ptr::null_mut();
        };
        client
            .build_medicine_details(name)
            .map_or(ptr::null_mut(), FfiHttpRequest::from_core)
    })
}

/// Build `GET /medicines/by_type`. Returns null if `medicine_type` is null.
#[unsafe(no_mangle)]
pub extern "C" fn genericbro_build_medicines_by_type(
    client: *const FfiMedicineClient,
    medicine_type: *const c_char,
    sort_order: FfiSortOrder,
) -> *mut FfiHttpRequest {
    build_with(client, |client| {
        let Some(medicine_type) = (unsafe { str_arg(medicine_type) }) else {
            return ptr::null_mut();
        };
        client
            .build_medicines_by_type(medicine_type, SortOrder::from(sort_order).as_param())
            .map_or(ptr::null_mut(), FfiHttpRequest::from_core)
    })
}

// ---------------------------------------------------------------------------
// Parse response functions
// ---------------------------------------------------------------------------

/// Returns a result with `data_tag = StringList` on success.
#[unsafe(no_mangle)]
pub extern "C" fn genericbro_parse_suggestions(
    client: *const FfiMedicineClient,
    response: *const FfiHttpResponse,
) -> *mut FfiResult {
    parse_with("genericbro_parse_suggestions", client, response, |c, r| {
        match c.parse_suggestions(r) {
            Ok(values) => FfiResult::ok_strings(values),
            Err(e) => FfiResult::from_error(e),
        }
    })
}

/// Returns a result with `data_tag = SearchResponse` on success. The
/// similar list is sorted by generic price according to `sort_order`.
#[unsafe(no_mangle)]
pub extern "C" fn genericbro_parse_search(
    client: *const FfiMedicineClient,
    response: *const FfiHttpResponse,
    sort_order: FfiSortOrder,
) -> *mut FfiResult {
    parse_with("genericbro_parse_search", client, response, |c, r| {
        match c.parse_search(r) {
            Ok(mut search) => {
                sort_by_generic_price(&mut search.similar_formulations, sort_order.into());
                FfiResult::ok_search(search)
            }
            Err(e) => FfiResult::from_error(e),
        }
    })
}

/// Returns a result with `data_tag = Medicine` on success.
#[unsafe(no_mangle)]
pub extern "C" fn genericbro_parse_medicine_details(
    client: *const FfiMedicineClient,
    response: *const FfiHttpResponse,
) -> *mut FfiResult {
    parse_with("genericbro_parse_medicine_details", client, response, |c, r| {
        match c.parse_medicine_details(r) {
            Ok(medicine) => FfiResult::ok_medicine(medicine),
            Err(e) => FfiResult::from_error(e),
        }
    })
}

/// Returns a result with `data_tag = MedicineList` on success, sorted by
/// generic price according to `sort_order`.
#[unsafe(no_mangle)]
pub extern "C" fn genericbro_parse_medicines_by_type(
    client: *const FfiMedicineClient,
    response: *const FfiHttpResponse,
    sort_order: FfiSortOrder,
) -> *mut FfiResult {
    parse_with("genericbro_parse_medicines_by_type", client, response, |c, r| {
        match c.parse_medicines_by_type(r) {
            Ok(mut medicines) => {
                sort_by_generic_price(&mut medicines, sort_order.into());
                FfiResult::ok_medicine_list(medicines)
            }
            Err(e) => FfiResult::from_error(e),
        }
    })
}

/// Default presentation constants, returned by value.
#[unsafe(no_mangle)]
pub extern "C" fn genericbro_theme_default() -> FfiTheme {
    Theme::default().into()
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free a request returned by any `genericbro_build_*`. Safe with null.
#[unsafe(no_mangle)]
pub extern "C" fn genericbro_free_request(req: *mut FfiHttpRequest) {
    if !req.is_null() {
        let _ = catch_unwind(|| unsafe { FfiHttpRequest::release(req) });
    }
}

/// Free a result returned by any `genericbro_parse_*`, payload included.
/// Safe with null.
#[unsafe(no_mangle)]
pub extern "C" fn genericbro_free_result(result: *mut FfiResult) {
    if !result.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| unsafe { FfiResult::release(result) }));
    }
}

/// Free a string handed out by this library. Safe with null.
#[unsafe(no_mangle)]
pub extern "C" fn genericbro_free_string(s: *mut c_char) {
    let _ = catch_unwind(|| unsafe { free_c_string(s) });
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
