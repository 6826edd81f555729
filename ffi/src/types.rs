//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, pointer plus length instead of `Vec`,
//! and enums with explicit discriminants. Arrays are handed out as boxed
//! slices so they can be rebuilt exactly for freeing. Conversions and the
//! matching release helpers live here to keep `lib.rs` focused on the
//! `extern "C"` surface.

use std::ffi::{c_void, CString};
use std::os::raw::c_char;
use std::ptr;

use genericbro_core::{
    ApiError, HttpMethod, HttpRequest, Medicine, MedicineClient, SearchResponse, SortOrder,
    SuggestionField, Theme,
};

/// Opaque handle to a `MedicineClient`. C callers receive a pointer to this
/// and pass it back into every FFI function.
pub struct FfiMedicineClient {
    pub(crate) inner: MedicineClient,
}

/// Convert to a heap C string. Interior NULs are dropped rather than
/// failing the whole conversion.
pub(crate) fn to_c_string(s: impl Into<Vec<u8>>) -> *mut c_char {
    let c = CString::new(s).unwrap_or_else(|err| {
        let mut bytes = err.into_vec();
        bytes.retain(|b| *b != 0);
        CString::new(bytes).unwrap_or_default()
    });
    c.into_raw()
}

fn optional_c_string(s: Option<String>) -> *mut c_char {
    s.map_or(ptr::null_mut(), to_c_string)
}

/// Free a string produced by [`to_c_string`]. Null is ignored.
///
/// # Safety
/// `s` must come from [`to_c_string`] and not have been freed already.
pub(crate) unsafe fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

/// Leak a vector as a boxed slice; empty vectors become null.
fn leak_slice<T>(items: Vec<T>) -> (*mut T, u32) {
    if items.is_empty() {
        return (ptr::null_mut(), 0);
    }
    let len = items.len() as u32;
    (Box::into_raw(items.into_boxed_slice()) as *mut T, len)
}

/// Reclaim a slice produced by [`leak_slice`].
///
/// # Safety
/// `items`/`len` must be exactly what `leak_slice` returned.
unsafe fn reclaim_slice<T>(items: *mut T, len: u32) -> Vec<T> {
    if items.is_null() || len == 0 {
        return Vec::new();
    }
    let slice = ptr::slice_from_raw_parts_mut(items, len as usize);
    unsafe { Box::from_raw(slice) }.into_vec()
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Client-side sort order. `None` keeps server order and omits the query
/// parameter.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FfiSortOrder {
    None = 0,
    LowToHigh = 1,
    HighToLow = 2,
}

impl From<FfiSortOrder> for SortOrder {
    fn from(order: FfiSortOrder) -> Self {
        match order {
            FfiSortOrder::None => SortOrder::None,
            FfiSortOrder::LowToHigh => SortOrder::LowToHigh,
            FfiSortOrder::HighToLow => SortOrder::HighToLow,
        }
    }
}

/// Column an autocomplete query runs against.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FfiSuggestionField {
    Name = 0,
    Formulation = 1,
    Type = 2,
    Dosage = 3,
}

impl From<FfiSuggestionField> for SuggestionField {
    fn from(field: FfiSuggestionField) -> Self {
        match field {
            FfiSuggestionField::Name => SuggestionField::Name,
            FfiSuggestionField::Formulation => SuggestionField::Formulation,
            FfiSuggestionField::Type => SuggestionField::Type,
            FfiSuggestionField::Dosage => SuggestionField::Dosage,
        }
    }
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// Built by `genericbro_build_*` functions. The host executes the request
/// and passes the response back through `genericbro_parse_*`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    /// Absolute URL, query string included.
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    /// JSON body, or null.
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    pub(crate) fn from_core(req: HttpRequest) -> *mut Self {
        let headers = req
            .headers
            .into_iter()
            .map(|(key, value)| FfiHeader {
                key: to_c_string(key),
                value: to_c_string(value),
            })
            .collect();
        let (headers, headers_len) = leak_slice(headers);
        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            url: to_c_string(req.url),
            headers,
            headers_len,
            body: optional_c_string(req.body),
        }))
    }

    /// # Safety
    /// `req` must come from [`FfiHttpRequest::from_core`] and be freed once.
    pub(crate) unsafe fn release(req: *mut Self) {
        let req = unsafe { Box::from_raw(req) };
        unsafe {
            free_c_string(req.url);
            free_c_string(req.body);
            for header in reclaim_slice(req.headers, req.headers_len) {
                free_c_string(header.key);
                free_c_string(header.value);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The host builds this after executing a request and passes a pointer to a
/// `genericbro_parse_*` function. The FFI layer reads but does not free
/// these fields. A null body is treated as empty.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

#[repr(C)]
pub struct FfiMedicine {
    pub name: *mut c_char,
    pub dosage: *mut c_char,
    pub formulation: *mut c_char,
    pub medicine_type: *mut c_char,
    pub uses: *mut c_char,
    pub side_effects: *mut c_char,
    pub cost_of_branded: f64,
    pub cost_of_generic: f64,
    /// Server value, or branded minus generic.
    pub cost_difference: f64,
    /// Percentage saved; meaningful only when `has_savings` is true.
    pub savings: f64,
    pub has_savings: bool,
}

impl FfiMedicine {
    fn from_core(medicine: Medicine) -> Self {
        let cost_difference = medicine.effective_cost_difference();
        let savings = medicine.effective_savings();
        FfiMedicine {
            name: to_c_string(medicine.name),
            dosage: to_c_string(medicine.dosage),
            formulation: to_c_string(medicine.formulation),
            medicine_type: to_c_string(medicine.medicine_type),
            uses: to_c_string(medicine.uses),
            side_effects: to_c_string(medicine.side_effects),
            cost_of_branded: medicine.cost_of_branded,
            cost_of_generic: medicine.cost_of_generic,
            cost_difference,
            savings: savings.unwrap_or(0.0),
            has_savings: savings.is_some(),
        }
    }

    /// Free the C-string fields (but not the struct itself).
    unsafe fn release_fields(&self) {
        unsafe {
            free_c_string(self.name);
            free_c_string(self.dosage);
            free_c_string(self.formulation);
            free_c_string(self.medicine_type);
            free_c_string(self.uses);
            free_c_string(self.side_effects);
        }
    }
}

#[repr(C)]
pub struct FfiMedicineList {
    pub items: *mut FfiMedicine,
    pub len: u32,
}

impl FfiMedicineList {
    fn from_core(medicines: Vec<Medicine>) -> Self {
        let (items, len) = leak_slice(medicines.into_iter().map(FfiMedicine::from_core).collect());
        FfiMedicineList { items, len }
    }

    unsafe fn release_items(&self) {
        for item in unsafe { reclaim_slice(self.items, self.len) } {
            unsafe { item.release_fields() };
        }
    }
}

/// Parsed search response. `exact_match`, `uses` and `side_effects` are
/// null when absent.
#[repr(C)]
pub struct FfiSearchResponse {
    pub exact_match: *mut FfiMedicine,
    pub similar: FfiMedicineList,
    pub uses: *mut c_char,
    pub side_effects: *mut c_char,
}

impl FfiSearchResponse {
    fn from_core(response: SearchResponse) -> Self {
        FfiSearchResponse {
            exact_match: response
                .exact_match
                .map_or(ptr::null_mut(), |m| Box::into_raw(Box::new(FfiMedicine::from_core(m)))),
            similar: FfiMedicineList::from_core(response.similar_formulations),
            uses: optional_c_string(response.uses),
            side_effects: optional_c_string(response.side_effects),
        }
    }
}

#[repr(C)]
pub struct FfiStringList {
    pub items: *mut *mut c_char,
    pub len: u32,
}

/// Presentation constants, mirrored from the core `Theme`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FfiTheme {
    pub primary: u32,
    pub secondary: u32,
    pub background: u32,
    pub surface: u32,
    pub error: u32,
    pub savings_highlight: u32,
    pub text_primary: u32,
    pub text_secondary: u32,
    pub spacing_small: f32,
    pub spacing_medium: f32,
    pub spacing_large: f32,
    pub corner_radius: f32,
}

impl From<Theme> for FfiTheme {
    fn from(t: Theme) -> Self {
        FfiTheme {
            primary: t.primary,
            secondary: t.secondary,
            background: t.background,
            surface: t.surface,
            error: t.error,
            savings_highlight: t.savings_highlight,
            text_primary: t.text_primary,
            text_secondary: t.text_secondary,
            spacing_small: t.spacing_small,
            spacing_medium: t.spacing_medium,
            spacing_large: t.spacing_large,
            corner_radius: t.corner_radius,
        }
    }
}

// ---------------------------------------------------------------------------
// Result envelope
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiResult`.
#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    NotFound = 1,
    Http = 2,
    Deserialization = 3,
    Serialization = 4,
    Panic = 5,
    NullArg = 6,
    InvalidUrl = 7,
    EmptyCriteria = 8,
    Transport = 9,
    Timeout = 10,
}

/// Tag that tells `genericbro_free_result` what `FfiResult::data` points to.
#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub enum FfiDataTag {
    None = 0,
    Medicine = 1,
    MedicineList = 2,
    SearchResponse = 3,
    StringList = 4,
}

/// Result envelope for all parse operations.
///
/// On success `error_code` is `Ok`, `error_message` is null, and `data`
/// points to the payload named by `data_tag`. On failure `error_code`
/// describes the category, `error_message` is a C string, `http_status`
/// is set when the server answered, and `data` is null.
#[repr(C)]
pub struct FfiResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub data_tag: FfiDataTag,
    pub data: *mut c_void,
}

impl FfiResult {
    fn ok<T>(data_tag: FfiDataTag, payload: T) -> *mut Self {
        Box::into_raw(Box::new(FfiResult {
            error_code: FfiErrorCode::Ok,
            error_message: ptr::null_mut(),
            http_status: 0,
            data_tag,
            data: Box::into_raw(Box::new(payload)) as *mut c_void,
        }))
    }

    fn err(error_code: FfiErrorCode, http_status: u16, message: String) -> *mut Self {
        Box::into_raw(Box::new(FfiResult {
            error_code,
            error_message: to_c_string(message),
            http_status,
            data_tag: FfiDataTag::None,
            data: ptr::null_mut(),
        }))
    }

    pub(crate) fn ok_medicine(medicine: Medicine) -> *mut Self {
        Self::ok(FfiDataTag::Medicine, FfiMedicine::from_core(medicine))
    }

    pub(crate) fn ok_medicine_list(medicines: Vec<Medicine>) -> *mut Self {
        Self::ok(FfiDataTag::MedicineList, FfiMedicineList::from_core(medicines))
    }

    pub(crate) fn ok_search(response: SearchResponse) -> *mut Self {
        Self::ok(FfiDataTag::SearchResponse, FfiSearchResponse::from_core(response))
    }

    pub(crate) fn ok_strings(values: Vec<String>) -> *mut Self {
        let (items, len) = leak_slice(values.into_iter().map(to_c_string).collect());
        Self::ok(FfiDataTag::StringList, FfiStringList { items, len })
    }

    pub(crate) fn from_error(err: ApiError) -> *mut Self {
        let http_status = err.status().unwrap_or(0);
        let code = match &err {
            ApiError::NotFound { .. } => FfiErrorCode::NotFound,
            ApiError::Http { .. } => FfiErrorCode::Http,
            ApiError::Deserialization(_) => FfiErrorCode::Deserialization,
            ApiError::Serialization(_) => FfiErrorCode::Serialization,
            ApiError::InvalidUrl(_) => FfiErrorCode::InvalidUrl,
            ApiError::EmptyCriteria => FfiErrorCode::EmptyCriteria,
            ApiError::Transport(_) | ApiError::RetriesExhausted { .. } => FfiErrorCode::Transport,
            ApiError::Timeout(_) => FfiErrorCode::Timeout,
        };
        Self::err(code, http_status, err.to_string())
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::err(FfiErrorCode::NullArg, 0, format!("null argument: {name}"))
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::err(FfiErrorCode::Panic, 0, msg.to_string())
    }

    /// # Safety
    /// `result` must come from one of the constructors above and be freed
    /// once.
    pub(crate) unsafe fn release(result: *mut Self) {
        let result = unsafe { Box::from_raw(result) };
        unsafe { free_c_string(result.error_message) };
        if result.data.is_null() {
            return;
        }
        match result.data_tag {
            FfiDataTag::Medicine => {
                let medicine = unsafe { Box::from_raw(result.data as *mut FfiMedicine) };
                unsafe { medicine.release_fields() };
            }
            FfiDataTag::MedicineList => {
                let list = unsafe { Box::from_raw(result.data as *mut FfiMedicineList) };
                unsafe { list.release_items() };
            }
            FfiDataTag::SearchResponse => {
                let response = unsafe { Box::from_raw(result.data as *mut FfiSearchResponse) };
                if !response.exact_match.is_null() {
                    let exact = unsafe { Box::from_raw(response.exact_match) };
                    unsafe { exact.release_fields() };
                }
                unsafe {
                    response.similar.release_items();
                    free_c_string(response.uses);
                    free_c_string(response.side_effects);
                }
            }
            FfiDataTag::StringList => {
                let list = unsafe { Box::from_raw(result.data as *mut FfiStringList) };
                for s in unsafe { reclaim_slice(list.items, list.len) } {
                    unsafe { free_c_string(s) };
                }
            }
            FfiDataTag::None => {}
        }
    }
}
