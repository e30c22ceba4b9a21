//! FFI bindings for the wellness core
//!
//! This module provides C-compatible functions so a web shell written in
//! another language can call the core in-process. All functions use C strings
//! (null-terminated) and return allocated memory that must be freed by the
//! caller using `wellness_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use crate::history::DEFAULT_PAGE_SIZE;
use crate::pipeline::{calorie_burn_to_json, summary_to_json, WellnessProcessor};
use crate::schema::CalorieBurnForm;
use crate::types::SummaryPeriod;

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Set the last error message
fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

/// Clear the last error message
fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Helper to convert C string to Rust string
unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Like `cstr_to_string`, but NULL means "not given"
unsafe fn optional_cstr(ptr: *const c_char) -> Result<Option<String>, ()> {
    if ptr.is_null() {
        return Ok(None);
    }
    CStr::from_ptr(ptr)
        .to_str()
        .map(|s| Some(s.to_string()))
        .map_err(|_| ())
}

/// Helper to convert Rust string to C string (caller must free)
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

// ============================================================================
// Stateless API
// ============================================================================

/// Estimate calories for a profile and a calorie-burn form, both JSON.
///
/// # Safety
/// - `profile_json` and `form_json` must be valid null-terminated C strings.
/// - Returns a newly allocated string that must be freed with `wellness_free_string`.
/// - Returns NULL on error; call `wellness_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn wellness_calorie_burn(
    profile_json: *const c_char,
    form_json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let profile_str = match cstr_to_string(profile_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid profile string pointer");
            return ptr::null_mut();
        }
    };

    let form_str = match cstr_to_string(form_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid form string pointer");
            return ptr::null_mut();
        }
    };

    match calorie_burn_to_json(profile_str, form_str) {
        Ok(report) => string_to_cstr(&report),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Summarize a log history (JSON array or NDJSON) for a period ("week" or "month").
///
/// # Safety
/// - `logs_json` and `period` must be valid null-terminated C strings.
/// - Returns a newly allocated string that must be freed with `wellness_free_string`.
/// - Returns NULL on error; call `wellness_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn wellness_summary(
    logs_json: *const c_char,
    period: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let logs_str = match cstr_to_string(logs_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid logs string pointer");
            return ptr::null_mut();
        }
    };

    let period_str = match cstr_to_string(period) {
        Some(s) => s,
        None => {
            set_last_error("Invalid period string pointer");
            return ptr::null_mut();
        }
    };

    match summary_to_json(logs_str, period_str) {
        Ok(report) => string_to_cstr(&report),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Stateful Processor API
// ============================================================================

/// Opaque handle to a WellnessProcessor
pub struct WellnessProcessorHandle {
    processor: WellnessProcessor,
}

/// Create a new WellnessProcessor with the specified history page size.
///
/// # Safety
/// - Returns a pointer to a newly allocated WellnessProcessor.
/// - Must be freed with `wellness_processor_free`.
#[no_mangle]
pub unsafe extern "C" fn wellness_processor_new(page_size: i32) -> *mut WellnessProcessorHandle {
    clear_last_error();

    let page_size = if page_size <= 0 {
        DEFAULT_PAGE_SIZE
    } else {
        page_size as usize
    };

    let processor = WellnessProcessor::with_page_size(page_size);
    let handle = Box::new(WellnessProcessorHandle { processor });
    Box::into_raw(handle)
}

/// Free a WellnessProcessor.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `wellness_processor_new`.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn wellness_processor_free(processor: *mut WellnessProcessorHandle) {
    if !processor.is_null() {
        drop(Box::from_raw(processor));
    }
}

/// Load the user profile into a processor.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `wellness_processor_new`.
/// - `json` must be a valid null-terminated C string.
/// - Returns 0 on success, -1 on error; call `wellness_last_error` for details.
#[no_mangle]
pub unsafe extern "C" fn wellness_processor_load_profile(
    processor: *mut WellnessProcessorHandle,
    json: *const c_char,
) -> i32 {
    clear_last_error();

    if processor.is_null() {
        set_last_error("Null processor pointer");
        return -1;
    }

    let handle = &mut *processor;

    let json_str = match cstr_to_string(json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return -1;
        }
    };

    match handle.processor.load_profile(&json_str) {
        Ok(()) => 0,
        Err(e) => {
            set_last_error(&e.to_string());
            -1
        }
    }
}

/// Load the log history (JSON array or NDJSON) into a processor.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `wellness_processor_new`.
/// - `json` must be a valid null-terminated C string.
/// - Returns the number of logs loaded, or -1 on error.
#[no_mangle]
pub unsafe extern "C" fn wellness_processor_load_logs(
    processor: *mut WellnessProcessorHandle,
    json: *const c_char,
) -> i32 {
    clear_last_error();

    if processor.is_null() {
        set_last_error("Null processor pointer");
        return -1;
    }

    let handle = &mut *processor;

    let json_str = match cstr_to_string(json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return -1;
        }
    };

    match handle.processor.load_logs(&json_str) {
        Ok(count) => i32::try_from(count).unwrap_or(i32::MAX),
        Err(e) => {
            set_last_error(&e.to_string());
            -1
        }
    }
}

/// Save the processor's log history as a JSON array.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `wellness_processor_new`.
/// - Returns a newly allocated string that must be freed with `wellness_free_string`.
/// - Returns NULL on error; call `wellness_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn wellness_processor_save_logs(
    processor: *mut WellnessProcessorHandle,
) -> *mut c_char {
    clear_last_error();

    if processor.is_null() {
        set_last_error("Null processor pointer");
        return ptr::null_mut();
    }

    let handle = &*processor;

    match handle.processor.save_logs() {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Estimate a calorie-burn form against the processor's profile.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `wellness_processor_new`.
/// - `form_json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `wellness_free_string`.
/// - Returns NULL on error; call `wellness_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn wellness_processor_calorie_burn(
    processor: *mut WellnessProcessorHandle,
    form_json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    if processor.is_null() {
        set_last_error("Null processor pointer");
        return ptr::null_mut();
    }

    let handle = &*processor;

    let form_str = match cstr_to_string(form_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid form string pointer");
            return ptr::null_mut();
        }
    };

    let form: CalorieBurnForm = match serde_json::from_str(&form_str) {
        Ok(form) => form,
        Err(e) => {
            set_last_error(&e.to_string());
            return ptr::null_mut();
        }
    };

    match handle.processor.calorie_burn_json(&form) {
        Ok(report) => string_to_cstr(&report),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Summarize the processor's logs. `period` may be NULL for the default week.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `wellness_processor_new`.
/// - `period` must be NULL or a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `wellness_free_string`.
/// - Returns NULL on error; call `wellness_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn wellness_processor_summary(
    processor: *mut WellnessProcessorHandle,
    period: *const c_char,
) -> *mut c_char {
    clear_last_error();

    if processor.is_null() {
        set_last_error("Null processor pointer");
        return ptr::null_mut();
    }

    let handle = &*processor;

    let period = match optional_cstr(period) {
        Ok(p) => SummaryPeriod::from_query(p.as_deref()),
        Err(()) => {
            set_last_error("Invalid period string");
            return ptr::null_mut();
        }
    };

    match handle.processor.summary_json(period) {
        Ok(report) => string_to_cstr(&report),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Render one history page. `page` and `search_date` may be NULL.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `wellness_processor_new`.
/// - `page` and `search_date` must be NULL or valid null-terminated C strings.
/// - Returns a newly allocated string that must be freed with `wellness_free_string`.
/// - Returns NULL on error; call `wellness_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn wellness_processor_dashboard(
    processor: *mut WellnessProcessorHandle,
    page: *const c_char,
    search_date: *const c_char,
) -> *mut c_char {
    clear_last_error();

    if processor.is_null() {
        set_last_error("Null processor pointer");
        return ptr::null_mut();
    }

    let handle = &*processor;

    let (page, search_date) = match (optional_cstr(page), optional_cstr(search_date)) {
        (Ok(page), Ok(search)) => (page, search),
        _ => {
            set_last_error("Invalid page or search string");
            return ptr::null_mut();
        }
    };

    match handle
        .processor
        .dashboard_json(page.as_deref(), search_date.as_deref())
    {
        Ok(report) => string_to_cstr(&report),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by wellness functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a wellness function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn wellness_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Get the last error message.
///
/// # Safety
/// - Returns a pointer to a thread-local error string.
/// - The returned pointer is valid until the next wellness function call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn wellness_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

// ============================================================================
// Version Information
// ============================================================================

/// Get the library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn wellness_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    fn sample_profile() -> CString {
        CString::new(r#"{"weight_kg": 70.0, "calorie_goal": 300}"#).unwrap()
    }

    fn sample_logs() -> CString {
        CString::new(
            r#"[
                {"id": 1, "date": "2024-01-01", "water_intake_ml": 1000, "mood": "Happy"},
                {"id": 2, "date": "2024-01-02", "water_intake_ml": 2000, "mood": "Sad"}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_ffi_calorie_burn() {
        let profile = sample_profile();
        let form = CString::new(r#"{"exercise_type": "Walking", "duration": 60}"#).unwrap();

        unsafe {
            let result = wellness_calorie_burn(profile.as_ptr(), form.as_ptr());
            assert!(!result.is_null());

            let result_str = CStr::from_ptr(result).to_str().unwrap();
            assert!(result_str.contains("calories_kcal"));
            assert!(result_str.contains("245.0"));

            wellness_free_string(result);
        }
    }

    #[test]
    fn test_ffi_summary() {
        let logs = sample_logs();
        let period = CString::new("week").unwrap();

        unsafe {
            let result = wellness_summary(logs.as_ptr(), period.as_ptr());
            assert!(!result.is_null());

            let value: serde_json::Value =
                serde_json::from_str(CStr::from_ptr(result).to_str().unwrap()).unwrap();
            assert_eq!(value["report"]["summary"]["avg_water_ml"], 1500.0);

            wellness_free_string(result);
        }
    }

    #[test]
    fn test_ffi_processor_lifecycle() {
        unsafe {
            let processor = wellness_processor_new(7);
            assert!(!processor.is_null());

            let profile = sample_profile();
            assert_eq!(wellness_processor_load_profile(processor, profile.as_ptr()), 0);

            let logs = sample_logs();
            assert_eq!(wellness_processor_load_logs(processor, logs.as_ptr()), 2);

            let form = CString::new(r#"{"exercise_type": "Yoga", "duration": 30}"#).unwrap();
            let burn = wellness_processor_calorie_burn(processor, form.as_ptr());
            assert!(!burn.is_null());
            wellness_free_string(burn);

            let summary = wellness_processor_summary(processor, ptr::null());
            assert!(!summary.is_null());
            wellness_free_string(summary);

            let page = CString::new("1").unwrap();
            let dashboard = wellness_processor_dashboard(processor, page.as_ptr(), ptr::null());
            assert!(!dashboard.is_null());
            wellness_free_string(dashboard);

            let saved = wellness_processor_save_logs(processor);
            assert!(!saved.is_null());

            let processor2 = wellness_processor_new(0);
            assert_eq!(wellness_processor_load_logs(processor2, saved), 2);

            wellness_free_string(saved);
            wellness_processor_free(processor);
            wellness_processor_free(processor2);
        }
    }

    #[test]
    fn test_ffi_error_handling() {
        unsafe {
            let profile = CString::new(r#"{"calorie_goal": 300}"#).unwrap();
            let form = CString::new(r#"{"exercise_type": "Walking", "duration": 60}"#).unwrap();

            let result = wellness_calorie_burn(profile.as_ptr(), form.as_ptr());
            assert!(result.is_null());

            let error = wellness_last_error();
            assert!(!error.is_null());

            let error_str = CStr::from_ptr(error).to_str().unwrap();
            assert!(error_str.contains("weight"));
        }
    }

    #[test]
    fn test_ffi_null_processor() {
        unsafe {
            let result = wellness_processor_summary(ptr::null_mut(), ptr::null());
            assert!(result.is_null());
            assert!(!wellness_last_error().is_null());
        }
    }

    #[test]
    fn test_ffi_version() {
        unsafe {
            let version = wellness_version();
            assert!(!version.is_null());

            let version_str = CStr::from_ptr(version).to_str().unwrap();
            assert!(!version_str.is_empty());
        }
    }
}
