//! C ABI over a `ShardedLruCache<String, String>`.
//!
//! Null pointers stand in for "absent" on this side of the boundary, so a
//! null value passed to `cache_set` is rejected and the cache is left as it
//! was. Strings returned by `cache_get*` and `cache_del` must be released
//! with `cache_free_string`.

use crate::{Expiry, ShardedLruCache};
use std::ffi::{c_void, CStr, CString};
use std::os::raw::{c_char, c_int};
use std::ptr;
use std::time::Duration;

use tracing::warn;

type FfiCache = ShardedLruCache<String, String>;

unsafe fn cache_ref<'a>(ptr: *mut c_void) -> Option<&'a FfiCache> {
    (ptr as *const FfiCache).as_ref()
}

unsafe fn read_str<'a>(s: *const c_char) -> Option<&'a str> {
    if s.is_null() {
        return None;
    }
    CStr::from_ptr(s).to_str().ok()
}

fn into_c_string(value: Option<String>) -> *mut c_char {
    match value.map(CString::new) {
        Some(Ok(c_str)) => c_str.into_raw(),
        _ => ptr::null_mut(),
    }
}

/// Creates a cache, or returns null if the shape is invalid.
#[no_mangle]
pub extern "C" fn cache_create(num_shards: usize, capacity: usize) -> *mut c_void {
    match FfiCache::new(num_shards, capacity) {
        Ok(cache) => Box::into_raw(Box::new(cache)) as *mut c_void,
        Err(err) => {
            warn!(%err, "rejecting cache configuration");
            ptr::null_mut()
        }
    }
}

#[no_mangle]
pub extern "C" fn cache_destroy(ptr: *mut c_void) {
    if !ptr.is_null() {
        unsafe {
            let _ = Box::from_raw(ptr as *mut FfiCache);
        }
    }
}

/// Stores `value` under `key`. A `ttl_ms` of zero never expires.
///
/// Returns 1 on success and 0 if any pointer is null or not UTF-8.
#[no_mangle]
pub extern "C" fn cache_set(
    ptr: *mut c_void,
    key: *const c_char,
    value: *const c_char,
    ttl_ms: u64,
) -> c_int {
    unsafe {
        let Some(cache) = cache_ref(ptr) else {
            return 0;
        };
        let (Some(key), Some(value)) = (read_str(key), read_str(value)) else {
            return 0;
        };

        let expire = match ttl_ms {
            0 => Expiry::Never,
            ms => Expiry::after(Duration::from_millis(ms)),
        };
        cache.set(key.to_string(), value.to_string(), expire);
        1
    }
}

#[no_mangle]
pub extern "C" fn cache_get(ptr: *mut c_void, key: *const c_char) -> *mut c_char {
    unsafe {
        match (cache_ref(ptr), read_str(key)) {
            (Some(cache), Some(key)) => into_c_string(cache.get(&key.to_string())),
            _ => ptr::null_mut(),
        }
    }
}

#[no_mangle]
pub extern "C" fn cache_get_not_stale(ptr: *mut c_void, key: *const c_char) -> *mut c_char {
    unsafe {
        match (cache_ref(ptr), read_str(key)) {
            (Some(cache), Some(key)) => into_c_string(cache.get_not_stale(&key.to_string())),
            _ => ptr::null_mut(),
        }
    }
}

/// Removes `key`, returning its value or null if it was absent.
#[no_mangle]
pub extern "C" fn cache_del(ptr: *mut c_void, key: *const c_char) -> *mut c_char {
    unsafe {
        match (cache_ref(ptr), read_str(key)) {
            (Some(cache), Some(key)) => into_c_string(cache.del(&key.to_string())),
            _ => ptr::null_mut(),
        }
    }
}

#[no_mangle]
pub extern "C" fn cache_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        unsafe {
            let _ = CString::from_raw(ptr);
        }
    }
}

#[no_mangle]
pub extern "C" fn cache_len(ptr: *mut c_void) -> usize {
    unsafe { cache_ref(ptr).map_or(0, |cache| cache.len()) }
}

#[no_mangle]
pub extern "C" fn cache_capacity(ptr: *mut c_void) -> usize {
    unsafe { cache_ref(ptr).map_or(0, |cache| cache.capacity()) }
}

#[no_mangle]
pub extern "C" fn cache_expire(ptr: *mut c_void) -> usize {
    unsafe { cache_ref(ptr).map_or(0, |cache| cache.expire()) }
}

#[no_mangle]
pub extern "C" fn cache_clear(ptr: *mut c_void) -> usize {
    unsafe { cache_ref(ptr).map_or(0, |cache| cache.clear()) }
}
