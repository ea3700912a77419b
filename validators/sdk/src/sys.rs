//! `reso` imports provided by the host sandbox

use crate::boundary::{Boundary, Snapshot};

mod ffi {
    #[link(wasm_import_module = "reso")]
    unsafe extern "C" {
        pub fn diagnostic(len: i32, ptr: i32);
        pub fn data(len: i32, ptr: i32) -> i32;
        pub fn previous_data(len: i32, ptr: i32) -> i32;
        pub fn error(field_len: i32, field_ptr: i32, message_len: i32, message_ptr: i32);
        pub fn warn(field_len: i32, field_ptr: i32, message_len: i32, message_ptr: i32);
        pub fn set_required(field_len: i32, field_ptr: i32, value: i32);
        pub fn set_display(field_len: i32, field_ptr: i32, value: i32);
        pub fn set(field_len: i32, field_ptr: i32, value_len: i32, value_ptr: i32);
    }
}

/// The live host, reached through the module's `reso` imports
#[derive(Debug, Default)]
pub struct WasmHost;

fn raw(bytes: &[u8]) -> (i32, i32) {
    (bytes.len() as i32, bytes.as_ptr() as i32)
}

impl WasmHost {
    fn transfer(snapshot: Snapshot, len: i32, ptr: i32) -> i32 {
        unsafe {
            match snapshot {
                Snapshot::Current => ffi::data(len, ptr),
                Snapshot::Previous => ffi::previous_data(len, ptr),
            }
        }
    }
}

impl Boundary for WasmHost {
    fn probe_size(&mut self, snapshot: Snapshot) -> i32 {
        Self::transfer(snapshot, 0, 0)
    }

    fn fill(&mut self, snapshot: Snapshot, buf: &mut [u8]) -> i32 {
        Self::transfer(snapshot, buf.len() as i32, buf.as_mut_ptr() as i32)
    }

    fn diagnostic(&mut self, text: &str) {
        let (len, ptr) = raw(text.as_bytes());
        unsafe { ffi::diagnostic(len, ptr) }
    }

    fn error(&mut self, field: &str, message: &str) {
        let (field_len, field_ptr) = raw(field.as_bytes());
        let (message_len, message_ptr) = raw(message.as_bytes());
        unsafe { ffi::error(field_len, field_ptr, message_len, message_ptr) }
    }

    fn warn(&mut self, field: &str, message: &str) {
        let (field_len, field_ptr) = raw(field.as_bytes());
        let (message_len, message_ptr) = raw(message.as_bytes());
        unsafe { ffi::warn(field_len, field_ptr, message_len, message_ptr) }
    }

    fn set_required(&mut self, field: &str, value: i32) {
        let (field_len, field_ptr) = raw(field.as_bytes());
        unsafe { ffi::set_required(field_len, field_ptr, value) }
    }

    fn set_display(&mut self, field: &str, value: i32) {
        let (field_len, field_ptr) = raw(field.as_bytes());
        unsafe { ffi::set_display(field_len, field_ptr, value) }
    }

    fn set(&mut self, field: &str, value: &[u8]) {
        let (field_len, field_ptr) = raw(field.as_bytes());
        let (value_len, value_ptr) = raw(value);
        unsafe { ffi::set(field_len, field_ptr, value_len, value_ptr) }
    }
}
