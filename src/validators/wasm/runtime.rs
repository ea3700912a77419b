//! WASM runtime management and the `reso` host calls

use crate::config::RuntimeSettings;
use crate::validators::context::{HostContext, Snapshot};
use crate::validators::result::{HostCall, ValidationError};
use anyhow::{anyhow, bail};
use std::borrow::Cow;
use tracing::{debug, info};
use wasmtime::*;

/// Import module name for all host calls
pub const HOST_MODULE: &str = "reso";

/// WASM runtime for executing validation modules
pub struct WasmRuntime {
    engine: Engine,
    linker: Linker<HostContext>,
    settings: RuntimeSettings,
}

impl WasmRuntime {
    /// Create a new WASM runtime
    pub fn new(settings: &RuntimeSettings) -> Result<Self, ValidationError> {
        info!("🔧 Initializing WASM runtime");

        let mut config = Config::new();
        config.wasm_bulk_memory(true);
        config.consume_fuel(true); // Bounds each invocation

        let engine = Engine::new(&config)
            .map_err(|e| ValidationError::Runtime(format!("Failed to create WASM engine: {}", e)))?;

        let mut linker = Linker::new(&engine);
        Self::register_host_functions(&mut linker).map_err(|e| {
            ValidationError::Runtime(format!("Failed to register host functions: {}", e))
        })?;

        info!("✅ WASM runtime initialized");

        Ok(Self {
            engine,
            linker,
            settings: settings.clone(),
        })
    }

    /// Register the host calls validation modules import
    fn register_host_functions(linker: &mut Linker<HostContext>) -> Result<()> {
        // reso.data / reso.previous_data - two-phase record transfer. Always
        // returns the record size; only writes when the buffer can hold it.
        linker.func_wrap(
            HOST_MODULE,
            "data",
            |mut caller: Caller<'_, HostContext>, len: i32, ptr: i32| -> Result<i32> {
                transfer(&mut caller, Snapshot::Current, len, ptr)
            },
        )?;
        linker.func_wrap(
            HOST_MODULE,
            "previous_data",
            |mut caller: Caller<'_, HostContext>, len: i32, ptr: i32| -> Result<i32> {
                transfer(&mut caller, Snapshot::Previous, len, ptr)
            },
        )?;

        // reso.diagnostic - operator log line. Invalid UTF-8 is tolerated.
        linker.func_wrap(
            HOST_MODULE,
            "diagnostic",
            |mut caller: Caller<'_, HostContext>, len: i32, ptr: i32| -> Result<()> {
                with_memory(&mut caller, |memory, ctx| {
                    let text = read_string_lax(memory, len, ptr, "diagnostic")?;
                    info!(target: "reso::diagnostic", "{}", text);
                    ctx.record(HostCall::Diagnostic { text: text.into_owned() });
                    Ok(())
                })
            },
        )?;

        // reso.error - the field failed validation
        linker.func_wrap(
            HOST_MODULE,
            "error",
            |mut caller: Caller<'_, HostContext>,
             field_len: i32,
             field_ptr: i32,
             message_len: i32,
             message_ptr: i32|
             -> Result<()> {
                with_memory(&mut caller, |memory, ctx| {
                    let field = read_string(memory, field_len, field_ptr, "field")?;
                    let message = read_string(memory, message_len, message_ptr, "message")?;
                    ctx.record(HostCall::Error {
                        field: field.to_string(),
                        message: message.to_string(),
                    });
                    Ok(())
                })
            },
        )?;

        // reso.warn - the field has a warning
        linker.func_wrap(
            HOST_MODULE,
            "warn",
            |mut caller: Caller<'_, HostContext>,
             field_len: i32,
             field_ptr: i32,
             message_len: i32,
             message_ptr: i32|
             -> Result<()> {
                with_memory(&mut caller, |memory, ctx| {
                    let field = read_string(memory, field_len, field_ptr, "field")?;
                    let message = read_string(memory, message_len, message_ptr, "message")?;
                    ctx.record(HostCall::Warn {
                        field: field.to_string(),
                        message: message.to_string(),
                    });
                    Ok(())
                })
            },
        )?;

        // reso.set_required / reso.set_display - 0 is off, anything else is on
        linker.func_wrap(
            HOST_MODULE,
            "set_required",
            |mut caller: Caller<'_, HostContext>, len: i32, ptr: i32, value: i32| -> Result<()> {
                with_memory(&mut caller, |memory, ctx| {
                    let field = read_string(memory, len, ptr, "field")?;
                    ctx.record(HostCall::SetRequired {
                        field: field.to_string(),
                        required: value != 0,
                    });
                    Ok(())
                })
            },
        )?;
        linker.func_wrap(
            HOST_MODULE,
            "set_display",
            |mut caller: Caller<'_, HostContext>, len: i32, ptr: i32, value: i32| -> Result<()> {
                with_memory(&mut caller, |memory, ctx| {
                    let field = read_string(memory, len, ptr, "field")?;
                    ctx.record(HostCall::SetDisplay {
                        field: field.to_string(),
                        display: value != 0,
                    });
                    Ok(())
                })
            },
        )?;

        // reso.set - overwrite a field; the value is JSON text
        linker.func_wrap(
            HOST_MODULE,
            "set",
            |mut caller: Caller<'_, HostContext>,
             field_len: i32,
             field_ptr: i32,
             value_len: i32,
             value_ptr: i32|
             -> Result<()> {
                with_memory(&mut caller, |memory, ctx| {
                    let field = read_string(memory, field_len, field_ptr, "field")?;
                    let value = read_string(memory, value_len, value_ptr, "value")?;
                    let Ok(value) = serde_json::from_str::<serde_json::Value>(value) else {
                        bail!("value for {} was not valid JSON", field);
                    };
                    ctx.record(HostCall::Set {
                        field: field.to_string(),
                        value,
                    });
                    Ok(())
                })
            },
        )?;

        Ok(())
    }

    /// Get engine reference
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Get linker reference
    pub fn linker(&self) -> &Linker<HostContext> {
        &self.linker
    }

    pub fn settings(&self) -> &RuntimeSettings {
        &self.settings
    }
}

/// Run `f` with the module's linear memory and the store data
fn with_memory<R>(
    caller: &mut Caller<'_, HostContext>,
    f: impl FnOnce(&mut [u8], &mut HostContext) -> Result<R>,
) -> Result<R> {
    let Some(memory) = caller
        .get_export("memory")
        .and_then(|export| export.into_memory())
    else {
        bail!("No memory export");
    };

    let (memory, ctx) = memory.data_and_store_mut(&mut *caller);
    f(memory, ctx)
}

fn transfer(
    caller: &mut Caller<'_, HostContext>,
    snapshot: Snapshot,
    len: i32,
    ptr: i32,
) -> Result<i32> {
    let name = match snapshot {
        Snapshot::Current => "data",
        Snapshot::Previous => "previous_data",
    };

    with_memory(caller, |memory, ctx| {
        let dest = read_slice_mut(memory, len, ptr, name)?;
        let record = ctx.records().bytes(snapshot);
        let size = i32::try_from(record.len()).map_err(|_| anyhow!("{} is too large", name))?;

        if record.len() <= dest.len() {
            dest[..record.len()].copy_from_slice(record);
        }

        debug!("(reso.{} len:{} ptr:{}) → {}", name, len, ptr, size);
        Ok(size)
    })
}

/// Read a string from module memory, replacing invalid UTF-8
fn read_string_lax<'a>(memory: &'a [u8], len: i32, ptr: i32, name: &str) -> Result<Cow<'a, str>> {
    Ok(String::from_utf8_lossy(read_slice(memory, len, ptr, name)?))
}

/// Read a string from module memory. Fails if it isn't UTF-8.
fn read_string<'a>(memory: &'a [u8], len: i32, ptr: i32, name: &str) -> Result<&'a str> {
    let slice = read_slice(memory, len, ptr, name)?;

    match std::str::from_utf8(slice) {
        Ok(s) => Ok(s),
        Err(_) => bail!("{} is invalid UTF-8", name),
    }
}

fn bounds(memory_len: usize, len: i32, ptr: i32, name: &str) -> Result<std::ops::Range<usize>> {
    if len < 0 {
        bail!("{} length is less than zero", name);
    }
    if ptr < 0 {
        bail!("{} pointer is less than zero", name);
    }

    let start = ptr as usize;
    let end = start + len as usize;
    if end > memory_len {
        bail!("{} is out of bounds", name);
    }

    Ok(start..end)
}

/// Read a slice from module memory. Fails if the length or pointer are invalid.
fn read_slice<'a>(memory: &'a [u8], len: i32, ptr: i32, name: &str) -> Result<&'a [u8]> {
    let range = bounds(memory.len(), len, ptr, name)?;
    Ok(&memory[range])
}

fn read_slice_mut<'a>(
    memory: &'a mut [u8],
    len: i32,
    ptr: i32,
    name: &str,
) -> Result<&'a mut [u8]> {
    let range = bounds(memory.len(), len, ptr, name)?;
    Ok(&mut memory[range])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_initializes() {
        let runtime = WasmRuntime::new(&RuntimeSettings::default()).unwrap();
        assert_eq!(runtime.settings().fuel, RuntimeSettings::default().fuel);
    }

    #[test]
    fn test_read_slice_bounds() {
        let memory = [1_u8, 2, 3, 4];

        assert_eq!(read_slice(&memory, 2, 1, "x").unwrap(), &[2, 3]);
        assert_eq!(read_slice(&memory, 0, 4, "x").unwrap(), &[] as &[u8]);
        assert!(read_slice(&memory, 2, 3, "x").is_err());
        assert!(read_slice(&memory, -1, 0, "x").is_err());
        assert!(read_slice(&memory, 1, -1, "x").is_err());
        assert!(read_slice(&memory, 1, i32::MAX, "x").is_err());
    }

    #[test]
    fn test_read_string_requires_utf8() {
        let memory = [b'o', b'k', 0xff];

        assert_eq!(read_string(&memory, 2, 0, "field").unwrap(), "ok");
        assert!(read_string(&memory, 3, 0, "field").is_err());
        assert_eq!(read_string_lax(&memory, 3, 0, "diagnostic").unwrap(), "ok\u{fffd}");
    }

    #[test]
    fn test_read_slice_mut_is_writable() {
        let mut memory = [0_u8; 4];
        read_slice_mut(&mut memory, 2, 2, "data").unwrap().copy_from_slice(b"hi");
        assert_eq!(&memory, b"\0\0hi");
    }
}
