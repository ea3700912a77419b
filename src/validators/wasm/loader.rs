//! WASM validation module loader

use super::WasmRuntime;
use crate::validators::{
    Execution, ExecutionStatus, HostContext, RecordPair, ValidationError, Validator,
};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};
use wasmtime::{Error, Linker, Module, Store, Trap};

/// Name of the function every validation module exports
pub const ENTRYPOINT: &str = "validate";

/// A compiled validation module
#[derive(Clone)]
pub struct WasmValidator {
    name: String,
    runtime: Arc<WasmRuntime>,
    linker: Arc<Linker<HostContext>>,
    module: Module,
}

impl WasmValidator {
    /// Load a validation module from file
    pub fn from_file(
        name: String,
        path: &Path,
        runtime: Arc<WasmRuntime>,
    ) -> Result<Self, ValidationError> {
        debug!("Loading WASM validator: {} from {}", name, path.display());

        let wasm_bytes = std::fs::read(path).map_err(|e| {
            ValidationError::Load(format!("Failed to read WASM file '{}': {}", path.display(), e))
        })?;

        Self::from_bytes(name, &wasm_bytes, runtime)
    }

    /// Compile a validation module from binary (or text) WebAssembly
    pub fn from_bytes(
        name: String,
        wasm: &[u8],
        runtime: Arc<WasmRuntime>,
    ) -> Result<Self, ValidationError> {
        let module = Module::new(runtime.engine(), wasm).map_err(|e| {
            ValidationError::Load(format!("Failed to compile module '{}': {}", name, e))
        })?;

        // Some toolchains import WASI shims the module never calls.
        // Satisfy them with traps instead of failing to link.
        let mut linker = runtime.linker().clone();
        linker
            .define_unknown_imports_as_traps(&module)
            .map_err(|e| {
                ValidationError::Load(format!("Failed to link module '{}': {}", name, e))
            })?;

        info!("✅ WASM validator '{}' loaded successfully", name);

        Ok(Self {
            name,
            runtime,
            linker: Arc::new(linker),
            module,
        })
    }

    /// Run `validate()` once in a fresh store
    fn execute_wasm(&self, records: &RecordPair) -> Result<Execution, ValidationError> {
        let settings = self.runtime.settings();

        let mut store = Store::new(
            self.runtime.engine(),
            HostContext::new(records.clone(), settings.max_memory_bytes),
        );
        store.limiter(|ctx| &mut ctx.limits);
        store
            .set_fuel(settings.fuel)
            .map_err(|e| ValidationError::Runtime(format!("Failed to set fuel: {}", e)))?;

        let instance = self
            .linker
            .instantiate(&mut store, &self.module)
            .map_err(|e| ValidationError::Instantiate(format!("{:#}", e)))?;

        let validate = instance
            .get_typed_func::<(), ()>(&mut store, ENTRYPOINT)
            .map_err(|e| ValidationError::MissingEntrypoint(e.to_string()))?;

        let status = match validate.call(&mut store, ()) {
            Ok(()) => ExecutionStatus::Completed,
            Err(err) => {
                let reason = describe_trap(&err);
                warn!("⚠️  Validator '{}' aborted: {}", self.name, reason);
                ExecutionStatus::Aborted(reason)
            }
        };

        let fuel_consumed = settings.fuel.saturating_sub(store.get_fuel().unwrap_or(0));
        let report = store.into_data().into_report();
        debug!(
            "Validator '{}' made {} calls using {} fuel",
            self.name,
            report.calls.len(),
            fuel_consumed
        );

        Ok(Execution {
            status,
            report,
            fuel_consumed,
        })
    }
}

fn describe_trap(err: &Error) -> String {
    match err.downcast_ref::<Trap>() {
        Some(Trap::OutOfFuel) => "fuel exhausted".to_string(),
        Some(trap) => trap.to_string(),
        None => format!("{:#}", err),
    }
}

#[async_trait]
impl Validator for WasmValidator {
    async fn validate(&self, records: &RecordPair) -> Result<Execution, ValidationError> {
        // Execute in thread pool to avoid blocking
        let validator = self.clone();
        let records = records.clone();

        tokio::task::spawn_blocking(move || validator.execute_wasm(&records))
            .await
            .map_err(|e| ValidationError::Runtime(format!("WASM execution panicked: {}", e)))?
    }

    fn name(&self) -> &str {
        &self.name
    }
}
