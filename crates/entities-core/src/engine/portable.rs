//! Portable engine: the precompiled `entities-wasm` module run through wasmi
//!
//! wasmi is an interpreter, so this works wherever the host can run Rust at
//! all, including hosts that forbid JIT. Calls are serialized through a
//! mutex because a wasm store is single-threaded; scoring itself is cheap
//! compared to the lock.

use super::abi;
use super::{ModuleSource, SimilarityEngine};
use crate::error::{EngineError, EngineInitError};
use parking_lot::Mutex;
use tracing::info;
use wasmi::core::F64;
use wasmi::{
    Engine, Func, Instance, Linker, Memory, Module, Store, TypedFunc, WasmParams, WasmResults,
};

type Operands = (u32, u32, u32, u32);

/// Similarity engine backed by a loaded portable module
pub struct PortableEngine {
    runtime: Mutex<Runtime>,
}

struct Runtime {
    store: Store<()>,
    memory: Memory,
    alloc: TypedFunc<u32, u32>,
    free: TypedFunc<(u32, u32), ()>,
    edit_distance: TypedFunc<Operands, u32>,
    edit_similarity: TypedFunc<Operands, F64>,
    jaro_winkler: TypedFunc<Operands, F64>,
}

/// Location of both operands inside guest memory
struct Buffer {
    ptr: u32,
    size: u32,
    operands: Operands,
}

impl PortableEngine {
    /// Read, compile and instantiate the module, then verify its ABI
    pub fn load(source: &ModuleSource) -> Result<Self, EngineInitError> {
        let bytes = match source {
            ModuleSource::Path(path) => {
                std::fs::read(path).map_err(|e| EngineInitError::Io {
                    path: path.clone(),
                    message: e.to_string(),
                })?
            }
            ModuleSource::Bytes(bytes) => bytes.to_vec(),
        };

        let engine = Self::from_bytes(&bytes)?;
        info!(source = ?source, size = bytes.len(), "loaded portable similarity engine");
        Ok(engine)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EngineInitError> {
        let engine = Engine::default();
        let module =
            Module::new(&engine, bytes).map_err(|e| EngineInitError::Compile(e.to_string()))?;

        let mut store = Store::new(&engine, ());
        let linker = <Linker<()>>::new(&engine);
        let instance = linker
            .instantiate(&mut store, &module)
            .map_err(|e| EngineInitError::Instantiate(e.to_string()))?
            .start(&mut store)
            .map_err(|e| EngineInitError::Instantiate(e.to_string()))?;

        let version: TypedFunc<(), u32> = typed(&instance, &store, abi::ABI_VERSION_FN)?;
        let found = version
            .call(&mut store, ())
            .map_err(|e| EngineInitError::Instantiate(e.to_string()))?;
        if found != abi::ABI_VERSION {
            return Err(EngineInitError::AbiMismatch {
                expected: abi::ABI_VERSION,
                found,
            });
        }

        let memory = instance
            .get_memory(&store, abi::MEMORY)
            .ok_or_else(|| EngineInitError::MissingExport {
                name: abi::MEMORY.to_string(),
            })?;

        let runtime = Runtime {
            memory,
            alloc: typed(&instance, &store, abi::ALLOC)?,
            free: typed(&instance, &store, abi::FREE)?,
            edit_distance: typed(&instance, &store, abi::EDIT_DISTANCE)?,
            edit_similarity: typed(&instance, &store, abi::EDIT_SIMILARITY)?,
            jaro_winkler: typed(&instance, &store, abi::JARO_WINKLER_SIMILARITY)?,
            store,
        };

        Ok(Self {
            runtime: Mutex::new(runtime),
        })
    }
}

fn typed<P, R>(
    instance: &Instance,
    store: &Store<()>,
    name: &str,
) -> Result<TypedFunc<P, R>, EngineInitError>
where
    P: WasmParams,
    R: WasmResults,
{
    let func: Func = instance
        .get_func(store, name)
        .ok_or_else(|| EngineInitError::MissingExport {
            name: name.to_string(),
        })?;
    func.typed::<P, R>(store).map_err(|e| {
        EngineInitError::Instantiate(format!(
            "export '{}' has an unexpected signature: {}",
            name, e
        ))
    })
}

impl Runtime {
    /// Copy `a` then `b` into one freshly allocated guest buffer
    fn write(&mut self, a: &str, b: &str) -> Result<Buffer, EngineError> {
        let a_len = guest_len(a.len())?;
        let b_len = guest_len(b.len())?;
        let size = a_len.checked_add(b_len).ok_or_else(|| EngineError::Memory {
            message: "operands exceed guest address space".to_string(),
        })?;

        if size == 0 {
            return Ok(Buffer {
                ptr: 0,
                size: 0,
                operands: (0, 0, 0, 0),
            });
        }

        let ptr = self
            .alloc
            .call(&mut self.store, size)
            .map_err(|e| call_error(abi::ALLOC, e))?;
        if ptr == 0 {
            return Err(EngineError::Memory {
                message: format!("guest allocation of {} bytes failed", size),
            });
        }

        self.copy_in(ptr, a.as_bytes())?;
        self.copy_in(ptr + a_len, b.as_bytes())?;

        Ok(Buffer {
            ptr,
            size,
            operands: (ptr, a_len, ptr + a_len, b_len),
        })
    }

    fn copy_in(&mut self, offset: u32, bytes: &[u8]) -> Result<(), EngineError> {
        self.memory
            .write(&mut self.store, offset as usize, bytes)
            .map_err(|e| EngineError::Memory {
                message: e.to_string(),
            })
    }

    fn release(&mut self, buffer: Buffer) -> Result<(), EngineError> {
        if buffer.size == 0 {
            return Ok(());
        }
        self.free
            .call(&mut self.store, (buffer.ptr, buffer.size))
            .map_err(|e| call_error(abi::FREE, e))
    }

    /// Run `call` with both operands in guest memory, always releasing them
    fn with_operands<R>(
        &mut self,
        a: &str,
        b: &str,
        call: impl FnOnce(&mut Self, Operands) -> Result<R, EngineError>,
    ) -> Result<R, EngineError> {
        let buffer = self.write(a, b)?;
        let outcome = call(self, buffer.operands);
        self.release(buffer)?;
        outcome
    }
}

impl SimilarityEngine for PortableEngine {
    fn name(&self) -> &'static str {
        "portable"
    }

    fn edit_distance(&self, a: &str, b: &str) -> Result<usize, EngineError> {
        let mut runtime = self.runtime.lock();
        runtime.with_operands(a, b, |rt, operands| {
            rt.edit_distance
                .call(&mut rt.store, operands)
                .map(|d| d as usize)
                .map_err(|e| call_error(abi::EDIT_DISTANCE, e))
        })
    }

    fn edit_similarity(&self, a: &str, b: &str) -> Result<f64, EngineError> {
        let mut runtime = self.runtime.lock();
        runtime.with_operands(a, b, |rt, operands| {
            rt.edit_similarity
                .call(&mut rt.store, operands)
                .map(f64::from)
                .map_err(|e| call_error(abi::EDIT_SIMILARITY, e))
        })
    }

    fn jaro_winkler_similarity(&self, a: &str, b: &str) -> Result<f64, EngineError> {
        let mut runtime = self.runtime.lock();
        runtime.with_operands(a, b, |rt, operands| {
            rt.jaro_winkler
                .call(&mut rt.store, operands)
                .map(f64::from)
                .map_err(|e| call_error(abi::JARO_WINKLER_SIMILARITY, e))
        })
    }
}

fn guest_len(len: usize) -> Result<u32, EngineError> {
    u32::try_from(len).map_err(|_| EngineError::Memory {
        message: format!("operand of {} bytes exceeds guest address space", len),
    })
}

fn call_error(function: &str, e: impl std::fmt::Display) -> EngineError {
    EngineError::Call {
        function: function.to_string(),
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    /// Smallest valid module: magic + version, no sections
    const EMPTY_MODULE: &[u8] = b"\0asm\x01\0\0\0";

    /// Hand-assembled guest with the full export set: `wasm_alloc` always
    /// returns 16, `edit_distance` returns the length of `a`, and the two
    /// similarity exports return the f64 constants 0.25 and 0.75.
    #[rustfmt::skip]
    const STUB_MODULE: &[u8] = &[
    0x00, 0x61, 0x73, 0x6d, 0x01, 0x00, 0x00, 0x00, 0x01, 0x1f, 0x05, 0x60, 0x01, 0x7f, 0x01, 0x7f,
    0x60, 0x02, 0x7f, 0x7f, 0x00, 0x60, 0x00, 0x01, 0x7f, 0x60, 0x04, 0x7f, 0x7f, 0x7f, 0x7f, 0x01,
    0x7f, 0x60, 0x04, 0x7f, 0x7f, 0x7f, 0x7f, 0x01, 0x7c, 0x03, 0x07, 0x06, 0x00, 0x01, 0x02, 0x03,
    0x04, 0x04, 0x05, 0x03, 0x01, 0x00, 0x01, 0x07, 0x76, 0x07, 0x06, 0x6d, 0x65, 0x6d, 0x6f, 0x72,
    0x79, 0x02, 0x00, 0x0a, 0x77, 0x61, 0x73, 0x6d, 0x5f, 0x61, 0x6c, 0x6c, 0x6f, 0x63, 0x00, 0x00,
    0x09, 0x77, 0x61, 0x73, 0x6d, 0x5f, 0x66, 0x72, 0x65, 0x65, 0x00, 0x01, 0x14, 0x65, 0x6e, 0x74,
    0x69, 0x74, 0x69, 0x65, 0x73, 0x5f, 0x61, 0x62, 0x69, 0x5f, 0x76, 0x65, 0x72, 0x73, 0x69, 0x6f,
    0x6e, 0x00, 0x02, 0x0d, 0x65, 0x64, 0x69, 0x74, 0x5f, 0x64, 0x69, 0x73, 0x74, 0x61, 0x6e, 0x63,
    0x65, 0x00, 0x03, 0x0f, 0x65, 0x64, 0x69, 0x74, 0x5f, 0x73, 0x69, 0x6d, 0x69, 0x6c, 0x61, 0x72,
    0x69, 0x74, 0x79, 0x00, 0x04, 0x17, 0x6a, 0x61, 0x72, 0x6f, 0x5f, 0x77, 0x69, 0x6e, 0x6b, 0x6c,
    0x65, 0x72, 0x5f, 0x73, 0x69, 0x6d, 0x69, 0x6c, 0x61, 0x72, 0x69, 0x74, 0x79, 0x00, 0x05, 0x0a,
    0x2b, 0x06, 0x04, 0x00, 0x41, 0x10, 0x0b, 0x02, 0x00, 0x0b, 0x04, 0x00, 0x41, 0x01, 0x0b, 0x04,
    0x00, 0x20, 0x01, 0x0b, 0x0b, 0x00, 0x44, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xd0, 0x3f, 0x0b,
    0x0b, 0x00, 0x44, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xe8, 0x3f, 0x0b,
    ];

    #[test]
    fn test_missing_file() {
        let path = PathBuf::from("/nonexistent/entities_wasm.wasm");
        let err = PortableEngine::load(&ModuleSource::Path(path.clone()))
            .err()
            .unwrap();
        match err {
            EngineInitError::Io { path: p, .. } => assert_eq!(p, path),
            other => panic!("expected Io error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_bytes() {
        let err = PortableEngine::from_bytes(b"definitely not wasm").err().unwrap();
        assert!(matches!(err, EngineInitError::Compile(_)), "{:?}", err);
    }

    #[test]
    fn test_module_without_exports() {
        let err = PortableEngine::load(&ModuleSource::bytes(EMPTY_MODULE))
            .err()
            .unwrap();
        assert_eq!(
            err,
            EngineInitError::MissingExport {
                name: abi::ABI_VERSION_FN.to_string()
            }
        );
    }

    #[test]
    fn test_f64_results_cross_the_boundary() {
        let engine = PortableEngine::from_bytes(STUB_MODULE).unwrap();
        assert_eq!(engine.edit_similarity("apple", "appels").unwrap(), 0.25);
        assert_eq!(engine.jaro_winkler_similarity("apple", "appels").unwrap(), 0.75);
    }

    #[test]
    fn test_operands_are_laid_out_in_guest_memory() {
        let engine = PortableEngine::from_bytes(STUB_MODULE).unwrap();
        assert_eq!(engine.edit_distance("strawberry", "jam").unwrap(), 10);
        // empty operands skip allocation entirely
        assert_eq!(engine.edit_distance("", "").unwrap(), 0);
    }
}
