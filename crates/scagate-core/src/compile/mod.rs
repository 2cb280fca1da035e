pub mod args;

pub use args::{Compilation, CompiledArguments, Env, TraceEntry, compile, process_env};
