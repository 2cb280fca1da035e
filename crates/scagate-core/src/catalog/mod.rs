pub mod builtin;
pub mod load;
pub mod model;
pub mod render;

pub use load::{load_file, load_str, resolve};
pub use model::{Catalog, CatalogInfo, ParameterSpec, ValueKind};
