pub mod invocation;
pub mod settings;

pub use invocation::{indexed_values, InvocationConfig};
pub use settings::{default_local_repository, default_settings_path, Settings};
