pub mod classpath;
pub mod entry_point;
pub mod manifest;
pub mod task;
pub mod wrapper;

pub use classpath::{flatten_classpath, get_classpath_separator, join_classpath};
pub use entry_point::resolve_entry_point;
pub use manifest::Manifest;
pub use task::{run, run_until, InvocationResult, LaunchSpec};
pub use wrapper::WrapperJar;
