pub mod runtime;

pub use runtime::{find_on_path, locate_java_binary, resolve_java_binary};
