mod dir_loader;
mod http_loader;
mod mapping;

pub use dir_loader::JsonDirLoader;
pub use http_loader::{DEFAULT_REQUEST_TIMEOUT, HttpPoolLoader};
pub use mapping::decode_pool;
