mod memory;
mod noop;
mod proxy;

pub use memory::MemoryProxy;
pub use noop::NoopProxy;
pub use proxy::{DataProxy, ProxyError};
