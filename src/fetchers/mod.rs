mod proxy;
mod wordpress;

pub use proxy::ProxyClient;
pub use wordpress::WordPressClient;
