pub mod http;
pub mod traits;

pub use http::HttpBackend;
pub use traits::TrackerBackend;
