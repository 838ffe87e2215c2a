pub mod conversion_guard;
pub mod remote_fetcher;

pub use conversion_guard::{ConversionGuard, ConversionPermit};
pub use remote_fetcher::{FetchedFile, HttpFetcher, RemoteFetcher};
