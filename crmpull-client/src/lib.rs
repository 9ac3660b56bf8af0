pub mod error;
pub mod fetcher;
pub mod record;

pub use error::FetchError;
pub use fetcher::{CompanyFetcher, PageCallback};
pub use record::{FetchRequest, PageProgress, Record};
