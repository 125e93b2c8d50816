mod store;
mod validation;

pub use store::CacheStore;
pub use validation::is_valid;
