mod credentials;
mod quote_service;

pub use credentials::{ConfigCredentialStore, CredentialStore};
#[cfg(test)]
pub use credentials::MemoryCredentialStore;
pub use quote_service::QuoteService;

#[cfg(test)]
pub(crate) use quote_service::tests as test_support;
