//! Application layer: the configuration store.
//!
//! Depends on `domain` only.  Persistence lives in `infrastructure::storage`,
//! which extends [`store::ConfigurationStore`] with `read`/`write`.

pub mod store;
