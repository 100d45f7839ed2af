//! Per-article view counting.
//!
//! [`ViewCountStore`] is the contract of the external counter service;
//! [`HttpViewStore`] talks to it over HTTP and [`MemoryViewStore`] is a
//! process-local stand-in. [`ViewCounter`] is the per-view-session state
//! machine the presentation layer observes.

pub mod counter;
pub mod error;
pub mod http;
pub mod memory;
pub mod store;

pub use counter::{CounterMode, Phase, ViewCounter, ViewCounterState};
pub use error::StoreError;
pub use http::HttpViewStore;
pub use memory::MemoryViewStore;
pub use store::{CountResponse, ViewCountStore};
