pub mod config;
pub mod content;
pub mod error;
pub mod index;
pub mod loader;
pub mod project;
pub mod resolve;
pub mod types;

pub use config::{Messages, Site, parse_site_toml};
pub use error::{Error, Result};
pub use index::ContentIndex;
pub use loader::{SITE_TOML, SiteBundle, load_site};
pub use project::project;
pub use resolve::{LocalePolicy, NotFound, Resolution, resolve, resolve_with_policy};
pub use types::*;
