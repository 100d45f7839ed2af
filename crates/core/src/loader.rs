use crate::config::{Site, parse_site_toml};
use crate::content::load_content;
use crate::error::{Error, Result};
use crate::index::ContentIndex;
use std::path::Path;

pub const SITE_TOML: &str = "site.toml";

/// A parsed site together with its content index
#[derive(Debug)]
pub struct SiteBundle {
    pub site: Site,
    pub index: ContentIndex,
}

/// Read `site.toml` under `root`, ingest the content directory and build
/// the index. This is the single construction point for a build.
pub fn load_site(root: &Path) -> Result<SiteBundle> {
    let config_path = root.join(SITE_TOML);
    if !config_path.exists() {
        return Err(Error::ConfigParse(format!(
            "{} not found in {}",
            SITE_TOML,
            root.display()
        )));
    }

    let site = parse_site_toml(&config_path)?;
    let records = load_content(&root.join(&site.content.dir))?;
    let index = ContentIndex::new(records)?;

    tracing::info!(
        root = %root.display(),
        records = index.len(),
        "site loaded"
    );

    Ok(SiteBundle { site, index })
}
