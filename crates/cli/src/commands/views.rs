use anyhow::{Context, Result};
use blog_kit_core::Slug;
use blog_kit_views::{CounterMode, HttpViewStore, Phase, ViewCounter};
use std::sync::Arc;

/// Run one view session for `slug` against the store at `endpoint`
pub async fn run(slug: String, endpoint: String, increment: bool) -> Result<()> {
    let slug = Slug::parse(&slug).context("Invalid slug")?;
    let store = Arc::new(HttpViewStore::new(&endpoint).context("Failed to create HTTP client")?);

    let mode = if increment {
        CounterMode::IncrementOnView
    } else {
        CounterMode::ReadOnly
    };
    let counter = ViewCounter::new(slug.as_str(), store, mode);
    let state = counter.activate().await;

    println!("{}: {} views", counter.slug(), state.label());

    if state.phase == Phase::Error {
        anyhow::bail!("View store at {} is unavailable", endpoint);
    }
    if counter.mode() == CounterMode::IncrementOnView {
        println!("   ✓ Recorded one view");
    }
    Ok(())
}
