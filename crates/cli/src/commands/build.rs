use anyhow::{Context, Result};
use blog_kit_core::load_site;
use blog_kit_generator::{GenerateOptions, GeneratedSite, generate_site};
use std::fs;
use std::path::{Path, PathBuf};

/// Build static site for deployment
pub async fn run(path: PathBuf, output: PathBuf) -> Result<()> {
    println!("🔨 Building static site...");
    println!("   Source: {}", path.display());
    println!("   Output: {}", output.display());
    println!();

    if !path.exists() {
        anyhow::bail!("Site directory does not exist: {}", path.display());
    }

    let bundle = load_site(&path).context("Failed to load site")?;

    println!("✓ Loaded: {}", bundle.site.metadata.title);
    println!("  Articles: {}", bundle.index.len());
    println!(
        "  Locales: {}",
        bundle
            .site
            .metadata
            .locales
            .iter()
            .map(|l| l.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!();

    println!("📄 Generating pages...");
    let generated = generate_site(&bundle.site, &bundle.index, GenerateOptions::default());
    write_site(&generated, &output)?;
    println!(
        "   ✓ Wrote {} pages and {} assets",
        generated.pages.len(),
        generated.assets.len()
    );

    println!();
    println!("✅ Build complete!");
    println!("   Output: {}", output.display());
    println!();

    Ok(())
}

/// Write every generated file below `output`, creating directories as needed
pub fn write_site(generated: &GeneratedSite, output: &Path) -> Result<()> {
    fs::create_dir_all(output).context("Failed to create output directory")?;

    let files = generated
        .pages
        .iter()
        .map(|(path, html)| (path, html.as_bytes()))
        .chain(
            generated
                .assets
                .iter()
                .map(|(path, data)| (path, data.as_slice())),
        );

    for (relative, data) in files {
        let dst = output.join(relative);
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&dst, data).with_context(|| format!("Failed to write {}", dst.display()))?;
    }

    Ok(())
}
