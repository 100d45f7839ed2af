use blog_kit_validator::validate_site;
use std::path::PathBuf;

pub async fn run(path: PathBuf) -> anyhow::Result<()> {
    println!("Validating site at: {}", path.display());

    let report = validate_site(&path);

    for line in &report.info {
        println!("  ℹ {}", line);
    }
    for line in &report.warnings {
        println!("  ⚠ {}", line);
    }
    for line in &report.errors {
        eprintln!("  ✗ {}", line);
    }

    if !report.is_ok() {
        anyhow::bail!("Validation failed with {} error(s)", report.errors.len());
    }

    println!("\n✓ Site is valid");
    Ok(())
}
