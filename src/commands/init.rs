use crate::commands::Out;
use crate::{Config, Result};
use anyhow::{ensure, Context};
use std::path::Path;
use url::Url;

/// Creates an initial `config.json` file at `path`.
///
/// # Arguments
/// - `path` - Where to write the config file. Its parent directory is created if needed.
/// - `sources` - The URLs of the published CSV export, primary first, e.g.
///   https://docs.google.com/spreadsheets/d/e/2PACX-1vQ3x/pub?output=csv
/// - `mirror_prefix` - When given, each source is also tried through this mirror.
/// - `brand_affixes` - Brand names to remove from unit names.
///
/// # Errors
/// - Returns an error if `sources` is empty, if the file already exists or if any file operation
///   fails.
pub async fn init(
    path: &Path,
    sources: Vec<Url>,
    mirror_prefix: Option<String>,
    brand_affixes: Vec<String>,
) -> Result<Out<()>> {
    ensure!(
        !sources.is_empty(),
        "At least one --source is needed to create a config file"
    );
    let _config = Config::create(path, sources, mirror_prefix, brand_affixes)
        .await
        .context("Unable to create the config file")?;
    Ok(format!("Successfully created the config file at {}", path.display()).into())
}
