use anyhow::{Context, Result};

use crate::provider::Provider;

pub fn run() -> Result<()> {
    let document = Provider::new().schema_document();
    let json = serde_json::to_string_pretty(&document).context("Failed to encode schema")?;
    println!("{json}");
    Ok(())
}
