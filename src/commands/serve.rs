use anyhow::Result;
use std::io;

use crate::host;
use crate::provider::Provider;

pub fn run() -> Result<()> {
    let mut provider = Provider::new();
    log::info!(
        "serving {} resource and {} data source types on stdio",
        provider.resource_types().count(),
        provider.data_source_types().count()
    );
    host::serve(io::BufReader::new(io::stdin()), io::stdout().lock(), &mut provider)
}
