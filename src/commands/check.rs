use anyhow::{Result, bail};
use std::path::PathBuf;

use crate::Context;
use crate::config::{self, ProviderConfig};
use crate::error::Error;
use crate::provider::Provider;
use crate::session::Session;
use crate::ui;

pub fn run(ctx: &Context, path: Option<PathBuf>) -> Result<()> {
    let path = match path {
        Some(path) => path,
        None => config::default_path()?,
    };
    let config = ProviderConfig::load_or_default(&path)?.with_env();
    log::debug!("loaded {config:?}");

    if !ctx.quiet {
        ui::header("Provider Configuration");
        ui::kv("file", &path.display().to_string());
    }

    let settings = match config.validate() {
        Ok(settings) => settings,
        Err(e) => {
            ui::error(&e.to_string());
            for name in config.missing() {
                ui::dim(&format!("set `{name}` in {} or its CF_* environment variable", path.display()));
            }
            bail!("configuration is incomplete");
        }
    };

    if !ctx.quiet {
        ui::kv("api", &settings.deployment_api_url);
        ui::kv("issuer", &settings.oidc_issuer);
        ui::kv("client", &settings.oidc_client_id);
        ui::info("Requesting a token...");
    }

    match Session::connect(&settings) {
        Ok(session) => {
            ui::success("Authenticated with the control plane");
            if !ctx.quiet {
                ui::kv("interactive login", session.issuer_url());
            }
            if ctx.verbose > 0 {
                show_types();
            }
            Ok(())
        }
        Err(Error::Api(e)) => {
            let category = e.category();
            ui::error(&format!("{}: {e}", category.description()));
            ui::warn(category.advice());
            bail!("authentication failed");
        }
        Err(e) => Err(e.into()),
    }
}

/// Type names the provider serves, grouped for display
fn type_sections(provider: &Provider) -> [(&'static str, Vec<&str>); 2] {
    [
        ("Resources", provider.resource_types().collect()),
        ("Data Sources", provider.data_source_types().collect()),
    ]
}

fn show_types() {
    let provider = Provider::new();
    for (title, names) in type_sections(&provider) {
        ui::header(title);
        for name in names {
            ui::dim(name);
        }
    }
}
