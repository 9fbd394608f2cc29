use anyhow::Result;
use camino::Utf8PathBuf;
use cookiejar_app_core::AppSettings;

use crate::{CliContext, CliDeletePolicy};

pub fn handle_show(ctx: &CliContext) -> Result<AppSettings> {
    let settings = ctx.settings()?;
    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(settings)
}

pub fn handle_set(
    ctx: &CliContext,
    delete_policy: Option<CliDeletePolicy>,
    timeout_ms: Option<u64>,
    cookie_source: Option<Utf8PathBuf>,
) -> Result<AppSettings> {
    let mut settings = ctx.settings()?;

    if let Some(policy) = delete_policy {
        settings.delete_policy = policy.into();
    }
    if let Some(ms) = timeout_ms {
        let clamped = cookiejar_config::clamp_timeout_ms(ms);
        if clamped != ms {
            tracing::warn!(requested = ms, applied = clamped, "lookup timeout clamped");
            println!("Lookup timeout clamped to {clamped} ms.");
        }
        settings.lookup_timeout_ms = clamped;
    }
    if let Some(path) = cookie_source {
        settings.cookie_source = Some(path.to_string());
    }

    ctx.persistence.save_settings(&settings)?;
    println!("Settings saved.");
    Ok(settings)
}
