use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use camino::Utf8PathBuf;
use cookiejar_app_core::{
    aggregation_summary, Aggregation, AppSettings, Confirmer, CookieAggregator, DeleteOutcome,
    EditorError, EditorKernel, EditorStore, FilePersistence, ViewerKernel, WatchListStore,
};
use cookiejar_core::{WatchList, WatchSpec, WatchSpecFields};
use cookiejar_infra::open_cookie_source;
use cookiejar_persistence::{RedbSlotStore, StorageError};

use crate::presenter::{AutoConfirm, StdinConfirmer, TextPresenter};

/// Where settings and the watch-list live, plus the `--cookies` override.
pub struct CliContext {
    pub persistence: FilePersistence,
    pub cookies: Option<Utf8PathBuf>,
}

impl CliContext {
    pub fn new(data_dir: Option<Utf8PathBuf>, cookies: Option<Utf8PathBuf>) -> Self {
        let persistence = match data_dir {
            Some(dir) => FilePersistence::at(dir),
            None => FilePersistence::new(),
        };
        Self {
            persistence,
            cookies,
        }
    }

    pub fn settings(&self) -> Result<AppSettings> {
        self.persistence.load_settings()
    }

    fn watch_list_store(&self) -> Result<WatchListStore> {
        let root = self
            .persistence
            .data_dir()
            .context("Failed to resolve data directory")?;
        Ok(WatchListStore::new(Arc::new(RedbSlotStore::new(root))))
    }

    fn cookie_source_path(&self, settings: &AppSettings) -> Result<Utf8PathBuf> {
        let path = self
            .cookies
            .clone()
            .or_else(|| settings.cookie_source.clone().map(Utf8PathBuf::from))
            .ok_or_else(|| {
                anyhow!("No cookie source configured. Pass --cookies or run `settings set --cookie-source`")
            })?;
        if !path.exists() {
            bail!("Cookie source {} does not exist", path);
        }
        Ok(path)
    }

    fn editor<C: Confirmer>(
        &self,
        presenter: TextPresenter,
        confirmer: C,
    ) -> Result<EditorKernel<TextPresenter, C>> {
        let settings = self.settings()?;
        Ok(EditorKernel::new(
            EditorStore::default(),
            self.watch_list_store()?,
            presenter,
            confirmer,
        )
        .with_delete_policy(settings.delete_policy))
    }
}

pub async fn cmd_view(ctx: &CliContext) -> Result<Aggregation> {
    let settings = ctx.settings()?;
    let path = ctx.cookie_source_path(&settings)?;
    let aggregator = CookieAggregator::new(open_cookie_source(&path), settings.lookup_timeout());

    let mut viewer = ViewerKernel::new(ctx.watch_list_store()?, aggregator, TextPresenter::new());
    viewer.refresh().await?;
    let aggregation = viewer
        .wait_for_render()
        .await
        .ok_or_else(|| anyhow!("Cookie lookup ended without a result"))?;

    println!();
    println!(":: {}", aggregation_summary(&aggregation));
    Ok(aggregation)
}

pub async fn cmd_list(ctx: &CliContext) -> Result<WatchList> {
    let kernel = ctx.editor(TextPresenter::new(), AutoConfirm)?;
    kernel.load().await?;
    Ok(kernel.store.state().list)
}

pub async fn cmd_add(ctx: &CliContext, fields: WatchSpecFields) -> Result<WatchSpec> {
    let kernel = ctx.editor(TextPresenter::quiet(), AutoConfirm)?;
    kernel.load().await?;
    kernel.begin_add();
    let spec = kernel.submit(fields).await?;
    println!("Added '{}' on {} (id {}).", spec.name, spec.domain, spec.id);
    Ok(spec)
}

/// Fields left as `None` keep the stored value.
pub async fn cmd_edit(
    ctx: &CliContext,
    id: String,
    name: Option<String>,
    domain: Option<String>,
    desc: Option<String>,
) -> Result<WatchSpec> {
    let kernel = ctx.editor(TextPresenter::quiet(), AutoConfirm)?;
    kernel.load().await?;
    kernel.begin_edit(&id)?;

    let mut form = kernel
        .store
        .state()
        .dialog
        .map(|d| d.form)
        .ok_or(EditorError::NoOpenDialog)?;
    if let Some(name) = name {
        form.name = name;
    }
    if let Some(domain) = domain {
        form.domain = domain;
    }
    if let Some(desc) = desc {
        form.desc = desc;
    }

    let spec = kernel.submit(form).await?;
    println!("Updated '{}' on {} (id {}).", spec.name, spec.domain, spec.id);
    Ok(spec)
}

pub async fn cmd_delete(ctx: &CliContext, id: String, yes: bool) -> Result<DeleteOutcome> {
    let outcome = if yes {
        delete_with(ctx, &id, AutoConfirm).await?
    } else {
        delete_with(ctx, &id, StdinConfirmer).await?
    };
    match &outcome {
        DeleteOutcome::Deleted { removed } => {
            println!("Removed {} watch entr{}.", removed.len(), plural(removed.len()));
            for spec in removed {
                println!("   {} {} ({})", spec.id, spec.name, spec.domain);
            }
        }
        DeleteOutcome::Declined => println!("Nothing deleted."),
    }
    Ok(outcome)
}

async fn delete_with<C: Confirmer>(
    ctx: &CliContext,
    id: &str,
    confirm: C,
) -> Result<DeleteOutcome> {
    let kernel = ctx.editor(TextPresenter::quiet(), confirm)?;
    kernel.load().await?;
    Ok(kernel.delete(id).await?)
}

/// Whether the kernel's presenter already printed `err`, so `main` should not
/// print it again. Storage errors only reach here through the viewer, which
/// reports them itself.
pub fn already_presented(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause.is::<StorageError>()
            || matches!(
                cause.downcast_ref::<EditorError>(),
                Some(e) if !matches!(e, EditorError::NoOpenDialog)
            )
    })
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        "y"
    } else {
        "ies"
    }
}
