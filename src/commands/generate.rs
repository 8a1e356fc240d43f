//! Generate static files

use anyhow::Result;
use notify_debouncer_mini::{new_debouncer, DebounceEventResult};
use notify_debouncer_mini::notify::{RecursiveMode, Watcher as _};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::config::ApiConfig;
use crate::content::CourseLoader;
use crate::generator::{Generator, Report};
use crate::{Site, CONFIG_FILE};

/// Fetch the courses and generate the static site
pub async fn run(site: &Site, api: &ApiConfig) -> Result<Report> {
    let start = Instant::now();

    let loader = CourseLoader::new(api.clone(), &site.config.markdown)?;
    let list = loader.load().await?;

    tracing::info!("Loaded {} courses", list.len());

    let generator = Generator::new(site)?;
    let report = generator.generate(&list)?;

    tracing::info!(
        "Generated {} files in {:.2}s",
        report.files.len(),
        start.elapsed().as_secs_f64()
    );

    Ok(report)
}

/// Watch the config file, source and template directories, regenerating on change
///
/// The site configuration is re-read before every rebuild. `on_rebuild` runs
/// after each successful generation.
pub async fn watch<F>(base_dir: PathBuf, api: ApiConfig, mut on_rebuild: F) -> Result<()>
where
    F: FnMut(&Report),
{
    let (tx, mut rx) = mpsc::unbounded_channel();

    // Create debouncer to avoid multiple rapid rebuilds
    let mut debouncer =
        new_debouncer(Duration::from_millis(500), move |res: DebounceEventResult| {
            let _ = tx.send(res);
        })?;

    let site = Site::new(&base_dir)?;
    for (path, mode) in [
        (base_dir.join(CONFIG_FILE), RecursiveMode::NonRecursive),
        (site.source_dir.clone(), RecursiveMode::Recursive),
        (site.template_dir.clone(), RecursiveMode::Recursive),
    ] {
        if path.exists() {
            debouncer.watcher().watch(&path, mode)?;
            tracing::debug!("Watching: {:?}", path);
        }
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    while let Some(result) = rx.recv().await {
        let events = match result {
            Ok(events) => events,
            Err(e) => {
                tracing::error!("Watch error: {:?}", e);
                continue;
            }
        };

        let changed: Vec<_> = events
            .iter()
            .filter(|e| is_relevant(&e.path, &site.public_dir))
            .collect();
        if changed.is_empty() {
            continue;
        }

        for event in &changed {
            tracing::info!("File changed: {}", event.path.display());
        }

        let rebuilt = match Site::new(&base_dir) {
            Ok(site) => run(&site, &api).await,
            Err(e) => Err(e),
        };
        match rebuilt {
            Ok(report) => on_rebuild(&report),
            Err(e) => tracing::error!("Generation failed: {:#}", e),
        }
    }

    Ok(())
}

/// Filter out editor droppings, VCS files and our own output
fn is_relevant(path: &Path, public_dir: &Path) -> bool {
    let path_str = path.to_string_lossy();
    !path.starts_with(public_dir)
        && !path_str.contains(".git")
        && !path_str.contains(".DS_Store")
        && !path_str.ends_with('~')
}
