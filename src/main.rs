use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;

use structure_outline::cli::{CliArgs, PrintSink, StartupConfig};
use structure_outline::provider::{StaticSymbolProvider, SymbolProvider, TreeSitterProvider};
use structure_outline::runtime::OutlineRuntime;
use structure_outline::watch::FileWatcher;

fn main() -> Result<()> {
    structure_outline::tracing::init();

    let startup = CliArgs::parse().into_config()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    runtime.block_on(run(startup))
}

async fn run(startup: StartupConfig) -> Result<()> {
    let provider: Rc<dyn SymbolProvider> = match &startup.symbols {
        Some(path) => Rc::new(StaticSymbolProvider::from_file(path)?),
        None => Rc::new(TreeSitterProvider::new()),
    };
    let sink = PrintSink::new(std::io::stdout(), startup.format);
    let (runtime, sender) = OutlineRuntime::from_config(provider, sink, &startup.outline);

    let content = startup.read_file()?;
    let subscription = sender.focus(startup.buffer.clone(), startup.language.as_str(), content);
    let watcher = if startup.watch {
        Some(FileWatcher::new(
            &startup.file,
            startup.buffer.clone(),
            sender.clone(),
        )?)
    } else {
        None
    };

    let driver = async move {
        if let Some(watcher) = &watcher {
            eprintln!("Watching {} (Ctrl+C to stop)", watcher.path().display());
            tokio::signal::ctrl_c()
                .await
                .context("Failed to listen for Ctrl+C")?;
        }
        // Dropping every sender lets the runtime finish
        drop(watcher);
        drop(subscription);
        drop(sender);
        Ok::<_, anyhow::Error>(())
    };

    let (sink, result) = tokio::join!(runtime.run(), driver);
    result?;

    if sink.published() == 0 {
        tracing::warn!("No outline was published for {}", startup.file.display());
    }
    Ok(())
}
