pub mod config;
pub mod employee;
pub mod init;
pub mod project;
pub mod types;

use anyhow::Context;
use roster_core::config::Config;
use roster_core::project::Viewer;
use roster_core::store::YamlStore;
use roster_core::ProjectBoard;
use std::future::Future;
use std::path::Path;

/// Drive a core future to completion from synchronous command code.
pub(crate) fn block_on<F: Future>(fut: F) -> anyhow::Result<F::Output> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("failed to start tokio runtime")?;
    Ok(rt.block_on(fut))
}

/// Load config, then fetch the viewer's projects and the employee directory.
pub(crate) fn load_board(root: &Path, viewer: &Viewer) -> anyhow::Result<(ProjectBoard, YamlStore)> {
    let config = Config::load(root).context("failed to load config")?;
    let store = YamlStore::new(root);
    let mut board = ProjectBoard::new(&config, viewer.clone());
    let loaded = block_on(board.load(&store, &store))?;
    if let Err(e) = loaded {
        let hint = board
            .notice()
            .map(|n| format!("{}: {}", n.header, n.content))
            .unwrap_or_else(|| "failed to load projects".to_string());
        return Err(anyhow::Error::new(e).context(hint));
    }
    Ok((board, store))
}
