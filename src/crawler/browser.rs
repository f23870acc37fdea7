//! Browser session lifecycle

use crate::{KagamiError, Result};
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use tokio::task::JoinHandle;

/// Launches headless Chrome and spawns the CDP message pump
///
/// The handler stream must be polled for the whole session; dropping it
/// stalls every page. The caller keeps the returned task alive until the
/// browser has been closed.
pub async fn launch_browser() -> Result<(Browser, JoinHandle<()>)> {
    let config = BrowserConfig::builder()
        .build()
        .map_err(KagamiError::Browser)?;

    let (browser, mut handler) = Browser::launch(config).await?;

    let pump = tokio::spawn(async move { while handler.next().await.is_some() {} });

    Ok((browser, pump))
}
