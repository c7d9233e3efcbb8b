use crate::nodes::Payload;
use serde::Serialize;
use std::path::Path;
use tracing::{debug, error, trace};

/// Reads a `.json` file from `path`.
pub async fn read_json<T: serde::de::DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let path = path.as_ref();
    trace!("reading file path: {}", path.display());
    let file = tokio::fs::read(path).await.map_err(|err| {
        error!("failed to read {}, error({err})", path.display());
        err
    })?;
    trace!("file read; deserializing bytes ...");
    let data: T = serde_json::from_slice(&file)?;
    Ok(data)
}

/// Reads a saved `__data.json` response from `path` and extracts `nodes[node].data`.
pub async fn read_payload(path: impl AsRef<Path>, node: usize) -> anyhow::Result<Payload> {
    let path = path.as_ref();
    let response: serde_json::Value = read_json(path).await?;
    let payload = Payload::from_value(response, node).map_err(|err| {
        error!("unexpected payload in {}, error({err})", path.display());
        err
    })?;
    Ok(payload)
}

/// Writes `data` to `path` as pretty-printed JSON.
///
/// Parent directories are created, as necessary.
pub async fn write_json<T: Serialize>(path: impl AsRef<Path>, data: &T) -> anyhow::Result<()> {
    let path = path.as_ref();
    if let Some(dir) = path.parent() {
        trace!("checking directory path: {}", dir.display());
        tokio::fs::create_dir_all(dir).await?;
    }

    let bytes = serde_json::to_vec_pretty(data)?;
    tokio::fs::write(path, bytes).await.map_err(|err| {
        error!("failed to write {}, error({err})", path.display());
        err
    })?;
    debug!("{} written", path.display());

    Ok(())
}
