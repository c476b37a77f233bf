use crate::SpiderError;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::trace;

/// Create `dir` (and its parents) if it does not already exist.
pub async fn ensure_dir(dir: &Path) -> Result<(), SpiderError> {
    if !tokio::fs::try_exists(dir).await? {
        trace!("creating directory {}", dir.display());
    }
    tokio::fs::create_dir_all(dir).await?;
    Ok(())
}

/// Read the whole file at `path`; `Ok(None)` if there is no such file.
pub async fn read_optional(path: &Path) -> Result<Option<Vec<u8>>, SpiderError> {
    trace!("reading file path: {}", path.display());
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(bytes)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Reads a `.json` file from `path`; `Ok(None)` if there is no such file.
pub async fn read_json<T: serde::de::DeserializeOwned>(
    path: &Path,
) -> Result<Option<T>, SpiderError> {
    match read_optional(path).await? {
        Some(bytes) => {
            trace!("file read; deserializing bytes ...");
            Ok(Some(serde_json::from_slice(&bytes)?))
        }
        None => Ok(None),
    }
}

/// Serialize `value` to `path` as JSON, replacing any previous content.
pub async fn write_json<T: serde::Serialize>(
    path: &Path,
    value: &T,
    pretty: bool,
) -> Result<(), SpiderError> {
    let bytes = if pretty {
        serde_json::to_vec_pretty(value)?
    } else {
        serde_json::to_vec(value)?
    };
    write_atomic(path, &bytes).await
}

/// Write `bytes` to a sibling `.part` file, then rename it over `path`.
///
/// Readers never observe a truncated file under the final name; if the write fails the
/// `.part` file is removed and `path` keeps whatever it held before.
pub async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), SpiderError> {
    let part = part_path(path);
    trace!("writing {} bytes to {}", bytes.len(), part.display());

    if let Err(err) = tokio::fs::write(&part, bytes).await {
        let _ = tokio::fs::remove_file(&part).await;
        return Err(err.into());
    }
    tokio::fs::rename(&part, path).await?;
    Ok(())
}

fn part_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(".part");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn part_file_sits_next_to_target() {
        let part = part_path(Path::new("/data/dave_inc./q1.pdf"));
        assert_eq!(part, PathBuf::from("/data/dave_inc./q1.pdf.part"));
    }

    #[tokio::test]
    async fn atomic_write_replaces_content() {
        let dir = std::env::temp_dir().join(format!("irdump-fs-{}", std::process::id()));
        ensure_dir(&dir).await.unwrap();
        let path = dir.join("file.bin");

        write_atomic(&path, b"first").await.unwrap();
        write_atomic(&path, b"second").await.unwrap();

        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"second");
        assert!(!part_path(&path).exists());
        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn missing_json_is_none() {
        let path = std::env::temp_dir().join("irdump-definitely-missing.json");
        let read: Option<serde_json::Value> = read_json(&path).await.unwrap();
        assert!(read.is_none());
    }
}
