use serde::{de::DeserializeOwned, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::{fs, io::AsyncWriteExt};

use crate::error::{storage_error, Error};

#[tracing::instrument]
pub async fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T, Error> {
    let content = fs::read(path).await?;
    let data = serde_json::from_slice(&content)?;

    Ok(data)
}

/// Replaces the document at `path` with `data`.
///
/// The bytes land in a sibling temp file that is renamed over the target, so
/// a reader sees either the old document or the new one.
#[tracing::instrument(skip(data))]
pub async fn write_document<T: Serialize>(path: &Path, data: &T) -> Result<(), Error> {
    let content = serde_json::to_vec(data)?;

    let tmp_path = temp_path(path)?;
    let mut tmp_file = fs::File::create(&tmp_path).await?;
    tmp_file.write_all(&content).await?;
    tmp_file.sync_all().await?;
    drop(tmp_file);

    if let Err(err) = fs::rename(&tmp_path, path).await {
        let _ = fs::remove_file(&tmp_path).await;
        return Err(err.into());
    }

    Ok(())
}

fn temp_path(path: &Path) -> Result<PathBuf, Error> {
    let file_name = path.file_name().ok_or_else(storage_error)?;

    let mut tmp_name = OsString::from(".");
    tmp_name.push(file_name);
    tmp_name.push(".tmp");

    Ok(path.with_file_name(tmp_name))
}

#[tokio::test]
async fn write_then_read_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.json");

    write_document(&path, &vec![1, 2, 3]).await.unwrap();
    write_document(&path, &vec![4]).await.unwrap();

    let data: Vec<i32> = read_document(&path).await.unwrap();
    assert_eq!(data, vec![4]);
    assert!(!dir.path().join(".doc.json.tmp").exists());
}

#[tokio::test]
async fn read_missing_document_is_storage_error() {
    let dir = tempfile::tempdir().unwrap();

    let err = read_document::<Vec<i32>>(&dir.path().join("missing.json"))
        .await
        .unwrap_err();
    assert!(err.is_storage_error());
}

#[tokio::test]
async fn write_into_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gone").join("doc.json");

    let err = write_document(&path, &vec![1]).await.unwrap_err();
    assert!(err.is_storage_error());
}
