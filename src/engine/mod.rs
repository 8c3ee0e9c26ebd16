mod catalog_api;
mod helpers;
mod selection_api;

use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use crate::{api::API, entities::Place, error::Error};

const CATALOG_FILE: &str = "places.json";
const SELECTION_FILE: &str = "user-places.json";

/// Flat-file store backing the catalog and the user's selection.
///
/// Both documents are plain JSON arrays of places. The selection document is
/// overwritten whole on every replace.
pub struct Engine {
    places_path: PathBuf,
    user_places_path: PathBuf,
    write_lock: Mutex<()>,
}

impl Engine {
    #[tracing::instrument(name = "Engine::new", skip_all)]
    pub async fn new(data_dir: impl AsRef<Path>) -> Result<Self, Error> {
        let data_dir = data_dir.as_ref();

        let engine = Self {
            places_path: data_dir.join(CATALOG_FILE),
            user_places_path: data_dir.join(SELECTION_FILE),
            write_lock: Mutex::new(()),
        };

        // a fresh checkout has no selection yet
        if tokio::fs::metadata(&engine.user_places_path).await.is_err() {
            tracing::info!("creating empty {}", SELECTION_FILE);
            helpers::write_document(&engine.user_places_path, &Vec::<Place>::new()).await?;
        }

        Ok(engine)
    }

    pub fn places_path(&self) -> &Path {
        &self.places_path
    }

    pub fn user_places_path(&self) -> &Path {
        &self.user_places_path
    }
}

impl API for Engine {}

#[test]
fn new_engine() {
    use tokio_test::block_on;

    let dir = tempfile::tempdir().unwrap();

    let engine = block_on(Engine::new(dir.path())).unwrap();

    assert_eq!(engine.places_path(), dir.path().join("places.json"));
    assert_eq!(
        std::fs::read_to_string(engine.user_places_path()).unwrap(),
        "[]"
    );
}
