use super::helpers::{read_document, write_document};
use super::Engine;

use async_trait::async_trait;

use crate::{api::SelectionAPI, entities::Place, error::Error};

#[async_trait]
impl SelectionAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn find_user_places(&self) -> Result<Vec<Place>, Error> {
        read_document(&self.user_places_path).await
    }

    #[tracing::instrument(skip(self, places), fields(count = places.len()))]
    async fn replace_user_places(&self, places: Vec<Place>) -> Result<String, Error> {
        let _guard = self.write_lock.lock().await;

        write_document(&self.user_places_path, &places).await?;

        tracing::info!("replaced user places");

        Ok("User places updated!".into())
    }
}
