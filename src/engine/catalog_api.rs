use super::helpers::read_document;
use super::Engine;

use async_trait::async_trait;

use crate::{api::CatalogAPI, entities::Place, error::Error};

#[async_trait]
impl CatalogAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn list_places(&self) -> Result<Vec<Place>, Error> {
        read_document(&self.places_path).await
    }
}
