use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::entities::Place;
use crate::error::Error;

/// `{ "places": [...] }`, used by both directions of the HTTP surface.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlacesBody {
    pub places: Vec<Place>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

#[async_trait]
pub trait CatalogAPI {
    async fn list_places(&self) -> Result<Vec<Place>, Error>;
}

#[async_trait]
pub trait SelectionAPI {
    async fn find_user_places(&self) -> Result<Vec<Place>, Error>;

    /// Overwrites the stored selection with `places` and returns a
    /// confirmation message.
    async fn replace_user_places(&self, places: Vec<Place>) -> Result<String, Error>;
}

pub trait API: CatalogAPI + SelectionAPI {}

pub type DynAPI = Arc<dyn API + Send + Sync>;
