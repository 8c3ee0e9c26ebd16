use axum::extract::{Extension, Json};

use crate::{
    api::{CatalogAPI, DynAPI, PlacesBody},
    error::Error,
};

pub async fn list(Extension(api): Extension<DynAPI>) -> Result<Json<PlacesBody>, Error> {
    let places = api.list_places().await?;

    Ok(PlacesBody { places }.into())
}
