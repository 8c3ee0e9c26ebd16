use axum::extract::{rejection::JsonRejection, Extension, Json};

use crate::{
    api::{DynAPI, MessageBody, PlacesBody, SelectionAPI},
    error::{invalid_input_error, Error},
};

pub async fn find(Extension(api): Extension<DynAPI>) -> Result<Json<PlacesBody>, Error> {
    let places = api.find_user_places().await?;

    Ok(PlacesBody { places }.into())
}

pub async fn replace(
    Extension(api): Extension<DynAPI>,
    params: Result<Json<PlacesBody>, JsonRejection>,
) -> Result<Json<MessageBody>, Error> {
    let Json(params) = params.map_err(|rejection| {
        tracing::warn!("rejected user places payload: {}", rejection.body_text());
        invalid_input_error().with_message(rejection.body_text())
    })?;

    let message = api.replace_user_places(params.places).await?;

    Ok(MessageBody { message }.into())
}
