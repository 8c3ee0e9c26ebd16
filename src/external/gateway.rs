use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::{
    api::{MessageBody, PlacesBody},
    entities::Place,
    error::{parse_error, response_error, Error},
};

/// Read/replace access to the durable selection, plus the catalog listing.
///
/// A call either fully succeeds or fails with no partial effect.
#[async_trait]
pub trait Gateway {
    async fn fetch_available_places(&self) -> Result<Vec<Place>, Error>;
    async fn read(&self) -> Result<Vec<Place>, Error>;
    async fn replace(&self, places: Vec<Place>) -> Result<String, Error>;
}

#[derive(Clone, Debug)]
pub struct HttpGateway {
    client: reqwest::Client,
    api_base: String,
}

impl HttpGateway {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), api_base)
    }

    pub fn with_client(client: reqwest::Client, api_base: impl Into<String>) -> Self {
        Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    #[tracing::instrument(skip(self))]
    async fn fetch_available_places(&self) -> Result<Vec<Place>, Error> {
        let res = self.client.get(self.url("/places")).send().await?;

        let data: PlacesBody = decode(res, "Failed to fetch places.").await?;

        Ok(data.places)
    }

    #[tracing::instrument(skip(self))]
    async fn read(&self) -> Result<Vec<Place>, Error> {
        let res = self.client.get(self.url("/user-places")).send().await?;

        let data: PlacesBody = decode(res, "Failed to fetch user places.").await?;

        Ok(data.places)
    }

    #[tracing::instrument(skip(self, places), fields(count = places.len()))]
    async fn replace(&self, places: Vec<Place>) -> Result<String, Error> {
        let res = self
            .client
            .put(self.url("/user-places"))
            .json(&PlacesBody { places })
            .send()
            .await?;

        let data: MessageBody = decode(res, "Failed to update user data.").await?;

        Ok(data.message)
    }
}

/// Turns a non-2xx status into a response error carrying the server's message
/// (or `failure` when it sent none), and a body of the wrong shape into a
/// parse error.
async fn decode<T: DeserializeOwned>(res: reqwest::Response, failure: &str) -> Result<T, Error> {
    let status = res.status();
    let bytes = res.bytes().await?;

    if !status.is_success() {
        tracing::warn!("gateway responded with {}", status);

        let message = serde_json::from_slice::<MessageBody>(&bytes)
            .map(|body| body.message)
            .ok()
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| failure.to_string());

        return Err(response_error(message));
    }

    serde_json::from_slice(&bytes).map_err(|err| {
        tracing::warn!("unexpected gateway body: {}", err);
        parse_error()
    })
}
