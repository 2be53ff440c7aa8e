//! reqwest implementation of [`DisplayApi`] against the hub's HTTP routes.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use crate::domain::flight::{Flight, FlightType};
use crate::domain::foundation::{AdvertisementId, AirportCode};
use crate::ports::{ActiveAdvertisements, DisplayApi, DisplayApiError, FlightList};

/// HTTP client for the display-facing API.
pub struct HttpDisplayApi {
    base_url: String,
    client: Client,
}

impl HttpDisplayApi {
    /// Build a client; `base_url` is e.g. `http://127.0.0.1:8080`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, DisplayApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DisplayApiError::Request(e.to_string()))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, DisplayApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DisplayApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|e| DisplayApiError::Decode(e.to_string()))
    }
}

fn request_error(e: reqwest::Error) -> DisplayApiError {
    if e.is_timeout() {
        DisplayApiError::Request(format!("Timed out: {}", e))
    } else if e.is_connect() {
        DisplayApiError::Request(format!("Connection failed: {}", e))
    } else {
        DisplayApiError::Request(e.to_string())
    }
}

#[async_trait]
impl DisplayApi for HttpDisplayApi {
    async fn active_advertisements(
        &self,
        airport: &AirportCode,
    ) -> Result<ActiveAdvertisements, DisplayApiError> {
        let response = self
            .client
            .get(self.url("/api/advertisements/active"))
            .query(&[("airport", airport.as_str())])
            .send()
            .await
            .map_err(request_error)?;

        let active: ActiveAdvertisements = Self::decode(response).await?;
        if !active.success {
            return Err(DisplayApiError::Rejected);
        }
        Ok(active)
    }

    async fn record_view(&self, id: &AdvertisementId) -> Result<(), DisplayApiError> {
        let response = self
            .client
            .post(self.url(&format!("/api/advertisements/{}/view", id)))
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(DisplayApiError::Status {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            })
        }
    }

    async fn flights(
        &self,
        airport: &AirportCode,
        flight_type: Option<FlightType>,
    ) -> Result<Vec<Flight>, DisplayApiError> {
        let mut query = vec![("airport", airport.as_str())];
        if let Some(flight_type) = flight_type {
            query.push(("type", flight_type.as_str()));
        }

        let response = self
            .client
            .get(self.url("/api/flights"))
            .query(&query)
            .send()
            .await
            .map_err(request_error)?;

        let list: FlightList = Self::decode(response).await?;
        if !list.success {
            return Err(DisplayApiError::Rejected);
        }
        Ok(list.flights)
    }
}
