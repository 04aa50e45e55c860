use std::time::Duration;

use reqwest::{
    Url,
    blocking::{Client, RequestBuilder},
};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::{
    api::{Api, ApiError},
    models::{
        area::{Area, AreaInput},
        employee::{Employee, EmployeeInput},
    },
};

/// [`Api`] backed by the REST service, using a blocking client.
pub struct HttpApi {
    base_url: String,
    client: Client,
}

impl HttpApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Transport {
                url: base_url.to_string(),
                source: e,
            })?;

        Self::with_client(base_url, client)
    }

    pub fn with_client(base_url: &str, client: Client) -> Result<Self, ApiError> {
        Url::parse(base_url).map_err(|e| ApiError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn send(&self, request: RequestBuilder, url: &str) -> Result<String, ApiError> {
        let response = request.send().map_err(|e| ApiError::Transport {
            url: url.to_string(),
            source: e,
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "API returned an error status");
            return Err(ApiError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response.text().map_err(|e| ApiError::Transport {
            url: url.to_string(),
            source: e,
        })
    }

    fn decode<T: DeserializeOwned>(body: &str, url: &str) -> Result<T, ApiError> {
        serde_json::from_str(body).map_err(|e| ApiError::Decode {
            url: url.to_string(),
            source: e,
        })
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!(%url, "GET");
        let body = self.send(self.client.get(&url), &url)?;
        Self::decode(&body, &url)
    }

    fn post<B: serde::Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!(%url, "POST");
        let body = self.send(self.client.post(&url).json(body), &url)?;
        Self::decode(&body, &url)
    }

    fn put<B: serde::Serialize>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        let url = self.url(path);
        debug!(%url, "PUT");
        self.send(self.client.put(&url).json(body), &url)?;
        Ok(())
    }

    fn delete(&self, path: &str) -> Result<(), ApiError> {
        let url = self.url(path);
        debug!(%url, "DELETE");
        self.send(self.client.delete(&url), &url)?;
        Ok(())
    }
}

impl Api for HttpApi {
    fn list_areas(&self) -> Result<Vec<Area>, ApiError> {
        self.get("areas")
    }

    fn get_area(&self, id: i64) -> Result<Area, ApiError> {
        self.get(&format!("areas/info/{}", id))
    }

    fn create_area(&self, input: &AreaInput) -> Result<Area, ApiError> {
        self.post("areas/crear", input)
    }

    fn update_area(&self, id: i64, input: &AreaInput) -> Result<(), ApiError> {
        self.put(&format!("areas/update/{}", id), input)
    }

    fn delete_area(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("areas/delete/{}", id))
    }

    fn list_employees(&self) -> Result<Vec<Employee>, ApiError> {
        self.get("employees")
    }

    fn get_employee(&self, id: i64) -> Result<Employee, ApiError> {
        self.get(&format!("employees/info/{}", id))
    }

    fn create_employee(&self, input: &EmployeeInput) -> Result<Employee, ApiError> {
        self.post("employees/create", input)
    }

    fn update_employee(&self, id: i64, input: &EmployeeInput) -> Result<(), ApiError> {
        self.put(&format!("employees/update/{}", id), input)
    }

    fn delete_employee(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("employees/delete/{}", id))
    }
}
