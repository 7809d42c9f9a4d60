//! # Light Module
//!
//! Switches a named object on the EasyRemote lighting controller.
//!
//! Each call is one HTTP `PUT` of a small JSON document:
//!
//! ```text
//! PUT http://172.19.19.221/api/objects/black/state
//! {"state":true}
//! ```

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use crate::config::LightConfig;
use crate::error::{PtzPadError, Result};

/// Request timeout for the lighting controller.
const LIGHT_TIMEOUT: Duration = Duration::from_secs(2);

/// Sets the on/off state of a named light object
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LightSwitch: Send {
    async fn set_state(&mut self, object: &str, on: bool) -> Result<()>;
}

#[derive(Serialize)]
struct StateBody {
    state: bool,
}

/// HTTP client for the EasyRemote controller
#[derive(Debug, Clone)]
pub struct EasyRemoteLight {
    client: reqwest::Client,
    base_url: String,
}

impl EasyRemoteLight {
    /// # Errors
    ///
    /// Returns `Http` if the underlying HTTP client cannot be built.
    pub fn new(config: &LightConfig) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(LIGHT_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: format!("http://{}", config.host),
        })
    }

    fn object_url(&self, object: &str) -> String {
        format!("{}/api/objects/{}/state", self.base_url, object)
    }
}

#[async_trait]
impl LightSwitch for EasyRemoteLight {
    async fn set_state(&mut self, object: &str, on: bool) -> Result<()> {
        let url = self.object_url(object);
        debug!("Setting light {} to {}", object, on);

        let response = self
            .client
            .put(&url)
            .json(&StateBody { state: on })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PtzPadError::Light(format!(
                "{} answered {} when setting {} to {}",
                url, status, object, on
            )));
        }

        Ok(())
    }
}
