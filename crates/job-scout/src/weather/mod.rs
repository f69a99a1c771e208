//! Weather Lookup

mod weatherstack;

pub use weatherstack::{WeatherstackClient, WeatherstackConfig};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Current conditions for a location
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    /// As the user asked for it, not as the provider resolved it
    pub location: String,
    /// Degrees Celsius
    pub temperature: f64,
    pub description: String,
}

impl WeatherReport {
    pub fn sentence(&self) -> String {
        format!(
            "Weather in {}: {}, {}°C",
            self.location, self.description, self.temperature
        )
    }
}

#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current(&self, location: &str) -> Result<WeatherReport>;

    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentence_format() {
        let report = WeatherReport {
            location: "Kathmandu".into(),
            temperature: 21.0,
            description: "Partly cloudy".into(),
        };
        assert_eq!(report.sentence(), "Weather in Kathmandu: Partly cloudy, 21°C");
    }
}
