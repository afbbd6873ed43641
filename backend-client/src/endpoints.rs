use raksha_protocol::LIVE_CHANNEL_PATH;
use raksha_protocol::RiskLevel;
use url::Url;

use crate::error::ApiError;
use crate::error::ApiResult;

/// Absolute addresses of every backend operation, derived from one base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: String,
}

impl Endpoints {
    /// Validate `base` and strip any trailing slash. Only `http` and `https`
    /// bases are accepted because the live address is derived by scheme
    /// substitution.
    pub fn new(base: &str) -> ApiResult<Self> {
        let trimmed = base.trim().trim_end_matches('/');
        let parsed = Url::parse(trimmed).map_err(|e| ApiError::InvalidBase {
            base: base.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::InvalidBase {
                base: base.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }
        Ok(Self {
            base: trimmed.to_string(),
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn panic(&self) -> String {
        format!("{}/panic", self.base)
    }

    pub fn anomaly(&self) -> String {
        format!("{}/anomaly", self.base)
    }

    pub fn escalate(&self) -> String {
        format!("{}/escalate", self.base)
    }

    pub fn explanation(&self, reason: &str) -> String {
        format!(
            "{}/explanation?reason={}",
            self.base,
            urlencoding::encode(reason)
        )
    }

    pub fn guidance(&self, location: &str, risk: RiskLevel) -> String {
        format!(
            "{}/guidance?location={}&risk={}",
            self.base,
            urlencoding::encode(location),
            urlencoding::encode(risk.as_ref())
        )
    }

    /// Live channel address: the first `http` of the base becomes `ws`
    /// (so `https` maps to `wss`), followed by the channel path.
    pub fn live(&self) -> String {
        format!("{}{LIVE_CHANNEL_PATH}", self.base.replacen("http", "ws", 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn endpoints(base: &str) -> Endpoints {
        Endpoints::new(base).unwrap_or_else(|e| panic!("{base} should be accepted: {e}"))
    }

    #[test]
    fn live_address_substitutes_scheme() {
        assert_eq!(endpoints("http://localhost:8000").live(), "ws://localhost:8000/ws");
        assert_eq!(endpoints("https://raksha.example/").live(), "wss://raksha.example/ws");
    }

    #[test]
    fn query_values_are_percent_encoded() {
        let e = endpoints("http://localhost:8000/");
        assert_eq!(
            e.explanation("route_deviation"),
            "http://localhost:8000/explanation?reason=route_deviation"
        );
        assert_eq!(
            e.guidance("Metro Station XYZ", RiskLevel::High),
            "http://localhost:8000/guidance?location=Metro%20Station%20XYZ&risk=high"
        );
    }

    #[test]
    fn rejects_non_http_bases() {
        assert!(matches!(
            Endpoints::new("ftp://localhost"),
            Err(ApiError::InvalidBase { .. })
        ));
        assert!(matches!(
            Endpoints::new("not a url"),
            Err(ApiError::InvalidBase { .. })
        ));
    }
}
