//! Conversions from external infrastructure errors into domain errors.

use std::io::{Error as IoError, ErrorKind};

use reqwest::Error as HttpError;
use serde_json::Error as JsonError;
use smartpantry_domain::SmartPantryError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub SmartPantryError);

impl From<InfraError> for SmartPantryError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<SmartPantryError> for InfraError {
    fn from(value: SmartPantryError) -> Self {
        Self(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoSmartPantryError {
    fn into_smartpantry(self) -> SmartPantryError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → SmartPantryError */
/* -------------------------------------------------------------------------- */

impl IntoSmartPantryError for HttpError {
    fn into_smartpantry(self) -> SmartPantryError {
        if self.is_timeout() {
            return SmartPantryError::Network("HTTP request timed out".into());
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return SmartPantryError::Network("HTTP connection failure".into());
        }

        if self.is_builder() {
            return SmartPantryError::Config(format!("invalid HTTP request: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => SmartPantryError::Auth(message),
                404 => SmartPantryError::NotFound(message),
                400..=499 => SmartPantryError::InvalidInput(message),
                _ => SmartPantryError::Network(message),
            };
        }

        SmartPantryError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        Self(value.into_smartpantry())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → SmartPantryError */
/* -------------------------------------------------------------------------- */

impl IntoSmartPantryError for IoError {
    fn into_smartpantry(self) -> SmartPantryError {
        match self.kind() {
            ErrorKind::NotFound => SmartPantryError::NotFound(self.to_string()),
            ErrorKind::PermissionDenied => {
                SmartPantryError::Storage(format!("permission denied: {self}"))
            }
            _ => SmartPantryError::Storage(self.to_string()),
        }
    }
}

impl From<IoError> for InfraError {
    fn from(value: IoError) -> Self {
        Self(value.into_smartpantry())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → SmartPantryError */
/* -------------------------------------------------------------------------- */

impl IntoSmartPantryError for JsonError {
    fn into_smartpantry(self) -> SmartPantryError {
        if self.is_io() {
            SmartPantryError::Storage(self.to_string())
        } else {
            SmartPantryError::InvalidInput(format!("malformed JSON: {self}"))
        }
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        Self(value.into_smartpantry())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use reqwest::{Client, StatusCode};
    use tokio::runtime::Runtime;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[test]
    fn io_permission_denied_maps_to_storage_error() {
        let err = IoError::new(ErrorKind::PermissionDenied, "session file");
        let mapped: SmartPantryError = InfraError::from(err).into();
        match mapped {
            SmartPantryError::Storage(msg) => assert!(msg.contains("permission denied")),
            other => panic!("expected storage error, got {:?}", other),
        }
    }

    #[test]
    fn io_not_found_maps_to_not_found() {
        let err = IoError::new(ErrorKind::NotFound, "missing");
        let mapped: SmartPantryError = InfraError::from(err).into();
        assert!(matches!(mapped, SmartPantryError::NotFound(_)));
    }

    #[test]
    fn json_syntax_error_maps_to_invalid_input() {
        let err = serde_json::from_str::<serde_json::Value>("{ nope").unwrap_err();
        let mapped: SmartPantryError = InfraError::from(err).into();
        match mapped {
            SmartPantryError::InvalidInput(msg) => assert!(msg.contains("malformed JSON")),
            other => panic!("expected invalid input, got {:?}", other),
        }
    }

    #[test]
    fn http_status_401_maps_to_auth_error() {
        Runtime::new().unwrap().block_on(async {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .respond_with(ResponseTemplate::new(StatusCode::UNAUTHORIZED))
                .mount(&server)
                .await;

            let client = Client::builder().no_proxy().build().unwrap();
            let error =
                client.get(server.uri()).send().await.unwrap().error_for_status().unwrap_err();

            let mapped: SmartPantryError = InfraError::from(error).into();
            match mapped {
                SmartPantryError::Auth(msg) => assert!(msg.contains("401")),
                other => panic!("expected auth error, got {:?}", other),
            }
        });
    }

    #[test]
    fn http_status_404_maps_to_not_found() {
        Runtime::new().unwrap().block_on(async {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .respond_with(ResponseTemplate::new(StatusCode::NOT_FOUND))
                .mount(&server)
                .await;

            let client = Client::builder().no_proxy().build().unwrap();
            let error =
                client.get(server.uri()).send().await.unwrap().error_for_status().unwrap_err();

            let mapped: SmartPantryError = InfraError::from(error).into();
            assert!(matches!(mapped, SmartPantryError::NotFound(_)));
        });
    }
}
