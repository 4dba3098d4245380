//! Query string extractors.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::errors::AppError;

/// `Query` whose rejection renders as a 400 error body
pub struct QueryParams<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::bad_request(e.body_text()))?;
        Ok(QueryParams(value))
    }
}

/// Query string that has passed its `validator` rules
pub struct ValidatedQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let QueryParams(value) = QueryParams::<T>::from_request_parts(parts, state).await?;
        value.validate().map_err(AppError::InvalidFields)?;
        Ok(ValidatedQuery(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Lookup {
        #[validate(length(min = 1, message = "Code is required"))]
        code: String,
    }

    fn parts(uri: &str) -> Parts {
        Request::builder().uri(uri).body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn test_validated_query_accepts_valid_input() {
        let mut parts = parts("/lookup?code=MUG-001");
        let ValidatedQuery(lookup) = ValidatedQuery::<Lookup>::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(lookup.code, "MUG-001");
    }

    #[tokio::test]
    async fn test_validated_query_rejects_rule_violation() {
        let mut parts = parts("/lookup?code=");
        let err = ValidatedQuery::<Lookup>::from_request_parts(&mut parts, &())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, AppError::InvalidFields(_)));
    }

    #[test]
    fn test_missing_parameter_is_bad_request() {
        let mut parts = parts("/lookup");
        let err = tokio_test::block_on(QueryParams::<Lookup>::from_request_parts(&mut parts, &()))
            .err()
            .unwrap();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
