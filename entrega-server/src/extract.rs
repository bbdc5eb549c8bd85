//! Path extractor whose rejection renders the standard envelope instead
//! of axum's plain-text default.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use crate::errors::ApiError;

/// Drop-in replacement for [`axum::extract::Path`]. A non-parsing path
/// parameter (e.g. `GET /pedidos/abc`) answers with the same
/// `ApiResponse` shape every other failure uses.
#[derive(Debug, Clone, Copy)]
pub struct Path<T>(pub T);

impl<S, T> FromRequestParts<S> for Path<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        match axum::extract::Path::<T>::from_request_parts(parts, state).await {
            Ok(axum::extract::Path(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError::new(
                rejection.status(),
                "Identificador de ruta inválido",
            )),
        }
    }
}
