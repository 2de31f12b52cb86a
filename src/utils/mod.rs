use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use chrono::{NaiveDate, Utc};
use futures_util::future::LocalBoxFuture;
use validator::Validate;

use crate::api::error;

/// Calendar day analytics counters are keyed by.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Decodes an already-parsed JSON body into `T` and runs its validation rules.
pub fn decode_json<T>(value: serde_json::Value) -> Result<T, error::Error>
where
    T: Validate + serde::de::DeserializeOwned,
{
    let model: T =
        serde_json::from_value(value).map_err(|e| error::Error::bad_request(e.to_string()))?;
    checked(model)
}

fn checked<T: Validate>(model: T) -> Result<T, error::Error> {
    model.validate().map_err(|e| error::Error::bad_request(e.to_string()))?;
    Ok(model)
}

/// JSON body that has already passed its `validator` rules.
pub struct ValidatedJson<T>(pub T);

impl<T> FromRequest for ValidatedJson<T>
where
    T: Validate + serde::de::DeserializeOwned + 'static,
{
    type Error = error::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let body = web::Json::<T>::from_request(req, payload);
        Box::pin(async move {
            let body = body.await.map_err(|e| error::Error::bad_request(e.to_string()))?;
            checked(body.into_inner()).map(ValidatedJson)
        })
    }
}

/// Query string counterpart of [`ValidatedJson`].
pub struct ValidatedQuery<T>(pub T);

impl<T> FromRequest for ValidatedQuery<T>
where
    T: Validate + serde::de::DeserializeOwned + 'static,
{
    type Error = error::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let query = web::Query::<T>::from_request(req, payload);
        Box::pin(async move {
            let query = query.await.map_err(|e| error::Error::bad_request(e.to_string()))?;
            checked(query.into_inner()).map(ValidatedQuery)
        })
    }
}
