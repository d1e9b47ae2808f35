mod client;
mod error;
pub(crate) mod types;

pub(crate) use {
    client::ApiClient,
    error::{ApiError, ApiResult},
};
