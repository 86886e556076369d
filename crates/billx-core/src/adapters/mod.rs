//! One adapter per supported service.

mod bit2bill;
mod living_room;
mod paid_by_coins;

pub use bit2bill::Bit2BillAdapter;
pub use living_room::LivingRoomAdapter;
pub use paid_by_coins::PaidByCoinsAdapter;

use serde::de::DeserializeOwned;

use crate::http_client::HttpResponse;
use crate::price_service::ServiceError;

/// Browser user-agent the services expect on API calls.
pub(crate) const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/68.0.3440.106 Safari/537.36";

/// Checks the status line, then decodes the body as JSON.
pub(crate) fn decode_json<T: DeserializeOwned>(
    url: &str,
    response: &HttpResponse,
) -> Result<T, ServiceError> {
    if !response.is_success() {
        return Err(ServiceError::Status {
            status: response.status,
            url: url.to_owned(),
        });
    }
    serde_json::from_str(&response.body).map_err(|error| ServiceError::Decode {
        url: url.to_owned(),
        message: error.to_string(),
    })
}
