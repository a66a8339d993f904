use serde::Serialize;

/// `{"status": ...}` acknowledgement used by the JSON mutation endpoints.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct StatusResponse {
    pub status: &'static str,
}

impl StatusResponse {
    pub const SUCCESS: Self = Self { status: "success" };
    pub const ALREADY_FAVORITED: Self = Self {
        status: "already_favorited",
    };
}

/// View model for pages that carry no data beyond which form to show.
#[derive(Debug, Serialize)]
pub struct PageView {
    pub page: &'static str,
}
