use serde::{Deserialize, Serialize};
use workfolio_core::NewWork;

/// Body of `POST /works`. Absent or null text fields become empty strings so
/// that validation can name them.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkIn {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub client_url: Option<String>,
    #[serde(default)]
    pub is_visible: Option<bool>,
}

impl From<CreateWorkIn> for NewWork {
    fn from(body: CreateWorkIn) -> Self {
        NewWork {
            title: body.title.unwrap_or_default(),
            description: body.description.unwrap_or_default(),
            image_url: body.image_url.unwrap_or_default(),
            client_url: body.client_url.unwrap_or_default(),
            is_visible: body.is_visible.unwrap_or(true),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UploadOut {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorOut {
    pub message: String,
}
