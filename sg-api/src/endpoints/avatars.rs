//! Avatar endpoints.

use reqwest::Url;
use sg_core::error::SgResult;

use crate::client::ApiClient;

impl ApiClient {
    /// URL of an image showing the initials of `name`.
    pub fn initials_avatar_url(&self, name: &str) -> SgResult<Url> {
        self.public_url("/avatars/initials", &[("name", name.to_string())])
    }
}
