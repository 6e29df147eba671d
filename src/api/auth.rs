use super::client::{text_form, ApiClient};
use crate::error::Result;
use titweng_common::LoginResponse;

impl ApiClient {
    /// ログインしてトークンを保存する
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        let form = text_form(vec![
            ("username", username.trim().to_string()),
            ("password", password.to_string()),
        ]);
        let response: LoginResponse = self.post_form("/admin/login", form).await?;
        self.context().set_token(&response.access_token)?;
        tracing::info!(username = username.trim(), "logged in");
        Ok(response)
    }

    pub fn logout(&self) -> Result<()> {
        self.context().clear_token()
    }
}
