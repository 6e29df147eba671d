use super::client::{jpeg_part, text_form, ApiClient};
use crate::capture::ImageUpload;
use crate::error::{AdminError, Result};
use titweng_common::validation::normalize_tag;
use titweng_common::{
    interpret_verification, VerificationLog, VerificationLogList, VerificationOutcome, VerifyMethod,
    VerifyResponse,
};

impl ApiClient {
    pub async fn verify_tag(&self, tag: &str, location: Option<&str>) -> Result<VerificationOutcome> {
        let tag = normalize_tag(tag)?;
        let mut fields = vec![("cow_tag", tag.clone())];
        if let Some(location) = location.map(str::trim).filter(|l| !l.is_empty()) {
            fields.push(("location", location.to_string()));
        }

        // 未登録タグを404で返すバックエンドもあるため不一致として扱う
        let outcome = match self.post_form::<VerifyResponse>("/admin/verify/tag", text_form(fields)).await {
            Ok(response) => interpret_verification(&response, VerifyMethod::Tag),
            Err(AdminError::NotFound(_)) => VerificationOutcome::no_match("Cow tag not found"),
            Err(e) => return Err(e),
        };
        tracing::info!(cow_tag = %tag, found = outcome.found(), "tag verification");
        Ok(outcome)
    }

    pub async fn verify_nose(&self, images: Vec<ImageUpload>, location: Option<&str>) -> Result<VerificationOutcome> {
        if images.is_empty() {
            return Err(AdminError::Validation("Please capture or upload a nose print image".into()));
        }

        let count = images.len();
        let mut form = text_form(Vec::new());
        for image in images {
            tracing::debug!(file = %image.file_name, sha256 = %image.short_digest(), "uploading nose print");
            form = form.part("files", jpeg_part(&image.file_name, image.bytes)?);
        }
        if let Some(location) = location.map(str::trim).filter(|l| !l.is_empty()) {
            form = form.text("location", location.to_string());
        }

        let response: VerifyResponse = self.post_form("/admin/verify/nose", form).await?;
        let outcome = interpret_verification(&response, VerifyMethod::NosePrint);
        tracing::info!(
            images = count,
            found = outcome.found(),
            similarity = ?outcome.similarity_percent(),
            "nose print verification"
        );
        Ok(outcome)
    }

    pub async fn verification_logs(&self) -> Result<Vec<VerificationLog>> {
        let list: VerificationLogList = self.get_json("/admin/verifications").await?;
        Ok(list.verifications)
    }
}
