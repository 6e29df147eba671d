use super::client::{jpeg_part, path_segment, text_form, ApiClient};
use crate::capture::ImageUpload;
use crate::error::{AdminError, Result};
use titweng_common::validation::normalize_tag;
use titweng_common::{ApiMessage, Cow, CowList, CowUpdate, OwnerTransfer, RegisterResponse, Registration, TagInfo};

/// 新規登録の送信内容
#[derive(Debug, Clone)]
pub struct NewCattle {
    pub registration: Registration,
    pub nose_prints: Vec<ImageUpload>,
    pub facial_image: ImageUpload,
}

impl ApiClient {
    pub async fn list_cows(&self) -> Result<Vec<Cow>> {
        let list: CowList = self.get_json("/admin/cows").await?;
        Ok(list.cows)
    }

    pub async fn get_cow(&self, id: &str) -> Result<Cow> {
        self.get_json(&format!("/admin/cows/{}", path_segment(id))).await
    }

    /// タグから牛を探す（一覧APIから引く）
    pub async fn find_cow(&self, tag: &str) -> Result<Cow> {
        let tag = normalize_tag(tag)?;
        self.list_cows()
            .await?
            .into_iter()
            .find(|cow| cow.cow_tag.eq_ignore_ascii_case(&tag))
            .ok_or_else(|| AdminError::NotFound(format!("cow {}", tag)))
    }

    /// 更新・移転はIDで行うため、タグからIDを引く
    async fn cow_id_for(&self, tag: &str) -> Result<String> {
        let cow = self.find_cow(tag).await?;
        cow.cow_id
            .map(|id| id.to_string())
            .ok_or_else(|| AdminError::Transport(format!("cow {} has no id in the listing", cow.cow_tag)))
    }

    pub async fn next_tag(&self) -> Result<TagInfo> {
        self.get_json("/admin/cow-tag/info").await
    }

    pub async fn register_cow(&self, cattle: NewCattle) -> Result<RegisterResponse> {
        cattle
            .registration
            .validate(cattle.nose_prints.len(), true)?;

        let mut form = text_form(cattle.registration.form_fields());
        for print in cattle.nose_prints {
            form = form.part("nose_print_files", jpeg_part(&print.file_name, print.bytes)?);
        }
        let face = cattle.facial_image;
        form = form.part("facial_image_file", jpeg_part(&face.file_name, face.bytes)?);

        let response: RegisterResponse = self.post_form("/admin/register-cow", form).await?;
        tracing::info!(cow_tag = ?response.cow_tag, "registered cow");
        Ok(response)
    }

    pub async fn update_cow(&self, tag: &str, update: &CowUpdate) -> Result<ApiMessage> {
        if update.is_empty() {
            return Err(AdminError::Validation("Nothing to update: give --breed, --color or --age".into()));
        }
        let id = self.cow_id_for(tag).await?;
        let path = format!("/admin/cows/{}", path_segment(&id));
        self.put_form(&path, text_form(update.form_fields())).await
    }

    pub async fn transfer_cow(&self, tag: &str, new_owner: &OwnerTransfer) -> Result<ApiMessage> {
        new_owner.validate()?;
        let id = self.cow_id_for(tag).await?;
        let path = format!("/admin/cows/{}/transfer", path_segment(&id));
        self.post_form(&path, text_form(new_owner.form_fields())).await
    }

    /// 削除（`full` の場合は所有者・照合履歴などの関連データも削除）
    pub async fn delete_cow(&self, tag: &str, full: bool) -> Result<ApiMessage> {
        let tag = normalize_tag(tag)?;
        let action = if full { "delete-full" } else { "delete" };
        let response = self
            .delete_json(&format!("/admin/cow/{}/{}", path_segment(&tag), action))
            .await?;
        tracing::info!(cow_tag = %tag, full, "deleted cow");
        Ok(response)
    }

    pub async fn cow_face(&self, tag: &str) -> Result<Vec<u8>> {
        let tag = normalize_tag(tag)?;
        self.get_bytes(&format!("/admin/cow/{}/face", path_segment(&tag))).await
    }
}
