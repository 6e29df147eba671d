//! 入力チェックとフォーム項目の組み立て
//!
//! 送信前のローカル検証のみ。最終的な判定はバックエンドが行う。

use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// 登録時に必要な鼻紋画像の枚数
pub const REQUIRED_NOSE_PRINTS: usize = 3;

/// タグ入力を正規化（前後空白を除去、空は拒否）
pub fn normalize_tag(input: &str) -> Result<String> {
    let tag = input.trim();
    if tag.is_empty() {
        return Err(Error::Validation("Please enter a cow tag".into()));
    }
    Ok(tag.to_string())
}

/// タグ書式（TW-2025-BWF-0042）の確認
pub fn check_tag_format(tag: &str) -> Result<()> {
    lazy_static::lazy_static! {
        static ref TAG_RE: Regex = Regex::new(r"^TW-\d{4}-[A-Z]{3}-\d{4}$").unwrap();
    }

    if TAG_RE.is_match(tag) {
        Ok(())
    } else {
        Err(Error::Validation(format!(
            "Tag \"{}\" does not look like TW-YYYY-XXX-NNNN",
            tag
        )))
    }
}

/// メールアドレスの簡易チェック
pub fn validate_email(input: &str) -> Result<String> {
    lazy_static::lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }

    let email = input.trim();
    if email.is_empty() {
        return Err(Error::Validation("Please enter an email address".into()));
    }
    if !EMAIL_RE.is_match(email) {
        return Err(Error::Validation(format!("Invalid email address: {}", email)));
    }
    Ok(email.to_string())
}

/// 空でない値だけをフォーム項目に追加
fn push_field(fields: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<&str>) {
    if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
        fields.push((key, value.to_string()));
    }
}

/// 牛の新規登録内容（画像以外）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Registration {
    pub owner_full_name: String,
    pub owner_email: Option<String>,
    pub owner_phone: Option<String>,
    pub owner_address: Option<String>,
    pub owner_national_id: Option<String>,
    pub breed: String,
    pub color: String,
    pub age: u32,
}

impl Registration {
    /// 必須項目と画像枚数を確認
    pub fn validate(&self, nose_print_count: usize, has_facial_image: bool) -> Result<()> {
        if nose_print_count != REQUIRED_NOSE_PRINTS {
            return Err(Error::Validation(format!(
                "Please capture exactly {} nose print images. {}/{} completed.",
                REQUIRED_NOSE_PRINTS, nose_print_count, REQUIRED_NOSE_PRINTS
            )));
        }
        if !has_facial_image {
            return Err(Error::Validation("Please capture 1 facial image.".into()));
        }
        if self.owner_full_name.trim().is_empty()
            || self.breed.trim().is_empty()
            || self.color.trim().is_empty()
        {
            return Err(Error::Validation("Please fill in all required fields.".into()));
        }
        Ok(())
    }

    /// multipartのテキスト項目（空欄は送らない）
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::new();
        push_field(&mut fields, "owner_full_name", Some(&self.owner_full_name));
        push_field(&mut fields, "owner_email", self.owner_email.as_deref());
        push_field(&mut fields, "owner_phone", self.owner_phone.as_deref());
        push_field(&mut fields, "owner_address", self.owner_address.as_deref());
        push_field(&mut fields, "owner_national_id", self.owner_national_id.as_deref());
        push_field(&mut fields, "breed", Some(&self.breed));
        push_field(&mut fields, "color", Some(&self.color));
        fields.push(("age", self.age.to_string()));
        fields
    }
}

/// 牛情報の更新内容
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CowUpdate {
    pub breed: Option<String>,
    pub color: Option<String>,
    pub age: Option<u32>,
}

impl CowUpdate {
    pub fn is_empty(&self) -> bool {
        self.form_fields().is_empty()
    }

    /// 指定された項目のみ送る（年齢0は未指定扱い）
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::new();
        push_field(&mut fields, "breed", self.breed.as_deref());
        push_field(&mut fields, "color", self.color.as_deref());
        if let Some(age) = self.age.filter(|age| *age > 0) {
            fields.push(("age", age.to_string()));
        }
        fields
    }
}

/// 所有者移転の新所有者
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OwnerTransfer {
    pub full_name: String,
    pub email: Option<String>,
    pub phone: String,
    pub address: String,
    pub national_id: String,
}

impl OwnerTransfer {
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = [
            ("full name", &self.full_name),
            ("phone", &self.phone),
            ("address", &self.address),
            ("national ID", &self.national_id),
        ]
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(label, _)| *label)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(format!(
                "New owner is missing: {}",
                missing.join(", ")
            )))
        }
    }

    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::new();
        push_field(&mut fields, "owner_full_name", Some(&self.full_name));
        push_field(&mut fields, "owner_email", self.email.as_deref());
        push_field(&mut fields, "owner_phone", Some(&self.phone));
        push_field(&mut fields, "owner_address", Some(&self.address));
        push_field(&mut fields, "owner_national_id", Some(&self.national_id));
        fields
    }
}
