//! 一覧表示用の検索・並べ替え
//!
//! 件数の少ない一覧をクライアント側で絞り込む。

use crate::types::{Cow, Owner};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// 並べ替え方向
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// 並べ替え用の列値
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue<'a> {
    Text(&'a str),
    Number(f64),
}

impl CellValue<'_> {
    fn compare(&self, other: &CellValue<'_>) -> Ordering {
        match (self, other) {
            (CellValue::Number(a), CellValue::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (CellValue::Text(a), CellValue::Text(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
            (CellValue::Number(_), CellValue::Text(_)) => Ordering::Less,
            (CellValue::Text(_), CellValue::Number(_)) => Ordering::Greater,
        }
    }
}

/// 検索・並べ替え可能な行
pub trait TableRow {
    /// 検索対象の文字列
    fn search_fields(&self) -> Vec<Option<&str>>;

    /// 列キーに対応する値（未知のキーや欠損はNone）
    fn cell(&self, column: &str) -> Option<CellValue<'_>>;
}

impl TableRow for Cow {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.cow_tag.as_str()),
            self.owner_full_name.as_deref(),
            self.breed.as_deref(),
        ]
    }

    fn cell(&self, column: &str) -> Option<CellValue<'_>> {
        match column {
            "cow_tag" | "tag" => Some(CellValue::Text(&self.cow_tag)),
            "owner_full_name" | "owner" => self.owner_full_name.as_deref().map(CellValue::Text),
            "breed" => self.breed.as_deref().map(CellValue::Text),
            "color" => self.color.as_deref().map(CellValue::Text),
            "age" => self.age.map(|age| CellValue::Number(age as f64)),
            "created_at" | "registered" => self.created_at.as_deref().map(CellValue::Text),
            _ => None,
        }
    }
}

impl TableRow for Owner {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            self.full_name.as_deref(),
            self.phone.as_deref(),
            self.email.as_deref(),
        ]
    }

    fn cell(&self, column: &str) -> Option<CellValue<'_>> {
        match column {
            "full_name" | "name" => self.full_name.as_deref().map(CellValue::Text),
            "phone" => self.phone.as_deref().map(CellValue::Text),
            "email" => self.email.as_deref().map(CellValue::Text),
            "address" => self.address.as_deref().map(CellValue::Text),
            "created_at" => self.created_at.as_deref().map(CellValue::Text),
            _ => None,
        }
    }
}

/// 部分一致（大文字小文字を区別しない）で絞り込む
///
/// 空の検索語は全件を返す。
pub fn filter_rows<'a, T: TableRow>(rows: &'a [T], term: &str) -> Vec<&'a T> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return rows.iter().collect();
    }

    rows.iter()
        .filter(|row| {
            row.search_fields()
                .into_iter()
                .flatten()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}

/// 列で並べ替える（欠損値は方向にかかわらず末尾、安定ソート）
pub fn sort_rows<T: TableRow>(rows: &mut [&T], column: &str, direction: SortDirection) {
    rows.sort_by(|a, b| match (a.cell(column), b.cell(column)) {
        (Some(x), Some(y)) => {
            let ordering = x.compare(&y);
            match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
