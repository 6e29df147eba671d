//! 照合結果の分類
//!
//! バックエンドが返した `(found, similarity)` を3段階に分類し、
//! 表示用のトーン・アイコン・タイトルを付与する。
//!
//! - 95%以上: 一致（MATCH）
//! - 95%未満: 部分一致（PARTIAL_MATCH）、85%以上は要確認（warning）
//! - 見つからない: 不一致（NO_MATCH）
//!
//! 同じ閾値は照合履歴の類似度の色分けにも使う（[`similarity_tone`]）。

use crate::types::CowSummary;
use serde::{Deserialize, Serialize};

/// この値以上を一致とみなす（%）
pub const MATCH_THRESHOLD: f64 = 95.0;

/// この値以上の部分一致はwarning、未満はdestructive（%）
pub const REVIEW_THRESHOLD: f64 = 85.0;

/// 分類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchClass {
    NoMatch,
    PartialMatch,
    Match,
}

/// 表示色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Success,
    Warning,
    Destructive,
}

/// 表示アイコン
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Icon {
    Check,
    Alert,
    Cross,
}

impl Icon {
    pub fn symbol(&self) -> &'static str {
        match self {
            Icon::Check => "✅",
            Icon::Alert => "⚠️",
            Icon::Cross => "❌",
        }
    }
}

/// 分類結果と表示メタデータ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub class: MatchClass,
    pub tone: Tone,
    pub icon: Icon,
    pub title: String,
}

/// `(found, similarity_percent)` を分類する
///
/// `similarity_percent` は0-100に換算済みであること（範囲外の値は検証しない）。
/// `found == false` の場合、`similarity_percent` は参照しない。
pub fn classify(found: bool, similarity_percent: f64) -> Classification {
    if !found {
        return Classification {
            class: MatchClass::NoMatch,
            tone: Tone::Destructive,
            icon: Icon::Cross,
            title: "NO MATCH FOUND".to_string(),
        };
    }

    let percent = format_percent(similarity_percent);
    if similarity_percent >= MATCH_THRESHOLD {
        Classification {
            class: MatchClass::Match,
            tone: Tone::Success,
            icon: Icon::Check,
            title: format!("MATCH FOUND ({}% Similarity)", percent),
        }
    } else {
        Classification {
            class: MatchClass::PartialMatch,
            tone: similarity_tone(similarity_percent),
            icon: Icon::Alert,
            title: format!("PARTIAL MATCH ({}% Similarity)", percent),
        }
    }
}

/// 類似度（%）の色分け（照合履歴と共通）
pub fn similarity_tone(similarity_percent: f64) -> Tone {
    if similarity_percent >= MATCH_THRESHOLD {
        Tone::Success
    } else if similarity_percent >= REVIEW_THRESHOLD {
        Tone::Warning
    } else {
        Tone::Destructive
    }
}

/// 類似度の表示用文字列
///
/// 小数1桁で切り捨て、".0" は省く（0.97 * 100 の誤差で "97.00000000000001" と
/// 出さないため）。切り捨てなので部分一致が95%と表示されることはない。
pub fn format_percent(similarity_percent: f64) -> String {
    let truncated = (similarity_percent * 10.0 + 1e-9).floor() / 10.0;
    let text = format!("{:.1}", truncated);
    match text.strip_suffix(".0") {
        Some(whole) => whole.to_string(),
        None => text,
    }
}

/// 1回の照合の結果
///
/// `cow` は見つかった場合にのみ存在する。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum VerificationOutcome {
    NoMatch {
        message: String,
    },
    Found {
        similarity_percent: f64,
        cow: CowSummary,
        verified: Option<bool>,
        method: Option<String>,
    },
}

impl VerificationOutcome {
    pub fn no_match(message: impl Into<String>) -> Self {
        VerificationOutcome::NoMatch {
            message: message.into(),
        }
    }

    pub fn found(&self) -> bool {
        matches!(self, VerificationOutcome::Found { .. })
    }

    pub fn similarity_percent(&self) -> Option<f64> {
        match self {
            VerificationOutcome::Found {
                similarity_percent, ..
            } => Some(*similarity_percent),
            VerificationOutcome::NoMatch { .. } => None,
        }
    }

    pub fn cow(&self) -> Option<&CowSummary> {
        match self {
            VerificationOutcome::Found { cow, .. } => Some(cow),
            VerificationOutcome::NoMatch { .. } => None,
        }
    }

    pub fn classify(&self) -> Classification {
        classify(self.found(), self.similarity_percent().unwrap_or(0.0))
    }
}
