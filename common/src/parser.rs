//! 照合APIレスポンスの解釈
//!
//! `verification_results` の先頭要素だけを見る。
//! - 鼻紋照合: 類似度(0.0-1.0)を%に換算
//! - タグ照合: タグが一致した時点で本人確認とみなし100%固定

use crate::error::{Error, Result};
use crate::types::{VerificationResultEntry, VerifyResponse};
use crate::verification::VerificationOutcome;

/// 照合方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyMethod {
    NosePrint,
    Tag,
}

impl VerifyMethod {
    fn not_found_message(&self) -> &'static str {
        match self {
            VerifyMethod::NosePrint => "No matching cow found",
            VerifyMethod::Tag => "Cow tag not found",
        }
    }
}

/// 照合レスポンスを解釈する
///
/// `verification_results` が無い・空の場合は不一致として扱う。
pub fn interpret_verification(response: &VerifyResponse, method: VerifyMethod) -> VerificationOutcome {
    let entry = match first_entry(response) {
        Ok(Some(entry)) => entry,
        Ok(None) => return VerificationOutcome::no_match(method.not_found_message()),
        Err(_) => return VerificationOutcome::no_match("Invalid response format"),
    };

    if !entry.cow_found {
        return VerificationOutcome::no_match(method.not_found_message());
    }

    let similarity_percent = match method {
        VerifyMethod::NosePrint => entry.similarity.unwrap_or(0.0) * 100.0,
        VerifyMethod::Tag => 100.0,
    };

    VerificationOutcome::Found {
        similarity_percent,
        cow: entry.cow_details.clone().unwrap_or_default(),
        verified: entry.verified,
        method: entry.verification_method.clone(),
    }
}

/// JSON文字列から直接解釈する
pub fn parse_verification(body: &str, method: VerifyMethod) -> Result<VerificationOutcome> {
    let response: VerifyResponse = serde_json::from_str(body)?;
    if response.verification_results.is_none() {
        return Err(Error::Parse("verification_results is missing".into()));
    }
    Ok(interpret_verification(&response, method))
}

fn first_entry(response: &VerifyResponse) -> Result<Option<&VerificationResultEntry>> {
    let results = response
        .verification_results
        .as_ref()
        .ok_or_else(|| Error::Parse("verification_results is missing".into()))?;
    Ok(results.first())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verification::MatchClass;

    #[test]
    fn test_nose_match_scales_fraction() {
        let body = r#"{
            "verification_results": [{
                "cow_found": true,
                "similarity": 0.97,
                "cow_details": {
                    "cow_tag": "TW-2025-BWF-0042",
                    "breed": "Ankole",
                    "color": "Brown",
                    "owner_name": "John Deng",
                    "facial_image_url": "/static/faces/42.jpg"
                },
                "verified": true,
                "verification_method": "nose_print"
            }]
        }"#;
        let outcome = parse_verification(body, VerifyMethod::NosePrint).unwrap();
        let classification = outcome.classify();
        assert_eq!(classification.class, MatchClass::Match);
        assert_eq!(classification.title, "MATCH FOUND (97% Similarity)");
        let cow = outcome.cow().unwrap();
        assert_eq!(cow.owner_name.as_deref(), Some("John Deng"));
        assert_eq!(cow.facial_image_url.as_deref(), Some("/static/faces/42.jpg"));
    }

    #[test]
    fn test_empty_results_is_no_match() {
        let outcome = parse_verification(r#"{"verification_results": []}"#, VerifyMethod::NosePrint).unwrap();
        assert!(!outcome.found());
        assert_eq!(outcome.classify().title, "NO MATCH FOUND");
        assert_eq!(
            outcome,
            VerificationOutcome::no_match("No matching cow found")
        );
    }

    #[test]
    fn test_tag_match_is_forced_to_full_similarity() {
        let body = r#"{"verification_results": [{"cow_found": true, "similarity": 0.2, "cow_details": {"cow_tag": "TW-2025-HLS-0156"}}]}"#;
        let outcome = parse_verification(body, VerifyMethod::Tag).unwrap();
        assert_eq!(outcome.similarity_percent(), Some(100.0));
        assert_eq!(outcome.classify().class, MatchClass::Match);
    }

    #[test]
    fn test_tag_not_found_message() {
        let body = r#"{"verification_results": [{"cow_found": false}]}"#;
        let outcome = parse_verification(body, VerifyMethod::Tag).unwrap();
        assert_eq!(outcome, VerificationOutcome::no_match("Cow tag not found"));
    }

    #[test]
    fn test_null_cow_found_is_no_match() {
        let body = r#"{"verification_results": [{"cow_found": null, "similarity": 0.99, "cow_details": null}]}"#;
        let outcome = parse_verification(body, VerifyMethod::NosePrint).unwrap();
        assert_eq!(outcome, VerificationOutcome::no_match("No matching cow found"));
    }

    #[test]
    fn test_missing_similarity_counts_as_zero() {
        let response = VerifyResponse {
            verification_results: Some(vec![VerificationResultEntry {
                cow_found: true,
                ..Default::default()
            }]),
            detail: None,
        };
        let outcome = interpret_verification(&response, VerifyMethod::NosePrint);
        assert_eq!(outcome.similarity_percent(), Some(0.0));
        assert_eq!(outcome.classify().class, MatchClass::PartialMatch);
    }

    #[test]
    fn test_missing_results_field() {
        let response = VerifyResponse::default();
        let outcome = interpret_verification(&response, VerifyMethod::NosePrint);
        assert_eq!(outcome, VerificationOutcome::no_match("Invalid response format"));

        let err = parse_verification(r#"{"detail": "oops"}"#, VerifyMethod::Tag).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_invalid_json() {
        let err = parse_verification("not json", VerifyMethod::Tag).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }
}
