//! Titweng Admin Common Library
//!
//! 管理CLIから使う、I/Oを伴わない型とロジック

pub mod activity;
pub mod error;
pub mod parser;
pub mod table;
pub mod types;
pub mod validation;
pub mod verification;

pub use activity::{build_feed, parse_timestamp, time_ago, Activity, ActivityKind};
pub use error::{Error, Result};
pub use parser::{interpret_verification, parse_verification, VerifyMethod};
pub use table::{filter_rows, sort_rows, SortDirection, TableRow};
pub use types::*;
pub use validation::{CowUpdate, OwnerTransfer, Registration};
pub use verification::{
    classify, similarity_tone, Classification, Icon, MatchClass, Tone, VerificationOutcome,
    MATCH_THRESHOLD, REVIEW_THRESHOLD,
};
