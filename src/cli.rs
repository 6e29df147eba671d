use crate::context::{Language, Theme};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "titweng-admin")]
#[command(about = "家畜登録システム管理CLI（鼻紋照合・登録・通報管理）", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 表ではなくJSONで出力
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 管理者としてログイン
    Login {
        /// ユーザー名（省略時は入力を求める）
        #[arg(short, long)]
        username: Option<String>,
    },

    /// 保存済みトークンを削除
    Logout,

    /// ログイン状態を表示
    Session,

    /// 統計と最近のアクティビティ
    Dashboard,

    /// 牛の一覧・登録・更新・削除
    #[command(subcommand)]
    Cattle(CattleCommand),

    /// 所有者一覧
    Owners {
        /// 名前・電話・メールで絞り込み
        #[arg(short, long)]
        search: Option<String>,

        /// 並べ替える列 (full_name/phone/email/address/created_at)
        #[arg(long)]
        sort: Option<String>,

        /// 降順
        #[arg(long)]
        desc: bool,
    },

    /// 鼻紋・タグで照合
    #[command(subcommand)]
    Verify(VerifyCommand),

    /// 盗難・紛争の通報
    #[command(subcommand)]
    Reports(ReportCommand),

    /// 登録受領証
    #[command(subcommand)]
    Receipt(ReceiptCommand),

    /// システム状態の確認
    #[command(subcommand)]
    System(SystemCommand),

    /// 言語・テーマの表示/変更
    Prefs {
        #[arg(long)]
        language: Option<Language>,

        #[arg(long)]
        theme: Option<Theme>,
    },

    /// 設定を表示/編集
    Config {
        /// APIのベースURLを設定
        #[arg(long)]
        set_api_url: Option<String>,

        /// 再エンコード時のJPEG品質 (1-100)
        #[arg(long)]
        set_jpeg_quality: Option<u8>,

        /// 照合時の既定の位置
        #[arg(long)]
        set_default_location: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[derive(Subcommand)]
pub enum CattleCommand {
    /// 登録済みの牛を一覧表示
    List {
        /// タグ・所有者名・品種で絞り込み
        #[arg(short, long)]
        search: Option<String>,

        /// 並べ替える列 (cow_tag/owner_full_name/breed/color/age/created_at)
        #[arg(long)]
        sort: Option<String>,

        /// 降順
        #[arg(long)]
        desc: bool,
    },

    /// 1頭の詳細
    Show { tag: String },

    /// 新規登録（鼻紋3枚 + 顔写真1枚）
    Register {
        #[arg(long)]
        owner_name: String,

        #[arg(long)]
        owner_email: Option<String>,

        #[arg(long)]
        owner_phone: Option<String>,

        #[arg(long)]
        owner_address: Option<String>,

        #[arg(long)]
        owner_national_id: Option<String>,

        #[arg(long)]
        breed: String,

        #[arg(long)]
        color: String,

        /// 年齢（歳）
        #[arg(long)]
        age: u32,

        /// 鼻紋画像（3枚、ファイルまたはフォルダ）
        #[arg(long = "nose", required = true, num_args = 1..)]
        nose: Vec<PathBuf>,

        /// 顔写真
        #[arg(long)]
        face: PathBuf,
    },

    /// 品種・毛色・年齢を更新
    Update {
        tag: String,

        #[arg(long)]
        breed: Option<String>,

        #[arg(long)]
        color: Option<String>,

        #[arg(long)]
        age: Option<u32>,
    },

    /// 所有者を移転
    Transfer {
        tag: String,

        #[arg(long)]
        name: String,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        phone: String,

        #[arg(long)]
        address: String,

        #[arg(long)]
        national_id: String,
    },

    /// 削除
    Delete {
        tag: String,

        /// 所有者・照合履歴など関連データも削除
        #[arg(long)]
        full: bool,

        /// 確認を省略
        #[arg(short, long)]
        yes: bool,
    },

    /// 次に払い出されるタグ
    NextTag,

    /// 顔写真をダウンロード
    Face {
        tag: String,

        /// 保存先（省略時は <TAG>-face.jpg）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum VerifyCommand {
    /// タグで照合
    Tag {
        tag: String,

        /// 照合場所
        #[arg(short, long)]
        location: Option<String>,

        /// タグ書式（TW-YYYY-XXX-NNNN）を送信前に確認
        #[arg(long)]
        strict_tag: bool,
    },

    /// 鼻紋画像で照合
    Nose {
        /// 画像ファイルまたはフォルダ
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// 照合場所
        #[arg(short, long)]
        location: Option<String>,
    },

    /// 照合履歴
    Logs {
        /// 表示件数
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
}

#[derive(Subcommand)]
pub enum ReportCommand {
    /// 通報一覧
    List {
        #[arg(long)]
        status: Option<ReportStatus>,

        /// 種別 (theft/dispute など)
        #[arg(long = "type")]
        report_type: Option<String>,
    },

    /// 1件の詳細（RPT-007 または 7）
    Show {
        #[arg(value_parser = parse_report_id)]
        id: i64,
    },

    /// 返信してステータスを更新
    Reply {
        #[arg(value_parser = parse_report_id)]
        id: i64,

        /// 返信内容
        #[arg(short, long)]
        message: String,

        #[arg(long, default_value = "resolved")]
        status: ReportStatus,
    },
}

#[derive(Subcommand)]
pub enum ReceiptCommand {
    /// 受領証の情報
    Info { tag: String },

    /// 受領証PDFをダウンロード
    Download {
        tag: String,

        /// 保存先（省略時は cow-receipt-<TAG>.pdf）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum SystemCommand {
    /// ヘルスチェック
    Health,

    /// メール設定の確認
    EmailConfig,

    /// 照合モデルの確認
    MlModels,

    /// テストメールを送信
    TestEmail { email: String },

    /// データベースを初期化
    SetupDb {
        /// 確認を省略
        #[arg(short, long)]
        yes: bool,
    },

    /// ヘルスチェックとメール設定をまとめて表示
    Status,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportStatus {
    Pending,
    InProgress,
    Resolved,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::InProgress => "in_progress",
            ReportStatus::Resolved => "resolved",
        }
    }
}

/// "RPT-007" / "rpt-7" / "7" を数値IDにする
pub fn parse_report_id(value: &str) -> Result<i64, String> {
    let trimmed = value.trim();
    let digits = trimmed
        .get(..4)
        .filter(|prefix| prefix.eq_ignore_ascii_case("RPT-"))
        .map(|_| &trimmed[4..])
        .unwrap_or(trimmed);

    digits
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| format!("Invalid report id: {}. Use RPT-007 or 7", value))
}
