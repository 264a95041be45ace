//! # Lexica
//!
//! Lexicaは、辞書に基づいてテキスト中の表記を高速に探し出すアノテーションエンジンです。
//!
//! ## 概要
//!
//! 辞書に登録された多数の表記（人名、挨拶文など）を、Aho–Corasick法による
//! オートマトンで1回の走査で照合します。照合結果は区切り文字の検証と
//! 最長一致による重なりの解消を経て、ラベル付きの区間（アノテーション）として
//! 返されます。
//!
//! ## 主な機能
//!
//! - **多パターン照合**: 文字単位のAho–Corasickオートマトンによる線形時間の照合
//! - **省メモリな状態表現**: 10万から100万件規模の辞書を想定したインライン遷移表
//! - **区切りの検証**: 英単語の途中や不適切な記号に隣接するマッチを除外
//! - **最長一致**: 重なり合うマッチを優先度付きで解消
//!
//! ## 使用例
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use lexica::AnnotatorBuilder;
//!
//! let dict = "mark\tMark Kosoglow\tsales
//! van der berg
//! berg";
//!
//! let mut builder = AnnotatorBuilder::new("names").ignore_case(true);
//! builder.load_reader(dict.as_bytes())?;
//! let annotator = builder.build()?;
//!
//! let annotations = annotator.annotate("Mark met Van der Berg.");
//! assert_eq!(annotations.len(), 2);
//!
//! let a0 = &annotations[0];
//! assert_eq!(a0.text(), "Mark");
//! assert_eq!(a0.range(), 0..4);
//! assert_eq!(a0.values(), Some(&["Mark Kosoglow".to_string(), "sales".to_string()][..]));
//!
//! let a1 = &annotations[1];
//! assert_eq!(a1.text(), "Van der Berg");
//! assert_eq!(a1.range(), 9..21);
//! assert_eq!(a1.to_string(), "[P0] [9..21) names: \"Van der Berg\"");
//! # Ok(())
//! # }
//! ```

#[cfg(not(any(target_pointer_width = "32", target_pointer_width = "64")))]
compile_error!("`target_pointer_width` must be 32 or 64");

/// アノテーションの型と一覧操作
pub mod annotation;

/// 辞書に基づくアノテーター
pub mod annotator;

/// Aho–Corasickオートマトン
pub mod automaton;

/// 辞書ファイルの読み込み
pub mod dictionary;

/// エラー型の定義
pub mod errors;

/// 辞書エントリ
pub mod mention;

/// 文の内部表現
mod sentence;

/// 重なり合うアノテーションの解消
pub mod span;

/// 内部ユーティリティ関数
pub mod utils;


// Re-exports
pub use annotation::Annotation;
pub use annotator::config::PresetAnnotatorKind;
pub use annotator::{Annotator, AnnotatorBuilder, AnnotatorOptions};
pub use dictionary::Stopwords;
pub use span::longest_spans;

/// このライブラリのバージョン番号
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
