//! プリセットアノテーターの設定
//!
//! このモジュールは、よく使われる辞書に合わせた設定済みのアノテーターの
//! 種類とメタデータを定義します。辞書ファイル自体は同梱されていないため、
//! [`PresetAnnotatorKind::file_name`] の名前で用意する必要があります。

use std::fmt;
use std::str::FromStr;

use crate::errors::LexicaError;

/// 設定済みのアノテーターの種類を表します。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PresetAnnotatorKind {
    /// 名（大文字小文字を無視、3文字以上）
    FirstNames,
    /// 姓（各単語の先頭を大文字に正規化、3文字以上）
    LastNames,
    /// 書き出しの挨拶（テキスト先頭のみ）
    Salutations,
    /// 結びの挨拶（テキスト先頭のみ）
    Valedictions,
}

impl PresetAnnotatorKind {
    /// すべての種類
    pub const ALL: [Self; 4] = [
        Self::FirstNames,
        Self::LastNames,
        Self::Salutations,
        Self::Valedictions,
    ];

    pub(crate) fn meta(&self) -> &'static AnnotatorMeta {
        use PresetAnnotatorKind::*;

        match self {
            FirstNames => &FIRST_NAMES,
            LastNames => &LAST_NAMES,
            Salutations => &SALUTATIONS,
            Valedictions => &VALEDICTIONS,
        }
    }

    /// アノテーターの名前を取得します。アノテーションの種類としても使われます。
    pub fn name(&self) -> &'static str {
        self.meta().name
    }

    /// 辞書ファイルの名前を取得します。
    pub fn file_name(&self) -> &'static str {
        self.meta().file_name
    }
}

pub(crate) static FIRST_NAMES: AnnotatorMeta = AnnotatorMeta {
    name: "first-names",
    file_name: "first-names.dict",
    min_chars: 3,
    ignore_case: true,
    title_case: false,
    prefix_match: false,
};

pub(crate) static LAST_NAMES: AnnotatorMeta = AnnotatorMeta {
    name: "last-names",
    file_name: "last-names.dict",
    min_chars: 3,
    ignore_case: false,
    title_case: true,
    prefix_match: false,
};

pub(crate) static SALUTATIONS: AnnotatorMeta = AnnotatorMeta {
    name: "salutations",
    file_name: "salutations.dict",
    min_chars: 1,
    ignore_case: true,
    title_case: false,
    prefix_match: true,
};

pub(crate) static VALEDICTIONS: AnnotatorMeta = AnnotatorMeta {
    name: "valedictions",
    file_name: "valedictions.dict",
    min_chars: 1,
    ignore_case: true,
    title_case: false,
    prefix_match: true,
};

/// プリセットのメタデータ
pub(crate) struct AnnotatorMeta {
    pub name: &'static str,
    pub file_name: &'static str,
    pub min_chars: usize,
    pub ignore_case: bool,
    pub title_case: bool,
    pub prefix_match: bool,
}

impl fmt::Display for PresetAnnotatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PresetAnnotatorKind {
    type Err = LexicaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| {
                let names: Vec<_> = Self::ALL.iter().map(|k| k.name()).collect();
                LexicaError::invalid_argument(
                    "preset",
                    format!("must be one of {}", names.join(", ")),
                )
            })
    }
}
