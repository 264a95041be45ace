//! ユーティリティ関数と型変換トレイトを提供するモジュール
//!
//! このモジュールには、TSV行の分割、文字単位の大文字小文字変換、
//! 型変換などのヘルパー関数が含まれています。
//!
//! - `FromU32`: u32からの型変換トレイト
//! - TSV行の解析
//! - 文字数を変えない大文字小文字変換

use csv_core::ReadFieldResult;

use crate::errors::Result;

/// u32から他の型への変換を提供するトレイト
///
/// 標準ライブラリのFromトレイトとは異なり、プラットフォーム固有の仮定を
/// 行うことができます。状態IDやメンションIDを添字に変換する際に使用します。
pub trait FromU32 {
    /// u32値から実装型を生成する
    fn from_u32(src: u32) -> Self;
}

#[cfg(any(target_pointer_width = "32", target_pointer_width = "64"))]
impl FromU32 for usize {
    #[inline(always)]
    fn from_u32(src: u32) -> Self {
        // Since the pointer width is guaranteed to be 32 or 64,
        // the following process always succeeds.
        unsafe { Self::try_from(src).unwrap_unchecked() }
    }
}

/// タブ区切りの行を解析してフィールドのベクターに分割する
///
/// 辞書ファイルの各行は `mention \t value1 \t value2 ...` の形式です。
/// 引用符は特別扱いせず、各フィールドはそのまま取り出されます
/// （`O"Brien` のような表記を壊さないため）。
///
/// # 引数
///
/// * `row` - 解析するタブ区切りの文字列
///
/// フィールドの長さに上限はありません。内部バッファが一杯になった場合は
/// 読み取った分を蓄えて続きを読みます。
///
/// # エラー
///
/// フィールドがUTF-8として不正な場合にエラーを返します。
///
/// # 例
///
/// ```
/// # use lexica::utils::parse_tsv_row;
/// let fields = parse_tsv_row("mark\tMark Kosoglow\tsales").unwrap();
/// assert_eq!(fields, vec!["mark", "Mark Kosoglow", "sales"]);
///
/// let fields_with_quote = parse_tsv_row("o\"brien\tO\"Brien").unwrap();
/// assert_eq!(fields_with_quote, vec!["o\"brien", "O\"Brien"]);
/// ```
pub fn parse_tsv_row(row: &str) -> Result<Vec<String>> {
    let mut fields = vec![];
    let mut rdr = csv_core::ReaderBuilder::new()
        .delimiter(b'\t')
        .quoting(false)
        .build();
    let mut bytes = row.as_bytes();
    let mut output = [0; 4096];
    let mut field = vec![];
    loop {
        let (result, nin, nout) = rdr.read_field(bytes, &mut output);
        field.extend_from_slice(&output[..nout]);
        bytes = &bytes[nin..];
        let end = match result {
            ReadFieldResult::OutputFull => continue,
            ReadFieldResult::Field { record_end } => record_end,
            ReadFieldResult::InputEmpty | ReadFieldResult::End => true,
        };
        fields.push(std::str::from_utf8(&field)?.to_string());
        field.clear();
        if end {
            break;
        }
    }
    Ok(fields)
}

/// 1文字を小文字に変換します。
///
/// 変換結果が複数文字になる場合（例: `'İ'`）は元の文字を返します。
/// これにより文字列全体の文字数が変わらず、変換後のテキスト上の
/// オフセットを元のテキストにそのまま適用できます。
#[inline(always)]
pub fn fold_case(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

/// 1文字を大文字に変換します。[`fold_case`] と同じく文字数を保ちます。
#[inline(always)]
pub fn upper_case(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}

/// 文字列を小文字に変換します。文字数は変わりません。
pub fn lowercase(s: &str) -> String {
    s.chars().map(fold_case).collect()
}

/// 各単語の先頭を大文字に、それ以外を小文字に変換します。
///
/// 単語は空白文字で区切られます。
///
/// ```
/// # use lexica::utils::title_case;
/// assert_eq!(title_case("mcDONALD  o'neil"), "Mcdonald  O'neil");
/// ```
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_whitespace() {
            at_word_start = true;
            out.push(c);
        } else if at_word_start {
            at_word_start = false;
            out.push(upper_case(c));
        } else {
            out.push(fold_case(c));
        }
    }
    out
}

/// `[0-9A-Za-z]` に該当するかどうかを返します。
///
/// 照合イテレータが英単語の途中でマッチを打ち切らないための判定に使います。
#[inline(always)]
pub const fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
}
