//! 入力テキストの内部表現を提供するモジュール
//!
//! 入力文字列を文字単位に分割し、照合用の文字列と文字位置からバイト位置への
//! マッピングを保持します。オフセットはすべて文字単位です。

use crate::utils::fold_case;

/// 入力テキストの内部表現を保持する構造体
///
/// # フィールド
///
/// * `input` - 元の入力文字列
/// * `chars` - 入力文字列を文字単位に分割した配列
/// * `scan` - 照合に使う文字配列（大文字小文字を無視する場合は小文字化済み）
/// * `c2b` - 文字位置からバイト位置へのマッピング配列
#[derive(Default, Clone, Debug)]
pub struct Sentence<'a> {
    input: &'a str,
    chars: Vec<char>,
    scan: Option<Vec<char>>,
    c2b: Vec<usize>,
}

impl<'a> Sentence<'a> {
    /// 入力文字列を解析します。
    ///
    /// `fold` が `true` の場合、照合用の文字配列を1文字ずつ小文字化します。
    /// 小文字化は文字数を変えないため、照合結果のオフセットは元の文字列に
    /// そのまま適用できます。
    pub fn new(input: &'a str, fold: bool) -> Self {
        let mut chars = Vec::with_capacity(input.len());
        let mut c2b = Vec::with_capacity(input.len() + 1);
        for (bi, ch) in input.char_indices() {
            chars.push(ch);
            c2b.push(bi);
        }
        c2b.push(input.len());
        let scan = fold.then(|| chars.iter().copied().map(fold_case).collect());
        Self {
            input,
            chars,
            scan,
            c2b,
        }
    }

    /// 元の文字配列
    #[inline(always)]
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// 照合に使う文字配列
    #[inline(always)]
    pub fn scan_chars(&self) -> &[char] {
        self.scan.as_deref().unwrap_or(&self.chars)
    }

    #[inline(always)]
    pub fn len_char(&self) -> usize {
        self.chars.len()
    }

    #[inline(always)]
    pub fn byte_position(&self, pos_char: usize) -> usize {
        self.c2b[pos_char]
    }

    /// 文字位置 `[begin, end)` の部分文字列を返します。
    #[inline(always)]
    pub fn substring(&self, begin: usize, end: usize) -> &'a str {
        &self.input[self.byte_position(begin)..self.byte_position(end)]
    }
}
