//! 辞書エントリ

use serde::Serialize;

use crate::utils::FromU32;

/// 辞書に登録された1件の表記
///
/// オートマトンの出力IDはこの構造体の [`MentionStore`] 内の添字です。
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Mention {
    char_len: usize,
    values: Vec<String>,
    priority: u8,
}

impl Mention {
    /// 新しいメンションを作成します。
    pub fn new(char_len: usize, values: Vec<String>, priority: u8) -> Self {
        Self {
            char_len,
            values,
            priority,
        }
    }

    /// 登録された表記の文字数
    #[inline(always)]
    pub fn char_len(&self) -> usize {
        self.char_len
    }

    #[inline(always)]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// 小さいほど優先されます。
    #[inline(always)]
    pub fn priority(&self) -> u8 {
        self.priority
    }
}

/// 追記専用のメンション格納庫
#[derive(Clone, Debug, Default)]
pub struct MentionStore {
    mentions: Vec<Mention>,
}

impl MentionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// メンションを追加し、そのIDを返します。
    ///
    /// # エラー
    ///
    /// 件数が `u32` の範囲を超えた場合にエラーを返します。
    pub fn push(&mut self, mention: Mention) -> crate::errors::Result<u32> {
        let id = u32::try_from(self.mentions.len())?;
        self.mentions.push(mention);
        Ok(id)
    }

    #[inline(always)]
    pub fn get(&self, id: u32) -> Option<&Mention> {
        self.mentions.get(usize::from_u32(id))
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.mentions.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.mentions.is_empty()
    }

    /// IDの昇順にメンションを列挙します。
    pub fn iter(&self) -> impl Iterator<Item = (u32, &Mention)> + '_ {
        (0u32..).zip(self.mentions.iter())
    }
}
