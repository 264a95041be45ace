//! 辞書ファイルの読み込み
//!
//! 辞書ファイルはUTF-8のテキストで、1行に1件のエントリを記述します。
//!
//! ```text
//! mention<TAB>value1<TAB>value2 ...
//! ```
//!
//! 各行は前後の空白を取り除いてから解析します。空行は無視されます。
//! `{` で始まり `}` で終わる行は構造化エントリ用に予約されており、
//! 警告を出力して読み飛ばします。
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Instant;

use hashbrown::HashSet;

use crate::automaton::Automaton;
use crate::errors::{LexicaError, Result};
use crate::mention::{Mention, MentionStore};
use crate::utils;

const PROGRESS_INTERVAL: usize = 10_000;

/// 同梱の英語ストップワード
const EN_STOPWORDS: &str = include_str!("resources/en-stopwords.txt");

/// ストップワードの集合
///
/// 単語は前後の空白を除いて小文字化した形で保持されます。
#[derive(Clone, Debug, Default)]
pub struct Stopwords {
    words: HashSet<String>,
}

impl Stopwords {
    /// 空の集合を作成します。
    pub fn new() -> Self {
        Self::default()
    }

    /// 同梱の英語ストップワードを読み込みます。
    pub fn english() -> Self {
        EN_STOPWORDS.lines().collect()
    }

    /// 1行1語のリストから読み込みます。
    ///
    /// # エラー
    ///
    /// 読み込みに失敗した場合、またはUTF-8として不正な場合にエラーを返します。
    pub fn from_reader<R>(mut rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let mut buf = vec![];
        rdr.read_to_end(&mut buf)?;
        Ok(std::str::from_utf8(&buf)?.lines().collect())
    }

    /// ファイルから読み込みます。
    ///
    /// # エラー
    ///
    /// パスがディレクトリの場合、またはファイルを読めない場合にエラーを返します。
    pub fn from_path<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        log::info!("Loading stopwords from {}", path.display());
        Self::from_reader(open_file(path)?)
    }

    /// 単語を追加します。
    pub fn insert(&mut self, word: &str) {
        let word = utils::lowercase(word.trim());
        if !word.is_empty() {
            self.words.insert(word);
        }
    }

    /// 文字列全体がストップワードかどうかを返します。大文字小文字は区別しません。
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&utils::lowercase(word.trim()))
    }

    /// 単語を列挙します。順序は不定です。
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.words.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl<S> FromIterator<S> for Stopwords
where
    S: AsRef<str>,
{
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut stopwords = Self::new();
        stopwords.extend(iter);
        stopwords
    }
}

impl<S> Extend<S> for Stopwords
where
    S: AsRef<str>,
{
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for word in iter {
            self.insert(word.as_ref());
        }
    }
}

/// 読み込み結果の集計
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// 空行を除いた行数
    pub lines: usize,

    /// 登録されたメンション数
    pub mentions: usize,

    /// 読み飛ばした行数（予約行、不正な行、短すぎる表記、ストップワード）
    pub skipped: usize,
}

/// 辞書の行を解析し、メンションとパターンを登録するローダー
///
/// 受理された表記ごとに、[`MentionStore`] へ1件追加し、同じIDで
/// [`Automaton`] へパターンを1件追加します。
pub struct DictionaryLoader<'a> {
    automaton: &'a mut Automaton,
    mentions: &'a mut MentionStore,
    ignore_case: bool,
    title_case: bool,
    min_chars: usize,
    priority: u8,
    stopwords: Option<&'a Stopwords>,
}

impl<'a> DictionaryLoader<'a> {
    /// 既定の設定でローダーを作成します。
    pub fn new(automaton: &'a mut Automaton, mentions: &'a mut MentionStore) -> Self {
        Self {
            automaton,
            mentions,
            ignore_case: false,
            title_case: false,
            min_chars: 1,
            priority: 0,
            stopwords: None,
        }
    }

    /// 表記を小文字に正規化するかどうかを指定します。`title_case` より優先されます。
    pub fn ignore_case(mut self, yes: bool) -> Self {
        self.ignore_case = yes;
        self
    }

    /// 各単語の先頭を大文字に正規化するかどうかを指定します。
    pub fn title_case(mut self, yes: bool) -> Self {
        self.title_case = yes;
        self
    }

    /// 登録する表記の最小文字数（正規化前）を指定します。
    pub fn min_chars(mut self, min_chars: usize) -> Self {
        self.min_chars = min_chars;
        self
    }

    /// 登録するメンションの既定の優先度を指定します。
    pub fn priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    /// 除外するストップワードを指定します。
    pub fn stopwords(mut self, stopwords: Option<&'a Stopwords>) -> Self {
        self.stopwords = stopwords;
        self
    }

    /// 辞書ファイルを読み込みます。
    ///
    /// # エラー
    ///
    /// パスがディレクトリの場合、ファイルを読めない場合、
    /// または内容がUTF-8として不正な場合にエラーを返します。
    pub fn load_path<P>(&mut self, path: P) -> Result<LoadStats>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        log::info!("Loading dictionary from {}", path.display());
        self.load_reader(open_file(path)?)
    }

    /// 辞書をリーダーから読み込みます。
    ///
    /// # エラー
    ///
    /// 読み込みに失敗した場合、または内容がUTF-8として不正な場合に
    /// エラーを返します。個々の行の不備は警告を出力して読み飛ばします。
    pub fn load_reader<R>(&mut self, mut rdr: R) -> Result<LoadStats>
    where
        R: Read,
    {
        let start = Instant::now();
        let mut buf = vec![];
        rdr.read_to_end(&mut buf)?;
        let text = std::str::from_utf8(&buf)?;

        let mut stats = LoadStats::default();
        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            stats.lines += 1;
            let added = self.load_line(line, lineno + 1)?;
            if added == 0 {
                stats.skipped += 1;
            }
            stats.mentions += added;
        }

        log::info!(
            "Loaded {} mentions from {} lines ({} skipped) in {:.3} seconds",
            stats.mentions,
            stats.lines,
            stats.skipped,
            start.elapsed().as_secs_f64()
        );
        Ok(stats)
    }

    fn load_line(&mut self, line: &str, lineno: usize) -> Result<usize> {
        if line.starts_with('{') && line.ends_with('}') {
            log::warn!("Skipped a structured entry at line {lineno}");
            return Ok(0);
        }
        let mut fields = match utils::parse_tsv_row(line) {
            Ok(fields) => fields.into_iter(),
            Err(e) => {
                log::warn!("Skipped a malformed line at line {lineno}: {e}");
                return Ok(0);
            }
        };
        let mention = fields.next().unwrap_or_default();
        let mention = mention.trim();
        if mention.is_empty() {
            log::warn!("Skipped an empty mention at line {lineno}");
            return Ok(0);
        }
        let values = fields
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .collect();
        self.add_mention(mention, values, self.priority)
    }

    /// 表記を1件登録し、登録されたメンション数を返します。
    ///
    /// 表記は正規化され、最小文字数とストップワードで絞り込まれます。
    ///
    /// # エラー
    ///
    /// オートマトンが既にコンパイル済みの場合、または件数が上限を超えた場合に
    /// エラーを返します。
    pub fn add_mention(
        &mut self,
        mention: &str,
        values: Vec<String>,
        priority: u8,
    ) -> Result<usize> {
        let mention = mention.trim();
        if mention.chars().count() < self.min_chars {
            return Ok(0);
        }
        let mut added = 0;
        for variant in self.variants(mention) {
            let char_len = variant.chars().count();
            if char_len == 0 {
                continue;
            }
            if self.automaton.is_compiled() {
                return Err(LexicaError::invalid_state(
                    "cannot add a mention",
                    "the automaton is already compiled",
                ));
            }
            let id = self
                .mentions
                .push(Mention::new(char_len, values.clone(), priority))?;
            self.automaton.add(variant.chars(), id)?;
            added += 1;

            if self.mentions.len() % PROGRESS_INTERVAL == 0 {
                log::info!("Loaded {} mentions", self.mentions.len());
            }
        }
        Ok(added)
    }

    /// 表記の異表記を生成します。
    ///
    /// 現在は正規化した表記そのものだけを返し、ストップワードであれば除外します。
    fn variants(&self, mention: &str) -> Vec<String> {
        let normalized = if self.ignore_case {
            utils::lowercase(mention)
        } else if self.title_case {
            utils::title_case(mention)
        } else {
            mention.to_string()
        };
        if let Some(stopwords) = self.stopwords {
            if stopwords.contains(&normalized) {
                log::trace!("Skipped a stopword: {normalized:?}");
                return vec![];
            }
        }
        vec![normalized]
    }
}

fn open_file(path: &Path) -> Result<File> {
    if path.is_dir() {
        return Err(LexicaError::PathIsDirectory(path.to_path_buf()));
    }
    Ok(File::open(path)?)
}
