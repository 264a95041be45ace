//! 辞書に基づくアノテーター
//!
//! [`AnnotatorBuilder`] で辞書を読み込み、[`AnnotatorBuilder::build`] で
//! 照合用のオートマトンをコンパイルして [`Annotator`] を作成します。
//!
//! # 例
//!
//! ```
//! use lexica::AnnotatorBuilder;
//!
//! let mut builder = AnnotatorBuilder::new("first-names").ignore_case(true);
//! builder.load_reader("mark\tMark Kosoglow\nmarkkosoglow".as_bytes())?;
//! let annotator = builder.build()?;
//!
//! let annotations = annotator.annotate("Email mark.kosoglow@outreach.io");
//! assert_eq!(annotations.len(), 1);
//! assert_eq!(annotations[0].text(), "mark");
//! assert_eq!(annotations[0].range(), 6..10);
//! # Ok::<(), lexica::errors::LexicaError>(())
//! ```
pub mod config;

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::annotation::Annotation;
use crate::annotator::config::PresetAnnotatorKind;
use crate::automaton::Automaton;
use crate::dictionary::{DictionaryLoader, LoadStats, Stopwords};
use crate::errors::{LexicaError, Result};
use crate::mention::{Mention, MentionStore};
use crate::sentence::Sentence;
use crate::span::longest_spans;
use crate::utils::fold_case;

/// 優先度の上限
pub const MAX_PRIORITY: u32 = 255;

/// マッチの直前に許される文字（空白文字に加えて）
const VALID_BEGIN_CHARS: &[char] = &[
    ' ', '/', '|', '[', '{', '(', '>', '?', '!', '"', '“', '\'', ';', ':', ',', '~',
];

/// マッチの直後に許される文字（空白文字に加えて）
const VALID_END_CHARS: &[char] = &[
    ' ', '~', ',', '.', ':', ';', '\'', '’', '”', '"', '!', '?', '/', '<', ')', '}', ']', '|',
];

/// アノテーターの設定
///
/// `serde` で読み込む場合、省略された項目には既定値が使われます。
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotatorOptions {
    /// 大文字小文字を無視して照合します。辞書の表記は小文字化されます。
    pub ignore_case: bool,

    /// 辞書の表記の各単語の先頭を大文字に正規化します。
    pub title_case: bool,

    /// テキストの先頭から始まるマッチだけを出力します。
    pub prefix_match: bool,

    /// テキストの末尾で終わるマッチだけを出力します。
    pub suffix_match: bool,

    /// 登録する表記の最小文字数
    pub min_chars: usize,

    /// 重なり合うマッチを解消し、最長のものだけを出力します。
    pub output_longest_span: bool,

    /// 登録するメンションの優先度（0から255、小さいほど優先）
    pub priority: u32,
}

impl Default for AnnotatorOptions {
    fn default() -> Self {
        Self {
            ignore_case: false,
            title_case: false,
            prefix_match: false,
            suffix_match: false,
            min_chars: 1,
            output_longest_span: true,
            priority: 0,
        }
    }
}

impl AnnotatorOptions {
    /// 設定値を検証します。
    ///
    /// # エラー
    ///
    /// 優先度が範囲外の場合にエラーを返します。
    pub fn validate(&self) -> Result<()> {
        check_priority(self.priority).map(|_| ())
    }
}

fn check_priority(priority: u32) -> Result<u8> {
    u8::try_from(priority).map_err(|_| {
        LexicaError::invalid_argument(
            "priority",
            format!("must be within 0 and {MAX_PRIORITY}, but got {priority}"),
        )
    })
}

/// アノテーターのビルダー
///
/// 設定は、その後に読み込む辞書エントリに適用されます。
/// 辞書を読み込んだ後で正規化の設定を変えても、既に登録された表記は
/// 変わりません。
///
/// 既定では同梱の英語ストップワード（[`Stopwords::english`]）に一致する
/// 表記を登録しません。
pub struct AnnotatorBuilder {
    annotator_type: String,
    options: AnnotatorOptions,
    stopwords: Stopwords,
    automaton: Automaton,
    mentions: MentionStore,
}

impl AnnotatorBuilder {
    /// 新しいビルダーを作成します。
    ///
    /// `annotator_type` はアノテーションの種類として使われます。
    /// 末尾の拡張子（`first-names.dict` の `.dict`）は取り除かれます。
    pub fn new<S>(annotator_type: S) -> Self
    where
        S: AsRef<str>,
    {
        Self {
            annotator_type: strip_extension(annotator_type.as_ref()).to_string(),
            options: AnnotatorOptions::default(),
            stopwords: Stopwords::english(),
            automaton: Automaton::new(),
            mentions: MentionStore::new(),
        }
    }

    /// プリセットの設定でビルダーを作成します。
    ///
    /// 辞書は別途 [`load_path`](Self::load_path) などで読み込む必要があります。
    ///
    /// ```no_run
    /// use std::path::Path;
    ///
    /// use lexica::annotator::config::PresetAnnotatorKind;
    /// use lexica::AnnotatorBuilder;
    ///
    /// let kind = PresetAnnotatorKind::FirstNames;
    /// let mut builder = AnnotatorBuilder::from_preset(kind);
    /// builder.load_path(Path::new("resources").join(kind.file_name()))?;
    /// let annotator = builder.build()?;
    /// # Ok::<(), lexica::errors::LexicaError>(())
    /// ```
    pub fn from_preset(kind: PresetAnnotatorKind) -> Self {
        let meta = kind.meta();
        Self::new(meta.name)
            .min_chars(meta.min_chars)
            .ignore_case(meta.ignore_case)
            .title_case(meta.title_case)
            .prefix_match(meta.prefix_match)
    }

    /// アノテーションの種類を指定します。[`new`](Self::new) と同じく拡張子は取り除かれます。
    pub fn annotator_type<S>(mut self, annotator_type: S) -> Self
    where
        S: AsRef<str>,
    {
        self.annotator_type = strip_extension(annotator_type.as_ref()).to_string();
        self
    }

    /// 設定をまとめて指定します。
    ///
    /// # エラー
    ///
    /// 設定値が不正な場合にエラーを返します。
    pub fn options(mut self, options: AnnotatorOptions) -> Result<Self> {
        options.validate()?;
        self.options = options;
        Ok(self)
    }

    pub fn ignore_case(mut self, yes: bool) -> Self {
        self.options.ignore_case = yes;
        self
    }

    pub fn title_case(mut self, yes: bool) -> Self {
        self.options.title_case = yes;
        self
    }

    pub fn prefix_match(mut self, yes: bool) -> Self {
        self.options.prefix_match = yes;
        self
    }

    pub fn suffix_match(mut self, yes: bool) -> Self {
        self.options.suffix_match = yes;
        self
    }

    pub fn min_chars(mut self, min_chars: usize) -> Self {
        self.options.min_chars = min_chars;
        self
    }

    pub fn output_longest_span(mut self, yes: bool) -> Self {
        self.options.output_longest_span = yes;
        self
    }

    /// 登録するメンションの優先度を指定します。
    ///
    /// # エラー
    ///
    /// `priority` が255を超える場合にエラーを返します。
    pub fn priority(mut self, priority: u32) -> Result<Self> {
        check_priority(priority)?;
        self.options.priority = priority;
        Ok(self)
    }

    /// 登録しない表記を指定します。既定の英語ストップワードは置き換えられます。
    ///
    /// 空の集合を渡すとストップワードによる除外を行いません。
    pub fn stopwords(mut self, stopwords: Stopwords) -> Self {
        self.stopwords = stopwords;
        self
    }

    fn loader(&mut self) -> Result<DictionaryLoader<'_>> {
        let priority = check_priority(self.options.priority)?;
        Ok(DictionaryLoader::new(&mut self.automaton, &mut self.mentions)
            .ignore_case(self.options.ignore_case)
            .title_case(self.options.title_case)
            .min_chars(self.options.min_chars)
            .priority(priority)
            .stopwords(Some(&self.stopwords)))
    }

    /// 辞書をリーダーから読み込みます。
    ///
    /// # エラー
    ///
    /// 読み込みに失敗した場合、または内容がUTF-8として不正な場合にエラーを返します。
    pub fn load_reader<R>(&mut self, rdr: R) -> Result<LoadStats>
    where
        R: Read,
    {
        self.loader()?.load_reader(rdr)
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
        self.loader()?.load_path(path)
    }

    /// 表記を1件登録し、登録されたメンション数を返します。
    ///
    /// # エラー
    ///
    /// 件数が上限を超えた場合にエラーを返します。
    pub fn add_mention<S>(&mut self, mention: &str, values: &[S]) -> Result<usize>
    where
        S: AsRef<str>,
    {
        let priority = check_priority(self.options.priority)?;
        self.add_mention_with_priority(mention, values, u32::from(priority))
    }

    /// 優先度を指定して表記を1件登録し、登録されたメンション数を返します。
    ///
    /// # エラー
    ///
    /// `priority` が255を超える場合、または件数が上限を超えた場合にエラーを返します。
    pub fn add_mention_with_priority<S>(
        &mut self,
        mention: &str,
        values: &[S],
        priority: u32,
    ) -> Result<usize>
    where
        S: AsRef<str>,
    {
        let priority = check_priority(priority)?;
        let values = values
            .iter()
            .map(|v| v.as_ref().trim().to_string())
            .filter(|v| !v.is_empty())
            .collect();
        self.loader()?.add_mention(mention, values, priority)
    }

    /// 登録済みのメンション数を返します。
    pub fn num_mentions(&self) -> usize {
        self.mentions.len()
    }

    /// オートマトンをコンパイルしてアノテーターを作成します。
    ///
    /// # エラー
    ///
    /// 設定値が不正な場合にエラーを返します。
    pub fn build(mut self) -> Result<Annotator> {
        self.options.validate()?;
        log::info!(
            "Compiling {} with {} mentions",
            self.annotator_type,
            self.mentions.len()
        );
        self.automaton.compile()?;
        Ok(Annotator {
            inner: Arc::new(AnnotatorInner {
                annotator_type: self.annotator_type,
                options: self.options,
                automaton: self.automaton,
                mentions: self.mentions,
            }),
        })
    }
}

struct AnnotatorInner {
    annotator_type: String,
    options: AnnotatorOptions,
    automaton: Automaton,
    mentions: MentionStore,
}

/// 辞書に登録された表記をテキストから探すアノテーター
///
/// 構築後は変更されません。内部のデータは `Arc` で共有されるため、
/// 複製は安価で、スレッド間で共有できます。
#[derive(Clone)]
pub struct Annotator {
    inner: Arc<AnnotatorInner>,
}

impl Annotator {
    /// テキスト中の表記を探し、アノテーションを返します。
    ///
    /// オフセットは `text` 上の文字位置です。
    pub fn annotate(&self, text: &str) -> Vec<Annotation> {
        self.annotate_at(text, 0)
    }

    /// アノテーションのテキスト中の表記を探します。
    ///
    /// 戻り値のオフセットは `parent` と同じ親テキスト上の位置です。
    pub fn annotate_within(&self, parent: &Annotation) -> Vec<Annotation> {
        self.annotate_at(parent.text(), parent.begin())
    }

    fn annotate_at(&self, text: &str, offset: usize) -> Vec<Annotation> {
        let inner = &*self.inner;
        let options = &inner.options;
        log::trace!("Annotating {}: {}", inner.annotator_type, text);

        let sent = Sentence::new(text, options.ignore_case);
        let len = sent.len_char();
        let mut annotations = vec![];

        for m in inner.automaton.find_iter_compiled(sent.scan_chars()) {
            let end = m.end();
            if options.suffix_match && end != len {
                continue;
            }
            for &id in m.outputs() {
                let Some(mention) = inner.mentions.get(id) else {
                    continue;
                };
                let Some(begin) = end.checked_sub(mention.char_len()) else {
                    continue;
                };
                if options.prefix_match && begin != 0 {
                    continue;
                }
                if !has_valid_bounding_chars(sent.chars(), begin, end) {
                    continue;
                }
                let values = (!mention.values().is_empty()).then(|| mention.values().to_vec());
                annotations.push(
                    Annotation::new(sent.substring(begin, end), offset + begin)
                        .with_type(&inner.annotator_type)
                        .with_priority(mention.priority())
                        .with_values(values),
                );
            }
        }

        if annotations.is_empty() {
            return annotations;
        }
        if log::log_enabled!(log::Level::Trace) {
            log::trace!("{}", crate::annotation::debug_string(&annotations));
        }
        if options.output_longest_span {
            annotations = longest_spans(annotations);
            if log::log_enabled!(log::Level::Trace) {
                log::trace!("{}", crate::annotation::debug_string(&annotations));
            }
        }
        annotations
    }

    fn scan_chars<'a>(&self, text: &'a str) -> impl Iterator<Item = char> + 'a {
        let ignore_case = self.inner.options.ignore_case;
        text.chars()
            .map(move |c| if ignore_case { fold_case(c) } else { c })
    }

    /// `prefix` がいずれかの登録表記の接頭辞であるかどうかを返します。
    ///
    /// 大文字小文字を無視する設定の場合は `prefix` も小文字化して調べます。
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.inner.automaton.has_prefix(self.scan_chars(prefix))
    }

    /// 文字列全体に一致する登録表記のメンションを返します。
    pub fn get(&self, text: &str) -> Option<&Mention> {
        let len = text.chars().count();
        self.inner
            .automaton
            .lookup(self.scan_chars(text))
            .iter()
            .filter_map(|&id| self.inner.mentions.get(id))
            .find(|m| m.char_len() == len)
    }

    /// 文字列全体が登録表記であるかどうかを返します。
    pub fn contains(&self, text: &str) -> bool {
        self.get(text).is_some()
    }

    #[inline(always)]
    pub fn annotator_type(&self) -> &str {
        &self.inner.annotator_type
    }

    #[inline(always)]
    pub fn options(&self) -> &AnnotatorOptions {
        &self.inner.options
    }

    #[inline(always)]
    pub fn num_mentions(&self) -> usize {
        self.inner.mentions.len()
    }

    #[inline(always)]
    pub fn mentions(&self) -> &MentionStore {
        &self.inner.mentions
    }

    /// 内部のオートマトンへの参照を返します。
    pub fn automaton(&self) -> &Automaton {
        &self.inner.automaton
    }
}

fn strip_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.contains('/') => stem,
        _ => name,
    }
}

#[inline(always)]
fn is_valid_begin_char(c: char) -> bool {
    c.is_whitespace() || VALID_BEGIN_CHARS.contains(&c)
}

#[inline(always)]
fn is_valid_end_char(c: char) -> bool {
    c.is_whitespace() || VALID_END_CHARS.contains(&c)
}

/// マッチの前後の文字が区切りとして妥当かどうかを返します。
fn has_valid_bounding_chars(chars: &[char], begin: usize, end: usize) -> bool {
    let valid_begin = begin == 0 || is_valid_begin_char(chars[begin - 1]);
    valid_begin && chars.get(end).map_or(true, |&c| is_valid_end_char(c))
}
