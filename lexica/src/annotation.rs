//! 照合結果のアノテーション

use std::any::Any;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Range;
use std::sync::Arc;

use hashbrown::HashSet;
use serde::Serialize;

/// 任意の付加情報
pub type Payload = Arc<dyn Any + Send + Sync>;

/// テキスト上の1区間に付けられたラベル
///
/// オフセットは親テキスト上の文字位置で、`end` は排他的です。
/// 等価性と順序は `(begin, end, text, annotator_type)` だけで決まり、
/// 優先度や値、付加情報は比較に使われません。
#[derive(Clone, Serialize)]
pub struct Annotation {
    begin: usize,
    end: usize,
    text: String,
    annotator_type: String,
    priority: u8,
    values: Option<Vec<String>>,
    #[serde(skip)]
    payload: Option<Payload>,
}

impl Annotation {
    /// `begin` から始まる `text` のアノテーションを作成します。
    pub fn new<S>(text: S, begin: usize) -> Self
    where
        S: Into<String>,
    {
        let text = text.into();
        let end = begin + text.chars().count();
        Self {
            begin,
            end,
            text,
            annotator_type: String::new(),
            priority: 0,
            values: None,
            payload: None,
        }
    }

    pub fn with_type<S>(mut self, annotator_type: S) -> Self
    where
        S: Into<String>,
    {
        self.annotator_type = annotator_type.into();
        self
    }

    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_values(mut self, values: Option<Vec<String>>) -> Self {
        self.values = values;
        self
    }

    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = Some(payload);
        self
    }

    #[inline(always)]
    pub fn begin(&self) -> usize {
        self.begin
    }

    #[inline(always)]
    pub fn end(&self) -> usize {
        self.end
    }

    #[inline(always)]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline(always)]
    pub fn annotator_type(&self) -> &str {
        &self.annotator_type
    }

    /// 小さいほど優先されます。
    #[inline(always)]
    pub fn priority(&self) -> u8 {
        self.priority
    }

    #[inline(always)]
    pub fn values(&self) -> Option<&[String]> {
        self.values.as_deref()
    }

    #[inline(always)]
    pub fn payload(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }

    /// 付加情報を指定した型として取り出します。
    pub fn payload_as<T>(&self) -> Option<&T>
    where
        T: Any,
    {
        self.payload.as_deref().and_then(|p| p.downcast_ref())
    }

    /// 文字数
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    #[inline(always)]
    pub fn range(&self) -> Range<usize> {
        self.begin..self.end
    }

    /// 2つの区間が1文字以上重なるかどうかを返します。
    pub fn is_overlap(&self, other: &Self) -> bool {
        self.begin < other.end && other.begin < self.end
    }

    /// このアノテーションのテキストの `[begin, end)` 文字目を切り出します。
    ///
    /// 戻り値のオフセットは、このアノテーションと同じ親テキスト上の位置です。
    /// 範囲がテキストの外にある場合は `None` を返します。
    ///
    /// ```
    /// use lexica::annotation::Annotation;
    ///
    /// let ann = Annotation::new("Dear Mark,", 10);
    /// let sub = ann.sub_annotation(5, 9).unwrap();
    /// assert_eq!(sub.text(), "Mark");
    /// assert_eq!(sub.range(), 15..19);
    /// ```
    pub fn sub_annotation(&self, begin: usize, end: usize) -> Option<Self> {
        if begin > end {
            return None;
        }
        let mut indices = self
            .text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(self.text.len()));
        let begin_byte = indices.nth(begin)?;
        let end_byte = if end == begin {
            begin_byte
        } else {
            indices.nth(end - begin - 1)?
        };
        Some(Self::new(&self.text[begin_byte..end_byte], self.begin + begin))
    }

    /// 値を含めたデバッグ用の文字列を返します。
    pub fn debug_string(&self) -> String {
        match &self.values {
            Some(values) => format!("{} => {}", self, values.join(", ")),
            None => self.to_string(),
        }
    }

    fn key(&self) -> (usize, usize, &str, &str) {
        (self.begin, self.end, &self.text, &self.annotator_type)
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "[P{}] [{}..{}) {}: \"{}\"",
            self.priority, self.begin, self.end, self.annotator_type, self.text
        )
    }
}

impl fmt::Debug for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Annotation")
            .field("begin", &self.begin)
            .field("end", &self.end)
            .field("text", &self.text)
            .field("annotator_type", &self.annotator_type)
            .field("priority", &self.priority)
            .field("values", &self.values)
            .field("payload", &self.payload.is_some())
            .finish()
    }
}

impl PartialEq for Annotation {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Annotation {}

impl Hash for Annotation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for Annotation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Annotation {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

/// 指定した種類のアノテーションだけを返します。
pub fn filter_by_type<'a>(
    annotations: &'a [Annotation],
    annotator_type: &'a str,
) -> impl Iterator<Item = &'a Annotation> + 'a {
    annotations
        .iter()
        .filter(move |a| a.annotator_type == annotator_type)
}

/// アノテーションのテキストを重複を除いて連結します。順序は最初の出現順です。
pub fn concat_text(annotations: &[Annotation], separator: &str) -> String {
    let mut seen = HashSet::new();
    let mut texts = vec![];
    for a in annotations {
        if seen.insert(a.text()) {
            texts.push(a.text());
        }
    }
    texts.join(separator)
}

/// 各アノテーションの [`Annotation::debug_string`] を改行で連結します。
pub fn debug_string(annotations: &[Annotation]) -> String {
    annotations
        .iter()
        .map(Annotation::debug_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let ann = Annotation::new("Mark", 6)
            .with_type("first-name")
            .with_priority(2)
            .with_values(Some(vec!["Mark Kosoglow".to_string(), "sales".to_string()]));
        assert_eq!(ann.to_string(), "[P2] [6..10) first-name: \"Mark\"");
        assert_eq!(
            ann.debug_string(),
            "[P2] [6..10) first-name: \"Mark\" => Mark Kosoglow, sales"
        );
    }

    #[test]
    fn test_equality_ignores_priority_and_values() {
        let a = Annotation::new("Mark", 0).with_type("x").with_priority(1);
        let b = Annotation::new("Mark", 0)
            .with_type("x")
            .with_values(Some(vec!["v".to_string()]));
        let c = Annotation::new("Mark", 0).with_type("y");
        assert_eq!(a, b);
        assert_ne!(a, c);
        let set: HashSet<Annotation> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_overlap() {
        let a = Annotation::new("abc", 0);
        let b = Annotation::new("cd", 2);
        let c = Annotation::new("de", 3);
        assert!(a.is_overlap(&b));
        assert!(!a.is_overlap(&c));
        assert!(b.is_overlap(&c));
    }

    #[test]
    fn test_sub_annotation() {
        let ann = Annotation::new("Zoë Smith", 3);
        let sub = ann.sub_annotation(0, 3).unwrap();
        assert_eq!(sub.text(), "Zoë");
        assert_eq!(sub.range(), 3..6);
        let sub = ann.sub_annotation(4, 9).unwrap();
        assert_eq!(sub.text(), "Smith");
        assert_eq!(sub.range(), 7..12);
        assert!(ann.sub_annotation(4, 10).is_none());
        assert!(ann.sub_annotation(5, 4).is_none());
        assert_eq!(ann.sub_annotation(9, 9).unwrap().len(), 0);
    }

    #[test]
    fn test_payload() {
        let ann = Annotation::new("x", 0).with_payload(Arc::new(42u32));
        assert_eq!(ann.payload_as::<u32>(), Some(&42));
        assert_eq!(ann.payload_as::<String>(), None);
    }

    #[test]
    fn test_serialize_skips_payload() {
        let ann = Annotation::new("Mark", 0)
            .with_type("first-name")
            .with_payload(Arc::new(1u8));
        let json = serde_json::to_value(&ann).unwrap();
        assert_eq!(json["text"], "Mark");
        assert_eq!(json["end"], 4);
        assert!(json.get("payload").is_none());
    }

    #[test]
    fn test_list_helpers() {
        let anns = vec![
            Annotation::new("Mark", 0).with_type("first"),
            Annotation::new("Smith", 5).with_type("last"),
            Annotation::new("Mark", 11).with_type("first"),
        ];
        assert_eq!(filter_by_type(&anns, "first").count(), 2);
        assert_eq!(concat_text(&anns, " "), "Mark Smith");
        assert_eq!(debug_string(&anns).lines().count(), 3);
    }
}
