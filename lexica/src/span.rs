//! 重なり合うアノテーションの解消

use std::cmp::Reverse;

use crate::annotation::Annotation;

/// アノテーションを並べ替えます。
///
/// `reverse` が `true` の場合は終了位置の降順、`false` の場合は開始位置の昇順に
/// 並べます。いずれも位置が同じなら長い順、長さも同じなら優先度の高い
/// （値の小さい）順です。
pub fn sort_spans_by_offset(annotations: &mut [Annotation], reverse: bool) {
    if reverse {
        annotations.sort_by_key(|a| (Reverse(a.end()), Reverse(a.len()), a.priority()));
    } else {
        annotations.sort_by_key(|a| (a.begin(), Reverse(a.len()), a.priority()));
    }
}

/// 互いに重ならない最長のアノテーションを選びます。
///
/// 末尾から貪欲に選択するため、終了位置が同じ候補の中では最も長く優先度の
/// 高いものが残ります。結果は開始位置の昇順です。
///
/// ```
/// use lexica::annotation::Annotation;
/// use lexica::span::longest_spans;
///
/// let spans = longest_spans(vec![
///     Annotation::new("Mark", 0),
///     Annotation::new("Mark Kosoglow", 0),
///     Annotation::new("Kosoglow", 5),
/// ]);
/// assert_eq!(spans.len(), 1);
/// assert_eq!(spans[0].text(), "Mark Kosoglow");
/// ```
pub fn longest_spans(mut annotations: Vec<Annotation>) -> Vec<Annotation> {
    sort_spans_by_offset(&mut annotations, true);
    let mut prev_start = usize::MAX;
    let mut spans = Vec::with_capacity(annotations.len());
    for a in annotations {
        if a.end() > prev_start {
            continue;
        }
        prev_start = a.begin();
        spans.push(a);
    }
    spans.reverse();
    spans
}
