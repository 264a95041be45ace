//! 照合イテレータ

use crate::automaton::state::{StateGraph, StateId, ROOT};
use crate::utils::is_word_char;

/// 1回のマッチ
///
/// 終了位置と、その位置で終わるパターンIDの集合を保持します。
/// 開始位置はパターンの長さから `end - len` として求めます。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawMatch<'a> {
    end: usize,
    outputs: &'a [u32],
}

impl<'a> RawMatch<'a> {
    /// マッチの終了位置（文字単位、排他的）
    #[inline(always)]
    pub const fn end(&self) -> usize {
        self.end
    }

    /// この位置で終わるパターンID
    #[inline(always)]
    pub const fn outputs(&self) -> &'a [u32] {
        self.outputs
    }
}

/// コンパイル済みオートマトン上でテキストを走査するイテレータ
///
/// [`Automaton::find_iter`](crate::automaton::Automaton::find_iter) から作成します。
/// 英数字の途中で終わるマッチ（例: `"cats"` 中の `"cat"`）は報告しません。
pub struct FindIter<'a> {
    graph: &'a StateGraph,
    haystack: &'a [char],
    state: StateId,
    pos: usize,
}

impl<'a> FindIter<'a> {
    pub(crate) fn new(graph: &'a StateGraph, haystack: &'a [char]) -> Self {
        debug_assert!(graph.root_loops());
        Self {
            graph,
            haystack,
            state: ROOT,
            pos: 0,
        }
    }

    /// 失敗リンクをたどって `c` による遷移先を求めます。
    ///
    /// 根は自己ループモードなので必ず停止します。
    #[inline(always)]
    fn next_state(&self, mut state: StateId, c: char) -> StateId {
        loop {
            if let Some(next) = self.graph.get(state, c) {
                return next;
            }
            state = self.graph.fail(state);
        }
    }
}

impl<'a> Iterator for FindIter<'a> {
    type Item = RawMatch<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let graph = self.graph;
        while self.pos < self.haystack.len() {
            let c = self.haystack[self.pos];
            self.state = self.next_state(self.state, c);
            self.pos += 1;

            let outputs = graph.outputs(self.state);
            if outputs.is_empty() {
                continue;
            }
            if let Some(&next) = self.haystack.get(self.pos) {
                if is_word_char(c) && is_word_char(next) {
                    continue;
                }
            }
            return Some(RawMatch {
                end: self.pos,
                outputs,
            });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use crate::automaton::Automaton;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn build(patterns: &[&str]) -> Automaton {
        let mut automaton = Automaton::new();
        for (i, p) in patterns.iter().enumerate() {
            automaton.add(p.chars(), u32::try_from(i).unwrap()).unwrap();
        }
        automaton.compile().unwrap();
        automaton
    }

    #[test]
    fn test_overlapping_outputs() {
        let automaton = build(&["he", "she", "his", "hers"]);
        let text = chars("she hers");
        let matches: Vec<_> = automaton
            .find_iter(&text)
            .unwrap()
            .map(|m| (m.end(), m.outputs().to_vec()))
            .collect();
        // "she" and "he" both end at 3; "he" inside "hers" is merged away.
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].0, 3);
        let mut ids = matches[0].1.clone();
        ids.sort_unstable();
        assert_eq!(ids, vec![0, 1]);
        assert_eq!(matches[1], (8, vec![3]));
    }

    #[test]
    fn test_word_boundary_merge() {
        let automaton = build(&["cat"]);
        assert_eq!(automaton.find_iter(&chars("cats")).unwrap().count(), 0);
        assert_eq!(automaton.find_iter(&chars("cat")).unwrap().count(), 1);
        assert_eq!(automaton.find_iter(&chars("cat.")).unwrap().count(), 1);
        assert_eq!(automaton.find_iter(&chars("cat!s")).unwrap().count(), 1);
    }

    #[test]
    fn test_non_ascii_does_not_merge() {
        let automaton = build(&["caf"]);
        let m: Vec<_> = automaton
            .find_iter(&chars("café"))
            .unwrap()
            .map(|m| m.end())
            .collect();
        assert_eq!(m, vec![3]);
    }

    #[test]
    fn test_restartable() {
        let automaton = build(&["ab"]);
        let text = chars("ab ab");
        let first: Vec<_> = automaton.find_iter(&text).unwrap().map(|m| m.end()).collect();
        let second: Vec<_> = automaton.find_iter(&text).unwrap().map(|m| m.end()).collect();
        assert_eq!(first, vec![2, 5]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_haystack() {
        let automaton = build(&["a"]);
        assert_eq!(automaton.find_iter(&[]).unwrap().count(), 0);
    }
}
