//! Aho–Corasickオートマトン
//!
//! パターンの追加とコンパイルの2段階で構築します。
//!
//! ```
//! use lexica::automaton::Automaton;
//!
//! let mut automaton = Automaton::new();
//! automaton.add("mark".chars(), 0)?;
//! automaton.add("kosoglow".chars(), 1)?;
//! automaton.compile()?;
//!
//! let text: Vec<char> = "mark kosoglow".chars().collect();
//! let ends: Vec<usize> = automaton.find_iter(&text)?.map(|m| m.end()).collect();
//! assert_eq!(ends, vec![4, 13]);
//! # Ok::<(), lexica::errors::LexicaError>(())
//! ```
pub mod search;
pub mod state;

use std::collections::VecDeque;
use std::time::Instant;

use crate::errors::{LexicaError, Result};

pub use crate::automaton::search::{FindIter, RawMatch};
use crate::automaton::state::{StateGraph, ROOT};

/// 文字単位のAho–Corasickオートマトン
#[derive(Clone, Debug, Default)]
pub struct Automaton {
    graph: StateGraph,
    num_patterns: usize,
    compiled: bool,
}

impl Automaton {
    /// 空のオートマトンを作成します。
    pub fn new() -> Self {
        Self::default()
    }

    /// パターンを追加します。
    ///
    /// 同じパターンを同じIDで複数回追加しても出力は1つだけです。
    ///
    /// # 引数
    ///
    /// * `pattern` - パターンの文字列
    /// * `output` - パターンの終端状態に記録するID
    ///
    /// # エラー
    ///
    /// コンパイル後に呼び出した場合、またはパターンが空の場合にエラーを返します。
    pub fn add<I>(&mut self, pattern: I, output: u32) -> Result<()>
    where
        I: IntoIterator<Item = char>,
    {
        if self.compiled {
            return Err(LexicaError::invalid_state(
                "cannot add a pattern",
                "the automaton is already compiled",
            ));
        }
        let mut state = ROOT;
        let mut len = 0;
        for c in pattern {
            state = match self.graph.child(state, c) {
                Some(next) => next,
                None => {
                    let next = self.graph.add_state()?;
                    self.graph.put(state, c, next);
                    next
                }
            };
            len += 1;
        }
        if len == 0 {
            return Err(LexicaError::invalid_argument(
                "pattern",
                "must not be empty",
            ));
        }
        self.graph.add_output(state, output);
        self.num_patterns += 1;
        Ok(())
    }

    /// 失敗リンクを計算し、オートマトンを照合可能な状態にします。
    ///
    /// 根の子から幅優先で状態を訪問し、各状態の失敗リンクを親の失敗リンクから
    /// 求めます。失敗先の出力はその状態の出力に合流されます。
    ///
    /// # エラー
    ///
    /// 既にコンパイル済みの場合にエラーを返します。
    pub fn compile(&mut self) -> Result<()> {
        if self.compiled {
            return Err(LexicaError::invalid_state(
                "cannot compile the automaton",
                "the automaton is already compiled",
            ));
        }
        let start = Instant::now();

        self.graph.enable_root_loop();
        let mut queue = VecDeque::new();
        for (_, child) in self.graph.edges(ROOT) {
            self.graph.set_fail(child, ROOT);
            queue.push_back(child);
        }
        while let Some(parent) = queue.pop_front() {
            for (c, child) in self.graph.edges(parent) {
                queue.push_back(child);
                let mut f = self.graph.fail(parent);
                let fail = loop {
                    if let Some(target) = self.graph.get(f, c) {
                        break target;
                    }
                    f = self.graph.fail(f);
                };
                self.graph.set_fail(child, fail);
                self.graph.inherit_outputs(child, fail);
            }
        }
        self.compiled = true;

        log::info!(
            "Compiled an automaton of {} states from {} patterns in {:.3} seconds",
            self.graph.num_states(),
            self.num_patterns,
            start.elapsed().as_secs_f64()
        );
        Ok(())
    }

    /// コンパイル済みかどうかを返します。
    #[inline(always)]
    pub fn is_compiled(&self) -> bool {
        self.compiled
    }

    /// テキスト中のマッチを列挙するイテレータを作成します。
    ///
    /// # エラー
    ///
    /// コンパイル前に呼び出した場合にエラーを返します。
    pub fn find_iter<'a>(&'a self, haystack: &'a [char]) -> Result<FindIter<'a>> {
        if !self.compiled {
            return Err(LexicaError::invalid_state(
                "cannot search the text",
                "the automaton is not compiled",
            ));
        }
        Ok(FindIter::new(&self.graph, haystack))
    }

    /// コンパイル済みであることが呼び出し側で保証されている場合に使います。
    #[inline(always)]
    pub(crate) fn find_iter_compiled<'a>(&'a self, haystack: &'a [char]) -> FindIter<'a> {
        debug_assert!(self.compiled);
        FindIter::new(&self.graph, haystack)
    }

    /// `prefix` がいずれかのパターンの接頭辞であるかどうかを返します。
    ///
    /// トライの辺だけをたどります。空の列は常に接頭辞です。
    pub fn has_prefix<I>(&self, prefix: I) -> bool
    where
        I: IntoIterator<Item = char>,
    {
        let mut state = ROOT;
        for c in prefix {
            match self.graph.child(state, c) {
                Some(next) => state = next,
                None => return false,
            }
        }
        true
    }

    /// `pattern` をトライの辺だけでたどり、到達した状態の出力を返します。
    ///
    /// コンパイル後は失敗先から合流した出力も含まれます。
    pub fn lookup<I>(&self, pattern: I) -> &[u32]
    where
        I: IntoIterator<Item = char>,
    {
        let mut state = ROOT;
        for c in pattern {
            match self.graph.child(state, c) {
                Some(next) => state = next,
                None => return &[],
            }
        }
        if state == ROOT {
            return &[];
        }
        self.graph.outputs(state)
    }

    /// 状態数を返します。
    #[inline(always)]
    pub fn num_states(&self) -> usize {
        self.graph.num_states()
    }

    /// 追加されたパターン数を返します。
    #[inline(always)]
    pub fn num_patterns(&self) -> usize {
        self.num_patterns
    }

    /// トライの状態数を辺だけをたどって数えます。
    pub fn trie_size(&self) -> usize {
        self.graph.trie_size(ROOT)
    }

    /// 内部の状態グラフへの参照を返します。
    pub fn graph(&self) -> &StateGraph {
        &self.graph
    }
}
