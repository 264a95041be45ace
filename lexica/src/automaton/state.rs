//! トライと失敗リンクからなる状態グラフ
//!
//! 状態はアリーナ（`Vec`）に格納され、添字 [`StateId`] で参照されます。
//! 遷移と失敗リンクはどちらも添字で保持するため、所有権の循環は発生しません。
//!
//! 辞書は数十万から百万件規模になり得るため、遷移表のメモリ効率を重視しています。
//! 一般的なトライのノードは子を1〜3個しか持たないので、根以外の状態では
//! `(文字, 状態ID)` の組をインライン配列に詰めて保持します。子の多い根だけは
//! ハッシュマップを使います。

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::errors::Result;
use crate::utils::FromU32;

/// 状態の識別子（アリーナの添字）
pub type StateId = u32;

/// 根状態の識別子
pub const ROOT: StateId = 0;

/// 根以外の状態の遷移表
///
/// 線形探索ですが、子の数が少ないため実質O(1)です。
#[derive(Default, Clone, Debug)]
pub struct Transitions {
    edges: SmallVec<[(char, StateId); 2]>,
}

impl Transitions {
    #[inline(always)]
    pub fn get(&self, c: char) -> Option<StateId> {
        self.edges
            .iter()
            .find(|&&(k, _)| k == c)
            .map(|&(_, target)| target)
    }

    /// 遷移を追加します。同じ文字の遷移が既にあれば上書きします。
    pub fn put(&mut self, c: char, target: StateId) {
        match self.edges.iter_mut().find(|(k, _)| *k == c) {
            Some(edge) => edge.1 = target,
            None => self.edges.push((c, target)),
        }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, StateId)> + '_ {
        self.edges.iter().copied()
    }
}

/// 状態で終わるパターンIDの集合
///
/// 重複は追加時に取り除かれます。ほとんどの状態は出力を0個か1個しか
/// 持たないため、1要素をインラインで保持します。
#[derive(Default, Clone, Debug)]
pub struct Outputs {
    ids: SmallVec<[u32; 1]>,
}

impl Outputs {
    /// IDを追加します。既に含まれていれば何もしません。
    #[inline(always)]
    pub fn insert(&mut self, id: u32) {
        if !self.ids.contains(&id) {
            self.ids.push(id);
        }
    }

    #[inline(always)]
    pub fn as_slice(&self) -> &[u32] {
        &self.ids
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[derive(Default, Clone, Debug)]
struct State {
    transitions: Transitions,
    fail: StateId,
    outputs: Outputs,
}

/// トライと失敗リンクを保持する状態グラフ
///
/// 添字0の状態が根です。根の遷移は `root_edges` に、その他の状態の遷移は
/// 各状態の [`Transitions`] に格納されます。
#[derive(Clone, Debug)]
pub struct StateGraph {
    root_edges: HashMap<char, StateId>,
    states: Vec<State>,
    root_loops: bool,
}

impl Default for StateGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl StateGraph {
    /// 根のみを持つグラフを作成します。
    pub fn new() -> Self {
        Self {
            root_edges: HashMap::new(),
            states: vec![State::default()],
            root_loops: false,
        }
    }

    /// 遷移先を取得します。
    ///
    /// 根に対しては、自己ループモードが有効な場合、遷移が存在しない文字でも
    /// 根自身を返します。このため照合時に「まだ何も一致していない」状態を
    /// 特別扱いする必要がありません。
    #[inline(always)]
    pub fn get(&self, state: StateId, c: char) -> Option<StateId> {
        if state == ROOT {
            match self.root_edges.get(&c) {
                Some(&target) => Some(target),
                None if self.root_loops => Some(ROOT),
                None => None,
            }
        } else {
            self.states[usize::from_u32(state)].transitions.get(c)
        }
    }

    /// トライの辺だけをたどって遷移先を取得します。根の自己ループは無視します。
    #[inline(always)]
    pub fn child(&self, state: StateId, c: char) -> Option<StateId> {
        if state == ROOT {
            self.root_edges.get(&c).copied()
        } else {
            self.states[usize::from_u32(state)].transitions.get(c)
        }
    }

    /// 遷移を設定します。
    pub fn put(&mut self, state: StateId, c: char, target: StateId) {
        if state == ROOT {
            self.root_edges.insert(c, target);
        } else {
            self.states[usize::from_u32(state)]
                .transitions
                .put(c, target);
        }
    }

    /// 状態から出る遷移の文字を列挙します。
    pub fn keys(&self, state: StateId) -> SmallVec<[char; 4]> {
        self.edges(state).into_iter().map(|(c, _)| c).collect()
    }

    /// 状態から出る `(文字, 遷移先)` を列挙します。
    pub fn edges(&self, state: StateId) -> SmallVec<[(char, StateId); 4]> {
        if state == ROOT {
            self.root_edges.iter().map(|(&c, &t)| (c, t)).collect()
        } else {
            self.states[usize::from_u32(state)]
                .transitions
                .iter()
                .collect()
        }
    }

    /// 新しい状態を作成し、そのIDを返します。
    ///
    /// # エラー
    ///
    /// 状態数が `u32` の範囲を超えた場合にエラーを返します。
    pub fn add_state(&mut self) -> Result<StateId> {
        let id = StateId::try_from(self.states.len())?;
        self.states.push(State::default());
        Ok(id)
    }

    /// 失敗リンクを取得します。コンパイル前は常に根を指します。
    #[inline(always)]
    pub fn fail(&self, state: StateId) -> StateId {
        self.states[usize::from_u32(state)].fail
    }

    pub fn set_fail(&mut self, state: StateId, fail: StateId) {
        self.states[usize::from_u32(state)].fail = fail;
    }

    #[inline(always)]
    pub fn outputs(&self, state: StateId) -> &[u32] {
        self.states[usize::from_u32(state)].outputs.as_slice()
    }

    pub fn add_output(&mut self, state: StateId, id: u32) {
        self.states[usize::from_u32(state)].outputs.insert(id);
    }

    /// `from` の出力をすべて `state` に追加します。
    pub fn inherit_outputs(&mut self, state: StateId, from: StateId) {
        if state == from {
            return;
        }
        let inherited = self.states[usize::from_u32(from)].outputs.clone();
        let outputs = &mut self.states[usize::from_u32(state)].outputs;
        for &id in inherited.as_slice() {
            outputs.insert(id);
        }
    }

    /// 根の自己ループモードを有効にします。
    pub fn enable_root_loop(&mut self) {
        self.root_loops = true;
    }

    #[inline(always)]
    pub fn root_loops(&self) -> bool {
        self.root_loops
    }

    /// アリーナ内の状態数を返します。
    #[inline(always)]
    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    /// `state` を根とする部分トライの状態数を返します。
    ///
    /// トライの辺だけをたどり、失敗リンクは見ません。辺に閉路があると
    /// 停止しないため、この計算が意味を持つのは辺集合が木である場合に限られます。
    /// 本実装では失敗リンクを別に保持し、根の自己ループも辺ではなくモードとして
    /// 扱うので、コンパイル後でも辺集合は木のままです。
    pub fn trie_size(&self, state: StateId) -> usize {
        let mut size = 0;
        let mut stack = vec![state];
        while let Some(s) = stack.pop() {
            size += 1;
            stack.extend(self.edges(s).into_iter().map(|(_, t)| t));
        }
        size
    }
}
