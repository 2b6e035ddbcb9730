//! Tree store: the single owner and mutator of the block forest.
//!
//! Blocks live in a `petgraph::StableDiGraph` arena. Edges point from parent
//! to child and a synthetic root stands for the top-level list. Child order is
//! kept explicitly per parent, since edge iteration order is not a reliable
//! paint order.
//!
//! Every lookup-based operation treats an unknown id as a benign race and
//! does nothing. Each effective mutation bumps `revision`; observers call
//! `snapshot()` to get a fresh `Canvas` value.

use crate::error::{BuilderError, BuilderResult};
use crate::id::BlockId;
use crate::model::*;
use petgraph::Direction;
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};

type ChildList = SmallVec<[NodeIndex; 4]>;

#[derive(Debug, Clone)]
enum Slot {
    Root,
    Block(BlockNode),
}

/// Direction for `move_block`: one step toward the start or end of the
/// containing sibling list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
}

/// A single store edit. Gestures and the wasm bridge produce these; the
/// store applies them through [`TreeStore::apply`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum BlockMutation {
    AddBlock {
        block: Block,
        parent: Option<BlockId>,
    },
    RemoveBlock {
        id: BlockId,
    },
    UpdateBlock {
        id: BlockId,
        patch: BlockPatch,
    },
    UpdateStyle {
        id: BlockId,
        style: BlockStyle,
    },
    DuplicateBlock {
        id: BlockId,
    },
    MoveBlock {
        id: BlockId,
        direction: MoveDirection,
    },
    ToggleVisibility {
        id: BlockId,
    },
    ToggleLock {
        id: BlockId,
    },
    Select {
        id: Option<BlockId>,
    },
}

/// Canvas-level fields that are not part of the block forest.
#[derive(Debug, Clone)]
struct CanvasMeta {
    id: String,
    name: String,
    design_tokens: DesignTokens,
    width: Option<f64>,
    height: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct TreeStore {
    graph: StableDiGraph<Slot, ()>,
    root: NodeIndex,
    id_index: HashMap<BlockId, NodeIndex>,
    child_order: HashMap<NodeIndex, ChildList>,
    meta: CanvasMeta,
    selection: Option<SelectedElement>,
    revision: u64,
}

impl Default for TreeStore {
    fn default() -> Self {
        Self::new("My Project")
    }
}

impl TreeStore {
    /// An empty store for a fresh canvas.
    #[must_use]
    pub fn new(name: &str) -> Self {
        let canvas = Canvas::new(name);
        let mut graph = StableDiGraph::new();
        let root = graph.add_node(Slot::Root);

        Self {
            graph,
            root,
            id_index: HashMap::new(),
            child_order: HashMap::new(),
            meta: CanvasMeta {
                id: canvas.id,
                name: canvas.name,
                design_tokens: canvas.design_tokens,
                width: canvas.width,
                height: canvas.height,
            },
            selection: None,
            revision: 0,
        }
    }

    /// Load an existing canvas. Fails if any id appears twice in the forest.
    pub fn from_canvas(canvas: Canvas) -> BuilderResult<Self> {
        let mut seen = HashSet::new();
        for block in canvas.iter() {
            if !seen.insert(block.id) {
                return Err(BuilderError::DuplicateId(block.id));
            }
        }

        let mut store = Self::new(&canvas.name);
        store.meta = CanvasMeta {
            id: canvas.id,
            name: canvas.name,
            design_tokens: canvas.design_tokens,
            width: canvas.width,
            height: canvas.height,
        };
        let root = store.root;
        for block in canvas.blocks {
            store.insert_subtree(root, block);
        }
        Ok(store)
    }

    // ─── Read side ───────────────────────────────────────────────────────

    /// Monotonic change counter. Differs after every effective mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.id_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_index.is_empty()
    }

    pub fn contains(&self, id: BlockId) -> bool {
        self.id_index.contains_key(&id)
    }

    pub fn canvas_name(&self) -> &str {
        &self.meta.name
    }

    pub fn design_tokens(&self) -> &DesignTokens {
        &self.meta.design_tokens
    }

    /// A block's own fields, without children.
    pub fn node(&self, id: BlockId) -> Option<&BlockNode> {
        self.index_of(id).and_then(|idx| self.slot(idx))
    }

    /// The block and its full subtree as an owned value.
    pub fn get_block(&self, id: BlockId) -> Option<Block> {
        self.index_of(id).and_then(|idx| self.materialize(idx))
    }

    /// Every block in the forest, pre-order.
    pub fn get_all_blocks(&self) -> Vec<&BlockNode> {
        let mut out = Vec::with_capacity(self.len());
        let mut stack: Vec<NodeIndex> = self.children(self.root).iter().rev().copied().collect();
        while let Some(idx) = stack.pop() {
            if let Some(node) = self.slot(idx) {
                out.push(node);
            }
            stack.extend(self.children(idx).iter().rev().copied());
        }
        out
    }

    /// Top-level block ids in paint order.
    pub fn top_level(&self) -> Vec<BlockId> {
        self.ids_of(self.root)
    }

    /// Direct child ids of `id` in paint order (empty if unknown).
    pub fn children_of(&self, id: BlockId) -> Vec<BlockId> {
        self.index_of(id)
            .map(|idx| self.ids_of(idx))
            .unwrap_or_default()
    }

    /// Parent of `id`, or `None` for top-level and unknown blocks.
    pub fn parent_of(&self, id: BlockId) -> Option<BlockId> {
        let parent = self.parent(self.index_of(id)?)?;
        self.slot(parent).map(|node| node.id)
    }

    /// The top-level forest as owned blocks.
    pub fn blocks(&self) -> Vec<Block> {
        self.children(self.root)
            .iter()
            .filter_map(|&idx| self.materialize(idx))
            .collect()
    }

    /// A fresh `Canvas` value reflecting the current state.
    pub fn snapshot(&self) -> Canvas {
        Canvas {
            id: self.meta.id.clone(),
            name: self.meta.name.clone(),
            blocks: self.blocks(),
            design_tokens: self.meta.design_tokens.clone(),
            width: self.meta.width,
            height: self.meta.height,
        }
    }

    // ─── Selection ───────────────────────────────────────────────────────

    /// Current selection, re-resolved against the store.
    pub fn selection(&self) -> Option<SelectedElement> {
        self.selection.filter(|sel| self.contains(sel.id))
    }

    pub fn selected_id(&self) -> Option<BlockId> {
        self.selection().map(|sel| sel.id)
    }

    pub fn selected_block(&self) -> Option<&BlockNode> {
        self.selection().and_then(|sel| self.node(sel.id))
    }

    /// Select `id`, or clear with `None`. Selecting an unknown id is a no-op.
    pub fn set_selection(&mut self, id: Option<BlockId>) -> bool {
        match id {
            Some(id) if !self.contains(id) => {
                log::debug!("select: unknown block {id}");
                false
            }
            Some(id) => {
                if self.selected_id() != Some(id) {
                    self.selection = Some(SelectedElement::block(id));
                    self.bump();
                }
                true
            }
            None => {
                self.clear_selection();
                true
            }
        }
    }

    pub fn clear_selection(&mut self) {
        if self.selection.take().is_some() {
            self.bump();
        }
    }

    // ─── Mutations ───────────────────────────────────────────────────────

    /// Append `block` (with its subtree) at the top level or under `parent`.
    ///
    /// Unknown parents are a no-op. A subtree carrying an id that already
    /// exists, or repeating an id internally, is rejected.
    pub fn add_block(&mut self, block: Block, parent: Option<BlockId>) -> bool {
        let parent_idx = match parent {
            None => self.root,
            Some(pid) => match self.index_of(pid) {
                Some(idx) => idx,
                None => {
                    log::debug!("add_block: unknown parent {pid}");
                    return false;
                }
            },
        };

        let mut incoming = HashSet::new();
        for b in block.iter() {
            if self.contains(b.id) || !incoming.insert(b.id) {
                log::warn!("add_block: rejecting subtree with duplicate id {}", b.id);
                return false;
            }
        }

        log::debug!("add_block {} under {parent:?}", block.id);
        self.insert_subtree(parent_idx, block);
        self.bump();
        true
    }

    /// Remove `id` and its whole subtree. Clears the selection if it pointed
    /// into the removed subtree.
    pub fn remove_block(&mut self, id: BlockId) -> bool {
        let Some(idx) = self.index_of(id) else {
            log::debug!("remove_block: unknown block {id}");
            return false;
        };

        if let Some(parent) = self.parent(idx)
            && let Some(order) = self.child_order.get_mut(&parent)
        {
            order.retain(|c| *c != idx);
        }

        let subtree = self.subtree_indices(idx);
        for &node_idx in &subtree {
            self.child_order.remove(&node_idx);
            if let Some(Slot::Block(node)) = self.graph.remove_node(node_idx) {
                self.id_index.remove(&node.id);
            }
        }

        if self.selection.is_some_and(|sel| !self.contains(sel.id)) {
            self.selection = None;
        }

        log::debug!("remove_block {id}: {} node(s)", subtree.len());
        self.bump();
        true
    }

    /// Merge the non-style fields of `patch`. Content that does not fit the
    /// block's kind is ignored.
    pub fn update_block(&mut self, id: BlockId, patch: &BlockPatch) -> bool {
        let Some(node) = self.node_mut(id) else {
            log::debug!("update_block: unknown block {id}");
            return false;
        };

        if let Some(label) = &patch.label {
            node.label.clone_from(label);
        }
        if let Some(hidden) = patch.hidden {
            node.hidden = hidden;
        }
        if let Some(locked) = patch.locked {
            node.locked = locked;
        }
        if let Some(content) = &patch.content {
            if content.fits(node.kind) {
                node.content = content.clone();
            } else {
                log::warn!("update_block {id}: {content:?} does not fit a {}", node.kind);
            }
        }

        self.bump();
        true
    }

    /// Shallow-merge `style` into the block's style.
    pub fn update_block_style(&mut self, id: BlockId, style: &BlockStyle) -> bool {
        let Some(node) = self.node_mut(id) else {
            log::debug!("update_block_style: unknown block {id}");
            return false;
        };
        node.style.merge(style);
        self.bump();
        true
    }

    /// Merge `style` into every listed block. Returns how many were found.
    pub fn update_blocks_style(&mut self, ids: &[BlockId], style: &BlockStyle) -> usize {
        let mut touched = 0;
        for &id in ids {
            if let Some(node) = self.node_mut(id) {
                node.style.merge(style);
                touched += 1;
            }
        }
        if touched > 0 {
            self.bump();
        }
        touched
    }

    /// Deep-clone `id` with fresh ids throughout and append the clone at the
    /// top level. Returns the clone's root id.
    pub fn duplicate_block(&mut self, id: BlockId) -> Option<BlockId> {
        let Some(mut clone) = self.get_block(id) else {
            log::debug!("duplicate_block: unknown block {id}");
            return None;
        };
        reassign_ids(&mut clone);
        let new_id = clone.id;

        let root = self.root;
        self.insert_subtree(root, clone);
        self.bump();
        log::debug!("duplicate_block {id} -> {new_id}");
        Some(new_id)
    }

    /// Swap `id` with its neighbour in the containing sibling list.
    /// No-op at either boundary.
    pub fn move_block(&mut self, id: BlockId, direction: MoveDirection) -> bool {
        let Some(idx) = self.index_of(id) else {
            log::debug!("move_block: unknown block {id}");
            return false;
        };
        let Some(parent) = self.parent(idx) else {
            return false;
        };
        let Some(order) = self.child_order.get_mut(&parent) else {
            return false;
        };
        let Some(pos) = order.iter().position(|&c| c == idx) else {
            return false;
        };

        let target = match direction {
            MoveDirection::Up if pos > 0 => pos - 1,
            MoveDirection::Down if pos + 1 < order.len() => pos + 1,
            _ => return false,
        };
        order.swap(pos, target);
        self.bump();
        true
    }

    pub fn toggle_block_visibility(&mut self, id: BlockId) -> bool {
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        node.hidden = !node.hidden;
        self.bump();
        true
    }

    pub fn toggle_block_lock(&mut self, id: BlockId) -> bool {
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        node.locked = !node.locked;
        self.bump();
        true
    }

    pub fn rename_canvas(&mut self, name: &str) {
        if self.meta.name != name {
            self.meta.name = name.to_string();
            self.bump();
        }
    }

    /// Apply one mutation. Returns whether it took effect.
    pub fn apply(&mut self, mutation: BlockMutation) -> bool {
        match mutation {
            BlockMutation::AddBlock { block, parent } => self.add_block(block, parent),
            BlockMutation::RemoveBlock { id } => self.remove_block(id),
            BlockMutation::UpdateBlock { id, patch } => self.update_block(id, &patch),
            BlockMutation::UpdateStyle { id, style } => self.update_block_style(id, &style),
            BlockMutation::DuplicateBlock { id } => self.duplicate_block(id).is_some(),
            BlockMutation::MoveBlock { id, direction } => self.move_block(id, direction),
            BlockMutation::ToggleVisibility { id } => self.toggle_block_visibility(id),
            BlockMutation::ToggleLock { id } => self.toggle_block_lock(id),
            BlockMutation::Select { id } => self.set_selection(id),
        }
    }

    // ─── Arena helpers ───────────────────────────────────────────────────

    fn bump(&mut self) {
        self.revision += 1;
    }

    fn index_of(&self, id: BlockId) -> Option<NodeIndex> {
        self.id_index.get(&id).copied()
    }

    fn slot(&self, idx: NodeIndex) -> Option<&BlockNode> {
        match self.graph.node_weight(idx)? {
            Slot::Block(node) => Some(node),
            Slot::Root => None,
        }
    }

    fn node_mut(&mut self, id: BlockId) -> Option<&mut BlockNode> {
        let idx = self.index_of(id)?;
        match self.graph.node_weight_mut(idx)? {
            Slot::Block(node) => Some(node),
            Slot::Root => None,
        }
    }

    fn parent(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.graph
            .neighbors_directed(idx, Direction::Incoming)
            .next()
    }

    fn children(&self, idx: NodeIndex) -> &[NodeIndex] {
        self.child_order
            .get(&idx)
            .map(SmallVec::as_slice)
            .unwrap_or_default()
    }

    fn ids_of(&self, idx: NodeIndex) -> Vec<BlockId> {
        self.children(idx)
            .iter()
            .filter_map(|&c| self.slot(c).map(|n| n.id))
            .collect()
    }

    fn subtree_indices(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut out = Vec::new();
        let mut stack = vec![idx];
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend_from_slice(self.children(next));
        }
        out
    }

    fn materialize(&self, idx: NodeIndex) -> Option<Block> {
        let node = self.slot(idx)?.clone();
        let children = self
            .children(idx)
            .iter()
            .filter_map(|&c| self.materialize(c))
            .collect();
        Some(node.with_children(children))
    }

    /// Insert without duplicate checks; callers validate ids first.
    fn insert_subtree(&mut self, parent: NodeIndex, block: Block) -> NodeIndex {
        let (node, children) = block.into_parts();
        let id = node.id;
        let idx = self.graph.add_node(Slot::Block(node));
        self.graph.add_edge(parent, idx, ());
        self.child_order.entry(parent).or_default().push(idx);
        self.id_index.insert(id, idx);

        for child in children {
            self.insert_subtree(idx, child);
        }
        idx
    }
}

/// Give every node in `block` a fresh id.
fn reassign_ids(block: &mut Block) {
    block.id = BlockId::with_prefix(&block.kind.slug().replace('-', "_"));
    for child in &mut block.children {
        reassign_ids(child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::create_block;
    use pretty_assertions::assert_eq;

    fn store_with_nested() -> (TreeStore, BlockId, BlockId, BlockId) {
        let mut store = TreeStore::default();
        let section = create_block(BlockKind::Section);
        let card = create_block(BlockKind::Card);
        let text = create_block(BlockKind::Text);
        let (s, c, t) = (section.id, card.id, text.id);
        store.add_block(section, None);
        store.add_block(card, Some(s));
        store.add_block(text, Some(c));
        (store, s, c, t)
    }

    #[test]
    fn add_and_get_nested() {
        let (store, s, c, t) = store_with_nested();
        assert_eq!(store.len(), 3);
        assert_eq!(store.top_level(), vec![s]);
        assert_eq!(store.children_of(s), vec![c]);
        assert_eq!(store.parent_of(t), Some(c));
        assert_eq!(store.parent_of(s), None);

        let section = store.get_block(s).unwrap();
        assert_eq!(section.children[0].children[0].id, t);
    }

    #[test]
    fn add_to_unknown_parent_is_noop() {
        let mut store = TreeStore::default();
        let rev = store.revision();
        let ok = store.add_block(create_block(BlockKind::Text), Some(BlockId::intern("ghost")));
        assert!(!ok);
        assert!(store.is_empty());
        assert_eq!(store.revision(), rev);
    }

    #[test]
    fn add_rejects_duplicate_ids() {
        let mut store = TreeStore::default();
        let block = create_block(BlockKind::Card);
        assert!(store.add_block(block.clone(), None));
        assert!(!store.add_block(block, None));
        assert_eq!(store.len(), 1);

        // Repeated id inside one subtree.
        let inner = create_block(BlockKind::Text);
        let dup = create_block(BlockKind::Section)
            .with_child(inner.clone())
            .with_child(inner);
        assert!(!store.add_block(dup, None));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn get_all_blocks_is_pre_order() {
        let (mut store, s, c, t) = store_with_nested();
        let b = create_block(BlockKind::Button);
        let bid = b.id;
        store.add_block(b, None);

        let order: Vec<BlockId> = store.get_all_blocks().iter().map(|n| n.id).collect();
        assert_eq!(order, vec![s, c, t, bid]);
    }

    #[test]
    fn remove_drops_subtree_and_selection() {
        let (mut store, s, _c, t) = store_with_nested();
        store.set_selection(Some(t));
        assert!(store.remove_block(s));
        assert!(store.is_empty());
        assert!(store.get_block(t).is_none());
        assert!(store.selection().is_none());
        assert!(!store.remove_block(s));
    }

    #[test]
    fn update_block_merges_fields() {
        let (mut store, _s, _c, t) = store_with_nested();
        store.update_block(
            t,
            &BlockPatch {
                label: Some("Intro".into()),
                content: Some(BlockContent::Text {
                    text: "Hello".into(),
                }),
                ..Default::default()
            },
        );
        let node = store.node(t).unwrap();
        assert_eq!(node.label, "Intro");
        assert_eq!(node.content.text(), Some("Hello"));
        assert!(!node.hidden);
    }

    #[test]
    fn update_block_ignores_mismatched_content() {
        let (mut store, s, _c, _t) = store_with_nested();
        store.update_block(s, &BlockPatch::content(BlockContent::Grid { columns: 2 }));
        assert_eq!(store.node(s).unwrap().content, BlockContent::None);
    }

    #[test]
    fn style_merge_through_store_is_idempotent() {
        let (mut store, _s, c, _t) = store_with_nested();
        let patch = BlockStyle {
            gap: Some(12.0),
            ..Default::default()
        };
        store.update_block_style(c, &patch);
        let once = store.node(c).unwrap().style.clone();
        store.update_block_style(c, &patch);
        assert_eq!(store.node(c).unwrap().style, once);
    }

    #[test]
    fn update_many_styles() {
        let (mut store, s, c, _t) = store_with_nested();
        let n = store.update_blocks_style(
            &[s, c, BlockId::intern("ghost")],
            &BlockStyle {
                opacity: Some(0.5),
                ..Default::default()
            },
        );
        assert_eq!(n, 2);
        assert_eq!(store.node(s).unwrap().style.opacity, Some(0.5));
    }

    #[test]
    fn duplicate_gets_fresh_ids_and_lands_top_level() {
        let (mut store, s, c, _t) = store_with_nested();
        let before: HashSet<BlockId> = store.get_all_blocks().iter().map(|n| n.id).collect();

        let clone = store.duplicate_block(c).unwrap();
        assert_eq!(store.len(), 5);
        assert_eq!(store.top_level(), vec![s, clone]);
        let cloned = store.get_block(clone).unwrap();
        assert!(cloned.ids().iter().all(|id| !before.contains(id)));
        assert_eq!(cloned.children[0].kind, BlockKind::Text);
    }

    #[test]
    fn move_within_siblings() {
        let mut store = TreeStore::default();
        let a = create_block(BlockKind::Card);
        let b = create_block(BlockKind::Card);
        let (aid, bid) = (a.id, b.id);
        store.add_block(a, None);
        store.add_block(b, None);

        assert!(!store.move_block(aid, MoveDirection::Up));
        assert!(!store.move_block(bid, MoveDirection::Down));
        assert!(store.move_block(bid, MoveDirection::Up));
        assert_eq!(store.top_level(), vec![bid, aid]);
    }

    #[test]
    fn toggles_flip_flags() {
        let (mut store, s, _c, _t) = store_with_nested();
        store.toggle_block_visibility(s);
        store.toggle_block_lock(s);
        let node = store.node(s).unwrap();
        assert!(node.hidden && node.locked);
        store.toggle_block_visibility(s);
        assert!(!store.node(s).unwrap().hidden);
    }

    #[test]
    fn revision_moves_on_every_effective_change() {
        let (mut store, s, _c, _t) = store_with_nested();
        let r0 = store.revision();
        store.update_block_style(s, &BlockStyle::position(1.0, 2.0));
        let r1 = store.revision();
        assert!(r1 > r0);
        store.update_block_style(BlockId::intern("ghost"), &BlockStyle::position(1.0, 2.0));
        assert_eq!(store.revision(), r1);
    }

    #[test]
    fn snapshot_roundtrips_through_from_canvas() {
        let (store, ..) = store_with_nested();
        let canvas = store.snapshot();
        let reloaded = TreeStore::from_canvas(canvas.clone()).unwrap();
        assert_eq!(reloaded.snapshot(), canvas);
    }

    #[test]
    fn from_canvas_rejects_duplicates() {
        let text = create_block(BlockKind::Text);
        let dup_id = text.id;
        let mut canvas = Canvas::default();
        canvas.blocks = vec![text.clone(), create_block(BlockKind::Section).with_child(text)];
        assert_eq!(
            TreeStore::from_canvas(canvas).unwrap_err(),
            BuilderError::DuplicateId(dup_id)
        );
    }

    #[test]
    fn apply_dispatches() {
        let mut store = TreeStore::default();
        let block = create_block(BlockKind::Rectangle);
        let id = block.id;
        assert!(store.apply(BlockMutation::AddBlock {
            block,
            parent: None
        }));
        assert!(store.apply(BlockMutation::Select { id: Some(id) }));
        assert_eq!(store.selected_id(), Some(id));
        assert!(store.apply(BlockMutation::UpdateStyle {
            id,
            style: BlockStyle::position(5.0, 6.0),
        }));
        assert_eq!(store.node(id).unwrap().style.x, Some(5.0));
        assert!(store.apply(BlockMutation::RemoveBlock { id }));
        assert!(!store.apply(BlockMutation::ToggleLock { id }));
    }
}
