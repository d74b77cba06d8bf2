use std::ops::{Index, IndexMut};

/// Handle into a [`Tree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);
}

/// One search node. Owned by the arena; parent and children are handles.
#[derive(Debug, Clone)]
pub struct Node<S, A> {
    pub state: S,
    /// Action leading here from the parent (`None` for the root)
    pub action: Option<A>,
    pub prior: f64,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub visits: u64,
    /// Sum of backpropagated rewards
    pub value: f64,
    pub depth: usize,
    pub terminal: bool,
}

impl<S, A> Node<S, A> {
    fn new(state: S, action: Option<A>, prior: f64, parent: Option<NodeId>, depth: usize) -> Self {
        Self {
            state,
            action,
            prior,
            parent,
            children: Vec::new(),
            visits: 0,
            value: 0.0,
            depth,
            terminal: false,
        }
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// value / visits, 0 for an unvisited node
    #[inline]
    pub fn mean_value(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.value / self.visits as f64
        }
    }

    /// UCB1 score against `parent_visits`; `None` while unvisited
    /// (treated as +∞ during selection).
    #[inline]
    pub fn ucb1(&self, parent_visits: u64, c: f64) -> Option<f64> {
        if self.visits == 0 {
            return None;
        }
        let explore = ((parent_visits.max(1) as f64).ln() / self.visits as f64).sqrt();
        Some(self.mean_value() + c * explore)
    }
}

/// Arena of nodes; dropping it tears the whole tree down.
#[derive(Debug, Clone)]
pub struct Tree<S, A> {
    nodes: Vec<Node<S, A>>,
}

// The root is created with the tree, so it is never empty.
#[allow(clippy::len_without_is_empty)]
impl<S, A> Tree<S, A> {
    pub fn new(root_state: S) -> Self {
        Self {
            nodes: vec![Node::new(root_state, None, 1.0, None, 0)],
        }
    }

    #[inline]
    pub fn root(&self) -> &Node<S, A> {
        &self.nodes[0]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn add_child(&mut self, parent: NodeId, state: S, action: A, prior: f64) -> NodeId {
        let id = NodeId(self.nodes.len());
        let depth = self[parent].depth + 1;
        self.nodes.push(Node::new(state, Some(action), prior, Some(parent), depth));
        self[parent].children.push(id);
        id
    }

    /// Child with the highest UCB1; unvisited children win, first one on ties.
    pub fn select_child(&self, id: NodeId, c: f64) -> Option<NodeId> {
        let parent_visits = self[id].visits;
        let mut best: Option<(NodeId, f64)> = None;
        for &child in &self[id].children {
            let score = self[child].ucb1(parent_visits, c).unwrap_or(f64::INFINITY);
            match best {
                Some((_, s)) if score <= s => {}
                _ => best = Some((child, score)),
            }
        }
        best.map(|(child, _)| child)
    }

    /// Most visited child, first one on ties. `None` for a leaf.
    pub fn most_visited_child(&self, id: NodeId) -> Option<NodeId> {
        let mut best: Option<NodeId> = None;
        for &child in &self[id].children {
            match best {
                Some(b) if self[child].visits <= self[b].visits => {}
                _ => best = Some(child),
            }
        }
        best
    }

    /// Add `reward` to `id` and every ancestor.
    pub fn backpropagate(&mut self, id: NodeId, reward: f64) {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let node = &mut self[current];
            node.visits += 1;
            node.value += reward;
            cursor = node.parent;
        }
    }

    pub fn max_depth(&self) -> usize {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }
}

impl<S, A> Index<NodeId> for Tree<S, A> {
    type Output = Node<S, A>;

    #[inline]
    fn index(&self, id: NodeId) -> &Self::Output {
        &self.nodes[id.0]
    }
}

impl<S, A> IndexMut<NodeId> for Tree<S, A> {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        &mut self.nodes[id.0]
    }
}
