//! Eviction List Module
//!
//! Circular doubly-linked list of cache nodes stored in an arena.
//!
//! Nodes live in a `Vec` of slots and link to each other by slot index.
//! The list is circular: the head is the most recently used node and
//! `head.prev` is the least recently used one (the eviction candidate).
//!
//! ```text
//!          ┌──────────────────────────────────────┐
//!          ▼                                      │
//!   head ─► [A] ◄──► [B] ◄──► [C] ◄──► [D] ───────┘
//!           MRU                         LRU = head.prev
//! ```
//!
//! Freed slots go on a free list and are reused; each reuse bumps the
//! slot generation so stale [`NodeId`]s are rejected.

use tracing::trace;

use crate::cache::node::{Node, NodeId};

#[derive(Debug)]
struct Slot<K, V, X> {
    generation: u64,
    prev: Option<usize>,
    next: Option<usize>,
    node: Option<Node<K, V, X>>,
}

// == Eviction List ==
#[derive(Debug)]
pub struct EvictionList<K, V, X = ()> {
    slots: Vec<Slot<K, V, X>>,
    free_list: Vec<usize>,
    head: Option<usize>,
    len: usize,
}

impl<K, V, X> Default for EvictionList<K, V, X> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, X> EvictionList<K, V, X> {
    // == Constructor ==
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            head: None,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Returns the slot index for `id` if it refers to a live node.
    fn resolve(&self, id: NodeId) -> Option<usize> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation && slot.node.is_some())
            .map(|_| id.index)
    }

    fn id_at(&self, index: usize) -> NodeId {
        NodeId {
            index,
            generation: self.slots[index].generation,
        }
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.resolve(id).is_some()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node<K, V, X>> {
        self.resolve(id).and_then(|index| self.slots[index].node.as_ref())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node<K, V, X>> {
        self.resolve(id)
            .and_then(|index| self.slots[index].node.as_mut())
    }

    /// Most recently used node.
    pub fn head(&self) -> Option<NodeId> {
        self.head.map(|index| self.id_at(index))
    }

    /// Least recently used node, i.e. the node before the head.
    pub fn tail(&self) -> Option<NodeId> {
        self.head
            .map(|head| self.slots[head].prev.unwrap_or(head))
            .map(|index| self.id_at(index))
    }

    // == Push Front ==
    /// Stores `node` in a free slot and links it at the head.
    pub fn push_front(&mut self, node: Node<K, V, X>) -> NodeId {
        let index = match self.free_list.pop() {
            Some(index) => {
                self.slots[index].node = Some(node);
                index
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    prev: None,
                    next: None,
                    node: Some(node),
                });
                self.slots.len() - 1
            }
        };
        self.link_at_head(index);
        self.len += 1;
        self.id_at(index)
    }

    // == Remove ==
    /// Unlinks the node and releases its slot.
    pub fn remove(&mut self, id: NodeId) -> Option<Node<K, V, X>> {
        let index = self.resolve(id)?;
        self.unlink(index);
        let slot = &mut self.slots[index];
        let node = slot.node.take();
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(index);
        self.len -= 1;
        node
    }

    // == Promote ==
    /// Moves the node to the head. Returns `false` for a dead handle.
    pub fn promote(&mut self, id: NodeId) -> bool {
        let Some(index) = self.resolve(id) else {
            return false;
        };
        if self.head != Some(index) {
            self.unlink(index);
            self.link_at_head(index);
            trace!(node = %id, "promoted to head");
        }
        true
    }

    fn link_at_head(&mut self, index: usize) {
        match self.head {
            None => {
                self.slots[index].prev = Some(index);
                self.slots[index].next = Some(index);
            }
            Some(head) => {
                let tail = self.slots[head].prev.unwrap_or(head);
                self.slots[index].prev = Some(tail);
                self.slots[index].next = Some(head);
                self.slots[tail].next = Some(index);
                self.slots[head].prev = Some(index);
            }
        }
        self.head = Some(index);
    }

    fn unlink(&mut self, index: usize) {
        let (Some(prev), Some(next)) = (self.slots[index].prev, self.slots[index].next) else {
            return;
        };
        if next == index {
            // last node in the cycle
            self.head = None;
        } else {
            self.slots[prev].next = Some(next);
            self.slots[next].prev = Some(prev);
            if self.head == Some(index) {
                self.head = Some(next);
            }
        }
        self.slots[index].prev = None;
        self.slots[index].next = None;
    }

    // == Iter ==
    /// Walks the list from most to least recently used.
    pub fn iter(&self) -> Iter<'_, K, V, X> {
        Iter {
            list: self,
            current: self.head,
        }
    }

    /// Checks that the links form one cycle through the head covering every
    /// live node, and that unlinked slots have no links.
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) -> std::result::Result<(), String> {
        let live = self.slots.iter().filter(|s| s.node.is_some()).count();
        if live != self.len {
            return Err(format!("len {} but {} live slots", self.len, live));
        }
        for (index, slot) in self.slots.iter().enumerate() {
            if slot.node.is_none() && (slot.prev.is_some() || slot.next.is_some()) {
                return Err(format!("free slot {index} still linked"));
            }
        }
        let Some(head) = self.head else {
            return if self.len == 0 {
                Ok(())
            } else {
                Err("empty head with live nodes".to_string())
            };
        };
        let mut seen = 0;
        let mut current = head;
        loop {
            let slot = &self.slots[current];
            let (Some(prev), Some(next)) = (slot.prev, slot.next) else {
                return Err(format!("linked slot {current} missing a link"));
            };
            if self.slots[next].prev != Some(current) || self.slots[prev].next != Some(current) {
                return Err(format!("asymmetric links at slot {current}"));
            }
            seen += 1;
            if seen > self.len {
                return Err("cycle longer than len".to_string());
            }
            current = next;
            if current == head {
                break;
            }
        }
        if seen != self.len {
            return Err(format!("cycle covers {seen} of {} nodes", self.len));
        }
        Ok(())
    }
}

// == Iterator ==
/// Lazy head-to-tail walk over an [`EvictionList`].
pub struct Iter<'a, K, V, X> {
    list: &'a EvictionList<K, V, X>,
    current: Option<usize>,
}

impl<'a, K, V, X> Iterator for Iter<'a, K, V, X> {
    type Item = (NodeId, &'a Node<K, V, X>);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.current?;
        let list = self.list;
        let slot = &list.slots[index];
        self.current = slot.next.filter(|next| Some(*next) != list.head);
        slot.node.as_ref().map(|node| (list.id_at(index), node))
    }
}
