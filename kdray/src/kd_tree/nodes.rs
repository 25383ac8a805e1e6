use super::{KdNode, KdNodeId};
use crate::{gpu, GrowableVec};

/// Nodes of the tree under construction, already in their serialized form.
#[derive(Debug)]
pub struct KdNodes {
    nodes: GrowableVec<gpu::KdNode>,
}

impl KdNodes {
    /// Reserves a slot for the node being built.
    ///
    /// Nodes are laid out in the order they're visited, so `id` must always
    /// be the next free slot; anything else means the builder went off the
    /// rails.
    pub fn allocate(&mut self, id: KdNodeId) {
        assert_eq!(
            id.get() as usize,
            self.nodes.len(),
            "node allocated out of order",
        );

        self.nodes.push(Default::default());
    }

    pub fn set(&mut self, id: KdNodeId, node: KdNode) {
        self.nodes[id.get() as usize] = node.serialize();
    }

    /// Returns the id that the next allocated node will get.
    pub fn next_id(&self) -> KdNodeId {
        KdNodeId::new(self.nodes.len() as u32)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    pub fn into_vec(self) -> Vec<gpu::KdNode> {
        self.nodes.into_vec()
    }
}

impl Default for KdNodes {
    fn default() -> Self {
        Self {
            nodes: GrowableVec::new("kd-nodes"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_and_set() {
        let mut target = KdNodes::default();

        target.allocate(KdNodeId::root());
        target.allocate(KdNodeId::new(1));

        target.set(
            KdNodeId::new(1),
            KdNode::Leaf {
                offset: 0,
                count: 1,
            },
        );

        assert_eq!(KdNodeId::new(2), target.next_id());
        assert_eq!(512, target.capacity());

        let nodes = target.into_vec();

        assert_eq!(2, nodes.len());
        assert!(nodes[1].is_leaf());
    }

    #[test]
    #[should_panic(expected = "node allocated out of order")]
    fn allocate_out_of_order() {
        let mut target = KdNodes::default();

        target.allocate(KdNodeId::new(1));
    }
}
