use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KdTreeStats {
    pub nodes: usize,
    pub interiors: usize,
    pub leaves: usize,
    pub empty_leaves: usize,
    pub indices: usize,
    pub max_leaf_size: usize,
    pub max_depth: u32,
}

impl KdTreeStats {
    pub fn average_leaf_size(&self) -> f32 {
        let non_empty_leaves = self.leaves - self.empty_leaves;

        if non_empty_leaves == 0 {
            0.0
        } else {
            (self.indices as f32) / (non_empty_leaves as f32)
        }
    }
}

impl fmt::Display for KdTreeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "nodes = {} ({} interior, {} leaves, {} empty), indices = {}, \
             max-leaf-size = {}, avg-leaf-size = {:.2}, max-depth = {}",
            self.nodes,
            self.interiors,
            self.leaves,
            self.empty_leaves,
            self.indices,
            self.max_leaf_size,
            self.average_leaf_size(),
            self.max_depth,
        )
    }
}
