use crate::GrowableVec;

/// Primitive ids referenced by leaves, grouped leaf by leaf.
#[derive(Debug)]
pub struct KdIndices {
    indices: GrowableVec<u32>,
}

impl KdIndices {
    /// Appends given ids, returning the offset at which they start.
    pub fn add(&mut self, ids: &[u32]) -> u32 {
        let offset = self.indices.len() as u32;

        self.indices.reserve_for(ids.len());
        self.indices.extend(ids.iter().copied());

        offset
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn into_vec(self) -> Vec<u32> {
        self.indices.into_vec()
    }
}

impl Default for KdIndices {
    fn default() -> Self {
        Self {
            indices: GrowableVec::new("kd-indices"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add() {
        let mut target = KdIndices::default();

        assert_eq!(0, target.add(&[3, 1, 2]));
        assert_eq!(3, target.add(&[]));
        assert_eq!(3, target.add(&[0, 1]));
        assert_eq!(vec![3, 1, 2, 0, 1], target.into_vec());
    }
}
