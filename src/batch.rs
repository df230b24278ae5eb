use crate::domain::{BatchSize, ObjectId};

pub fn chunk_count(len: usize, size: BatchSize) -> usize {
    len.div_ceil(size.get())
}

pub fn partition(ids: &[ObjectId], size: BatchSize) -> Vec<Vec<ObjectId>> {
    ids.chunks(size.get()).map(<[ObjectId]>::to_vec).collect()
}
