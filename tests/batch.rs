mod support;

use agol_geotable::batch::{chunk_count, partition};
use agol_geotable::domain::{BatchSize, ObjectId};

use support::ids;

#[test]
fn partition_covers_list_in_order() {
    for n in [0_i64, 1, 2, 7, 224, 225, 226, 450, 451, 1000] {
        for b in [1_usize, 2, 3, 10, 225, 1000] {
            let list: Vec<ObjectId> = (1..=n).map(ObjectId::new).collect();
            let size = BatchSize::new(b).unwrap();
            let batches = partition(&list, size);

            assert_eq!(batches.len(), (n as usize).div_ceil(b), "n={n} b={b}");
            assert!(batches.iter().all(|batch| !batch.is_empty() && batch.len() <= b));
            if let Some((last, full)) = batches.split_last() {
                assert!(full.iter().all(|batch| batch.len() == b));
                assert!(last.len() <= b);
            }
            assert_eq!(batches.concat(), list);
        }
    }
}

#[test]
fn empty_list_has_no_batches() {
    assert!(partition(&[], BatchSize::default()).is_empty());
    assert_eq!(chunk_count(0, BatchSize::default()), 0);
}

#[test]
fn exactly_one_full_batch_at_225() {
    let batches = partition(&ids(1..=225), BatchSize::default());
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].len(), 225);
}

#[test]
fn one_past_the_limit_spills_a_single_id() {
    let batches = partition(&ids(1..=226), BatchSize::default());
    assert_eq!(batches.len(), 2);
    assert_eq!(batches[1], vec![ObjectId::new(226)]);
    assert_eq!(chunk_count(226, BatchSize::default()), 2);
}

#[test]
fn non_contiguous_ids_keep_service_order() {
    let list = vec![
        ObjectId::new(42),
        ObjectId::new(7),
        ObjectId::new(1001),
        ObjectId::new(3),
    ];
    let batches = partition(&list, BatchSize::new(3).unwrap());
    assert_eq!(batches[0], list[..3].to_vec());
    assert_eq!(batches[1], vec![ObjectId::new(3)]);
}
