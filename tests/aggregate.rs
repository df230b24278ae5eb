mod support;

use agol_geotable::aggregate::concat;
use agol_geotable::feature::Feature;

use support::point_feature;

#[test]
fn concatenates_in_batch_order() {
    let f1 = point_feature(1, -122.0, 37.0);
    let f2 = point_feature(2, -122.1, 37.1);
    let f3 = point_feature(3, -122.2, 37.2);

    let out = concat(vec![vec![f1.clone(), f2.clone()], vec![f3.clone()]]);
    assert_eq!(out, vec![f1, f2, f3]);
}

#[test]
fn empty_batches_give_empty_collection() {
    assert!(concat(Vec::<Vec<Feature>>::new()).is_empty());
    assert!(concat(vec![Vec::new(), Vec::new(), Vec::new()]).is_empty());
}

#[test]
fn duplicates_are_kept() {
    let f1 = point_feature(1, -122.0, 37.0);
    let out = concat(vec![vec![f1.clone()], Vec::new(), vec![f1.clone()]]);
    assert_eq!(out, vec![f1.clone(), f1]);
}
