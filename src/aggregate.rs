use crate::feature::Feature;

pub fn concat<I>(batches: I) -> Vec<Feature>
where
    I: IntoIterator<Item = Vec<Feature>>,
{
    batches.into_iter().flatten().collect()
}
