//! Batch queries evaluated in parallel over an immutable tree.

use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::error::Result;
use crate::kdtree::{KDTree, KDTreeIndex, Neighbor};
use crate::r#type::IndexableNum;

impl<N: IndexableNum> KDTree<N> {
    /// Run [`nearest`][KDTreeIndex::nearest] for every query in parallel.
    ///
    /// Results are returned in query order. A query with the wrong dimension or a non-finite coordinate fails the batch.
    pub fn par_nearest<Q>(&self, queries: &[Q]) -> Result<Vec<Option<Neighbor<'_, N>>>>
    where
        Q: AsRef<[N]> + Sync,
    {
        queries
            .par_iter()
            .map(|query| self.nearest(query.as_ref()))
            .collect()
    }

    /// Run [`k_nearest`][KDTreeIndex::k_nearest] for every query in parallel.
    ///
    /// Results are returned in query order. A query with the wrong dimension or a non-finite coordinate fails the batch.
    pub fn par_k_nearest<Q>(&self, queries: &[Q], k: usize) -> Result<Vec<Vec<Neighbor<'_, N>>>>
    where
        Q: AsRef<[N]> + Sync,
    {
        queries
            .par_iter()
            .map(|query| self.k_nearest(query.as_ref(), k))
            .collect()
    }
}

#[cfg(test)]
mod test {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use crate::kdtree::{KDTree, KDTreeIndex};
    use crate::KdIndexError;

    #[test]
    fn parallel_matches_sequential() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut random_point = |span: f64| -> [f64; 3] {
            [
                rng.gen_range(-span..span),
                rng.gen_range(-span..span),
                rng.gen_range(-span..span),
            ]
        };
        let points: Vec<[f64; 3]> = (0..500).map(|_| random_point(10.)).collect();
        let queries: Vec<[f64; 3]> = (0..64).map(|_| random_point(12.)).collect();
        let tree = KDTree::<f64>::build(3, &points).unwrap();

        let nearest = tree.par_nearest(&queries).unwrap();
        let k_nearest = tree.par_k_nearest(&queries, 5).unwrap();
        for (i, query) in queries.iter().enumerate() {
            assert_eq!(nearest[i], tree.nearest(query).unwrap());
            assert_eq!(k_nearest[i], tree.k_nearest(query, 5).unwrap());
        }
    }

    #[test]
    fn parallel_reports_dimension_errors() {
        let tree = KDTree::<f64>::build(2, [[0., 0.], [1., 1.]]).unwrap();
        let queries = vec![vec![0., 0.], vec![1., 2., 3.]];
        assert_eq!(
            tree.par_nearest(&queries).unwrap_err(),
            KdIndexError::DimensionMismatch {
                expected: 2,
                found: 3
            }
        );
    }
}
