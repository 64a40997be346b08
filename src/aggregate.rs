use crate::error::{ChartError, Result};
use crate::normalize::{IterationBundle, SeriesSet};
use std::collections::BTreeMap;

/// Reduce an [`IterationBundle`] to a single [`SeriesSet`] by elementwise
/// arithmetic mean over the iteration dimension.
///
/// Every iteration must share iteration 0's key set and sequence length; the
/// first divergence found is reported. Iteration order does not affect the
/// result beyond round-off.
pub fn aggregate(bundle: &IterationBundle) -> Result<SeriesSet> {
    let sets = bundle.iterations();
    let first = sets
        .first()
        .ok_or_else(|| ChartError::MalformedInput("empty iteration bundle".into()))?;

    for (i, set) in sets.iter().enumerate().skip(1) {
        for key in first.keys() {
            let expected = first.get(key).unwrap().len();
            match set.get(key) {
                Some(seq) if seq.len() == expected => {}
                _ => {
                    return Err(ChartError::InconsistentIterationSchema {
                        iteration: i,
                        key: key.to_string(),
                    });
                }
            }
        }
        if let Some(extra) = set.keys().find(|k| first.get(k).is_none()) {
            return Err(ChartError::InconsistentIterationSchema {
                iteration: i,
                key: extra.to_string(),
            });
        }
    }

    let count = sets.len() as f64;
    let mut means = BTreeMap::new();
    for key in first.keys() {
        let len = first.get(key).unwrap().len();
        let mut sums = vec![0.0f64; len];
        for set in sets {
            for (sum, value) in sums.iter_mut().zip(set.get(key).unwrap()) {
                *sum += value;
            }
        }
        for sum in &mut sums {
            *sum /= count;
        }
        means.insert(key.to_string(), sums);
    }

    let mut out = SeriesSet::new(means);
    if let Some(graph) = first.graph_type() {
        out = out.with_graph_type(graph);
    }
    Ok(out)
}
