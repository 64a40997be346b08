use crate::error::{ChartError, Result};
use crate::experiment::{ExperimentKind, SeriesDecl, WsMetric};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Named numeric sequences for one chart, all of equal length. Index position
/// corresponds to processor count - 1 (or thread count - 1).
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSet {
    series: BTreeMap<String, Vec<f64>>,
    /// Work-stealing only: graph type retained from the grouped records.
    graph_type: Option<String>,
}

impl SeriesSet {
    pub fn new(series: BTreeMap<String, Vec<f64>>) -> Self {
        Self {
            series,
            graph_type: None,
        }
    }

    pub fn with_graph_type(mut self, graph_type: impl Into<String>) -> Self {
        self.graph_type = Some(graph_type.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&[f64]> {
        self.series.get(key).map(Vec::as_slice)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.series
            .iter()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }

    /// Number of series in the set.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// The common sequence length shared by every series (0 for an empty set).
    pub fn sequence_len(&self) -> usize {
        self.series.values().next().map_or(0, Vec::len)
    }

    pub fn graph_type(&self) -> Option<&str> {
        self.graph_type.as_deref()
    }
}

/// One normalized SeriesSet per iteration of a repeated benchmark run.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationBundle {
    sets: Vec<SeriesSet>,
}

impl IterationBundle {
    pub fn new(sets: Vec<SeriesSet>) -> Self {
        Self { sets }
    }

    pub fn iterations(&self) -> &[SeriesSet] {
        &self.sets
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

/// Extract the named numeric sequences for a single-run document of `kind`.
pub fn normalize(doc: &Value, kind: ExperimentKind) -> Result<SeriesSet> {
    match kind {
        ExperimentKind::LlicThroughput | ExperimentKind::LlicLatency => {
            normalize_fixed(doc, kind.declared_series())
        }
        ExperimentKind::WorkStealing => normalize_work_stealing(doc, WsMetric::ExecutionTime),
    }
}

/// Interpret a multi-iteration document: `iter-<i>` keys for i in 0..iters,
/// each holding a sub-document of the single-run shape for `kind`.
pub fn normalize_iterations(
    doc: &Value,
    kind: ExperimentKind,
    iters: usize,
) -> Result<IterationBundle> {
    let obj = doc.as_object().ok_or_else(|| {
        ChartError::MalformedInput("multi-iteration document is not a JSON object".into())
    })?;

    let mut sets = Vec::with_capacity(iters);
    for i in 0..iters {
        let sub = obj
            .get(&format!("iter-{}", i))
            .ok_or(ChartError::MissingIteration(i))?;
        sets.push(normalize(sub, kind)?);
    }
    Ok(IterationBundle::new(sets))
}

/// Fixed-shape schemas: a single-level object containing exactly the declared
/// keys, each an array of numbers of equal length.
fn normalize_fixed(doc: &Value, declared: &[SeriesDecl]) -> Result<SeriesSet> {
    let obj = doc
        .as_object()
        .ok_or_else(|| ChartError::MalformedInput("document is not a JSON object".into()))?;

    let mut series = BTreeMap::new();
    let mut expected_len: Option<usize> = None;

    for decl in declared {
        let value = obj
            .get(decl.key)
            .ok_or_else(|| ChartError::MissingSeries(decl.key.to_string()))?;
        let seq = numeric_sequence(value, decl.key)?;

        match expected_len {
            None => expected_len = Some(seq.len()),
            Some(expected) if expected != seq.len() => {
                return Err(ChartError::InconsistentSeriesLength {
                    key: decl.key.to_string(),
                    expected,
                    actual: seq.len(),
                });
            }
            Some(_) => {}
        }
        series.insert(decl.key.to_string(), seq);
    }

    // Fixed-shape documents must contain exactly the declared key set.
    if let Some(unknown) = obj.keys().find(|k| !series.contains_key(k.as_str())) {
        return Err(ChartError::UnknownSeriesKey(unknown.clone()));
    }

    Ok(SeriesSet::new(series))
}

/// A single work-stealing benchmark record. One record is produced per
/// processor count, in order.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WsRecord {
    algorithm: String,
    execution_time: f64,
    graph_type: String,
    puts: f64,
    takes: f64,
    steals: f64,
}

impl WsRecord {
    fn metric(&self, metric: WsMetric) -> f64 {
        match metric {
            WsMetric::ExecutionTime => self.execution_time,
            WsMetric::Puts => self.puts,
            WsMetric::Takes => self.takes,
            WsMetric::Steals => self.steals,
        }
    }
}

/// Work-stealing schema: a `values` array of tagged records, grouped by
/// `algorithm`. The first occurrence's `graphType` is retained per group; if
/// records for one algorithm span several graph types the distinction is
/// silently discarded.
pub fn normalize_work_stealing(doc: &Value, metric: WsMetric) -> Result<SeriesSet> {
    let values = doc.get("values").ok_or_else(|| {
        ChartError::MalformedInput("work-stealing document has no `values` array".into())
    })?;
    let records: Vec<WsRecord> = serde_json::from_value(values.clone())
        .map_err(|e| ChartError::MalformedInput(format!("work-stealing record: {}", e)))?;

    let declared = ExperimentKind::WorkStealing.declared_series();
    let mut series: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    let mut graph_types: BTreeMap<&str, String> = BTreeMap::new();

    for record in &records {
        let decl = declared
            .iter()
            .find(|d| d.key == record.algorithm)
            .ok_or_else(|| ChartError::UnknownSeriesKey(record.algorithm.clone()))?;

        series
            .entry(record.algorithm.clone())
            .or_default()
            .push(record.metric(metric));
        graph_types
            .entry(decl.key)
            .or_insert_with(|| record.graph_type.clone());
    }

    // Present groups must agree on length; the first group in declared order
    // establishes the expected value.
    let mut expected_len: Option<usize> = None;
    for decl in declared {
        if let Some(seq) = series.get(decl.key) {
            match expected_len {
                None => expected_len = Some(seq.len()),
                Some(expected) if expected != seq.len() => {
                    return Err(ChartError::InconsistentSeriesLength {
                        key: decl.key.to_string(),
                        expected,
                        actual: seq.len(),
                    });
                }
                Some(_) => {}
            }
        }
    }

    let graph_type = declared.iter().find_map(|d| graph_types.get(d.key).cloned());
    let mut set = SeriesSet::new(series);
    set.graph_type = graph_type;
    Ok(set)
}

fn numeric_sequence(value: &Value, key: &str) -> Result<Vec<f64>> {
    let arr = value
        .as_array()
        .ok_or_else(|| ChartError::MalformedInput(format!("series `{}` is not an array", key)))?;
    arr.iter()
        .map(|v| {
            v.as_f64().ok_or_else(|| {
                ChartError::MalformedInput(format!("series `{}` contains a non-numeric entry", key))
            })
        })
        .collect()
}
