use crate::style::LineStyle;

/// Experiment families with structurally different result schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExperimentKind {
    /// LL/IC counter throughput: object keyed by counter variant, one timing
    /// per processor count.
    LlicThroughput,
    /// LL/IC counter latency: object keyed by counter variant, one latency
    /// per thread count.
    LlicLatency,
    /// Work-stealing queue runs: array of records tagged with an `algorithm`
    /// name, one record per processor count.
    WorkStealing,
}

/// One row of the declared schema table for an experiment: the series key the
/// input must use, the label drawn in the legend, and the line style.
#[derive(Debug, Clone, Copy)]
pub struct SeriesDecl {
    pub key: &'static str,
    pub label: &'static str,
    pub line_style: LineStyle,
}

const LLIC_THROUGHPUT_SERIES: &[SeriesDecl] = &[
    SeriesDecl {
        key: "CAS",
        label: "LL/IC CAS",
        line_style: LineStyle::Dashed,
    },
    SeriesDecl {
        key: "FAI",
        label: "Fetch&Inc",
        line_style: LineStyle::Dotted,
    },
    SeriesDecl {
        key: "RW",
        label: "LL/IC without False Sharing",
        line_style: LineStyle::Solid,
    },
    SeriesDecl {
        key: "RWNC",
        label: "LL/IC with False Sharing",
        line_style: LineStyle::Solid,
    },
];

const LLIC_LATENCY_SERIES: &[SeriesDecl] = &[
    SeriesDecl {
        key: "LAT_FAI",
        label: "Fetch & Increment",
        line_style: LineStyle::Dashed,
    },
    SeriesDecl {
        key: "LAT_LLIC",
        label: "LL/IC CAS",
        line_style: LineStyle::Solid,
    },
];

const WORK_STEALING_SERIES: &[SeriesDecl] = &[
    SeriesDecl {
        key: "CHASELEV",
        label: "CHASELEV",
        line_style: LineStyle::Dashed,
    },
    SeriesDecl {
        key: "CILK",
        label: "CILK",
        line_style: LineStyle::Dashed,
    },
    SeriesDecl {
        key: "IDEMPOTENT_FIFO",
        label: "IDEMPOTENT_FIFO",
        line_style: LineStyle::Dashed,
    },
    SeriesDecl {
        key: "IDEMPOTENT_LIFO",
        label: "IDEMPOTENT_LIFO",
        line_style: LineStyle::Dashed,
    },
    SeriesDecl {
        key: "IDEMPOTENT_DEQUE",
        label: "IDEMPOTENT_DEQUE",
        line_style: LineStyle::Dashed,
    },
    SeriesDecl {
        key: "WS_NC_MULT",
        label: "WS_NC_MULT",
        line_style: LineStyle::Dashed,
    },
    SeriesDecl {
        key: "B_WS_NC_MULT",
        label: "B_WS_NC_MULT",
        line_style: LineStyle::Dashed,
    },
];

impl ExperimentKind {
    pub fn all() -> &'static [ExperimentKind] {
        &[
            ExperimentKind::LlicThroughput,
            ExperimentKind::LlicLatency,
            ExperimentKind::WorkStealing,
        ]
    }

    /// The fixed schema table for this kind. Declared order drives length
    /// checking, style assignment, and plot order.
    pub fn declared_series(&self) -> &'static [SeriesDecl] {
        match self {
            ExperimentKind::LlicThroughput => LLIC_THROUGHPUT_SERIES,
            ExperimentKind::LlicLatency => LLIC_LATENCY_SERIES,
            ExperimentKind::WorkStealing => WORK_STEALING_SERIES,
        }
    }

    /// Stable identifier used in artifact names.
    pub fn name(&self) -> &'static str {
        match self {
            ExperimentKind::LlicThroughput => "llic-throughput",
            ExperimentKind::LlicLatency => "llic-latency",
            ExperimentKind::WorkStealing => "work-stealing",
        }
    }
}

/// Which per-record measurement a work-stealing chart plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WsMetric {
    ExecutionTime,
    Puts,
    Takes,
    Steals,
}

impl WsMetric {
    pub fn name(&self) -> &'static str {
        match self {
            WsMetric::ExecutionTime => "time",
            WsMetric::Puts => "puts",
            WsMetric::Takes => "takes",
            WsMetric::Steals => "steals",
        }
    }
}
