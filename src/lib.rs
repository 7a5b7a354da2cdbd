pub mod config;
pub mod records;

pub mod data {
    pub mod columnar;
    pub mod loader;
}

pub mod metrics {
    pub mod bootstrap;
    pub mod fairness;
    pub mod groups;
    pub mod ranking;
}

pub mod report {
    pub mod table;
}

pub mod plot {
    pub mod bars;
}

pub use metrics::fairness::{evaluate, evaluate_with_groups, FairnessReport};
pub use metrics::groups::GroupStats;
pub use records::{InvalidInput, Record};
