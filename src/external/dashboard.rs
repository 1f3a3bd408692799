//! Dashboard KPI collaborator
//!
//! Pre-aggregated snapshots consumed read-only by the presentation layer.
//! The scoring core never touches these.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PnlSnapshot {
    pub project: String,
    pub revenue: f64,
    pub costs: f64,
    pub profit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadcountSnapshot {
    pub active_resources: u32,
    pub by_seniority: BTreeMap<String, u32>,
}

pub trait KpiProvider {
    fn pnl(&self) -> Result<PnlSnapshot>;
    fn headcount(&self) -> Result<HeadcountSnapshot>;
}

/// Fixture-backed provider for local use; the real warehouse sits behind
/// the same trait.
#[derive(Debug, Default)]
pub struct StaticKpiProvider;

impl KpiProvider for StaticKpiProvider {
    fn pnl(&self) -> Result<PnlSnapshot> {
        Ok(PnlSnapshot {
            project: "Santander Agil".to_string(),
            revenue: 500_000.0,
            costs: 350_000.0,
            profit: 150_000.0,
        })
    }

    fn headcount(&self) -> Result<HeadcountSnapshot> {
        let mut by_seniority = BTreeMap::new();
        by_seniority.insert("senior".to_string(), 10);
        by_seniority.insert("pleno".to_string(), 12);
        by_seniority.insert("junior".to_string(), 3);
        Ok(HeadcountSnapshot {
            active_resources: 25,
            by_seniority,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_snapshots_are_consistent() {
        let provider = StaticKpiProvider;
        let pnl = provider.pnl().unwrap();
        assert_eq!(pnl.profit, pnl.revenue - pnl.costs);

        let headcount = provider.headcount().unwrap();
        let total: u32 = headcount.by_seniority.values().sum();
        assert_eq!(total, headcount.active_resources);
    }
}
