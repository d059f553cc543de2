//! Kanban grouping over the stage set.

use crate::models::{Deal, DealStage};

/// One kanban column
#[derive(Debug, Clone)]
pub struct StageColumn<'a> {
    pub stage: DealStage,
    pub deals: Vec<&'a Deal>,
}

/// Group `deals` into the five stage columns, in display order.
/// Empty columns are kept; deals keep their input order inside a column.
pub fn group_by_stage(deals: &[Deal]) -> Vec<StageColumn<'_>> {
    let mut columns: Vec<StageColumn<'_>> = DealStage::ALL
        .into_iter()
        .map(|stage| StageColumn { stage, deals: Vec::new() })
        .collect();

    for deal in deals {
        columns[deal.current_stage.position()].deals.push(deal);
    }
    columns
}
