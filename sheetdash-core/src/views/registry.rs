//! View registry for creating view instances

use super::*;
use std::collections::HashSet;

/// All views, in tab order
pub fn create_all_views() -> Vec<Box<dyn DashboardView>> {
    vec![
        Box::new(overview::OverviewView),
        Box::new(profitability::ProfitabilityView),
        Box::new(channels::ChannelsView),
        Box::new(orders::OrdersView),
        Box::new(costs::CostsView),
        Box::new(suppliers::SuppliersView),
    ]
}

/// Get all valid view ids
pub fn get_all_view_ids() -> HashSet<&'static str> {
    create_all_views().iter().map(|view| view.id()).collect()
}

/// Views whose id is in `ids`, kept in tab order. An empty selection means all views.
pub fn create_selected_views(ids: &[String]) -> Vec<Box<dyn DashboardView>> {
    create_all_views()
        .into_iter()
        .filter(|view| ids.is_empty() || ids.iter().any(|id| id == view.id()))
        .collect()
}
