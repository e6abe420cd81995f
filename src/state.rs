use std::sync::Arc;

use chrono::NaiveDate;

use crate::data::error::CriteriaError;
use crate::data::filter::FilterCriteria;
use crate::data::model::{Dataset, SeasonFilter};
use crate::view::DashboardView;

// ---------------------------------------------------------------------------
// Dashboard state
// ---------------------------------------------------------------------------

/// Current selection over a shared dataset, independent of rendering.
///
/// Every setter recomputes the whole view from scratch. A rejected change
/// leaves both the criteria and the view as they were.
pub struct DashboardState {
    dataset: Arc<Dataset>,
    criteria: FilterCriteria,
    view: DashboardView,
}

impl DashboardState {
    /// Start with the dataset's full date range and every season.
    pub fn new(dataset: Arc<Dataset>) -> Self {
        let criteria = FilterCriteria::spanning(&dataset);
        let view = DashboardView::compute(&dataset, &criteria);
        Self {
            dataset,
            criteria,
            view,
        }
    }

    /// Start from explicit criteria, both dates within the dataset.
    pub fn with_criteria(
        dataset: Arc<Dataset>,
        criteria: FilterCriteria,
    ) -> Result<Self, CriteriaError> {
        dataset.check_date(criteria.start_date())?;
        dataset.check_date(criteria.end_date())?;
        let view = DashboardView::compute(&dataset, &criteria);
        Ok(Self {
            dataset,
            criteria,
            view,
        })
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn view(&self) -> &DashboardView {
        &self.view
    }

    pub fn season_options() -> Vec<SeasonFilter> {
        SeasonFilter::options()
    }

    pub fn set_start_date(&mut self, start: NaiveDate) -> Result<(), CriteriaError> {
        let c = self.criteria;
        self.set_criteria(FilterCriteria::new(start, c.end_date(), c.season())?)
    }

    pub fn set_end_date(&mut self, end: NaiveDate) -> Result<(), CriteriaError> {
        let c = self.criteria;
        self.set_criteria(FilterCriteria::new(c.start_date(), end, c.season())?)
    }

    pub fn set_season(&mut self, season: SeasonFilter) {
        self.criteria = self.criteria.with_season(season);
        self.recompute();
    }

    /// Replace the criteria after checking both dates lie within the dataset.
    pub fn set_criteria(&mut self, criteria: FilterCriteria) -> Result<(), CriteriaError> {
        self.dataset.check_date(criteria.start_date())?;
        self.dataset.check_date(criteria.end_date())?;
        self.criteria = criteria;
        self.recompute();
        Ok(())
    }

    fn recompute(&mut self) {
        self.view = DashboardView::compute(&self.dataset, &self.criteria);
    }
}
