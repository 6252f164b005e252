//! The on-page chart: one container, at most one live chart, and a request
//! counter so a slow score fetch cannot overwrite a newer selection.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::core::config::ChartConfig;
use crate::core::error::ChartResult;

use super::fonts::TextMeasure;
use super::render::{render, ChartContainer, RenderedChart};
use super::series::Series;

#[derive(Debug, Clone, Default)]
pub struct ChartSlot {
    container: ChartContainer,
    latest: Rc<Cell<u64>>,
    current: Rc<RefCell<Option<RenderedChart>>>,
}

impl PartialEq for ChartSlot {
    fn eq(&self, other: &Self) -> bool {
        self.container == other.container
    }
}

impl ChartSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn container(&self) -> &ChartContainer {
        &self.container
    }

    pub fn current(&self) -> Option<RenderedChart> {
        self.current.borrow().clone()
    }

    /// Starts a new request. Tickets from earlier requests go stale.
    pub fn begin(&self) -> u64 {
        let ticket = self.latest.get().wrapping_add(1);
        self.latest.set(ticket);
        ticket
    }

    pub fn is_latest(&self, ticket: u64) -> bool {
        self.latest.get() == ticket
    }

    /// Destroys the live chart, if any.
    pub fn clear(&self) {
        if let Some(chart) = self.current.borrow_mut().take() {
            chart.destroy();
        }
    }

    /// Replaces the live chart with a new render.
    ///
    /// Returns `Ok(None)` and leaves the slot untouched when `ticket` is no
    /// longer the latest request. On a render error the slot is left empty.
    pub fn show(
        &self,
        ticket: u64,
        series: &[Series],
        person_label: &str,
        config: &ChartConfig,
        measure: &dyn TextMeasure,
    ) -> ChartResult<Option<RenderedChart>> {
        if !self.is_latest(ticket) {
            tracing::debug!(person = %person_label, ticket, "dropping stale chart request");
            return Ok(None);
        }
        self.clear();
        let chart = render(&self.container, series, person_label, config, measure)?;
        *self.current.borrow_mut() = Some(chart.clone());
        Ok(Some(chart))
    }
}
