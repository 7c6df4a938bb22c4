//! Rubber-band selection over the canvas background.

use super::Interactor;
use crate::canvas::Canvas;
use crate::error::ManipulationResult;
use crate::event::{LayerEvent, MouseFilter};
use crate::figure::FigureId;
use crate::selection::SelectionModel;
use kurbo::{Point, Rect};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragMode {
    Select,
    Toggle,
}

/// Sweeps out a rubber-band rectangle and keeps the attached selection
/// models in step with what it covers.
///
/// Each drag step re-queries the canvas for a coarse candidate set, then
/// splits it into figures precisely overlapping the band (fresh) and
/// near-miss candidates. There is no cached holdover set carried between
/// steps: the coarse query runs at band-resize granularity anyway, so
/// near-miss figures are re-captured by the next query and the cache
/// would only duplicate it. Only the difference against the previous
/// step's fresh set is pushed into the models, so every step costs one
/// spatial query plus exact hit-tests on the candidates, and each model
/// sees one batched change per step.
pub struct SelectionDragger {
    select_filter: MouseFilter,
    toggle_filter: MouseFilter,
    models: Vec<Rc<RefCell<SelectionModel>>>,
    origin: Option<Point>,
    rubber_band: Option<Rect>,
    /// Fresh set from the previous drag step.
    fresh: Vec<FigureId>,
}

impl SelectionDragger {
    pub fn new() -> Self {
        Self {
            select_filter: MouseFilter::selection(),
            toggle_filter: MouseFilter::toggle(),
            models: Vec::new(),
            origin: None,
            rubber_band: None,
            fresh: Vec::new(),
        }
    }

    pub fn set_select_filter(&mut self, filter: MouseFilter) {
        self.select_filter = filter;
    }

    pub fn set_toggle_filter(&mut self, filter: MouseFilter) {
        self.toggle_filter = filter;
    }

    /// Attach a selection model the dragger will keep updated.
    pub fn add_model(&mut self, model: Rc<RefCell<SelectionModel>>) {
        self.models.push(model);
    }

    /// The current rubber-band rectangle, for rendering.
    pub fn rubber_band(&self) -> Option<Rect> {
        self.rubber_band
    }

    fn mode_for(&self, event: &LayerEvent) -> Option<DragMode> {
        if self.select_filter.accept(event) {
            Some(DragMode::Select)
        } else if self.toggle_filter.accept(event) {
            Some(DragMode::Toggle)
        } else {
            None
        }
    }

    /// Figures from the coarse candidate set that precisely overlap the
    /// band. The remainder are near misses; the next step's query picks
    /// them up again if the band moves their way.
    fn fresh_in(&self, canvas: &Canvas, band: Rect) -> Vec<FigureId> {
        canvas
            .figures_intersecting(band)
            .into_iter()
            .filter(|&id| {
                canvas
                    .figure(id)
                    .is_some_and(|figure| figure.intersects_rect(band))
            })
            .collect()
    }
}

impl Default for SelectionDragger {
    fn default() -> Self {
        Self::new()
    }
}

impl Interactor for SelectionDragger {
    fn accept(&self, event: &LayerEvent) -> bool {
        self.mode_for(event).is_some()
    }

    fn mouse_pressed(
        &mut self,
        event: &mut LayerEvent,
        canvas: &mut Canvas,
    ) -> ManipulationResult<()> {
        let Some(mode) = self.mode_for(event) else {
            return Ok(());
        };
        if mode == DragMode::Select {
            for model in &self.models {
                model.borrow_mut().clear_selection(canvas);
            }
        }
        let band = Rect::from_points(event.point, event.point);
        self.origin = Some(event.point);
        self.rubber_band = Some(band);
        self.fresh = self.fresh_in(canvas, band);
        event.consume();
        Ok(())
    }

    fn mouse_dragged(
        &mut self,
        event: &mut LayerEvent,
        canvas: &mut Canvas,
    ) -> ManipulationResult<()> {
        let Some(origin) = self.origin else {
            return Ok(());
        };
        let Some(mode) = self.mode_for(event) else {
            return Ok(());
        };
        // from_points swaps coordinates for drags up or left of the origin
        let band = Rect::from_points(origin, event.point);
        self.rubber_band = Some(band);

        let fresh = self.fresh_in(canvas, band);
        let stale: Vec<FigureId> = self
            .fresh
            .iter()
            .copied()
            .filter(|id| !fresh.contains(id))
            .collect();
        let newly: Vec<FigureId> = fresh
            .iter()
            .copied()
            .filter(|id| !self.fresh.contains(id))
            .collect();

        match mode {
            DragMode::Select => {
                for model in &self.models {
                    model.borrow_mut().update_selection(canvas, &newly, &stale);
                }
            }
            DragMode::Toggle => {
                for model in &self.models {
                    let mut model = model.borrow_mut();
                    for &id in newly.iter().chain(&stale) {
                        model.toggle_selection(canvas, id);
                    }
                }
            }
        }

        self.fresh = fresh;
        event.consume();
        Ok(())
    }

    fn mouse_released(
        &mut self,
        event: &mut LayerEvent,
        _canvas: &mut Canvas,
    ) -> ManipulationResult<()> {
        if self.origin.take().is_some() {
            self.rubber_band = None;
            self.fresh.clear();
            event.consume();
        }
        Ok(())
    }
}
