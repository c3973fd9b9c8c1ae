//! Home page infinite-scroll grid.
//!
//! The grid is two identical sections stacked vertically. CSS scrolls the
//! pair upward by exactly half its height and loops, so the second section
//! takes the place of the first without a visible seam. One section has to
//! be taller than the viewport for that to work.
//!
//! [`GridLayout::compute`] fixes the column and row counts from the design
//! viewport. The stylesheet then keeps those columns at any width and sizes
//! each row as the larger of a square cell and `fill_factor × 100vh / rows`,
//! so a section is at least `fill_factor` viewports tall on every screen and
//! the browser recomputes it on resize. [`GridLayout::section_height`] is the
//! same arithmetic in pixels.

use crate::config::GridConfig;
use crate::types::MediaItem;
use rand::Rng;
use rand::seq::SliceRandom;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub columns: usize,
    pub rows: usize,
    /// Cells in one of the two sections.
    pub per_section: usize,
}

impl GridLayout {
    /// Size one section for the configured design viewport.
    ///
    /// Never fewer than one column, and never fewer than two passes over the
    /// media so small portfolios still fill the loop.
    pub fn compute(config: &GridConfig, item_count: usize) -> Self {
        let pitch = f64::from(config.item_width + config.gap);
        let [width, height] = config.viewport;
        let columns = ((f64::from(width) / pitch).floor() as usize).max(1);
        let rows = (f64::from(height) * config.fill_factor / pitch).ceil() as usize;
        let per_section = (columns * rows).max(item_count * 2);
        Self {
            columns,
            rows,
            per_section,
        }
    }
}

impl GridLayout {
    /// Rendered height of one section in a `viewport` of `[width, height]` px.
    pub fn section_height(&self, config: &GridConfig, viewport: [f64; 2]) -> f64 {
        let [width, height] = viewport;
        let gap = f64::from(config.gap);
        let columns = self.columns.max(1) as f64;
        let square = (width - (columns - 1.0) * gap) / columns;
        let min_row = height * config.fill_factor / self.rows.max(1) as f64;
        let rendered_rows = self.per_section.div_ceil(self.columns.max(1)) as f64;
        rendered_rows * (square.max(min_row) + gap)
    }
}

/// Cell contents of one section; the rendered page repeats it verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct InfiniteGrid {
    pub layout: GridLayout,
    pub section: Vec<MediaItem>,
}

impl InfiniteGrid {
    pub fn is_empty(&self) -> bool {
        self.section.is_empty()
    }
}

/// Shuffle the renderable items and fill a section cyclically from them.
pub fn build<R: Rng + ?Sized>(items: &[MediaItem], config: &GridConfig, rng: &mut R) -> InfiniteGrid {
    let mut pool: Vec<&MediaItem> = items.iter().filter(|i| i.source().is_some()).collect();
    pool.shuffle(rng);

    let layout = GridLayout::compute(config, pool.len());
    let section = if pool.is_empty() {
        Vec::new()
    } else {
        pool.iter()
            .cycle()
            .take(layout.per_section)
            .map(|item| (*item).clone())
            .collect()
    };
    InfiniteGrid { layout, section }
}
