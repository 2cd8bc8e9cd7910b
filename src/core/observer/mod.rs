//! Change observer
//!
//! Keeps a grid in step with a live table. The observer owns:
//! - a structural subscription on the table (rows/cells added or removed,
//!   `colspan`/`rowspan` changed), answered with rebuild + annotate +
//!   `on_grid` + geometry + `on_geometry`
//! - a size subscription on the table and two representative cells, answered
//!   with geometry + `on_geometry` only
//! - an optional band stream; a band update rebuilds on the following turn
//!
//! Everything runs on one thread. Notifications queue up in delivery order and
//! are handled by [`ChangeObserver::pump`], one call per event-loop turn.

pub mod channel;
pub mod geometry;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::core::annotate::annotate;
use crate::core::grid::{build_grid, Band, Grid};
use crate::core::reader::read_table;
use crate::features::document::{Document, ElementId, ElementKind, SubscriptionId};
use crate::utils::error::{GridError, GridResult};

pub use channel::{Channel, Notification};
pub use geometry::{read_geometry, representative_targets, Geometry};

/// Which elements the size subscription watches after a rebuild
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResizeScope {
    /// The table plus one cell of the first row and one of the first column
    #[default]
    Representative,
    /// The table alone
    ContainerOnly,
}

/// Observer options
#[derive(Debug, Clone)]
pub struct ObserverOptions {
    /// Write placements back onto the cells after each rebuild
    pub annotate: bool,
    /// Rebuild after a band update on the next turn instead of immediately,
    /// so the renderer can apply the new column template first
    pub defer_band_updates: bool,
    /// Elements watched for size changes
    pub resize_scope: ResizeScope,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            annotate: true,
            defer_band_updates: true,
            resize_scope: ResizeScope::Representative,
        }
    }
}

impl ObserverOptions {
    /// Rebuild on band updates in the same turn
    pub fn eager() -> Self {
        Self {
            defer_band_updates: false,
            ..Default::default()
        }
    }

    /// No annotation and container-only size tracking, for callers that only
    /// want the grid
    pub fn headless() -> Self {
        Self {
            annotate: false,
            resize_scope: ResizeScope::ContainerOnly,
            ..Default::default()
        }
    }
}

#[derive(Debug, Default)]
struct BandStreamState {
    current: Option<Vec<Band>>,
    sinks: Vec<Channel<Notification>>,
}

/// Reactive band source: holds the latest band list and forwards updates to
/// every connected observer
#[derive(Debug, Clone, Default)]
pub struct BandStream {
    inner: Rc<RefCell<BandStreamState>>,
}

impl BandStream {
    pub fn new(bands: Vec<Band>) -> Self {
        BandStream {
            inner: Rc::new(RefCell::new(BandStreamState {
                current: Some(bands),
                sinks: Vec::new(),
            })),
        }
    }

    /// Latest published band list
    pub fn current(&self) -> Option<Vec<Band>> {
        self.inner.borrow().current.clone()
    }

    /// Publish a new band list
    pub fn publish(&self, bands: Vec<Band>) {
        let mut state = self.inner.borrow_mut();
        state.current = Some(bands.clone());
        state.sinks.retain(|sink| !sink.is_closed());
        for sink in &state.sinks {
            sink.push(Notification::Bands(bands.clone()));
        }
    }

    pub fn is_connected(&self) -> bool {
        self.consumer_count() > 0
    }

    /// Observers currently receiving updates
    pub fn consumer_count(&self) -> usize {
        self.inner
            .borrow()
            .sinks
            .iter()
            .filter(|sink| !sink.is_closed())
            .count()
    }

    fn connect(&self, sink: Channel<Notification>) {
        let mut state = self.inner.borrow_mut();
        if !state.sinks.iter().any(|s| s.same_channel(&sink)) {
            state.sinks.push(sink);
        }
    }

    fn disconnect(&self, sink: &Channel<Notification>) {
        self.inner
            .borrow_mut()
            .sinks
            .retain(|s| !s.same_channel(sink));
    }
}

/// Lifecycle of an observer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserverState {
    Uninitialized,
    Active,
    TornDown,
}

pub type GridCallback = Box<dyn FnMut(&Grid<ElementId>)>;
pub type GeometryCallback = Box<dyn FnMut(&Geometry)>;

/// Keeps a grid synchronized with a table; dropping it tears it down
pub struct ChangeObserver {
    document: Rc<RefCell<Document>>,
    table: ElementId,
    options: ObserverOptions,
    state: ObserverState,
    bands: Vec<Band>,
    band_stream: Option<BandStream>,
    inbox: Channel<Notification>,
    structure: Option<SubscriptionId>,
    size: Option<SubscriptionId>,
    /// A band update is waiting for the next turn
    rebuild_pending: bool,
    grid: Grid<ElementId>,
    on_grid: GridCallback,
    on_geometry: GeometryCallback,
}

impl fmt::Debug for ChangeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeObserver")
            .field("table", &self.table)
            .field("state", &self.state)
            .field("pending", &self.inbox.len())
            .field("rebuild_pending", &self.rebuild_pending)
            .finish_non_exhaustive()
    }
}

impl ChangeObserver {
    /// Start observing `table`
    ///
    /// Builds the initial grid, invokes both callbacks once and subscribes to
    /// structural, size and band changes.
    pub fn observe(
        document: Rc<RefCell<Document>>,
        table: ElementId,
        bands: Option<BandStream>,
        on_grid: impl FnMut(&Grid<ElementId>) + 'static,
        on_geometry: impl FnMut(&Geometry) + 'static,
        options: ObserverOptions,
    ) -> GridResult<Self> {
        if document.borrow().kind(table)? != ElementKind::Table {
            return Err(GridError::NotATable(table));
        }

        let mut observer = ChangeObserver {
            document,
            table,
            options,
            state: ObserverState::Uninitialized,
            bands: bands
                .as_ref()
                .and_then(BandStream::current)
                .unwrap_or_default(),
            band_stream: bands,
            inbox: Channel::new(),
            structure: None,
            size: None,
            rebuild_pending: false,
            grid: Grid::default(),
            on_grid: Box::new(on_grid),
            on_geometry: Box::new(on_geometry),
        };
        observer.activate()?;
        Ok(observer)
    }

    fn activate(&mut self) -> GridResult<()> {
        self.rebuild()?;

        {
            let mut doc = self.document.borrow_mut();
            self.structure = Some(doc.subscribe_structure(self.table, self.inbox.clone())?);
        }
        if let Some(stream) = &self.band_stream {
            stream.connect(self.inbox.clone());
        }

        self.state = ObserverState::Active;
        log::debug!("observer on table {} active", self.table);
        Ok(())
    }

    pub fn state(&self) -> ObserverState {
        self.state
    }

    pub fn table(&self) -> ElementId {
        self.table
    }

    /// The most recently built grid
    pub fn grid(&self) -> &Grid<ElementId> {
        &self.grid
    }

    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    /// Size subscription handle, present while active
    pub fn size_subscription(&self) -> Option<SubscriptionId> {
        self.size
    }

    /// Notifications waiting for the next turn
    pub fn pending(&self) -> usize {
        self.inbox.len() + usize::from(self.rebuild_pending)
    }

    /// Run one turn: a rebuild deferred from the previous turn first, then
    /// every queued notification in delivery order
    ///
    /// Returns the number of notifications handled.
    pub fn pump(&mut self) -> usize {
        if self.state != ObserverState::Active {
            return 0;
        }

        let mut handled = 0;
        if std::mem::take(&mut self.rebuild_pending) {
            self.handle_structure();
            handled += 1;
        }

        while let Some(notification) = self.inbox.pop() {
            match notification {
                Notification::Structure { target } => {
                    log::trace!("structure changed at {}", target);
                    self.handle_structure();
                }
                Notification::Resize { target } => {
                    log::trace!("size changed at {}", target);
                    self.remeasure();
                }
                Notification::Bands(bands) => {
                    self.bands = bands;
                    if self.options.defer_band_updates {
                        self.rebuild_pending = true;
                    } else {
                        self.handle_structure();
                    }
                }
            }
            handled += 1;
        }
        handled
    }

    /// Force a rebuild, as if a structural change had been delivered
    pub fn refresh(&mut self) {
        if self.state == ObserverState::Active {
            self.handle_structure();
        }
    }

    fn handle_structure(&mut self) {
        if let Err(err) = self.rebuild() {
            log::warn!("rebuild of table {} failed: {}", self.table, err);
        }
    }

    /// Read, build, annotate, report grid, reset size scope, report geometry
    fn rebuild(&mut self) -> GridResult<()> {
        let source = read_table(&self.document.borrow(), self.table)?;
        let grid = build_grid(&source, &self.bands);

        if self.options.annotate {
            annotate(&grid, &mut *self.document.borrow_mut());
        }
        self.grid = grid;
        (self.on_grid)(&self.grid);

        self.reset_size_scope()?;
        self.remeasure();
        Ok(())
    }

    fn reset_size_scope(&mut self) -> GridResult<()> {
        let targets = match self.options.resize_scope {
            ResizeScope::Representative => representative_targets(&self.grid, self.table),
            ResizeScope::ContainerOnly => vec![self.table],
        };

        let mut doc = self.document.borrow_mut();
        match self.size {
            Some(subscription) => doc.set_size_targets(subscription, &targets)?,
            None => self.size = Some(doc.subscribe_size(&targets, self.inbox.clone())?),
        }
        log::trace!("watching {} elements for size changes", targets.len());
        Ok(())
    }

    fn remeasure(&mut self) {
        let geometry = match read_geometry(&self.document.borrow(), self.table) {
            Ok(geometry) => geometry,
            Err(err) => {
                log::warn!("could not read geometry of table {}: {}", self.table, err);
                Geometry::default()
            }
        };
        (self.on_geometry)(&geometry);
    }

    /// Unsubscribe from every channel; later notifications are ignored
    pub fn teardown(&mut self) {
        if self.state == ObserverState::TornDown {
            return;
        }

        self.inbox.close();
        if let Some(stream) = self.band_stream.take() {
            stream.disconnect(&self.inbox);
        }
        match self.document.try_borrow_mut() {
            Ok(mut doc) => {
                for subscription in [self.structure.take(), self.size.take()].into_iter().flatten() {
                    doc.unsubscribe(subscription);
                }
            }
            // The document drops subscriptions on the closed inbox on its next change
            Err(_) => log::debug!("document busy during teardown of table {}", self.table),
        }
        self.rebuild_pending = false;
        self.state = ObserverState::TornDown;
        log::debug!("observer on table {} torn down", self.table);
    }
}

impl Drop for ChangeObserver {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_presets() {
        let opts = ObserverOptions::default();
        assert!(opts.annotate);
        assert!(opts.defer_band_updates);
        assert_eq!(opts.resize_scope, ResizeScope::Representative);

        assert!(!ObserverOptions::eager().defer_band_updates);

        let headless = ObserverOptions::headless();
        assert!(!headless.annotate);
        assert_eq!(headless.resize_scope, ResizeScope::ContainerOnly);
    }

    #[test]
    fn test_band_stream_forwards_only_when_connected() {
        let stream = BandStream::new(vec![Band::new(1)]);
        stream.publish(vec![Band::new(2)]);
        assert_eq!(stream.current(), Some(vec![Band::new(2)]));
        assert!(!stream.is_connected());

        let inbox = Channel::new();
        stream.connect(inbox.clone());
        stream.publish(vec![Band::new(3)]);
        assert_eq!(inbox.pop(), Some(Notification::Bands(vec![Band::new(3)])));

        stream.disconnect(&inbox);
        stream.publish(vec![Band::new(4)]);
        assert!(inbox.is_empty());
    }

    #[test]
    fn test_band_stream_fans_out() {
        let stream = BandStream::new(Vec::new());
        let first = Channel::new();
        let second = Channel::new();
        stream.connect(first.clone());
        stream.connect(second.clone());
        stream.connect(second.clone());
        assert_eq!(stream.consumer_count(), 2);

        stream.publish(vec![Band::new(2)]);
        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);

        // Closed sinks are dropped on the next publish
        first.close();
        stream.publish(vec![Band::new(3)]);
        assert_eq!(stream.consumer_count(), 1);
        assert_eq!(second.len(), 2);

        stream.disconnect(&second);
        assert!(!stream.is_connected());
    }

    #[test]
    fn test_observe_rejects_non_table() {
        let doc = Rc::new(RefCell::new(Document::new()));
        let row = {
            let mut d = doc.borrow_mut();
            let table = d.create_table();
            d.append_row(table).unwrap()
        };
        let err = ChangeObserver::observe(doc, row, None, |_| {}, |_| {}, Default::default())
            .unwrap_err();
        assert_eq!(err, GridError::NotATable(row));
    }
}
