//! In-memory element tree standing in for the rendered table
//!
//! The grid never owns the table it lays out. This module models the external
//! representation the rest of the crate talks to:
//! - an element arena (tables, row groups, rows, cells) with stable handles
//! - string attributes, custom style properties and computed style per element
//! - change subscriptions: structural changes under a root, and computed
//!   style changes on a set of size targets
//!
//! Detached elements stay in the arena; their handles remain valid but they no
//! longer produce notifications. Subscriptions whose channel has been closed
//! are dropped on the next change.

use std::fmt;

use fxhash::FxHashSet;
use indexmap::IndexMap;

use crate::core::observer::channel::{Channel, Notification};
use crate::data::constants::{ATTR_COLSPAN, ATTR_ROWSPAN, STRUCTURAL_ATTRIBUTES};
use crate::utils::error::{GridError, GridResult};

/// Stable handle of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

impl ElementId {
    pub fn from_raw(raw: usize) -> Self {
        ElementId(raw)
    }

    pub fn raw(self) -> usize {
        self.0
    }

    fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Kind of element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Table,
    /// Row group (`thead`, `tbody`, `tfoot`)
    Section,
    Row,
    Cell,
}

#[derive(Debug, Clone)]
struct Element {
    kind: ElementKind,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    attributes: IndexMap<String, String>,
    style: IndexMap<String, String>,
    computed: IndexMap<String, String>,
    row_index: Option<usize>,
}

impl Element {
    fn new(kind: ElementKind, parent: Option<ElementId>) -> Self {
        Element {
            kind,
            parent,
            children: Vec::new(),
            attributes: IndexMap::new(),
            style: IndexMap::new(),
            computed: IndexMap::new(),
            row_index: None,
        }
    }
}

/// Handle of a change subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Debug)]
enum Watch {
    Structure { root: ElementId },
    Size { targets: FxHashSet<ElementId> },
}

#[derive(Debug)]
struct Subscription {
    id: SubscriptionId,
    watch: Watch,
    channel: Channel<Notification>,
}

/// Element arena with change subscriptions
#[derive(Debug, Default)]
pub struct Document {
    elements: Vec<Element>,
    subscriptions: Vec<Subscription>,
    next_subscription: u64,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    fn element(&self, id: ElementId) -> GridResult<&Element> {
        self.elements
            .get(id.index())
            .ok_or(GridError::UnknownElement(id))
    }

    fn element_mut(&mut self, id: ElementId) -> GridResult<&mut Element> {
        self.elements
            .get_mut(id.index())
            .ok_or(GridError::UnknownElement(id))
    }

    fn alloc(&mut self, kind: ElementKind, parent: Option<ElementId>) -> ElementId {
        let id = ElementId(self.elements.len());
        self.elements.push(Element::new(kind, parent));
        id
    }

    /// Create a detached table element
    pub fn create_table(&mut self) -> ElementId {
        self.alloc(ElementKind::Table, None)
    }

    fn append(&mut self, parent: ElementId, kind: ElementKind) -> GridResult<ElementId> {
        self.element(parent)?;
        let id = self.alloc(kind, Some(parent));
        self.element_mut(parent)?.children.push(id);
        self.notify_structure(parent);
        Ok(id)
    }

    /// Append a row group to a table
    pub fn append_section(&mut self, table: ElementId) -> GridResult<ElementId> {
        self.append(table, ElementKind::Section)
    }

    /// Append a row to a table or row group
    pub fn append_row(&mut self, parent: ElementId) -> GridResult<ElementId> {
        self.append(parent, ElementKind::Row)
    }

    /// Append a cell to a row
    pub fn append_cell(&mut self, row: ElementId) -> GridResult<ElementId> {
        self.append(row, ElementKind::Cell)
    }

    /// Append a cell with span attributes already set
    pub fn append_cell_with_span(
        &mut self,
        row: ElementId,
        colspan: &str,
        rowspan: &str,
    ) -> GridResult<ElementId> {
        let cell = self.append_cell(row)?;
        let element = self.element_mut(cell)?;
        element.attributes.insert(ATTR_COLSPAN.into(), colspan.into());
        element.attributes.insert(ATTR_ROWSPAN.into(), rowspan.into());
        Ok(cell)
    }

    /// Detach an element (and its subtree) from its parent
    pub fn remove(&mut self, id: ElementId) -> GridResult<()> {
        let Some(parent) = self.element(id)?.parent else {
            return Ok(());
        };
        // Notify while the element is still attached
        self.notify_structure(parent);
        self.element_mut(parent)?.children.retain(|child| *child != id);
        self.element_mut(id)?.parent = None;
        Ok(())
    }

    pub fn kind(&self, id: ElementId) -> GridResult<ElementKind> {
        Ok(self.element(id)?.kind)
    }

    pub fn parent(&self, id: ElementId) -> GridResult<Option<ElementId>> {
        Ok(self.element(id)?.parent)
    }

    pub fn children(&self, id: ElementId) -> GridResult<&[ElementId]> {
        Ok(&self.element(id)?.children)
    }

    pub fn attribute(&self, id: ElementId, name: &str) -> Option<&str> {
        self.elements
            .get(id.index())?
            .attributes
            .get(name)
            .map(String::as_str)
    }

    pub fn set_attribute(&mut self, id: ElementId, name: &str, value: &str) -> GridResult<()> {
        let element = self.element_mut(id)?;
        let changed = element.attributes.get(name).map(String::as_str) != Some(value);
        element.attributes.insert(name.to_string(), value.to_string());
        if changed && STRUCTURAL_ATTRIBUTES.contains(&name) {
            self.notify_structure(id);
        }
        Ok(())
    }

    pub fn remove_attribute(&mut self, id: ElementId, name: &str) -> GridResult<()> {
        let removed = self.element_mut(id)?.attributes.shift_remove(name).is_some();
        if removed && STRUCTURAL_ATTRIBUTES.contains(&name) {
            self.notify_structure(id);
        }
        Ok(())
    }

    /// Custom style property, e.g. `--grid-row`
    pub fn style_property(&self, id: ElementId, name: &str) -> Option<&str> {
        self.elements
            .get(id.index())?
            .style
            .get(name)
            .map(String::as_str)
    }

    pub fn set_style_property(&mut self, id: ElementId, name: &str, value: &str) -> GridResult<()> {
        self.element_mut(id)?
            .style
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    /// Computed style as resolved by the rendering surface
    pub fn computed_style(&self, id: ElementId, name: &str) -> Option<&str> {
        self.elements
            .get(id.index())?
            .computed
            .get(name)
            .map(String::as_str)
    }

    /// Record a computed style value; notifies size subscribers watching `id`
    pub fn set_computed_style(&mut self, id: ElementId, name: &str, value: &str) -> GridResult<()> {
        let element = self.element_mut(id)?;
        let changed = element.computed.get(name).map(String::as_str) != Some(value);
        element.computed.insert(name.to_string(), value.to_string());
        if changed {
            self.notify_size(id);
        }
        Ok(())
    }

    /// Row index property written by the annotator
    pub fn row_index(&self, id: ElementId) -> Option<usize> {
        self.elements.get(id.index())?.row_index
    }

    pub fn set_row_index(&mut self, id: ElementId, index: usize) -> GridResult<()> {
        self.element_mut(id)?.row_index = Some(index);
        Ok(())
    }

    /// Whether `id` is `root` or one of its attached descendants
    pub fn is_within(&self, id: ElementId, root: ElementId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == root {
                return true;
            }
            current = self.elements.get(node.index()).and_then(|e| e.parent);
        }
        false
    }

    fn next_subscription_id(&mut self) -> SubscriptionId {
        self.next_subscription += 1;
        SubscriptionId(self.next_subscription)
    }

    /// Watch child-list and span attribute changes under `root`
    pub fn subscribe_structure(
        &mut self,
        root: ElementId,
        channel: Channel<Notification>,
    ) -> GridResult<SubscriptionId> {
        self.element(root)?;
        let id = self.next_subscription_id();
        self.subscriptions.push(Subscription {
            id,
            watch: Watch::Structure { root },
            channel,
        });
        Ok(id)
    }

    /// Watch computed style changes on `targets`
    pub fn subscribe_size(
        &mut self,
        targets: &[ElementId],
        channel: Channel<Notification>,
    ) -> GridResult<SubscriptionId> {
        for target in targets {
            self.element(*target)?;
        }
        let id = self.next_subscription_id();
        self.subscriptions.push(Subscription {
            id,
            watch: Watch::Size {
                targets: targets.iter().copied().collect(),
            },
            channel,
        });
        Ok(id)
    }

    /// Replace the targets of a size subscription
    pub fn set_size_targets(
        &mut self,
        subscription: SubscriptionId,
        targets: &[ElementId],
    ) -> GridResult<()> {
        for target in targets {
            self.element(*target)?;
        }
        if let Some(Subscription {
            watch: Watch::Size { targets: watched },
            ..
        }) = self.subscriptions.iter_mut().find(|s| s.id == subscription)
        {
            *watched = targets.iter().copied().collect();
        }
        Ok(())
    }

    /// Elements a size subscription currently watches, sorted
    pub fn size_targets(&self, subscription: SubscriptionId) -> Vec<ElementId> {
        let mut targets: Vec<ElementId> = self
            .subscriptions
            .iter()
            .find(|s| s.id == subscription)
            .map(|s| match &s.watch {
                Watch::Size { targets } => targets.iter().copied().collect(),
                Watch::Structure { .. } => Vec::new(),
            })
            .unwrap_or_default();
        targets.sort();
        targets
    }

    pub fn unsubscribe(&mut self, subscription: SubscriptionId) {
        self.subscriptions.retain(|s| s.id != subscription);
    }

    /// Live subscriptions, ignoring those whose channel is closed
    pub fn subscription_count(&self) -> usize {
        self.subscriptions
            .iter()
            .filter(|s| !s.channel.is_closed())
            .count()
    }

    fn prune_closed(&mut self) {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| !s.channel.is_closed());
        let pruned = before - self.subscriptions.len();
        if pruned > 0 {
            log::debug!("dropped {} subscriptions with closed channels", pruned);
        }
    }

    fn notify_structure(&mut self, target: ElementId) {
        self.prune_closed();
        for sub in &self.subscriptions {
            if let Watch::Structure { root } = sub.watch {
                if self.is_within(target, root) {
                    sub.channel.push(Notification::Structure { target });
                }
            }
        }
    }

    fn notify_size(&mut self, target: ElementId) {
        self.prune_closed();
        for sub in &self.subscriptions {
            if let Watch::Size { targets } = &sub.watch {
                if targets.contains(&target) {
                    sub.channel.push(Notification::Resize { target });
                }
            }
        }
    }
}
