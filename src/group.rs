//! Hierarchical Grouping Engine.
//!
//! A Lockbox file is a strictly nested hierarchy,
//!
//! ```text
//! Transmission (1) > Service (2) > Lockbox (5 .. 8) > Batch (.. 7) > Detail (6) > overflow (4)
//! ```
//!
//! sent as a flat sequence of lines with only implicit boundaries. The
//! [`GroupBuilder`] rebuilds the hierarchy with a pushdown automaton: an
//! explicit stack of open groups, rooted at an implicit top-level container,
//! and one transition per record code. A `Batch` has no header line of its
//! own; it opens on the first payment and stays open while the batch-number
//! field stays the same.
//!
//! Malformed sequences never fail the pass. A trailer with no matching open
//! container, or an invoice with no open detail, becomes an `Orphan` group
//! under whatever group is currently open, and the stack is left as it was.

use serde::{Serialize, Serializer};
use tracing::debug;

use crate::consumer::{self, RecordConsumer};
use crate::debug_trace::{Action, GroupTrace, Transition};
use crate::decoder::DecodedFile;
use crate::record::DecodedRecord;
use crate::schema::names;

/// What a group represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum GroupKind {
    Transmission,
    Service,
    Lockbox,
    Batch,
    Detail,
    Orphan,
}

impl GroupKind {
    pub fn label(&self) -> &'static str {
        match self {
            GroupKind::Transmission => "Transmission",
            GroupKind::Service => "Service",
            GroupKind::Lockbox => "Lockbox",
            GroupKind::Batch => "Batch",
            GroupKind::Detail => "Detail",
            GroupKind::Orphan => "Orphan",
        }
    }
}

/// One node of the group tree. Read-only once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupNode<'a> {
    kind: GroupKind,
    #[serde(rename = "headerIndex", serialize_with = "serialize_header")]
    header: Option<&'a DecodedRecord>,
    #[serde(rename = "recordIndices", serialize_with = "serialize_indices")]
    records: Vec<&'a DecodedRecord>,
    children: Vec<GroupNode<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    batch_key: Option<String>,
    #[serde(skip_serializing_if = "is_false")]
    trailer: bool,
}

fn serialize_header<S: Serializer>(
    header: &Option<&DecodedRecord>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match header {
        Some(record) => serializer.serialize_some(&record.index),
        None => serializer.serialize_none(),
    }
}

fn serialize_indices<S: Serializer>(
    records: &[&DecodedRecord],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(records.iter().map(|r| r.index))
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl<'a> GroupNode<'a> {
    pub fn kind(&self) -> GroupKind {
        self.kind
    }

    /// The record that opened this group. `None` for batches.
    pub fn header(&self) -> Option<&'a DecodedRecord> {
        self.header
    }

    /// Records that belong directly to this group: the header, then an
    /// attached trailer for containers or the overflow records for a detail.
    pub fn records(&self) -> &[&'a DecodedRecord] {
        &self.records
    }

    pub fn children(&self) -> &[GroupNode<'a>] {
        &self.children
    }

    /// Batch key: the batch number, or `unnumbered-<n>` when the field is
    /// blank. Only batches have one.
    pub fn batch_key(&self) -> Option<&str> {
        self.batch_key.as_deref()
    }

    /// True for the top-level group opened by a transmission trailer.
    pub fn is_trailer(&self) -> bool {
        self.trailer
    }

    /// Unique within a tree: the header's sequence index, or for a batch
    /// `batch-<n>` where `n` is the index of its first payment. Batch keys
    /// repeat across lockboxes, so they are not used here.
    pub fn id(&self) -> String {
        if let Some(header) = self.header {
            return header.index.to_string();
        }
        self.children
            .first()
            .and_then(|detail| detail.header)
            .map(|payment| format!("batch-{}", payment.index))
            .unwrap_or_default()
    }

    /// Human-readable title, e.g. `Lockbox Header` or `Batch #001`.
    pub fn title(&self) -> String {
        match (self.header, &self.batch_key) {
            (Some(header), _) => header.type_name().to_string(),
            (None, Some(key)) => format!("Batch #{key}"),
            (None, None) => self.kind.label().to_string(),
        }
    }

    /// Records in this group plus the records directly held by its children.
    ///
    /// For a batch this is its trailer plus every payment and invoice, not
    /// just the trailer the batch holds directly.
    pub fn record_count(&self) -> usize {
        self.records.len() + self.children.iter().map(|c| c.records.len()).sum::<usize>()
    }

    /// The batch or lockbox trailer (code 7 or 8) that closed this group.
    pub fn trailer(&self) -> Option<&'a DecodedRecord> {
        if self.kind == GroupKind::Orphan {
            return None;
        }
        self.records
            .iter()
            .rev()
            .find(|r| matches!(r.code, '7' | '8'))
            .copied()
    }

    /// Overflow (code 4) records of a detail.
    pub fn overflow(&self) -> impl Iterator<Item = &'a DecodedRecord> + '_ {
        self.records.iter().copied().filter(|r| r.code == '4')
    }

    /// Depth-first, pre-order walk of this node and its descendants.
    pub fn walk(&self) -> Walk<'_, 'a> {
        Walk { stack: vec![self] }
    }
}

/// Pre-order iterator over a group subtree.
pub struct Walk<'t, 'a> {
    stack: Vec<&'t GroupNode<'a>>,
}

impl<'t, 'a> Iterator for Walk<'t, 'a> {
    type Item = &'t GroupNode<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// The top-level groups of a file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GroupTree<'a> {
    roots: Vec<GroupNode<'a>>,
}

impl<'a> GroupTree<'a> {
    pub fn roots(&self) -> &[GroupNode<'a>] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Every node in the tree, depth-first.
    pub fn iter(&self) -> impl Iterator<Item = &GroupNode<'a>> {
        self.roots.iter().flat_map(|root| root.walk())
    }

    /// The deepest group that directly holds the record at `index`.
    pub fn find_by_record(&self, index: usize) -> Option<&GroupNode<'a>> {
        self.iter()
            .filter(|node| node.records.iter().any(|r| r.index == index))
            .last()
    }

    /// Find a group by [`GroupNode::id`].
    pub fn find_by_id(&self, id: &str) -> Option<&GroupNode<'a>> {
        self.iter().find(|node| node.id() == id)
    }
}

// --- Builder -----------------------------------------------------------------

const ROOT: usize = 0;

#[derive(Debug)]
struct Slot<'a> {
    kind: GroupKind,
    header: Option<&'a DecodedRecord>,
    records: Vec<&'a DecodedRecord>,
    children: Vec<usize>,
    batch_number: Option<&'a str>,
    batch_key: Option<String>,
    trailer: bool,
}

impl<'a> Slot<'a> {
    fn new(kind: GroupKind, header: Option<&'a DecodedRecord>) -> Self {
        Self {
            kind,
            header,
            records: header.into_iter().collect(),
            children: Vec::new(),
            batch_number: None,
            batch_key: None,
            trailer: false,
        }
    }
}

/// Stack-based builder of the group tree.
///
/// Groups live in an arena indexed by slot id; the stack holds the ids of
/// the open groups with the root at the bottom. A child's slot id is always
/// greater than its parent's.
#[derive(Debug)]
pub struct GroupBuilder<'a> {
    slots: Vec<Slot<'a>>,
    stack: Vec<usize>,
    unnumbered_batches: usize,
    trace: Option<GroupTrace>,
}

impl Default for GroupBuilder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> GroupBuilder<'a> {
    pub fn new() -> Self {
        Self {
            // Placeholder kind; transitions never match the root as a group.
            slots: vec![Slot::new(GroupKind::Transmission, None)],
            stack: vec![ROOT],
            unnumbered_batches: 0,
            trace: None,
        }
    }

    /// A builder that also records a [`GroupTrace`].
    pub fn traced() -> Self {
        Self {
            trace: Some(GroupTrace::default()),
            ..Self::new()
        }
    }

    /// Open groups on the stack, not counting the root.
    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    /// Apply the transition for one record.
    pub fn push(&mut self, record: &'a DecodedRecord) {
        let action = match record.code {
            '1' => {
                self.truncate(1);
                self.open(GroupKind::Transmission, Some(record));
                Action::Open(GroupKind::Transmission)
            }
            '2' => {
                self.truncate(2);
                self.open(GroupKind::Service, Some(record));
                Action::Open(GroupKind::Service)
            }
            '5' => {
                self.truncate(3);
                self.open(GroupKind::Lockbox, Some(record));
                Action::Open(GroupKind::Lockbox)
            }
            '6' => self.payment(record),
            '4' => self.overflow(record),
            '7' => {
                if self.top_is(GroupKind::Batch) {
                    self.attach_and_close(record);
                    Action::CloseBatch
                } else {
                    self.orphan(record)
                }
            }
            '8' => {
                let closed_batch = self.top_is(GroupKind::Batch);
                if closed_batch {
                    self.stack.pop();
                }
                if self.top_is(GroupKind::Lockbox) {
                    self.attach_and_close(record);
                    Action::CloseLockbox { closed_batch }
                } else {
                    self.orphan(record)
                }
            }
            '9' => {
                self.truncate(1);
                let id = self.add_child(ROOT, Slot::new(GroupKind::Transmission, Some(record)));
                self.slots[id].trailer = true;
                Action::TransmissionTrailer
            }
            _ => self.orphan(record),
        };

        if let Some(trace) = self.trace.as_mut() {
            trace.transitions.push(Transition {
                index: record.index,
                code: record.code,
                action,
                depth: self.stack.len() - 1,
            });
        }
    }

    fn payment(&mut self, record: &'a DecodedRecord) -> Action {
        let batch_number = record.raw_value(names::BATCH_NUMBER);
        let top = self.top();
        let continues = self.slots[top].kind == GroupKind::Batch
            && self.slots[top].batch_number == Some(batch_number);

        let mut opened = None;
        if !continues {
            if self.slots[top].kind == GroupKind::Batch {
                self.stack.pop();
            }
            let key = if batch_number.is_empty() {
                self.unnumbered_batches += 1;
                format!("unnumbered-{}", self.unnumbered_batches)
            } else {
                batch_number.to_string()
            };
            let id = self.open(GroupKind::Batch, None);
            self.slots[id].batch_number = Some(batch_number);
            self.slots[id].batch_key = Some(key.clone());
            opened = Some(key);
        }

        // Details are leaves: they hang off the batch but are never pushed.
        let batch = self.top();
        self.add_child(batch, Slot::new(GroupKind::Detail, Some(record)));
        Action::Detail { batch: opened }
    }

    fn overflow(&mut self, record: &'a DecodedRecord) -> Action {
        let top = self.top();
        let last_detail = if self.slots[top].kind == GroupKind::Batch {
            self.slots[top].children.last().copied()
        } else {
            None
        };

        match last_detail {
            Some(detail) => {
                self.slots[detail].records.push(record);
                Action::Overflow
            }
            None => self.orphan(record),
        }
    }

    fn orphan(&mut self, record: &'a DecodedRecord) -> Action {
        let parent = self.top();
        let parent_label = if parent == ROOT {
            "root"
        } else {
            self.slots[parent].kind.label()
        };
        debug!(
            index = record.index,
            code = %record.code,
            parent = parent_label,
            "record out of sequence, emitting orphan group"
        );
        self.add_child(parent, Slot::new(GroupKind::Orphan, Some(record)));
        Action::Orphan
    }

    fn top(&self) -> usize {
        // The root is never popped.
        self.stack.last().copied().unwrap_or(ROOT)
    }

    fn top_is(&self, kind: GroupKind) -> bool {
        let top = self.top();
        top != ROOT && self.slots[top].kind == kind
    }

    /// Pop until at most `len` entries (root included) remain.
    fn truncate(&mut self, len: usize) {
        self.stack.truncate(len.max(1));
    }

    fn add_child(&mut self, parent: usize, slot: Slot<'a>) -> usize {
        let id = self.slots.len();
        self.slots.push(slot);
        self.slots[parent].children.push(id);
        id
    }

    fn open(&mut self, kind: GroupKind, header: Option<&'a DecodedRecord>) -> usize {
        let id = self.add_child(self.top(), Slot::new(kind, header));
        self.stack.push(id);
        id
    }

    fn attach_and_close(&mut self, record: &'a DecodedRecord) {
        let top = self.top();
        self.slots[top].records.push(record);
        self.stack.pop();
    }

    /// Finish the pass, returning the tree and the trace if one was kept.
    pub fn build(self) -> (GroupTree<'a>, Option<GroupTrace>) {
        // Children always have larger slot ids than their parent, so building
        // from the back sees every child before its parent.
        let mut built: Vec<Option<GroupNode<'a>>> = Vec::with_capacity(self.slots.len());
        built.resize_with(self.slots.len(), || None);
        let mut roots = Vec::new();

        for (id, slot) in self.slots.into_iter().enumerate().rev() {
            let children: Vec<GroupNode<'a>> = slot
                .children
                .iter()
                .filter_map(|child| built[*child].take())
                .collect();

            if id == ROOT {
                roots = children;
            } else {
                built[id] = Some(GroupNode {
                    kind: slot.kind,
                    header: slot.header,
                    records: slot.records,
                    children,
                    batch_key: slot.batch_key,
                    trailer: slot.trailer,
                });
            }
        }

        (GroupTree { roots }, self.trace)
    }
}

impl<'a> RecordConsumer<'a> for GroupBuilder<'a> {
    type Output = (GroupTree<'a>, Option<GroupTrace>);

    fn consume(&mut self, record: &'a DecodedRecord) {
        self.push(record);
    }

    fn finish(self) -> Self::Output {
        self.build()
    }

    fn name(&self) -> &str {
        "GROUP"
    }
}

/// Build the group tree for a decoded sequence.
pub fn build_tree(records: &[DecodedRecord]) -> GroupTree<'_> {
    consumer::run(records, GroupBuilder::new()).0
}

/// Build the group tree and a per-record transition trace.
pub fn build_tree_traced(records: &[DecodedRecord]) -> (GroupTree<'_>, GroupTrace) {
    let (tree, trace) = consumer::run(records, GroupBuilder::traced());
    (tree, trace.unwrap_or_default())
}

impl DecodedFile {
    /// Group this file's records into a tree.
    pub fn group_tree(&self) -> GroupTree<'_> {
        build_tree(&self.records)
    }
}
