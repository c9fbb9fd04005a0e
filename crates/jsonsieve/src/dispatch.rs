//! Path-indexed callback dispatch over parser events.
//!
//! [`PathDispatcher`] implements [`EventConsumer`] on top of a trie of
//! registered [`ValuePath`]s. While the engine is inside a subtree that
//! cannot match any registered path, the dispatcher descends *virtually*:
//! it counts structural opens and closes on a small marker stack instead
//! of allocating trie nodes or path text for values nobody asked about.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use crate::error::DecodeError;
use crate::event::{EventConsumer, ValueKind};
use crate::path::{PathSegment, ValuePath};

/// Callback invoked once per value matching a registered path.
///
/// Arguments are the value's kind, the human-readable path at which it
/// matched (`"."` for the root), and its raw byte span (quotes excluded
/// for strings). Spans must not be retained past the invocation.
pub type ValueCallback<'cb> =
    Box<dyn FnMut(ValueKind, &str, &[u8]) -> Result<(), DecodeError> + 'cb>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeKind {
    Object,
    Array,
    Key,
}

/// Marker for one structural level entered below the deepest trie match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Overflow {
    Object,
    Array,
    Key,
}

struct Node<'cb> {
    kind: NodeKind,
    /// Key text; empty for array, object, and root nodes.
    key: String,
    parent: Option<usize>,
    children: Vec<usize>,
    callbacks: Vec<ValueCallback<'cb>>,
}

const ROOT: usize = 0;

/// Dispatches engine events to callbacks registered against value paths.
///
/// Build one, [`register`](Self::register) interest, then hand it to a
/// [`JsonParser`](crate::JsonParser) as its consumer. Registrations
/// sharing a path prefix share trie structure, so one value can fan out
/// to several callbacks. A path matches a location, not an occurrence:
/// when an object repeats a key, each occurrence is reported.
///
/// # Examples
///
/// ```rust
/// use core::cell::RefCell;
/// use jsonsieve::{JsonParser, PathDispatcher};
///
/// let hits = RefCell::new(Vec::new());
/// let mut dispatcher = PathDispatcher::new();
/// dispatcher.register(&".abc[]".parse().unwrap(), |_kind, path, raw| {
///     hits.borrow_mut().push((path.to_string(), raw.to_vec()));
///     Ok(())
/// });
/// let mut parser = JsonParser::new(dispatcher);
/// parser.parse(br#"{"abc": [1, 2]}"#).unwrap();
/// assert_eq!(hits.borrow().len(), 2);
/// ```
pub struct PathDispatcher<'cb> {
    nodes: Vec<Node<'cb>>,
    pos: usize,
    overflow: Vec<Overflow>,
    path: String,
}

impl Default for PathDispatcher<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'cb> PathDispatcher<'cb> {
    #[must_use]
    pub fn new() -> Self {
        let root = Node {
            kind: NodeKind::Key,
            key: String::new(),
            parent: None,
            children: Vec::new(),
            callbacks: Vec::new(),
        };
        Self {
            nodes: alloc::vec![root],
            pos: ROOT,
            overflow: Vec::new(),
            path: String::new(),
        }
    }

    /// Registers `callback` to run for every value matching `path`.
    ///
    /// Registration is append-only: trie nodes are created lazily on first
    /// use and never removed.
    pub fn register<F>(&mut self, path: &ValuePath, callback: F)
    where
        F: FnMut(ValueKind, &str, &[u8]) -> Result<(), DecodeError> + 'cb,
    {
        let mut pos = ROOT;
        for segment in path.segments() {
            match segment {
                PathSegment::Member(key) => {
                    pos = self.child_or_insert(pos, NodeKind::Object, "");
                    pos = self.child_or_insert(pos, NodeKind::Key, key);
                }
                PathSegment::Array => {
                    pos = self.child_or_insert(pos, NodeKind::Array, "");
                }
            }
        }
        self.nodes[pos].callbacks.push(Box::new(callback));
    }

    fn child_or_insert(&mut self, parent: usize, kind: NodeKind, key: &str) -> usize {
        if let Some(child) = self.find_child(parent, kind, key.as_bytes()) {
            return child;
        }
        let child = self.nodes.len();
        self.nodes.push(Node {
            kind,
            key: key.into(),
            parent: Some(parent),
            children: Vec::new(),
            callbacks: Vec::new(),
        });
        self.nodes[parent].children.push(child);
        child
    }

    fn find_child(&self, parent: usize, kind: NodeKind, key: &[u8]) -> Option<usize> {
        self.nodes[parent].children.iter().copied().find(|&child| {
            let node = &self.nodes[child];
            node.kind == kind && (kind != NodeKind::Key || node.key.as_bytes() == key)
        })
    }

    fn exec_callbacks(&mut self, kind: ValueKind, raw: &[u8]) -> Result<(), DecodeError> {
        let Self {
            nodes, pos, path, ..
        } = self;
        // Prefer the "." representation for the root over "".
        let path = if path.is_empty() { "." } else { path.as_str() };
        for callback in &mut nodes[*pos].callbacks {
            callback(kind, path, raw)?;
        }
        Ok(())
    }

    /// Steps back up past a key node so the cursor sits at the enclosing
    /// object again, once the key's value has been reported.
    fn step_up_past_key(&mut self) {
        if let Some(parent) = self.nodes[self.pos].parent {
            if self.nodes[parent].kind == NodeKind::Object {
                let key_len = self.nodes[self.pos].key.len();
                self.path.truncate(self.path.len() - key_len);
                self.pos = parent;
            }
        }
    }

    fn collection_start(&mut self, kind: NodeKind) {
        if self.overflow.is_empty() {
            debug_assert_ne!(self.cursor_kind(), NodeKind::Object);
            if let Some(child) = self.find_child(self.pos, kind, b"") {
                self.pos = child;
                if kind == NodeKind::Array {
                    // An array step leads with '.' only at the start.
                    if self.path.is_empty() {
                        self.path.push('.');
                    }
                    self.path.push_str("[]");
                } else {
                    self.path.push('.');
                }
                return;
            }
        }
        self.overflow.push(match kind {
            NodeKind::Object => Overflow::Object,
            _ => Overflow::Array,
        });
    }

    fn collection_end(&mut self, kind: ValueKind, raw: &[u8]) -> Result<(), DecodeError> {
        if self.overflow.is_empty() {
            let repr_len = if kind == ValueKind::Array { 2 } else { 1 };
            self.path.truncate(self.path.len() - repr_len);
            // Drop the leading '.' again once the root array closes.
            if kind == ValueKind::Array && self.path.len() == 1 {
                self.path.clear();
            }
            self.pos = self.nodes[self.pos].parent.unwrap_or(ROOT);
            self.exec_callbacks(kind, raw)?;
            self.step_up_past_key();
        } else {
            self.overflow.pop();
            if self.overflow.is_empty() {
                // The whole collection sat at the cursor's location.
                self.exec_callbacks(kind, raw)?;
                self.step_up_past_key();
            } else if self.overflow.last() == Some(&Overflow::Key) {
                self.overflow.pop();
            }
        }
        Ok(())
    }

    fn cursor_kind(&self) -> NodeKind {
        self.nodes[self.pos].kind
    }
}

impl EventConsumer for PathDispatcher<'_> {
    fn on_object_start(&mut self, _offset: usize) -> Result<(), DecodeError> {
        self.collection_start(NodeKind::Object);
        Ok(())
    }

    fn on_object_key(&mut self, key: &[u8]) -> Result<(), DecodeError> {
        if self.overflow.is_empty() {
            debug_assert_eq!(self.cursor_kind(), NodeKind::Object);
            if let Some(child) = self.find_child(self.pos, NodeKind::Key, key) {
                self.pos = child;
                self.path.push_str(&self.nodes[child].key);
            } else {
                self.overflow.push(Overflow::Key);
            }
        } else {
            self.overflow.push(Overflow::Key);
        }
        Ok(())
    }

    fn on_object_end(&mut self, raw: &[u8]) -> Result<(), DecodeError> {
        self.collection_end(ValueKind::Object, raw)
    }

    fn on_array_start(&mut self, _offset: usize) -> Result<(), DecodeError> {
        self.collection_start(NodeKind::Array);
        Ok(())
    }

    fn on_array_end(&mut self, raw: &[u8]) -> Result<(), DecodeError> {
        self.collection_end(ValueKind::Array, raw)
    }

    fn on_primitive_value(&mut self, kind: ValueKind, raw: &[u8]) -> Result<(), DecodeError> {
        if self.overflow.is_empty() {
            self.exec_callbacks(kind, raw)?;
            self.step_up_past_key();
        } else if self.overflow.last() == Some(&Overflow::Key) {
            self.overflow.pop();
        }
        Ok(())
    }
}
