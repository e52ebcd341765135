#![forbid(unsafe_code)]

//! The engine instance: data, registry, and the mounted subtree.
//!
//! A [`ViewModel`] resolves its mount target, compiles the subtree once,
//! and then keeps bound nodes in sync as data changes. Data changes reach
//! the view in two ways: a user edit on a `v-model` input (the installed
//! change listener writes the store and notifies), or an explicit
//! [`ViewModel::set`] / [`ViewModel::write`] + [`ViewModel::notify`].
//!
//! # Architecture
//!
//! State lives in an `Rc` shared with the change listeners the view model
//! installs on the host. Listeners hold a `Weak` reference, so dropping the
//! last `ViewModel` handle turns them into no-ops.
//!
//! # Invariants
//!
//! 1. Watchers for a key run in registration (document) order.
//! 2. Notifying a key with no watchers is a no-op.
//! 3. A notify for a key whose notify is already in progress is folded
//!    into it: the key is fanned out again once the current pass ends, with
//!    the latest value. After [`MAX_NOTIFY_PASSES`] passes watchers stop
//!    running and only view bindings are refreshed, so the view always ends
//!    in step with the store.
//! 4. A user change does not re-run the originating input's own model
//!    binding unless [`BindConfig::echo_model_updates`] is set.
//! 5. After [`ViewModel::dispose`], nothing fires, including the rest of a
//!    fan-out that called it: notify returns 0 and change listeners do
//!    nothing.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Mount target missing | Selector matches nothing | `MountError`, no walk |
//! | Watcher registered during notify | `watch` from a callback | Deferred until the fan-out ends |

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use weft_core::{DataStore, Host, NodeId, Value};

use crate::binding::{Binding, BindingKind};
use crate::compiler::Compiler;
use crate::config::{BindConfig, Mount, MountOptions, ViewConfig};
use crate::error::MountError;
use crate::registry::DependencyRegistry;

/// Fan-out passes for one key before watchers stop being re-run.
pub const MAX_NOTIFY_PASSES: usize = 16;

struct Inner<H> {
    host: Rc<H>,
    root: NodeId,
    config: BindConfig,
    data: RefCell<DataStore>,
    registry: RefCell<DependencyRegistry<Binding>>,
    deferred: RefCell<Vec<Binding>>,
    in_flight: RefCell<Vec<String>>,
    dirty: RefCell<Vec<String>>,
    disposed: Cell<bool>,
}

/// A mounted, live view model.
///
/// Cloning yields another handle to the same instance.
///
/// # Example
///
/// ```
/// use std::rc::Rc;
/// use weft_core::Host;
/// use weft_dom::Document;
/// use weft_runtime::{MountOptions, ViewModel};
///
/// let doc = Rc::new(Document::parse(r#"<div id="app">Hello {{ name }}</div>"#).unwrap());
/// let vm = ViewModel::new(
///     Rc::clone(&doc),
///     MountOptions::selector("#app").entry("name", "World"),
/// )
/// .unwrap();
///
/// let app = vm.root();
/// assert_eq!(doc.text_content(app).as_deref(), Some("Hello World"));
///
/// vm.set("name", "Weft");
/// assert_eq!(doc.text_content(app).as_deref(), Some("Hello Weft"));
/// ```
pub struct ViewModel<H: Host + 'static> {
    inner: Rc<Inner<H>>,
}

impl<H: Host + 'static> Clone for ViewModel<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<H: Host + 'static> fmt::Debug for ViewModel<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewModel")
            .field("root", &self.inner.root)
            .field("keys", &self.inner.data.borrow().len())
            .field("bindings", &self.inner.registry.borrow().total())
            .field("disposed", &self.inner.disposed.get())
            .finish()
    }
}

/// A non-owning handle, for callbacks that must not keep the view alive.
pub struct WeakViewModel<H: Host + 'static> {
    inner: Weak<Inner<H>>,
}

impl<H: Host + 'static> Clone for WeakViewModel<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<H: Host + 'static> WeakViewModel<H> {
    /// Upgrade to a strong handle if the view model is still alive.
    #[must_use]
    pub fn upgrade(&self) -> Option<ViewModel<H>> {
        self.inner.upgrade().map(|inner| ViewModel { inner })
    }
}

/// Resolve a mount target against the host.
pub fn resolve_mount<H: Host + ?Sized>(host: &H, el: &Mount) -> Result<NodeId, MountError> {
    match el {
        Mount::Selector(selector) => {
            host.query_selector(selector)
                .ok_or_else(|| MountError::NotFound {
                    selector: selector.clone(),
                })
        }
        Mount::Node(node) if host.contains(*node) => Ok(*node),
        Mount::Node(node) => Err(MountError::Detached(*node)),
    }
}

impl<H: Host + 'static> ViewModel<H> {
    /// Mount with the default [`BindConfig`].
    pub fn new(host: Rc<H>, options: MountOptions) -> Result<Self, MountError> {
        Self::with_config(host, options, BindConfig::default())
    }

    /// Mount with a loaded [`ViewConfig`].
    pub fn from_config(host: Rc<H>, config: ViewConfig) -> Result<Self, MountError> {
        Self::with_config(host, config.options, config.bind)
    }

    /// Resolve the mount target, take the initial data, and compile.
    ///
    /// Fails before touching the tree when the target does not resolve.
    pub fn with_config(
        host: Rc<H>,
        options: MountOptions,
        config: BindConfig,
    ) -> Result<Self, MountError> {
        let root = resolve_mount(&*host, &options.el)?;
        let data = options.data.unwrap_or_default();

        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("weft_mount", %root).entered();

        let compiled = Compiler::new(&*host, &data, &config).compile(root);

        let mut registry = DependencyRegistry::new();
        for binding in compiled.bindings {
            registry.add_dependency(binding.key().to_owned(), binding);
        }

        let inner = Rc::new(Inner {
            host,
            root,
            config,
            data: RefCell::new(data),
            registry: RefCell::new(registry),
            deferred: RefCell::new(Vec::new()),
            in_flight: RefCell::new(Vec::new()),
            dirty: RefCell::new(Vec::new()),
            disposed: Cell::new(false),
        });

        for (node, key) in compiled.model_inputs {
            let weak = Rc::downgrade(&inner);
            inner.host.add_change_listener(
                node,
                Rc::new(move |value: &str| {
                    if let Some(inner) = weak.upgrade() {
                        inner.handle_change(node, &key, value);
                    }
                }),
            );
        }

        Ok(Self { inner })
    }

    /// The resolved mount node.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.inner.root
    }

    /// The host this view model writes to.
    #[must_use]
    pub fn host(&self) -> &Rc<H> {
        &self.inner.host
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &BindConfig {
        &self.inner.config
    }

    /// A non-owning handle.
    #[must_use]
    pub fn downgrade(&self) -> WeakViewModel<H> {
        WeakViewModel {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Current value of `key` (trimmed).
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.inner.data.borrow().get(key.trim()).cloned()
    }

    /// Snapshot of the whole store.
    #[must_use]
    pub fn data(&self) -> DataStore {
        self.inner.data.borrow().clone()
    }

    /// Write `key` without notifying. Returns the previous value.
    pub fn write(&self, key: &str, value: impl Into<Value>) -> Option<Value> {
        self.inner.data.borrow_mut().set(key.trim(), value)
    }

    /// Write `key` and notify its watchers. Returns the number run.
    pub fn set(&self, key: &str, value: impl Into<Value>) -> usize {
        self.write(key, value);
        self.notify(key)
    }

    /// Re-run every watcher of `key` with the current value, in
    /// registration order. Returns the number of watchers run, summed over
    /// every pass when watchers write `key` back.
    pub fn notify(&self, key: &str) -> usize {
        self.inner.notify_from(key.trim(), None)
    }

    /// Observe `key`: `callback` receives the current value on every
    /// notify. It is not called on registration.
    ///
    /// Capture a [`WeakViewModel`] rather than a `ViewModel` inside the
    /// callback; a strong handle forms a reference cycle.
    pub fn watch(&self, key: &str, callback: impl Fn(Option<&Value>) + 'static) {
        if self.inner.disposed.get() {
            return;
        }
        self.inner
            .register(Binding::watch(key.trim(), Rc::new(callback)));
    }

    /// Number of watchers registered for `key`.
    #[must_use]
    pub fn binding_count(&self, key: &str) -> usize {
        self.inner.registry.borrow().binding_count(key.trim())
    }

    /// Number of distinct keys with watchers.
    #[must_use]
    pub fn watched_keys(&self) -> usize {
        self.inner.registry.borrow().len()
    }

    /// Drop every binding and silence installed change listeners.
    pub fn dispose(&self) {
        self.inner.disposed.set(true);
        self.inner.deferred.borrow_mut().clear();
        if let Ok(mut registry) = self.inner.registry.try_borrow_mut() {
            registry.clear();
        }
    }

    /// Whether [`dispose`](Self::dispose) has been called.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.get()
    }
}

impl<H: Host + 'static> Inner<H> {
    fn handle_change(&self, node: NodeId, key: &str, value: &str) {
        if self.disposed.get() {
            return;
        }
        let current = self.host.value(node).unwrap_or_else(|| value.to_owned());
        self.data.borrow_mut().set(key, Value::String(current));

        let origin = (!self.config.echo_model_updates).then_some(node);
        self.notify_from(key, origin);
    }

    fn notify_from(&self, key: &str, origin: Option<NodeId>) -> usize {
        if self.disposed.get() {
            return 0;
        }
        if self.in_flight.borrow().iter().any(|k| k == key) {
            let mut dirty = self.dirty.borrow_mut();
            if !dirty.iter().any(|k| k == key) {
                dirty.push(key.to_owned());
            }
            #[cfg(feature = "tracing")]
            tracing::debug!(key, "notify folded into the running fan-out");
            return 0;
        }
        self.in_flight.borrow_mut().push(key.to_owned());

        let mut ran = self.run_pass(key, origin, false);
        let mut passes = 1;
        while self.take_dirty(key) && !self.disposed.get() {
            if passes == MAX_NOTIFY_PASSES {
                // Watchers keep rewriting the key; bring the view in line
                // with the store without running them again.
                #[cfg(feature = "tracing")]
                tracing::debug!(key, passes, "notify pass limit reached");
                self.run_pass(key, None, true);
                break;
            }
            ran += self.run_pass(key, None, false);
            passes += 1;
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(key, watchers = ran, passes, "notify");

        self.in_flight.borrow_mut().pop();
        self.settle();
        ran
    }

    /// One ordered fan-out over the watchers of `key`. With `view_only`,
    /// `watch` callbacks are skipped.
    fn run_pass(&self, key: &str, origin: Option<NodeId>, view_only: bool) -> usize {
        self.registry.borrow().notify(key, |binding| {
            if self.disposed.get() {
                return;
            }
            if view_only && matches!(binding.kind(), BindingKind::Watch(_)) {
                return;
            }
            if origin.is_some_and(|node| binding.is_model_of(node)) {
                return;
            }
            let value = self.data.borrow().get(key).cloned();
            binding.apply(&*self.host, value.as_ref());
        })
    }

    fn take_dirty(&self, key: &str) -> bool {
        let mut dirty = self.dirty.borrow_mut();
        let Some(pos) = dirty.iter().position(|k| k == key) else {
            return false;
        };
        dirty.swap_remove(pos);
        true
    }

    fn register(&self, binding: Binding) {
        match self.registry.try_borrow_mut() {
            Ok(mut registry) => registry.add_dependency(binding.key().to_owned(), binding),
            Err(_) => self.deferred.borrow_mut().push(binding),
        }
    }

    /// Apply work queued while the registry was busy.
    fn settle(&self) {
        let Ok(mut registry) = self.registry.try_borrow_mut() else {
            return;
        };
        if self.disposed.get() {
            registry.clear();
            self.deferred.borrow_mut().clear();
            return;
        }
        for binding in self.deferred.borrow_mut().drain(..) {
            registry.add_dependency(binding.key().to_owned(), binding);
        }
    }
}
