//! Hosting windows and the registry used to find them by name.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use futures_signals::signal::{Mutable, MutableSignal};

/// A surface whose visibility the launcher can control.
pub trait HostWindow {
    fn is_visible(&self) -> bool;
    /// Show or hide the window. Hiding an already hidden window is a no-op.
    fn set_visible(&self, visible: bool);
}

/// Looks up the launcher's host window on demand.
pub type HostResolver = Box<dyn Fn() -> Option<Box<dyn HostWindow>>>;

type ShowHook = Rc<dyn Fn()>;

/// A named top-level window that is shown and hidden, never destroyed.
///
/// Clones share visibility and the show hook.
#[derive(Clone)]
pub struct Window {
    name: Arc<str>,
    visible: Mutable<bool>,
    on_show: Rc<RefCell<Option<ShowHook>>>,
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("name", &self.name)
            .field("visible", &self.visible.get())
            .finish()
    }
}

impl Window {
    pub fn new(name: &str, visible: bool) -> Self {
        Self {
            name: Arc::from(name),
            visible: Mutable::new(visible),
            on_show: Rc::new(RefCell::new(None)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run `hook` each time the window goes from hidden to visible,
    /// replacing any previous hook.
    pub fn on_show(&self, hook: impl Fn() + 'static) {
        *self.on_show.borrow_mut() = Some(Rc::new(hook));
    }

    /// Set visibility and return the previous value.
    pub fn replace_visible(&self, visible: bool) -> bool {
        let was_visible = self.visible.get();
        self.visible.set_neq(visible);
        if visible && !was_visible {
            let hook = self.on_show.borrow().clone();
            if let Some(hook) = hook {
                hook();
            }
        }
        was_visible
    }

    pub fn visible_signal(&self) -> MutableSignal<bool> {
        self.visible.signal()
    }
}

impl HostWindow for Window {
    fn is_visible(&self) -> bool {
        self.visible.get()
    }

    fn set_visible(&self, visible: bool) {
        self.replace_visible(visible);
    }
}

/// Windows of the running shell, keyed by name.
///
/// Clones share the same registry.
#[derive(Debug, Clone, Default)]
pub struct WindowRegistry {
    windows: Mutable<BTreeMap<String, Window>>,
}

impl WindowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a window, replacing any window with the same name.
    pub fn insert(&self, window: Window) {
        self.windows
            .lock_mut()
            .insert(window.name().to_string(), window);
    }

    pub fn remove(&self, name: &str) -> Option<Window> {
        self.windows.lock_mut().remove(name)
    }

    pub fn get(&self, name: &str) -> Option<Window> {
        self.windows.lock_ref().get(name).cloned()
    }

    pub fn names(&self) -> Vec<String> {
        self.windows.lock_ref().keys().cloned().collect()
    }

    /// A resolver that looks `name` up at call time, so a window removed
    /// later resolves to `None`.
    pub fn resolver(&self, name: &str) -> HostResolver {
        let registry = self.clone();
        let name = name.to_string();
        Box::new(move || {
            registry
                .get(&name)
                .map(|window| Box::new(window) as Box<dyn HostWindow>)
        })
    }
}
