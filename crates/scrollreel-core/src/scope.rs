use std::cell::RefCell;

/// Owner of cleanup work for something with a mount/unmount lifetime.
///
/// Disposers run once, in registration order, on [`Scope::dispose`] or when
/// the scope is dropped.
pub struct Scope {
    // `None` once disposed.
    pending: RefCell<Option<Vec<Box<dyn FnOnce()>>>>,
}

impl Scope {
    pub fn new() -> Self {
        Self {
            pending: RefCell::new(Some(Vec::new())),
        }
    }

    /// Registers cleanup work. On an already disposed scope it runs at once.
    pub fn add_disposer(&self, disposer: impl FnOnce() + 'static) {
        if let Some(list) = self.pending.borrow_mut().as_mut() {
            list.push(Box::new(disposer));
            return;
        }
        disposer();
    }

    pub fn is_disposed(&self) -> bool {
        self.pending.borrow().is_none()
    }

    pub fn len(&self) -> usize {
        self.pending.borrow().as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Runs every registered disposer. Later calls do nothing.
    pub fn dispose(&self) {
        let Some(disposers) = self.pending.borrow_mut().take() else {
            return;
        };
        for disposer in disposers {
            disposer();
        }
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        self.dispose();
    }
}
