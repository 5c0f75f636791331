//! Observable state cells.
//!
//! Each store keeps its table in a [`StateCell`]. Mutations replace the snapshot synchronously
//! and notify subscribers; a [`Subscription`] sees the current value straight away and then the
//! latest value after every change. Changes that land between two reads are coalesced, which is
//! what a re-rendering view wants. Dropping a subscription unsubscribes it.

use tokio::sync::watch;

/// A value with change notification.
#[derive(Debug)]
pub struct StateCell<T> {
    tx: watch::Sender<T>,
}

impl<T> StateCell<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Runs `f` against the current snapshot without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.tx.borrow())
    }

    /// Mutates the snapshot in place and notifies subscribers.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.tx.send_modify(f);
    }

    /// Replaces the snapshot, returning the previous one.
    pub fn replace(&self, value: T) -> T {
        self.tx.send_replace(value)
    }

    pub fn subscribe(&self) -> Subscription<T> {
        Subscription {
            rx: self.tx.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl<T: Clone> StateCell<T> {
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }
}

impl<T: Default> Default for StateCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// A live read view on a [`StateCell`].
#[derive(Debug)]
pub struct Subscription<T> {
    rx: watch::Receiver<T>,
}

impl<T: Clone> Subscription<T> {
    /// The current value. Marks it as seen.
    pub fn current(&mut self) -> T {
        self.rx.borrow_and_update().clone()
    }

    /// Waits for the next change and returns the value after it.
    ///
    /// Returns `None` once the owning cell has been dropped.
    pub async fn changed(&mut self) -> Option<T> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Like [`Subscription::current`], projected through `select`.
    pub fn select<R>(&mut self, select: impl FnOnce(&T) -> R) -> R {
        select(&self.rx.borrow_and_update())
    }

    /// True if a change happened since the value was last seen.
    pub fn has_changed(&self) -> bool {
        self.rx.has_changed().unwrap_or(false)
    }
}
