use crate::types::TrackerEvent;

/// Handle returned by [`Listeners::add`], used to remove the listener again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(TrackerEvent)>;

/// Synchronous event fan-out, in registration order.
#[derive(Default)]
pub struct Listeners {
    next_id: u64,
    entries: Vec<(ListenerId, Listener)>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, listener: impl FnMut(TrackerEvent) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(listener)));
        id
    }

    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dispatch(&mut self, event: TrackerEvent) {
        for (_, listener) in &mut self.entries {
            listener(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn dispatch_reaches_every_listener_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut listeners = Listeners::new();
        for name in ["a", "b"] {
            let log = Rc::clone(&log);
            listeners.add(move |event| log.borrow_mut().push((name, event)));
        }

        listeners.dispatch(TrackerEvent::Change);
        assert_eq!(
            *log.borrow(),
            vec![("a", TrackerEvent::Change), ("b", TrackerEvent::Change)]
        );
    }

    #[test]
    fn removed_listener_is_not_called() {
        let count = Rc::new(RefCell::new(0));
        let mut listeners = Listeners::new();
        let id = {
            let count = Rc::clone(&count);
            listeners.add(move |_| *count.borrow_mut() += 1)
        };

        assert!(listeners.remove(id));
        assert!(!listeners.remove(id));
        listeners.dispatch(TrackerEvent::Change);
        assert_eq!(*count.borrow(), 0);
        assert!(listeners.is_empty());
    }
}
