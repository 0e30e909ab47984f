use alloc::{boxed::Box, vec::Vec};

/// Actions polled together once per scheduler run. Button bindings live here.
#[derive(Default)]
pub struct EventLoop {
    events: Vec<Box<dyn FnMut()>>,
}

impl EventLoop {
    /// Add an event to run when the loop is polled.
    pub fn bind(&mut self, action: impl FnMut() + 'static) {
        self.events.push(Box::new(action));
    }

    /// Run every bound event, in binding order.
    pub fn poll(&mut self) {
        for event in self.events.iter_mut() {
            event();
        }
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
