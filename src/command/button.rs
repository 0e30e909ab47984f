use alloc::rc::Rc;
use core::cell::RefCell;

use crate::{
    event::EventLoop,
    input::{Button, Gamepad},
    CommandRef, Scheduler,
};

fn schedule(scheduler: &dyn Scheduler, command: &CommandRef) {
    tracing::debug!(?command, "trigger scheduling command");
    if let Err(error) = scheduler.schedule(command) {
        tracing::error!(%error, "failed to schedule bound command");
    }
}

fn cancel(scheduler: &dyn Scheduler, command: &CommandRef) {
    tracing::debug!(?command, "trigger cancelling command");
    if let Err(error) = scheduler.cancel(command) {
        tracing::error!(%error, "failed to cancel bound command");
    }
}

fn toggle(scheduler: &dyn Scheduler, command: &CommandRef) {
    if scheduler.is_scheduled(command) {
        cancel(scheduler, command);
    } else {
        schedule(scheduler, command);
    }
}

/// A condition, checked once per event loop poll, that commands can be bound to.
///
/// Bindings react to edges: the condition is sampled when the binding is made
/// and compared with the previous sample on every poll.
#[derive(Clone)]
pub struct Trigger {
    event_loop: Rc<RefCell<EventLoop>>,
    scheduler: Rc<dyn Scheduler>,
    condition: Rc<dyn Fn() -> bool>,
}

impl Trigger {
    pub fn new(
        event_loop: Rc<RefCell<EventLoop>>,
        scheduler: Rc<dyn Scheduler>,
        condition: impl Fn() -> bool + 'static,
    ) -> Self {
        Self {
            event_loop,
            scheduler,
            condition: Rc::new(condition),
        }
    }

    /// Active while `button` is held on `gamepad`.
    pub fn button<G: Gamepad + 'static>(
        event_loop: Rc<RefCell<EventLoop>>,
        scheduler: Rc<dyn Scheduler>,
        gamepad: Rc<G>,
        button: Button,
    ) -> Self {
        Self::new(event_loop, scheduler, move || gamepad.button(button))
    }

    fn with_condition(&self, condition: impl Fn() -> bool + 'static) -> Self {
        Self::new(self.event_loop.clone(), self.scheduler.clone(), condition)
    }

    /// Bind `action(was_active, is_active)` to run on every poll.
    fn bind(&self, mut action: impl FnMut(&dyn Scheduler, bool, bool) + 'static) {
        let condition = self.condition.clone();
        let scheduler = self.scheduler.clone();
        let mut pressed_last = condition();
        self.event_loop.borrow_mut().bind(move || {
            let pressed = condition();
            action(&*scheduler, pressed_last, pressed);
            pressed_last = pressed;
        });
    }

    /// Schedule `command` when the condition becomes true.
    pub fn on_true(self, command: impl Into<CommandRef>) -> Self {
        let command = command.into();
        self.bind(move |scheduler, was, is| {
            if !was && is {
                schedule(scheduler, &command);
            }
        });
        self
    }

    /// Schedule `command` when the condition becomes false.
    pub fn on_false(self, command: impl Into<CommandRef>) -> Self {
        let command = command.into();
        self.bind(move |scheduler, was, is| {
            if was && !is {
                schedule(scheduler, &command);
            }
        });
        self
    }

    /// Run `command` only while the condition holds.
    pub fn while_true(self, command: impl Into<CommandRef>) -> Self {
        let command = command.into();
        self.bind(move |scheduler, was, is| {
            if !was && is {
                schedule(scheduler, &command);
            } else if was && !is {
                cancel(scheduler, &command);
            }
        });
        self
    }

    pub fn toggle_on_true(self, command: impl Into<CommandRef>) -> Self {
        let command = command.into();
        self.bind(move |scheduler, was, is| {
            if !was && is {
                toggle(scheduler, &command);
            }
        });
        self
    }

    pub fn is_active(&self) -> bool {
        (self.condition)()
    }

    pub fn and(&self, other: &Self) -> Self {
        let condition = self.condition.clone();
        let other_condition = other.condition.clone();
        self.with_condition(move || condition() && other_condition())
    }

    pub fn or(&self, other: &Self) -> Self {
        let condition = self.condition.clone();
        let other_condition = other.condition.clone();
        self.with_condition(move || condition() || other_condition())
    }

    pub fn negate(&self) -> Self {
        let condition = self.condition.clone();
        self.with_condition(move || !condition())
    }
}
