use alloc::{rc::Rc, vec};
use core::{cell::RefCell, fmt::Debug};

use crate::{command::FunctionalCommand, Result, SubsystemRef};

/// A collection of robot parts and other hardware that act together as a whole.
pub trait Subsystem: Debug {
    /// This method will be called once per scheduler run
    fn periodic(&mut self) {}
    /// This method will be called once per scheduler run, but only during simulation
    fn sim_periodic(&mut self) {}
}

/// Shorthands for building commands that require a subsystem.
pub trait SubsystemRefExt {
    /// Runs `action` once, then finishes.
    fn run_once(&self, action: impl FnMut() -> Result + 'static) -> FunctionalCommand;
    fn start_end(
        &self,
        start: impl FnMut() -> Result + 'static,
        end: impl FnMut() -> Result + 'static,
    ) -> FunctionalCommand;
}

impl<T> SubsystemRefExt for Rc<RefCell<T>>
where
    T: Subsystem + 'static,
{
    fn run_once(&self, action: impl FnMut() -> Result + 'static) -> FunctionalCommand {
        SubsystemRef::new(self).run_once(action)
    }
    fn start_end(
        &self,
        start: impl FnMut() -> Result + 'static,
        end: impl FnMut() -> Result + 'static,
    ) -> FunctionalCommand {
        SubsystemRef::new(self).start_end(start, end)
    }
}

impl SubsystemRefExt for SubsystemRef {
    fn run_once(&self, action: impl FnMut() -> Result + 'static) -> FunctionalCommand {
        FunctionalCommand::instant(action, vec![self.clone()])
    }
    fn start_end(
        &self,
        start: impl FnMut() -> Result + 'static,
        mut end: impl FnMut() -> Result + 'static,
    ) -> FunctionalCommand {
        FunctionalCommand::new(
            start,
            || Ok(()),
            move |_| end(),
            || Ok(false),
            vec![self.clone()],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use core::cell::Cell;

    #[derive(Debug, Default)]
    struct Intake;

    impl Subsystem for Intake {}

    #[test]
    fn run_once_requires_subsystem_and_finishes() {
        let intake = Rc::new(RefCell::new(Intake));
        let hits = Rc::new(Cell::new(0));
        let mut command = intake.run_once({
            let hits = hits.clone();
            move || {
                hits.set(hits.get() + 1);
                Ok(())
            }
        });

        assert_eq!(command.get_requirements(), &[SubsystemRef::new(&intake)]);
        command.initialize().unwrap();
        assert_eq!(hits.get(), 1);
        assert!(command.is_finished().unwrap());
    }

    #[test]
    fn start_end_runs_end_on_interrupt() {
        let intake = Rc::new(RefCell::new(Intake));
        let running = Rc::new(Cell::new(false));
        let mut command = intake.start_end(
            {
                let running = running.clone();
                move || {
                    running.set(true);
                    Ok(())
                }
            },
            {
                let running = running.clone();
                move || {
                    running.set(false);
                    Ok(())
                }
            },
        );

        command.initialize().unwrap();
        command.execute().unwrap();
        assert!(running.get());
        assert!(!command.is_finished().unwrap());
        command.end(true).unwrap();
        assert!(!running.get());
    }
}
