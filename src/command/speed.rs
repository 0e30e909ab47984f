use alloc::vec::Vec;

use super::Command;
use crate::{
    input::{CapHold, SpeedCap},
    Result, SubsystemRef,
};

/// Overrides the speed cap with `target` while scheduled.
///
/// Ending releases only this command's override, so when two modifiers overlap
/// the one still held keeps its cap. Never finishes on its own; bind it with
/// [`Trigger::while_true`](super::button::Trigger::while_true).
#[derive(Debug, Clone)]
pub struct ChangeMaxSpeed {
    speed_cap: SpeedCap,
    target: f64,
    hold: Option<CapHold>,
    requirements: Vec<SubsystemRef>,
}

impl ChangeMaxSpeed {
    pub fn new(speed_cap: SpeedCap, target: f64) -> Self {
        Self {
            speed_cap,
            target,
            hold: None,
            requirements: Vec::new(),
        }
    }
}

impl Command for ChangeMaxSpeed {
    fn get_requirements(&self) -> &[SubsystemRef] {
        &self.requirements
    }

    fn initialize(&mut self) -> Result {
        if let Some(hold) = self.hold.take() {
            self.speed_cap.release(hold);
        }
        self.hold = Some(self.speed_cap.hold(self.target));
        Ok(())
    }

    fn end(&mut self, _interrupted: bool) -> Result {
        if let Some(hold) = self.hold.take() {
            self.speed_cap.release(hold);
        }
        Ok(())
    }

    fn runs_when_disabled(&self) -> bool {
        true
    }
}
