use std::cell::RefCell;
use std::rc::Rc;

use crate::audio_api::{AudioCommand, NoteTrigger};
use crate::error::EngineError;

use super::output::{OutputContext, OutputDevice};

#[derive(Debug, Default)]
struct OfflineState {
    now: f64,
    running: bool,
    opened: usize,
    suspended: usize,
    notes: Vec<NoteTrigger>,
}

/// An output that renders nothing. It keeps a clock you move by hand and a
/// log of every note submitted to it; used when there is no sound card and
/// for driving the engine in tests.
#[derive(Clone, Debug)]
pub struct OfflineDevice {
    sample_rate: u32,
    state: Rc<RefCell<OfflineState>>,
}

/// Read side of an [`OfflineDevice`], kept by whoever handed the device to
/// the engine.
#[derive(Clone, Debug)]
pub struct OfflineHandle {
    state: Rc<RefCell<OfflineState>>,
}

impl OfflineDevice {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            state: Rc::new(RefCell::new(OfflineState::default())),
        }
    }

    pub fn handle(&self) -> OfflineHandle {
        OfflineHandle { state: self.state.clone() }
    }
}

impl OutputDevice for OfflineDevice {
    fn open(&self) -> Result<Box<dyn OutputContext>, EngineError> {
        {
            let mut s = self.state.borrow_mut();
            s.opened += 1;
            s.now = 0.0; // every context starts its own clock
            s.running = false;
        }
        Ok(Box::new(OfflineContext {
            sample_rate: self.sample_rate,
            state: self.state.clone(),
        }))
    }
}

impl OfflineHandle {
    pub fn advance(&self, secs: f64) {
        self.state.borrow_mut().now += secs;
    }

    pub fn now(&self) -> f64 {
        self.state.borrow().now
    }

    pub fn is_running(&self) -> bool {
        self.state.borrow().running
    }

    pub fn contexts_opened(&self) -> usize {
        self.state.borrow().opened
    }

    pub fn times_suspended(&self) -> usize {
        self.state.borrow().suspended
    }

    pub fn scheduled(&self) -> Vec<NoteTrigger> {
        self.state.borrow().notes.clone()
    }

    pub fn take_scheduled(&self) -> Vec<NoteTrigger> {
        std::mem::take(&mut self.state.borrow_mut().notes)
    }
}

struct OfflineContext {
    sample_rate: u32,
    state: Rc<RefCell<OfflineState>>,
}

impl OutputContext for OfflineContext {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn current_time(&self) -> f64 {
        self.state.borrow().now
    }

    fn is_running(&self) -> bool {
        self.state.borrow().running
    }

    fn resume(&mut self) -> Result<(), EngineError> {
        self.state.borrow_mut().running = true;
        Ok(())
    }

    fn suspend(&mut self) -> Result<(), EngineError> {
        let mut s = self.state.borrow_mut();
        s.running = false;
        s.suspended += 1;
        Ok(())
    }

    fn submit(&self, cmd: AudioCommand) {
        match cmd {
            AudioCommand::Play(t) => self.state.borrow_mut().notes.push(t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_context_gets_a_fresh_clock() {
        let device = OfflineDevice::new(48000);
        let handle = device.handle();

        let mut ctx = device.open().unwrap();
        assert!(!ctx.is_running());
        ctx.resume().unwrap();
        handle.advance(1.5);
        assert_eq!(ctx.current_time(), 1.5);

        ctx.suspend().unwrap();
        let ctx = device.open().unwrap();
        assert_eq!(ctx.current_time(), 0.0);
        assert_eq!(handle.contexts_opened(), 2);
        assert_eq!(handle.times_suspended(), 1);
    }
}
