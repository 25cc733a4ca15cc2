//! Tick scheduling.
//!
//! The scheduler owns the "is a frame pending" bookkeeping and asks a
//! [`FrameDriver`] for frames. In the browser the driver wraps
//! `requestAnimationFrame`; [`ManualDriver`] lets tests and headless layouts
//! fire frames explicitly.

use super::simulation::{Simulation, TickSnapshot};

/// Source of frames for the scheduler.
pub trait FrameDriver {
	/// Arrange for the host to call [`Scheduler::frame`] once, soon.
	fn request_frame(&mut self);
	/// Withdraw the outstanding request, if any.
	fn cancel_frame(&mut self);
}

/// A driver that only records requests. The caller fires frames itself.
#[derive(Clone, Debug, Default)]
pub struct ManualDriver {
	pub requests: usize,
	pub cancellations: usize,
}

impl FrameDriver for ManualDriver {
	fn request_frame(&mut self) {
		self.requests += 1;
	}

	fn cancel_frame(&mut self) {
		self.cancellations += 1;
	}
}

/// Runs simulation ticks one frame at a time.
///
/// At most one frame is pending at any moment. After [`Scheduler::stop`] no
/// frame is requested again and late frames are ignored.
#[derive(Debug)]
pub struct Scheduler<D> {
	driver: D,
	pending: bool,
	stopped: bool,
}

impl<D: FrameDriver> Scheduler<D> {
	pub fn new(driver: D) -> Self {
		Self {
			driver,
			pending: false,
			stopped: false,
		}
	}

	pub fn driver(&self) -> &D {
		&self.driver
	}

	pub fn is_pending(&self) -> bool {
		self.pending
	}

	pub fn is_stopped(&self) -> bool {
		self.stopped
	}

	/// Makes sure a frame is pending while the simulation wants ticks.
	pub fn start(&mut self, sim: &Simulation) {
		if self.stopped || self.pending || !sim.is_active() {
			return;
		}
		self.pending = true;
		self.driver.request_frame();
	}

	/// Handles a fired frame: runs one tick, reports it, and schedules the next
	/// frame unless the simulation settled. Returns whether a tick ran.
	pub fn frame(
		&mut self,
		sim: &mut Simulation,
		on_tick: impl FnOnce(&TickSnapshot<'_>),
	) -> bool {
		self.pending = false;
		if self.stopped {
			return false;
		}
		let ran = self.tick_once(sim, on_tick);
		if ran {
			self.start(sim);
		}
		ran
	}

	/// Runs one tick right now, leaving any pending frame alone.
	pub fn tick_once(
		&mut self,
		sim: &mut Simulation,
		on_tick: impl FnOnce(&TickSnapshot<'_>),
	) -> bool {
		if self.stopped {
			return false;
		}
		match sim.tick() {
			Some(snapshot) => {
				on_tick(&snapshot);
				true
			}
			None => false,
		}
	}

	/// Fires up to `frames` pending frames back to back. Returns the number of
	/// ticks that ran.
	pub fn advance(
		&mut self,
		sim: &mut Simulation,
		frames: usize,
		mut on_tick: impl FnMut(&TickSnapshot<'_>),
	) -> usize {
		let mut ran = 0;
		for _ in 0..frames {
			if !self.pending {
				break;
			}
			if self.frame(sim, &mut on_tick) {
				ran += 1;
			}
		}
		ran
	}

	/// Cancels the pending frame and stops the simulation.
	pub fn stop(&mut self, sim: &mut Simulation) {
		if self.pending {
			self.driver.cancel_frame();
			self.pending = false;
		}
		self.stopped = true;
		sim.stop();
	}
}
