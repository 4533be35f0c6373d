//! Cancelable delay on a logical clock.

/// Fires once, `delay` time units after the most recent [`Debounce::start`],
/// unless canceled first. Time is supplied by the owner, so tests can step it
/// deterministically.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Debounce {
	delay: f64,
	deadline: Option<f64>,
}

impl Debounce {
	pub fn new(delay: f64) -> Self {
		Self {
			delay,
			deadline: None,
		}
	}

	pub fn delay(&self) -> f64 {
		self.delay
	}

	/// Arms the timer at `now`, replacing any pending deadline.
	pub fn start(&mut self, now: f64) {
		self.deadline = Some(now + self.delay);
	}

	pub fn cancel(&mut self) {
		self.deadline = None;
	}

	pub fn is_pending(&self) -> bool {
		self.deadline.is_some()
	}

	/// Returns `true` exactly once when `now` reaches the deadline.
	pub fn fire_due(&mut self, now: f64) -> bool {
		match self.deadline {
			Some(deadline) if now >= deadline => {
				self.deadline = None;
				true
			}
			_ => false,
		}
	}
}
