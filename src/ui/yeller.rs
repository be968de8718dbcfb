//! The yeller: once look mode is first engaged it shouts its phrase, then
//! repeats it after a random 2–3 s pause for as long as it is not muted.
//!
//! Time is passed in explicitly (`now` since app start) so the schedule is
//! driven by the frame loop and is trivially testable.

use std::time::Duration;

use log::{info, warn};
use rand::Rng;

pub const PHRASE: &str = "Cybersecurity!";
pub const MIN_DELAY_MS: u64 = 2000;
pub const MAX_DELAY_MS: u64 = 3000;

/// Speech output.  An unsupported announcer disables the yeller entirely.
pub trait Announcer {
    fn is_supported(&self) -> bool;
    fn speak(&mut self, text: &str);
    /// Drop anything queued but not yet spoken.
    fn cancel(&mut self);
}

/// Writes announcements to the log.
#[derive(Default)]
pub struct LogAnnouncer;

impl Announcer for LogAnnouncer {
    fn is_supported(&self) -> bool {
        true
    }

    fn speak(&mut self, text: &str) {
        info!("yeller: {text}");
    }

    fn cancel(&mut self) {}
}

/// No speech output available.
#[derive(Default)]
pub struct NullAnnouncer;

impl Announcer for NullAnnouncer {
    fn is_supported(&self) -> bool {
        false
    }

    fn speak(&mut self, _: &str) {}

    fn cancel(&mut self) {}
}

/// A single pending deadline.  Firing disarms it; re-arm to repeat.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PeriodicTask {
    due: Option<Duration>,
}

impl PeriodicTask {
    #[inline]
    pub fn arm(&mut self, at: Duration) {
        self.due = Some(at);
    }

    #[inline]
    pub fn cancel(&mut self) {
        self.due = None;
    }

    #[inline]
    pub fn due(&self) -> Option<Duration> {
        self.due
    }

    /// `true` exactly once when `now` reaches the deadline.
    pub fn fire(&mut self, now: Duration) -> bool {
        match self.due {
            Some(at) if now >= at => {
                self.due = None;
                true
            }
            _ => false,
        }
    }
}

pub struct Yeller<A, R> {
    announcer: A,
    rng: R,
    started: bool,
    muted: bool,
    task: PeriodicTask,
}

impl<A: Announcer, R: Rng> Yeller<A, R> {
    pub fn new(announcer: A, rng: R) -> Self {
        if !announcer.is_supported() {
            warn!("speech output unsupported; yeller disabled");
        }
        Self {
            announcer,
            rng,
            started: false,
            muted: false,
            task: PeriodicTask::default(),
        }
    }

    #[inline]
    pub fn is_supported(&self) -> bool {
        self.announcer.is_supported()
    }

    #[inline]
    pub fn muted(&self) -> bool {
        self.muted
    }

    #[inline]
    pub fn started(&self) -> bool {
        self.started
    }

    #[inline]
    pub fn next_due(&self) -> Option<Duration> {
        self.task.due()
    }

    #[inline]
    pub fn announcer(&self) -> &A {
        &self.announcer
    }

    fn schedule(&mut self, now: Duration) {
        if !self.is_supported() || self.muted {
            return;
        }
        let delay = self.rng.gen_range(MIN_DELAY_MS..=MAX_DELAY_MS);
        self.task.arm(now + Duration::from_millis(delay));
    }

    fn speak(&mut self) {
        if self.is_supported() {
            self.announcer.speak(PHRASE);
        }
    }

    /// First call starts the cycle (shouting right away unless muted);
    /// later calls do nothing.
    pub fn activate(&mut self, now: Duration) {
        if self.started {
            return;
        }
        self.started = true;
        if self.is_supported() && !self.muted {
            self.speak();
            self.schedule(now);
        }
    }

    /// Flip mute.  Muting cancels the timer and queued speech; unmuting
    /// reschedules when the cycle had already started.
    pub fn toggle_mute(&mut self, now: Duration) -> bool {
        self.muted = !self.muted;
        if self.muted {
            self.stop();
        } else if self.started && self.task.due().is_none() {
            self.schedule(now);
        }
        self.muted
    }

    /// Call once per frame.
    pub fn update(&mut self, now: Duration) {
        if self.task.fire(now) {
            self.speak();
            self.schedule(now);
        }
    }

    /// Teardown: nothing fires after this.
    pub fn stop(&mut self) {
        self.task.cancel();
        if self.is_supported() {
            self.announcer.cancel();
        }
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[derive(Default)]
    struct Recorder {
        spoken: Vec<String>,
        cancels: usize,
    }

    impl Announcer for Recorder {
        fn is_supported(&self) -> bool {
            true
        }
        fn speak(&mut self, text: &str) {
            self.spoken.push(text.to_string());
        }
        fn cancel(&mut self) {
            self.cancels += 1;
        }
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn yeller(seed: u64) -> Yeller<Recorder, StdRng> {
        Yeller::new(Recorder::default(), StdRng::seed_from_u64(seed))
    }

    #[test]
    fn nothing_before_activation() {
        let mut y = yeller(1);
        y.update(ms(60_000));
        assert!(y.announcer().spoken.is_empty());
        assert_eq!(y.next_due(), None);
    }

    #[test]
    fn activation_shouts_then_repeats_within_window() {
        let mut y = yeller(7);
        y.activate(ms(1000));
        assert_eq!(y.announcer().spoken, vec![PHRASE]);

        let mut last = ms(1000);
        for _ in 0..50 {
            let due = y.next_due().expect("armed");
            let gap = due - last;
            assert!(gap >= ms(MIN_DELAY_MS) && gap <= ms(MAX_DELAY_MS), "{gap:?}");
            y.update(due - ms(1));
            assert_eq!(y.next_due(), Some(due), "fired early");
            y.update(due);
            last = due;
        }
        assert_eq!(y.announcer().spoken.len(), 51);
    }

    #[test]
    fn activation_is_one_shot() {
        let mut y = yeller(3);
        y.activate(ms(0));
        y.activate(ms(10));
        assert_eq!(y.announcer().spoken.len(), 1);
    }

    #[test]
    fn mute_cancels_and_unmute_resumes() {
        let mut y = yeller(9);
        y.activate(ms(0));
        assert!(y.toggle_mute(ms(500)));
        assert_eq!(y.next_due(), None);
        assert_eq!(y.announcer().cancels, 1);
        y.update(ms(10_000));
        assert_eq!(y.announcer().spoken.len(), 1);

        assert!(!y.toggle_mute(ms(20_000)));
        let due = y.next_due().expect("rescheduled");
        assert!(due >= ms(22_000) && due <= ms(23_000));
        // unmuting does not shout immediately
        assert_eq!(y.announcer().spoken.len(), 1);
    }

    #[test]
    fn activated_while_muted_starts_on_unmute() {
        let mut y = yeller(5);
        y.toggle_mute(ms(0));
        y.activate(ms(100));
        assert!(y.started());
        assert!(y.announcer().spoken.is_empty());
        y.toggle_mute(ms(200));
        assert!(y.next_due().is_some());
    }

    #[test]
    fn unmute_before_start_stays_idle() {
        let mut y = yeller(5);
        y.toggle_mute(ms(0));
        y.toggle_mute(ms(10));
        assert_eq!(y.next_due(), None);
    }

    #[test]
    fn stop_prevents_further_callbacks() {
        let mut y = yeller(11);
        y.activate(ms(0));
        y.stop();
        y.update(ms(1_000_000));
        assert_eq!(y.announcer().spoken.len(), 1);
    }

    #[test]
    fn unsupported_speech_is_inert() {
        let mut y = Yeller::new(NullAnnouncer, StdRng::seed_from_u64(0));
        assert!(!y.is_supported());
        y.activate(ms(0));
        y.toggle_mute(ms(1));
        y.toggle_mute(ms(2));
        y.update(ms(100_000));
        assert_eq!(y.next_due(), None);
    }

    #[test]
    fn periodic_task_fires_once() {
        let mut t = PeriodicTask::default();
        t.arm(ms(5));
        assert!(!t.fire(ms(4)));
        assert!(t.fire(ms(5)));
        assert!(!t.fire(ms(6)));
    }
}
