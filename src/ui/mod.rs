pub mod input;
pub mod yeller;

pub use input::{Action, InputSampler, MouseLook};
pub use yeller::{Announcer, LogAnnouncer, NullAnnouncer, PeriodicTask, Yeller};
