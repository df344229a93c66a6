pub mod chart;
pub mod engine;
pub mod message;
pub mod progress;

pub use chart::{ChartRenderer, ChartStyle};
pub use engine::{PulseEngine, RunMode};
pub use message::MessageComposer;
pub use progress::{DateProgressCalculator, FixedClock, SystemClock};

pub use crate::domain::model::{ProgressSnapshot, RunReport};
pub use crate::domain::ports::{Clock, Publisher, Storage};
pub use crate::utils::error::Result;
