pub mod clock;
pub mod disambiguator;
pub mod router;

pub use clock::{Clock, ManualClock, SystemClock};
pub use disambiguator::{ClickDisambiguator, ClickIntent, DEFAULT_DELAY};
pub use router::ClickRouter;
