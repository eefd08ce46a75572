pub mod candidate;
pub mod note;
pub mod stage;

pub use candidate::{CandidateSummary, TagSummary};
pub use note::Note;
pub use stage::Stage;
