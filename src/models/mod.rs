pub mod loaders;
pub mod output;
pub mod report;

pub use loaders::{load_participants, parse_participants};
pub use output::{sanitize_file_stem, OutputAllocator, OutputPair};
pub use report::{BatchReport, ParticipantOutcome, ParticipantStatus};
