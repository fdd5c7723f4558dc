pub mod participant_loader;

pub use participant_loader::{load_participants, parse_participants};
