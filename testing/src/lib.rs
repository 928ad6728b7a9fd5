pub mod error;
mod framework;
mod negotiation_record;
mod test_directory;

pub use error::FrameworkError;
pub use framework::Framework;
pub use negotiation_record::{NegotiationRecord, NegotiationRecordSync};
pub use test_directory::{prepare_test_dir, test_assets_dir};
