// Domain models: decoded hub readings and the derived snapshots we publish

mod observation;
mod snapshot;

pub use observation::Observation;
pub use snapshot::Snapshot;
