mod commodity;
mod guid;
mod numeric;
mod timespec;

pub use commodity::Commodity;
pub use guid::{Guid, GuidDecodeError, GuidError};
pub use numeric::{Numeric, NumericError};
pub use timespec::Timespec;
