pub mod confidence;
pub mod correction;
pub mod recalled;
pub mod resolution;
pub mod vendor;

pub use confidence::Confidence;
pub use correction::{CorrectionKind, CorrectionMemory};
pub use recalled::RecalledMemories;
pub use resolution::{Resolution, ResolutionMemory};
pub use vendor::{FieldMapping, SkuMapping, TaxBehavior, VendorMemory};
