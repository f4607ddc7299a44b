/// Envelope-thickness model: pure interpolation logic, independent of the
/// loaded dataset.

pub mod thickness;
