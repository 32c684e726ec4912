pub mod enums;
pub mod patient;
pub mod scan;
pub mod diagnosis;
pub mod prognosis;
pub mod radiation_plan;
pub mod biomarker;
pub mod alert;

pub use enums::*;
pub use patient::*;
pub use scan::*;
pub use diagnosis::*;
pub use prognosis::*;
pub use radiation_plan::*;
pub use biomarker::*;
pub use alert::*;
