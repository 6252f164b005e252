mod batch;
mod dashboard;

pub use batch::Batch;
pub use dashboard::Dashboard;
