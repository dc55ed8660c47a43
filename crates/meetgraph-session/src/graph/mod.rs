pub mod reconcile;
pub mod store;

pub use reconcile::{Applied, SyncReconciler};
pub use store::GraphStore;
