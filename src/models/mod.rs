pub mod pool;
pub mod vdev;
