pub mod zpool;
