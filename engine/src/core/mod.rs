pub mod format;
pub mod platform;
pub mod storage;
pub mod timing;
