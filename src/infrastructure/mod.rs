pub mod pose;
pub mod storage;
