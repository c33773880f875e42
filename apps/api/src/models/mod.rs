pub mod match_result;
pub mod session;
