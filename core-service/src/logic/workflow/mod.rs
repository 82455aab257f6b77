//! Workflow Module - User-facing analysis sessions
//!
//! Hai state machine độc lập: phát hiện giọng nói trực tiếp và xác minh
//! người nói. Kết quả chỉ xuất hiện khi đã tổng hợp xong hoàn toàn.
//!
//! ## Structure
//! - `detection`: Idle -> Recording -> Processing -> Result
//! - `verification`: AwaitingSamples -> Ready -> Analyzing -> Decided

pub mod detection;
pub mod verification;


pub use detection::{format_elapsed, DetectionPhase, DetectionSnapshot, DetectionWorkflow};
pub use verification::{
    SampleSlot, VerificationPhase, VerificationSnapshot, VerificationWorkflow,
};
