//! 编排层（Orchestration Layer）
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<参与者>)
//!     ↓
//! workflow::CertificateFlow (处理单位参与者)
//!     ↓
//! services (能力层：render / convert)
//!     ↓
//! infrastructure (基础设施：CommandExecutor)
//! ```
//!
//! 编排层只做调度和统计，不做具体业务判断

pub mod batch_processor;

// 重新导出主要类型
pub use batch_processor::{App, BatchPaths};
