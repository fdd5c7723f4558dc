pub mod certificate_ctx;
pub mod certificate_flow;

pub use certificate_ctx::CertificateCtx;
pub use certificate_flow::CertificateFlow;
