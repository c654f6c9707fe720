//! gocite-client: remote annotation service client.
//! The service loads models, turns paper text into GO-term records,
//! extracts text from PDFs and searches PubMed.

pub mod http;
pub mod prompt;
pub mod service;

pub use http::HttpAnnotationService;
pub use prompt::default_prompt;
pub use service::{AnnotationService, PubmedResult, PubmedSearch, ServiceError, Submission};
