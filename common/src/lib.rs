//! SkinAnalyzer Common Library
//!
//! CLIとWeb(WASM)で共有される解析フローの型・状態管理・表示ルール

pub mod camera;
pub mod display;
pub mod endpoint;
pub mod error;
pub mod parser;
pub mod session;
pub mod types;

pub use camera::{CameraGate, CameraSession, MediaTrack};
pub use display::{display_confidence, format_affected_area, format_confidence, format_percent};
pub use endpoint::{Endpoint, DEFAULT_BASE_URL, UPLOAD_FIELD};
pub use error::{Error, Result};
pub use parser::{ensure_success, parse_prediction_response};
pub use session::{AnalysisSession, Completion, RequestState, SubmitTicket};
pub use types::{AnalysisResult, ImageSource, SourceOrigin};
