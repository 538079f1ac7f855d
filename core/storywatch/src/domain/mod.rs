//! storywatch 固有のドメイン型（型と不変条件）

pub mod command;
pub mod credentials;
pub mod match_mode;
pub mod redact;
pub mod report;
pub mod response;
pub mod session_descriptor;
pub mod settings;
pub mod story;

pub use command::{RunRequest, StoryWatchCommand};
pub use credentials::Credentials;
pub use match_mode::MatchMode;
pub use redact::Redactor;
pub use report::{NameFailure, ReconciliationReport};
pub use response::{FailureKind, InvocationResponse};
pub use session_descriptor::{SessionDescriptor, SessionFile};
pub use settings::{Settings, TableSettings};
pub use story::{AccountId, RecordId, Story, StoryId, Viewer};
