mod feedback;
mod session;

pub use feedback::{
    AlarmFeedback, FeedbackCall, FeedbackError, NotificationPermission, RecordingFeedback,
    SilentFeedback,
};
pub use session::{
    ActiveAlarm, AlarmSession, SessionSettings, SessionState, SimultaneousMode,
};
