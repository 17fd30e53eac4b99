//! Domain services for the cricket club.
//!
//! Services contain business logic that operates on domain models.

pub mod clock;
pub mod fixtures;
pub mod notification;
pub mod otp;
pub mod registration;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use fixtures::FixtureService;
pub use notification::{MailError, MailKind, MailMessage, Mailer, RecordingMailer};
pub use otp::{OtpGenerator, RandomOtpGenerator, ScriptedOtpGenerator};
pub use registration::{
    CodeRequestOutcome, RegistrationError, RegistrationService, RegistrationSettings,
    FEATURED_PLAYER_COUNT,
};
pub use store::{FixtureStore, InMemoryStore, PlayerStore, StoreError, TempUserStore};
