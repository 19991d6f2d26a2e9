//! Domain model types.
//!
//! Entities as the storage layer owns them, the `New*`/`*Update` shapes the
//! handlers feed it, and the response DTOs that go back over the wire.

pub mod course;
pub mod experience;
pub mod purchase;
pub mod session;
pub mod user;

pub use course::{Course, CourseUpdate, NewCourse};
pub use experience::{Experience, ExperienceUpdate, NewExperience};
pub use purchase::{NewPurchase, Purchase};
pub use session::{CurrentUser, session_keys};
pub use user::{NewUser, User, UserResponse};
