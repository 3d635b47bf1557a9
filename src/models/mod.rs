pub mod announcement;
pub mod center;
pub mod department;

pub use announcement::{Announcement, Coordinate, SlotIdentity};
pub use center::{AppointmentCenter, AppointmentSchedule, CenterLocation, CenterMetadata};
pub use department::Department;
