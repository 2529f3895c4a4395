pub mod course;
pub mod personal_schedule;
pub mod ps_course;
pub mod todo;
pub mod user;

pub use course::{Course, GeneralEducation, Instructor, Section, TimeLocation};
pub use personal_schedule::{NewPersonalSchedule, PersonalSchedule};
pub use ps_course::{NewPsCourse, PsCourse};
pub use todo::{NewTodo, Todo};
pub use user::{NewUser, User};
