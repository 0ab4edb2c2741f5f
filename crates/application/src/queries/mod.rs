//! Read-only requests and their handlers.

pub mod accounts;
pub mod courses;

pub use accounts::{GetUser, GetUserHandler, GetUsers, GetUsersHandler};
pub use courses::{GetCourse, GetCourseHandler, GetCourses, GetCoursesHandler};
