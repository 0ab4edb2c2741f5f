//! State-changing requests and their handlers.

pub mod accounts;
pub mod courses;

pub use accounts::{ChangePassword, ChangePasswordHandler, SignUp, SignUpHandler};
pub use courses::{
    CreateCourse, CreateCourseHandler, DeleteCourse, DeleteCourseHandler, UpdateCourse, UpdateCourseHandler,
};
